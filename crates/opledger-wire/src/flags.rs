//! Presence flags for noted-op records

/// Presence flags (1 byte, first byte of every record)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresenceFlags(pub u8);

impl PresenceFlags {
    pub const NONE: PresenceFlags = PresenceFlags(0);

    // Flag bits
    pub const ATTRIBUTION_TAG: u8 = 0b0000_0010;

    /// Every bit this version of the format assigns a meaning to
    pub const KNOWN: u8 = Self::ATTRIBUTION_TAG;

    #[inline]
    pub fn new(bits: u8) -> Self {
        PresenceFlags(bits)
    }

    #[inline]
    pub fn has_attribution_tag(self) -> bool {
        self.0 & Self::ATTRIBUTION_TAG != 0
    }

    #[inline]
    pub fn set_attribution_tag(&mut self, value: bool) {
        if value {
            self.0 |= Self::ATTRIBUTION_TAG;
        } else {
            self.0 &= !Self::ATTRIBUTION_TAG;
        }
    }

    /// Reserved bits that are set
    #[inline]
    pub fn unknown_bits(self) -> u8 {
        self.0 & !Self::KNOWN
    }
}

impl From<u8> for PresenceFlags {
    fn from(bits: u8) -> Self {
        PresenceFlags(bits)
    }
}

impl From<PresenceFlags> for u8 {
    fn from(flags: PresenceFlags) -> Self {
        flags.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_operations() {
        let mut flags = PresenceFlags::NONE;

        assert!(!flags.has_attribution_tag());
        flags.set_attribution_tag(true);
        assert!(flags.has_attribution_tag());
        assert_eq!(u8::from(flags), 0x02);

        flags.set_attribution_tag(false);
        assert_eq!(flags, PresenceFlags::NONE);
    }

    #[test]
    fn test_unknown_bits() {
        assert_eq!(PresenceFlags(0x02).unknown_bits(), 0);
        assert_eq!(PresenceFlags(0x83).unknown_bits(), 0x81);

        let flags = PresenceFlags::from(0xFF);
        assert!(flags.has_attribution_tag());
    }
}
