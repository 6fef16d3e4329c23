//! Error types for opledger

use thiserror::Error;

/// Core opledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // Validation errors
    #[error("Op code {code} out of range: valid codes are 0..{count}")]
    OutOfRange { code: i32, count: i32 },

    // Wire errors
    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error("Unknown presence flags: {0:#04x}")]
    UnknownFlags(u8),

    #[error("Batch too large: {count} records, max {max}")]
    BatchTooLarge { count: usize, max: usize },

    // Delivery errors
    #[error("Another noted-op callback is already registered")]
    CallbackAlreadySet,
}

impl LedgerError {
    /// True for every error raised because the input bytes were structurally bad.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            LedgerError::BufferTooShort { .. }
                | LedgerError::MalformedData(_)
                | LedgerError::UnknownFlags(_)
                | LedgerError::BatchTooLarge { .. }
        )
    }

    #[inline]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, LedgerError::OutOfRange { .. })
    }
}

/// Result type for opledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_grouping() {
        assert!(LedgerError::BufferTooShort { expected: 5, actual: 1 }.is_malformed());
        assert!(LedgerError::MalformedData("x".into()).is_malformed());
        assert!(LedgerError::UnknownFlags(0x80).is_malformed());
        assert!(!LedgerError::OutOfRange { code: -1, count: 10 }.is_malformed());
        assert!(!LedgerError::CallbackAlreadySet.is_malformed());
    }

    #[test]
    fn test_display() {
        let err = LedgerError::OutOfRange { code: 12, count: 12 };
        assert_eq!(err.to_string(), "Op code 12 out of range: valid codes are 0..12");
    }
}
