//! Operation identity
//!
//! Op codes are signed 32-bit on the wire. Only a registry decides which
//! values are valid, so an `OpCode` is a plain wrapper until it has been
//! checked by [`crate::OperationRegistry::check_op`].

use std::fmt;

/// Numeric identifier of an access-control-sensitive operation type
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct OpCode(pub i32);

impl OpCode {
    pub const ZERO: OpCode = OpCode(0);

    #[inline]
    pub fn new(code: i32) -> Self {
        OpCode(code)
    }

    #[inline]
    pub fn get(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        OpCode(i32::from_le_bytes(bytes))
    }
}

impl fmt::Debug for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Op({})", self.0)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

impl From<OpCode> for i32 {
    fn from(code: OpCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_code_roundtrip() {
        let code = OpCode::new(-12345);
        assert_eq!(OpCode::from_bytes(code.to_bytes()), code);
    }

    #[test]
    fn test_op_code_le_layout() {
        assert_eq!(OpCode::new(5).to_bytes(), [5, 0, 0, 0]);
        assert_eq!(OpCode::new(-1).to_bytes(), [0xFF; 4]);
    }
}
