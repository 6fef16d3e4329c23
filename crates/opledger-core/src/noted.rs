//! Synchronously noted operations
//!
//! A [`SyncNotedOp`] describes an operation that was recorded against the
//! access-control ledger for the current execution context. It is handed to
//! an observer either after a cross-process call or when the context notes
//! an operation for itself.
//!
//! Values are immutable. The only ways to obtain one are [`SyncNotedOp::new`]
//! and the wire decoder, which goes through `new` as well, so every live
//! value carries a code that was in range when it was created.

use std::fmt;

use crate::{LedgerResult, OpCode, OperationRegistry};

/// An operation recorded synchronously for the current context
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SyncNotedOp {
    op: OpCode,
    attribution_tag: Option<String>,
}

impl SyncNotedOp {
    /// Validate `op_code` against the registry and build the record.
    ///
    /// Fails with [`crate::LedgerError::OutOfRange`] when the code is negative
    /// or not below `registry.op_count()`.
    pub fn new<R>(op_code: i32, attribution_tag: Option<String>, registry: &R) -> LedgerResult<Self>
    where
        R: OperationRegistry + ?Sized,
    {
        let op = registry.check_op(op_code)?;
        Ok(SyncNotedOp {
            op,
            attribution_tag,
        })
    }

    /// The raw op code
    #[inline]
    pub fn op_code(&self) -> OpCode {
        self.op
    }

    /// Public name of the noted operation.
    ///
    /// # Panics
    ///
    /// Panics if the registry has no name for a code inside its own range.
    pub fn op_name<'r, R>(&self, registry: &'r R) -> &'r str
    where
        R: OperationRegistry + ?Sized,
    {
        match registry.op_name(self.op) {
            Some(name) => name,
            None => panic!(
                "registry inconsistency: no public name for in-range {} (op count {})",
                self.op,
                registry.op_count()
            ),
        }
    }

    /// Attribution tag of the noted operation, if any
    #[inline]
    pub fn attribution_tag(&self) -> Option<&str> {
        self.attribution_tag.as_deref()
    }

    /// Process-independent fingerprint consistent with equality.
    ///
    /// `h = 31 * (31 + code) + tag_hash`, wrapping, where `tag_hash` is 0 for
    /// an absent tag and the 31-polynomial over its UTF-16 units otherwise.
    pub fn fingerprint(&self) -> u32 {
        let mut hash: u32 = 1;
        hash = hash.wrapping_mul(31).wrapping_add(self.op.0 as u32);
        hash = hash
            .wrapping_mul(31)
            .wrapping_add(self.attribution_tag.as_deref().map_or(0, text_hash));
        hash
    }
}

fn text_hash(text: &str) -> u32 {
    text.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

impl fmt::Display for SyncNotedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribution_tag {
            Some(tag) => write!(f, "{}@{}", self.op, tag),
            None => write!(f, "{}", self.op),
        }
    }
}
