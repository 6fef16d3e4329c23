//! Operation registry contract
//!
//! The registry is the authority on which op codes exist and what they are
//! called publicly. Every code in `0..op_count()` must have a name; the
//! record types in this crate rely on that and treat a gap as a bug in the
//! registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{LedgerError, LedgerResult, OpCode};

/// Maps op codes to public names and publishes the valid code range.
pub trait OperationRegistry: Send + Sync {
    /// Total number of known operations (`N`). Valid codes are `0..N`.
    fn op_count(&self) -> i32;

    /// Public name of a code inside the valid range.
    fn op_name(&self, code: OpCode) -> Option<&str>;

    /// Range-check a raw code against the live operation count.
    fn check_op(&self, code: i32) -> LedgerResult<OpCode> {
        let count = self.op_count();
        if code < 0 || code >= count {
            return Err(LedgerError::OutOfRange { code, count });
        }
        Ok(OpCode(code))
    }
}

impl<R: OperationRegistry + ?Sized> OperationRegistry for &R {
    fn op_count(&self) -> i32 {
        (**self).op_count()
    }

    fn op_name(&self, code: OpCode) -> Option<&str> {
        (**self).op_name(code)
    }
}

impl<R: OperationRegistry + ?Sized> OperationRegistry for Arc<R> {
    fn op_count(&self) -> i32 {
        (**self).op_count()
    }

    fn op_name(&self, code: OpCode) -> Option<&str> {
        (**self).op_name(code)
    }
}

/// Well-known access-control operations, in code order.
const STANDARD_OPS: &[&str] = &[
    "COARSE_LOCATION",
    "FINE_LOCATION",
    "GPS",
    "VIBRATE",
    "READ_CONTACTS",
    "WRITE_CONTACTS",
    "READ_CALL_LOG",
    "WRITE_CALL_LOG",
    "READ_CALENDAR",
    "WRITE_CALENDAR",
    "WIFI_SCAN",
    "POST_NOTIFICATION",
    "NEIGHBORING_CELLS",
    "CALL_PHONE",
    "READ_SMS",
    "WRITE_SMS",
    "RECEIVE_SMS",
    "RECEIVE_EMERGENCY_BROADCAST",
    "RECEIVE_MMS",
    "RECEIVE_WAP_PUSH",
    "SEND_SMS",
    "READ_ICC_SMS",
    "WRITE_ICC_SMS",
    "WRITE_SETTINGS",
    "SYSTEM_ALERT_WINDOW",
    "ACCESS_NOTIFICATIONS",
    "CAMERA",
    "RECORD_AUDIO",
];

/// Immutable table-backed registry
#[derive(Clone, Debug, Default)]
pub struct OpTable {
    names: Vec<String>,
    by_name: HashMap<String, OpCode>,
}

impl OpTable {
    /// Build a table where the name at index `i` is the name of code `i`.
    ///
    /// Duplicate names keep their first code for reverse lookup. Tables
    /// longer than `i32::MAX` entries are truncated to the addressable range.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.truncate(i32::MAX as usize);

        let mut by_name = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            by_name.entry(name.clone()).or_insert(OpCode(idx as i32));
        }

        OpTable { names, by_name }
    }

    /// The built-in table of well-known operations
    pub fn standard() -> Self {
        OpTable::from_names(STANDARD_OPS.iter().copied())
    }

    /// Reverse lookup from public name to code
    pub fn op_by_name(&self, name: &str) -> Option<OpCode> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All names in code order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl OperationRegistry for OpTable {
    fn op_count(&self) -> i32 {
        self.names.len() as i32
    }

    fn op_name(&self, code: OpCode) -> Option<&str> {
        let idx = usize::try_from(code.0).ok()?;
        self.names.get(idx).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_op_bounds() {
        let table = OpTable::from_names(["A", "B", "C"]);

        assert_eq!(table.check_op(0), Ok(OpCode(0)));
        assert_eq!(table.check_op(2), Ok(OpCode(2)));
        assert_eq!(
            table.check_op(3),
            Err(LedgerError::OutOfRange { code: 3, count: 3 })
        );
        assert_eq!(
            table.check_op(-1),
            Err(LedgerError::OutOfRange { code: -1, count: 3 })
        );
    }

    #[test]
    fn test_empty_table_rejects_everything() {
        let table = OpTable::default();
        assert!(table.is_empty());
        assert!(table.check_op(0).is_err());
    }

    #[test]
    fn test_name_lookup() {
        let table = OpTable::standard();
        let code = table.op_by_name("RECORD_AUDIO").unwrap();

        assert_eq!(code, OpCode(27));
        assert_eq!(table.op_name(code), Some("RECORD_AUDIO"));
        assert_eq!(table.op_name(OpCode(-4)), None);
        assert_eq!(table.op_name(OpCode(table.op_count())), None);
    }

    #[test]
    fn test_duplicate_name_keeps_first_code() {
        let table = OpTable::from_names(["X", "Y", "X"]);
        assert_eq!(table.op_count(), 3);
        assert_eq!(table.op_by_name("X"), Some(OpCode(0)));
        assert_eq!(table.op_name(OpCode(2)), Some("X"));
    }

    #[test]
    fn test_forwarding_impls() {
        let table = Arc::new(OpTable::from_names(["A", "B"]));
        let by_ref = &table;

        assert_eq!(by_ref.op_count(), 2);
        assert_eq!(table.op_name(OpCode(1)), Some("B"));
        assert!(table.check_op(2).is_err());
    }
}
