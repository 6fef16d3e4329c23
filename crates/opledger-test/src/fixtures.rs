//! Shared fixtures: fake registries, a recording observer, proptest strategies

use opledger_core::{OpTable, OperationRegistry, SyncNotedOp};
use opledger_runtime::{DeliveryMode, OnOpNotedCallback};
use parking_lot::Mutex;
use proptest::prelude::*;

/// Registry with `count` codes named `OP_0`, `OP_1`, ...
pub fn indexed_registry(count: usize) -> OpTable {
    OpTable::from_names((0..count).map(|i| format!("OP_{}", i)))
}

/// Indexed registry with one code renamed
pub fn registry_with(count: usize, code: usize, name: &str) -> OpTable {
    OpTable::from_names((0..count).map(|i| {
        if i == code {
            name.to_string()
        } else {
            format!("OP_{}", i)
        }
    }))
}

/// Observer that keeps every delivery in arrival order
#[derive(Default)]
pub struct RecordingCallback {
    seen: Mutex<Vec<(SyncNotedOp, DeliveryMode)>>,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<(SyncNotedOp, DeliveryMode)> {
        self.seen.lock().clone()
    }

    pub fn count(&self, mode: DeliveryMode) -> usize {
        self.seen.lock().iter().filter(|(_, m)| *m == mode).count()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}

impl OnOpNotedCallback for RecordingCallback {
    fn on_noted(&self, op: &SyncNotedOp) {
        self.seen.lock().push((op.clone(), DeliveryMode::Remote));
    }

    fn on_self_noted(&self, op: &SyncNotedOp) {
        self.seen.lock().push((op.clone(), DeliveryMode::SelfNoted));
    }
}

/// Absent, empty, ASCII, non-ASCII and multi-kilobyte tags
pub fn arb_attribution_tag() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => Just(None),
        3 => Just(Some(String::new())),
        3 => "[a-z_]{1,16}".prop_map(Some),
        3 => "\\PC{1,12}".prop_map(Some),
        1 => "[a-z]{4097,5000}".prop_map(Some),
    ]
}

/// Valid records for `registry`
pub fn arb_noted_op(registry: OpTable) -> impl Strategy<Value = SyncNotedOp> {
    let count = registry.op_count().max(1);
    (0..count, arb_attribution_tag()).prop_filter_map("code outside registry", move |(code, tag)| {
        SyncNotedOp::new(code, tag, &registry).ok()
    })
}
