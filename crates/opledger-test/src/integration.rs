//! End-to-end delivery scenarios
//!
//! A simulated service notes operations while serving calls and ships them
//! back in its reply; the calling side's dispatcher decodes and delivers
//! them. Meanwhile worker threads note operations for themselves on the
//! same dispatcher.

use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use opledger_core::{LedgerResult, OpTable, OperationRegistry, SyncNotedOp};
use opledger_runtime::{DeliveryMode, NotedOpDispatcher};
use opledger_wire::NotedOpCodec;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fixtures::RecordingCallback;

// ============================================================================
// SIMULATED SERVICE
// ============================================================================

/// The far side of a cross-process call
pub struct SimulatedService {
    registry: Arc<OpTable>,
    codec: NotedOpCodec,
    rng: StdRng,
    /// Ops noted while serving the current call
    pending: Vec<SyncNotedOp>,
}

impl SimulatedService {
    pub fn new(registry: Arc<OpTable>, seed: u64) -> Self {
        SimulatedService {
            registry,
            codec: NotedOpCodec::default(),
            rng: StdRng::seed_from_u64(seed),
            pending: Vec::new(),
        }
    }

    /// Serve one call, noting `ops` random operations, and build the reply
    pub fn serve(&mut self, ops: usize) -> LedgerResult<Bytes> {
        for _ in 0..ops {
            let code = self.rng.gen_range(0..self.registry.op_count());
            let tag = if self.rng.gen_bool(0.5) {
                Some(format!("feature-{}", self.rng.gen_range(0..4)))
            } else {
                None
            };
            self.pending.push(SyncNotedOp::new(code, tag, &self.registry)?);
        }

        let reply = self.codec.encode_batch(&self.pending);
        self.pending.clear();
        reply
    }
}

// ============================================================================
// SCENARIO
// ============================================================================

#[derive(Clone, Debug)]
pub struct IntegrationTestConfig {
    /// Cross-process calls made
    pub calls: usize,
    /// Operations noted per call
    pub ops_per_call: usize,
    /// Worker threads noting for themselves
    pub self_noting_threads: usize,
    /// Self-notes per worker thread
    pub self_notes_per_thread: usize,
    pub seed: u64,
}

impl IntegrationTestConfig {
    pub fn minimal() -> Self {
        IntegrationTestConfig {
            calls: 1,
            ops_per_call: 1,
            self_noting_threads: 1,
            self_notes_per_thread: 1,
            seed: 7,
        }
    }

    pub fn standard() -> Self {
        IntegrationTestConfig {
            calls: 20,
            ops_per_call: 3,
            self_noting_threads: 4,
            self_notes_per_thread: 25,
            seed: 7,
        }
    }
}

#[derive(Debug, Default)]
pub struct IntegrationTestResult {
    pub expected_remote: usize,
    pub expected_self: usize,
    pub observed_remote: usize,
    pub observed_self: usize,
    /// Records whose name did not resolve to the expected registry entry
    pub misnamed: usize,
}

impl IntegrationTestResult {
    pub fn passed(&self) -> bool {
        self.expected_remote == self.observed_remote
            && self.expected_self == self.observed_self
            && self.misnamed == 0
    }
}

/// Run a full scenario against the standard registry
pub fn run_scenario(config: &IntegrationTestConfig) -> LedgerResult<IntegrationTestResult> {
    let registry = Arc::new(OpTable::standard());
    let dispatcher = Arc::new(NotedOpDispatcher::new(registry.clone()));
    let recorder = Arc::new(RecordingCallback::new());
    dispatcher.set_callback(recorder.clone())?;

    let workers: Vec<_> = (0..config.self_noting_threads)
        .map(|worker| {
            let dispatcher = dispatcher.clone();
            let notes = config.self_notes_per_thread;
            thread::spawn(move || -> LedgerResult<()> {
                let count = dispatcher.registry().op_count();
                for i in 0..notes {
                    let code = ((worker * notes + i) as i32) % count;
                    dispatcher.note_self(code, Some(format!("worker-{}", worker)))?;
                }
                Ok(())
            })
        })
        .collect();

    let mut service = SimulatedService::new(registry.clone(), config.seed);
    for _ in 0..config.calls {
        let reply = service.serve(config.ops_per_call)?;
        dispatcher.deliver_remote(&reply)?;
    }

    for worker in workers {
        match worker.join() {
            Ok(outcome) => outcome?,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    let misnamed = recorder
        .deliveries()
        .iter()
        .filter(|(op, _)| registry.op_by_name(op.op_name(&*registry)) != Some(op.op_code()))
        .count();

    Ok(IntegrationTestResult {
        expected_remote: config.calls * config.ops_per_call,
        expected_self: config.self_noting_threads * config.self_notes_per_thread,
        observed_remote: recorder.count(DeliveryMode::Remote),
        observed_self: recorder.count(DeliveryMode::SelfNoted),
        misnamed,
    })
}
