//! Noted-op dispatcher
//!
//! Holds at most one observer and routes validated records to it.

use std::sync::Arc;

use bytes::Bytes;
use opledger_core::{LedgerError, LedgerResult, OperationRegistry, SyncNotedOp};
use opledger_wire::{NotedOpCodec, WireConfig};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::{DeliveryMode, OnOpNotedCallback};

/// Dispatcher configuration
#[derive(Clone, Debug, Default)]
pub struct DispatcherConfig {
    /// Codec settings for remote replies
    pub wire: WireConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered_remote: u64,
    pub delivered_self: u64,
    /// Valid records seen while no observer was registered
    pub dropped: u64,
    /// Inputs refused by validation or decoding
    pub rejected: u64,
}

/// Outcome of routing one record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// No observer registered
    Dropped,
}

pub struct NotedOpDispatcher<R> {
    registry: R,
    codec: NotedOpCodec,
    callback: RwLock<Option<Arc<dyn OnOpNotedCallback>>>,
    stats: Mutex<DispatchStats>,
}

impl<R: OperationRegistry> NotedOpDispatcher<R> {
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, DispatcherConfig::default())
    }

    pub fn with_config(registry: R, config: DispatcherConfig) -> Self {
        NotedOpDispatcher {
            registry,
            codec: NotedOpCodec::new(config.wire),
            callback: RwLock::new(None),
            stats: Mutex::new(DispatchStats::default()),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Register the observer. Only one may be registered at a time.
    pub fn set_callback(&self, callback: Arc<dyn OnOpNotedCallback>) -> LedgerResult<()> {
        let mut slot = self.callback.write();
        if slot.is_some() {
            return Err(LedgerError::CallbackAlreadySet);
        }
        *slot = Some(callback);
        debug!("noted-op callback registered");
        Ok(())
    }

    /// Remove the observer, returning whether one was registered
    pub fn clear_callback(&self) -> bool {
        let removed = self.callback.write().take().is_some();
        if removed {
            debug!("noted-op callback cleared");
        }
        removed
    }

    pub fn has_callback(&self) -> bool {
        self.callback.read().is_some()
    }

    /// Record an operation noted by the current context for itself
    pub fn note_self(&self, op_code: i32, attribution_tag: Option<String>) -> LedgerResult<Delivery> {
        let op = SyncNotedOp::new(op_code, attribution_tag, &self.registry)
            .map_err(|e| self.reject(e))?;
        Ok(self.dispatch(&op, DeliveryMode::SelfNoted))
    }

    /// Encode the operations noted while serving a call, for the reply.
    ///
    /// More than `max_batch_len` operations is refused, since the receiving
    /// side would reject the whole reply.
    pub fn encode_remote(&self, ops: &[SyncNotedOp]) -> LedgerResult<Bytes> {
        self.codec.encode_batch(ops).map_err(|e| self.reject(e))
    }

    /// Decode a cross-process reply and deliver each record.
    ///
    /// Returns how many records reached the observer. A malformed reply is
    /// rejected whole and nothing from it is delivered.
    pub fn deliver_remote(&self, reply: &[u8]) -> LedgerResult<usize> {
        let ops = self
            .codec
            .decode_batch(reply, &self.registry)
            .map_err(|e| self.reject(e))?;

        let mut delivered = 0;
        for op in &ops {
            if self.dispatch(op, DeliveryMode::Remote) == Delivery::Delivered {
                delivered += 1;
            }
        }
        Ok(delivered)
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats.lock().clone()
    }

    fn dispatch(&self, op: &SyncNotedOp, mode: DeliveryMode) -> Delivery {
        // Clone out so the observer runs without the lock held
        let callback = self.callback.read().clone();
        let Some(callback) = callback else {
            self.stats.lock().dropped += 1;
            debug!(op = %op.op_code(), %mode, "no callback registered, noted op dropped");
            return Delivery::Dropped;
        };

        match mode {
            DeliveryMode::Remote => callback.on_noted(op),
            DeliveryMode::SelfNoted => callback.on_self_noted(op),
        }

        {
            let mut stats = self.stats.lock();
            match mode {
                DeliveryMode::Remote => stats.delivered_remote += 1,
                DeliveryMode::SelfNoted => stats.delivered_self += 1,
            }
        }
        debug!(
            op = op.op_name(&self.registry),
            attribution_tag = ?op.attribution_tag(),
            %mode,
            "noted op delivered"
        );
        Delivery::Delivered
    }

    fn reject(&self, err: LedgerError) -> LedgerError {
        self.stats.lock().rejected += 1;
        warn!(error = %err, "noted op rejected");
        err
    }
}
