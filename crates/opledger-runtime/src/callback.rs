//! Observer interface for noted operations

use std::fmt;

use opledger_core::SyncNotedOp;

/// How a noted operation reached the observer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryMode {
    /// Decoded from a cross-process reply
    Remote,
    /// Noted by the observing context for itself
    SelfNoted,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Remote => write!(f, "remote"),
            DeliveryMode::SelfNoted => write!(f, "self"),
        }
    }
}

/// Caller-supplied observer.
///
/// Called synchronously on the thread that delivered the record.
pub trait OnOpNotedCallback: Send + Sync {
    /// An operation was noted while serving a cross-process call
    fn on_noted(&self, op: &SyncNotedOp);

    /// The current context noted an operation for itself
    fn on_self_noted(&self, op: &SyncNotedOp);
}

/// Adapts a closure into an observer that ignores the delivery mode split
pub struct FnCallback<F>(pub F);

impl<F> OnOpNotedCallback for FnCallback<F>
where
    F: Fn(&SyncNotedOp, DeliveryMode) + Send + Sync,
{
    fn on_noted(&self, op: &SyncNotedOp) {
        (self.0)(op, DeliveryMode::Remote)
    }

    fn on_self_noted(&self, op: &SyncNotedOp) {
        (self.0)(op, DeliveryMode::SelfNoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opledger_core::OpTable;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fn_callback_routes_modes() {
        let remote = AtomicUsize::new(0);
        let local = AtomicUsize::new(0);
        let callback = FnCallback(|_: &SyncNotedOp, mode: DeliveryMode| {
            let counter = match mode {
                DeliveryMode::Remote => &remote,
                DeliveryMode::SelfNoted => &local,
            };
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let reg = OpTable::standard();
        let op = SyncNotedOp::new(0, None, &reg).unwrap();
        callback.on_noted(&op);
        callback.on_self_noted(&op);
        callback.on_self_noted(&op);

        assert_eq!(remote.load(Ordering::SeqCst), 1);
        assert_eq!(local.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(DeliveryMode::Remote.to_string(), "remote");
        assert_eq!(DeliveryMode::SelfNoted.to_string(), "self");
    }
}
