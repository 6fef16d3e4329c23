//! opledger Runtime - Delivery channel for noted operations
//!
//! A noted operation reaches the observer one of two ways:
//! - Remote: decoded from the reply of a cross-process call
//! - Self-noted: recorded by the same context that observes it
//!
//! The dispatcher validates every record before the observer sees it and
//! never holds its lock while the observer runs.

pub mod callback;
pub mod dispatcher;
pub mod logging;

pub use callback::*;
pub use dispatcher::*;
pub use logging::*;
