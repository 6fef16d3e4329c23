//! opledger Core - Recorded operation value type and its collaborators
//!
//! This crate defines:
//! - Operation identity (OpCode)
//! - The operation registry contract and a table-backed registry
//! - The immutable SyncNotedOp record
//! - Error types shared by the other opledger crates

pub mod error;
pub mod id;
pub mod noted;
pub mod registry;

pub use error::*;
pub use id::*;
pub use noted::*;
pub use registry::*;
