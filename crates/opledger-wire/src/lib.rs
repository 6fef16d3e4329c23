//! opledger Wire - Binary format for noted-op records
//!
//! This crate implements the wire format used to carry a SyncNotedOp
//! across a process boundary:
//! - Presence flags (1 byte)
//! - Op code (4 bytes, signed LE)
//! - Optional length-prefixed attribution tag
//! - Counted batches of records

pub mod batch;
pub mod codec;
pub mod flags;
pub mod text;

pub use batch::*;
pub use codec::*;
pub use flags::*;
pub use text::*;
