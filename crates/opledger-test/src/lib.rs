//! opledger Test Harness - Fixtures, codec fuzzing and delivery scenarios
//!
//! This crate provides:
//! - Fake registries and a recording observer
//! - Proptest strategies for valid records
//! - Mutation fuzzing of the decoder
//! - End-to-end remote and self-noted delivery scenarios

pub mod codec_fuzzer;
pub mod fixtures;
pub mod integration;

pub use codec_fuzzer::*;
pub use fixtures::*;
pub use integration::*;
