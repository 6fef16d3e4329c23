//! Codec Fuzzer - Mutation testing for the noted-op decoder
//!
//! Encodes random valid records, corrupts some of them, and checks:
//! - Untouched encodings always decode back to the original
//! - Every accepted record carries an in-range op code
//! - Corrupted input is rejected with an error, never a panic

use opledger_core::{LedgerError, OpTable, OperationRegistry, SyncNotedOp};
use opledger_wire::{NotedOpCodec, WireConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fixtures::indexed_registry;

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct CodecFuzzerConfig {
    /// Number of records to generate
    pub iterations: usize,
    /// Size of the registry decoded against
    pub op_count: usize,
    /// Longest generated attribution tag
    pub max_tag_len: usize,
    /// Probability a record is corrupted before decoding (0.0 - 1.0)
    pub mutation_prob: f64,
    /// Reject reserved flag bits
    pub strict_flags: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for CodecFuzzerConfig {
    fn default() -> Self {
        CodecFuzzerConfig {
            iterations: 1000,
            op_count: 32,
            max_tag_len: 24,
            mutation_prob: 0.3,
            strict_flags: false,
            seed: 42,
        }
    }
}

impl CodecFuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        CodecFuzzerConfig {
            iterations: 100,
            mutation_prob: 0.2,
            ..Default::default()
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        CodecFuzzerConfig {
            iterations: 20_000,
            op_count: 128,
            max_tag_len: 64,
            mutation_prob: 0.5,
            ..Default::default()
        }
    }

    /// Every input corrupted, strict flag checking
    pub fn adversarial() -> Self {
        CodecFuzzerConfig {
            iterations: 5000,
            mutation_prob: 1.0,
            strict_flags: true,
            ..Default::default()
        }
    }
}

/// Ways a buffer gets corrupted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    FlipByte,
    Truncate,
    AppendGarbage,
    RewriteCode,
    RewriteFlags,
}

impl Mutation {
    const ALL: [Mutation; 5] = [
        Mutation::FlipByte,
        Mutation::Truncate,
        Mutation::AppendGarbage,
        Mutation::RewriteCode,
        Mutation::RewriteFlags,
    ];
}

/// Codec fuzzer
pub struct CodecFuzzer {
    config: CodecFuzzerConfig,
    registry: OpTable,
    codec: NotedOpCodec,
    rng: StdRng,
}

impl CodecFuzzer {
    /// Create a new fuzzer
    pub fn new(config: CodecFuzzerConfig) -> Self {
        let codec = NotedOpCodec::new(WireConfig {
            strict_flags: config.strict_flags,
            ..Default::default()
        });

        CodecFuzzer {
            registry: indexed_registry(config.op_count),
            codec,
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    /// Generate a random valid record
    fn generate_op(&mut self) -> Option<SyncNotedOp> {
        let code = self.rng.gen_range(0..self.registry.op_count().max(1));
        let tag = if self.rng.gen_bool(0.5) {
            let len = self.rng.gen_range(0..=self.config.max_tag_len);
            Some(
                (0..len)
                    .map(|_| char::from(self.rng.gen_range(b'a'..=b'z')))
                    .collect(),
            )
        } else {
            None
        };
        SyncNotedOp::new(code, tag, &self.registry).ok()
    }

    fn mutate(&mut self, bytes: &mut Vec<u8>) -> Mutation {
        let mutation = Mutation::ALL[self.rng.gen_range(0..Mutation::ALL.len())];
        match mutation {
            Mutation::FlipByte => {
                let idx = self.rng.gen_range(0..bytes.len());
                bytes[idx] ^= self.rng.gen_range(1..=u8::MAX);
            }
            Mutation::Truncate => {
                let keep = self.rng.gen_range(0..bytes.len());
                bytes.truncate(keep);
            }
            Mutation::AppendGarbage => {
                let extra = self.rng.gen_range(1..8);
                for _ in 0..extra {
                    bytes.push(self.rng.gen());
                }
            }
            Mutation::RewriteCode => {
                let code: i32 = self.rng.gen();
                bytes[1..5].copy_from_slice(&code.to_le_bytes());
            }
            Mutation::RewriteFlags => {
                bytes[0] = self.rng.gen();
            }
        }
        mutation
    }

    /// Run the fuzzer
    pub fn run(&mut self) -> FuzzResult {
        let mut result = FuzzResult::new();

        for _ in 0..self.config.iterations {
            let Some(op) = self.generate_op() else {
                continue;
            };
            result.iterations += 1;

            let mut bytes = self.codec.encode(&op).to_vec();
            let mutation = if self.rng.gen_bool(self.config.mutation_prob) {
                Some(self.mutate(&mut bytes))
            } else {
                None
            };

            match self.codec.decode(&bytes, &self.registry) {
                Ok(decoded) => {
                    result.accepted += 1;
                    if self.registry.check_op(decoded.op_code().get()).is_err() {
                        result.range_violations += 1;
                    }
                    if mutation.is_none() && decoded != op {
                        result.roundtrip_failures += 1;
                    }
                }
                Err(err) => {
                    if mutation.is_none() {
                        result.roundtrip_failures += 1;
                    }
                    result.record_rejection(&err);
                }
            }
        }

        result
    }
}

/// Fuzzing result
#[derive(Debug, Default)]
pub struct FuzzResult {
    pub iterations: u64,
    pub accepted: u64,
    pub rejected_malformed: u64,
    pub rejected_range: u64,
    pub rejected_other: u64,
    /// Clean encodings that failed to decode to the original
    pub roundtrip_failures: u64,
    /// Accepted records whose code is outside the registry
    pub range_violations: u64,
}

impl FuzzResult {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_rejection(&mut self, err: &LedgerError) {
        if err.is_malformed() {
            self.rejected_malformed += 1;
        } else if err.is_out_of_range() {
            self.rejected_range += 1;
        } else {
            self.rejected_other += 1;
        }
    }

    pub fn rejected(&self) -> u64 {
        self.rejected_malformed + self.rejected_range + self.rejected_other
    }

    pub fn is_valid(&self) -> bool {
        self.roundtrip_failures == 0 && self.range_violations == 0 && self.rejected_other == 0
    }
}

/// Property helpers for record equality
pub mod properties {
    use super::*;

    /// Property: equality is reflexive
    #[allow(clippy::eq_op)]
    pub fn eq_reflexive(a: &SyncNotedOp) -> bool {
        a == a
    }

    /// Property: equality is symmetric
    pub fn eq_symmetric(a: &SyncNotedOp, b: &SyncNotedOp) -> bool {
        (a == b) == (b == a)
    }

    /// Property: equality is transitive
    pub fn eq_transitive(a: &SyncNotedOp, b: &SyncNotedOp, c: &SyncNotedOp) -> bool {
        !(a == b && b == c) || a == c
    }

    /// Property: equal records share a fingerprint
    pub fn fingerprint_consistent(a: &SyncNotedOp, b: &SyncNotedOp) -> bool {
        a != b || a.fingerprint() == b.fingerprint()
    }
}
