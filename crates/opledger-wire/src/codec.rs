//! Noted-op record codec
//!
//! Record layout (little-endian):
//! - Byte 0: Presence flags (bit 0x02 = attribution tag present)
//! - Bytes 1-4: Op code (signed)
//! - Bytes 5..: Attribution tag as length-prefixed text, only if flagged

use bytes::{Buf, BufMut, Bytes, BytesMut};
use opledger_core::{LedgerError, LedgerResult, OperationRegistry, SyncNotedOp};

use crate::{get_text, put_text, text_encoded_len, PresenceFlags};

/// Presence flag size in bytes
pub const FLAGS_SIZE: usize = 1;

/// Op code size in bytes
pub const OP_CODE_SIZE: usize = 4;

/// Smallest possible record (no attribution tag)
pub const MIN_RECORD_SIZE: usize = FLAGS_SIZE + OP_CODE_SIZE;

/// Codec configuration
#[derive(Clone, Debug)]
pub struct WireConfig {
    /// Reject records with reserved flag bits set instead of ignoring them
    pub strict_flags: bool,
    /// Longest attribution tag accepted on decode, in bytes. `None` accepts
    /// any tag the input actually contains.
    pub max_tag_len: Option<usize>,
    /// Most records accepted in one batch
    pub max_batch_len: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        WireConfig {
            strict_flags: false,
            max_tag_len: None,
            max_batch_len: 1024,
        }
    }
}

/// Encoder/decoder for [`SyncNotedOp`] records
#[derive(Clone, Debug, Default)]
pub struct NotedOpCodec {
    config: WireConfig,
}

impl NotedOpCodec {
    pub fn new(config: WireConfig) -> Self {
        NotedOpCodec { config }
    }

    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    /// Exact encoded size of `op`
    pub fn encoded_len(&self, op: &SyncNotedOp) -> usize {
        MIN_RECORD_SIZE + op.attribution_tag().map_or(0, text_encoded_len)
    }

    /// Encode a record into a new buffer
    pub fn encode(&self, op: &SyncNotedOp) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len(op));
        self.encode_into(op, &mut buf);
        buf.freeze()
    }

    /// Append a record to `buf`
    pub fn encode_into<B: BufMut>(&self, op: &SyncNotedOp, buf: &mut B) {
        let mut flags = PresenceFlags::NONE;
        flags.set_attribution_tag(op.attribution_tag().is_some());

        buf.put_u8(flags.into());
        buf.put_slice(&op.op_code().to_bytes());
        if let Some(tag) = op.attribution_tag() {
            put_text(buf, tag);
        }
    }

    /// Read exactly one record from the front of `buf`.
    ///
    /// Structural checks run before the op code is range-checked against
    /// `registry`.
    pub fn read<B, R>(&self, buf: &mut B, registry: &R) -> LedgerResult<SyncNotedOp>
    where
        B: Buf,
        R: OperationRegistry + ?Sized,
    {
        if buf.remaining() < MIN_RECORD_SIZE {
            return Err(LedgerError::BufferTooShort {
                expected: MIN_RECORD_SIZE,
                actual: buf.remaining(),
            });
        }

        let flags = PresenceFlags::new(buf.get_u8());
        if self.config.strict_flags && flags.unknown_bits() != 0 {
            return Err(LedgerError::UnknownFlags(flags.0));
        }

        let op_code = buf.get_i32_le();
        let attribution_tag = if flags.has_attribution_tag() {
            Some(get_text(buf, self.config.max_tag_len)?)
        } else {
            None
        };

        SyncNotedOp::new(op_code, attribution_tag, registry)
    }

    /// Decode a buffer holding exactly one record
    pub fn decode<R>(&self, bytes: &[u8], registry: &R) -> LedgerResult<SyncNotedOp>
    where
        R: OperationRegistry + ?Sized,
    {
        let mut cursor = bytes;
        let op = self.read(&mut cursor, registry)?;
        ensure_consumed(cursor)?;
        Ok(op)
    }
}

pub(crate) fn ensure_consumed(rest: &[u8]) -> LedgerResult<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::MalformedData(format!(
            "{} trailing bytes after record",
            rest.len()
        )))
    }
}

/// Encode with the default configuration
pub fn encode(op: &SyncNotedOp) -> Bytes {
    NotedOpCodec::default().encode(op)
}

/// Decode with the default configuration
pub fn decode<R>(bytes: &[u8], registry: &R) -> LedgerResult<SyncNotedOp>
where
    R: OperationRegistry + ?Sized,
{
    NotedOpCodec::default().decode(bytes, registry)
}
