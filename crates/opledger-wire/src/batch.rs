//! Batches of noted-op records
//!
//! A cross-process reply can carry every operation noted while serving it.
//! Format: [COUNT:4 LE][RECORD]*COUNT

use bytes::{Buf, BufMut, Bytes, BytesMut};
use opledger_core::{LedgerError, LedgerResult, OperationRegistry, SyncNotedOp};

use crate::codec::{ensure_consumed, MIN_RECORD_SIZE};
use crate::NotedOpCodec;

/// Size of the batch count prefix
pub const BATCH_COUNT_SIZE: usize = 4;

impl NotedOpCodec {
    /// Encode a batch of records.
    ///
    /// Fails with `BatchTooLarge` rather than emit a batch this codec's own
    /// `decode_batch` would refuse.
    pub fn encode_batch(&self, ops: &[SyncNotedOp]) -> LedgerResult<Bytes> {
        let max = self.config().max_batch_len;
        let count = u32::try_from(ops.len())
            .ok()
            .filter(|&count| count as usize <= max)
            .ok_or(LedgerError::BatchTooLarge { count: ops.len(), max })?;

        let len = BATCH_COUNT_SIZE + ops.iter().map(|op| self.encoded_len(op)).sum::<usize>();
        let mut buf = BytesMut::with_capacity(len);

        buf.put_u32_le(count);
        for op in ops {
            self.encode_into(op, &mut buf);
        }
        Ok(buf.freeze())
    }

    /// Decode a buffer holding exactly one batch.
    ///
    /// Any bad record fails the whole batch.
    pub fn decode_batch<R>(&self, bytes: &[u8], registry: &R) -> LedgerResult<Vec<SyncNotedOp>>
    where
        R: OperationRegistry + ?Sized,
    {
        let mut cursor = bytes;
        if cursor.remaining() < BATCH_COUNT_SIZE {
            return Err(LedgerError::BufferTooShort {
                expected: BATCH_COUNT_SIZE,
                actual: cursor.remaining(),
            });
        }

        let count = cursor.get_u32_le() as usize;
        let max = self.config().max_batch_len;
        if count > max {
            return Err(LedgerError::BatchTooLarge { count, max });
        }

        // Every record takes at least MIN_RECORD_SIZE bytes
        let mut ops = Vec::with_capacity(count.min(cursor.remaining() / MIN_RECORD_SIZE));
        for _ in 0..count {
            ops.push(self.read(&mut cursor, registry)?);
        }
        ensure_consumed(cursor)?;

        Ok(ops)
    }
}
