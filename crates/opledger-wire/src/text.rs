//! Length-prefixed text
//!
//! Format: [LEN:4 LE][UTF-8 bytes:LEN]

use bytes::{Buf, BufMut};
use opledger_core::{LedgerError, LedgerResult};

/// Size of the length prefix
pub const TEXT_LEN_SIZE: usize = 4;

/// Encoded size of `text`
#[inline]
pub fn text_encoded_len(text: &str) -> usize {
    TEXT_LEN_SIZE + text.len()
}

/// Write `text` with its length prefix
pub fn put_text<B: BufMut>(buf: &mut B, text: &str) {
    debug_assert!(text.len() <= u32::MAX as usize);
    buf.put_u32_le(text.len() as u32);
    buf.put_slice(text.as_bytes());
}

/// Read one length-prefixed text, rejecting lengths above `max_len` if set
pub fn get_text<B: Buf>(buf: &mut B, max_len: Option<usize>) -> LedgerResult<String> {
    if buf.remaining() < TEXT_LEN_SIZE {
        return Err(LedgerError::BufferTooShort {
            expected: TEXT_LEN_SIZE,
            actual: buf.remaining(),
        });
    }

    let len = buf.get_u32_le() as usize;
    if let Some(max_len) = max_len.filter(|&max| len > max) {
        return Err(LedgerError::MalformedData(format!(
            "text length {} exceeds limit {}",
            len, max_len
        )));
    }
    if buf.remaining() < len {
        return Err(LedgerError::BufferTooShort {
            expected: len,
            actual: buf.remaining(),
        });
    }

    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec())
        .map_err(|e| LedgerError::MalformedData(format!("text is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_text_layout() {
        let mut buf = BytesMut::new();
        put_text(&mut buf, "cam");

        assert_eq!(&buf[..], &[3, 0, 0, 0, b'c', b'a', b'm']);
        assert_eq!(buf.len(), text_encoded_len("cam"));
    }

    #[test]
    fn test_empty_text() {
        let mut buf = BytesMut::new();
        put_text(&mut buf, "");
        assert_eq!(&buf[..], &[0, 0, 0, 0]);

        let mut cur = &buf[..];
        assert_eq!(get_text(&mut cur, None).unwrap(), "");
        assert!(cur.is_empty());
    }

    #[test]
    fn test_missing_length() {
        let mut cur: &[u8] = &[1, 0];
        assert_eq!(
            get_text(&mut cur, None),
            Err(LedgerError::BufferTooShort { expected: 4, actual: 2 })
        );
    }

    #[test]
    fn test_length_beyond_buffer() {
        let mut cur: &[u8] = &[10, 0, 0, 0, b'a', b'b'];
        assert_eq!(
            get_text(&mut cur, None),
            Err(LedgerError::BufferTooShort { expected: 10, actual: 2 })
        );
    }

    #[test]
    fn test_length_over_limit() {
        let mut cur: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF];
        let err = get_text(&mut cur, Some(64)).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedData(_)));
    }

    #[test]
    fn test_unlimited_length_bounded_by_input() {
        let mut cur: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF, b'a'];
        assert_eq!(
            get_text(&mut cur, None),
            Err(LedgerError::BufferTooShort { expected: u32::MAX as usize, actual: 1 })
        );
    }

    #[test]
    fn test_long_text_without_limit() {
        let text = "x".repeat(70_000);
        let mut buf = BytesMut::new();
        put_text(&mut buf, &text);

        let mut cur = &buf[..];
        assert_eq!(get_text(&mut cur, None).unwrap(), text);
    }

    #[test]
    fn test_invalid_utf8() {
        let mut cur: &[u8] = &[2, 0, 0, 0, 0xC3, 0x28];
        let err = get_text(&mut cur, Some(64)).unwrap_err();
        assert!(err.is_malformed());
    }
}
