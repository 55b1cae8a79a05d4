//! Compact length prefix (`compact-u16`)
//!
//! Seven bits per byte, little-endian, high bit set on every byte except the
//! last. At most three bytes.

use crate::{Result, TxError};

/// Append a compact-u16 length
pub fn encode_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let mut rem = u16::try_from(len)
        .map_err(|_| TxError::Malformed(format!("length {} exceeds u16", len)))?;
    loop {
        let mut elem = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(elem);
            return Ok(());
        }
        elem |= 0x80;
        out.push(elem);
    }
}

/// Read a compact-u16 length, returning `(len, bytes_consumed)`
pub fn decode_len(bytes: &[u8]) -> Result<(usize, usize)> {
    let mut len: usize = 0;
    for (i, byte) in bytes.iter().take(3).enumerate() {
        len |= ((byte & 0x7f) as usize) << (i * 7);
        if byte & 0x80 == 0 {
            if len > u16::MAX as usize {
                return Err(TxError::Malformed("compact-u16 overflow".to_string()));
            }
            return Ok((len, i + 1));
        }
    }
    Err(TxError::Malformed("truncated compact-u16".to_string()))
}
