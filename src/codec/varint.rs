//! SQLite varints: big-endian base-128, high bit set on every byte that is
//! followed by another. A ninth byte, when reached, contributes all 8 bits,
//! so nine bytes hold a full 64-bit value.

use crate::types::{MAX_VARINT_LEN, error::DatabaseError};

const CONTINUATION_BIT: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7F;

/// Decodes the varint at the start of `bytes`, returning `(value, bytes_consumed)`.
pub fn decode(bytes: &[u8]) -> Result<(u64, usize), DatabaseError> {
    let mut value = 0u64;

    for (i, &byte) in bytes.iter().enumerate().take(MAX_VARINT_LEN) {
        if i == MAX_VARINT_LEN - 1 {
            value = (value << 8) | u64::from(byte);
            return Ok((value, MAX_VARINT_LEN));
        }

        value = (value << 7) | u64::from(byte & PAYLOAD_MASK);
        if byte & CONTINUATION_BIT == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(DatabaseError::TruncatedVarint {
        offset: bytes.len(),
    })
}

/// Decodes a varint starting at `offset`, reporting truncation relative to `bytes`.
pub fn decode_at(bytes: &[u8], offset: usize) -> Result<(u64, usize), DatabaseError> {
    let tail = bytes
        .get(offset..)
        .ok_or(DatabaseError::TruncatedVarint { offset })?;
    decode(tail).map_err(|_| DatabaseError::TruncatedVarint {
        offset: bytes.len(),
    })
}

pub fn encoded_len(value: u64) -> usize {
    if value > 0x00FF_FFFF_FFFF_FFFF {
        return MAX_VARINT_LEN;
    }
    let significant_bits = 64 - value.leading_zeros() as usize;
    significant_bits.div_ceil(7).max(1)
}

/// Appends the encoding of `value` to `out`, returning the number of bytes written.
pub fn encode(value: u64, out: &mut Vec<u8>) -> usize {
    let len = encoded_len(value);

    if len == MAX_VARINT_LEN {
        let mut high = value >> 8;
        let mut prefix = [0u8; MAX_VARINT_LEN - 1];
        for slot in prefix.iter_mut().rev() {
            *slot = (high as u8 & PAYLOAD_MASK) | CONTINUATION_BIT;
            high >>= 7;
        }
        out.extend_from_slice(&prefix);
        out.push(value as u8);
        return len;
    }

    for i in (0..len).rev() {
        let group = ((value >> (7 * i)) as u8) & PAYLOAD_MASK;
        if i == 0 {
            out.push(group);
        } else {
            out.push(group | CONTINUATION_BIT);
        }
    }
    len
}
