//! Selection mask packing: bit-per-point, most-significant-bit first.
//!
//! Point `i` lives in bit `7 - (i % 8)` of byte `i / 8`, matching the
//! renderer's packed-bits convention. A mask for `n` points occupies
//! `ceil(n / 8)` bytes; trailing bits beyond `n` are ignored on decode.

use crate::error::{WireError, WireResult};

/// Pack a boolean vector into MSB-first bytes.
pub fn pack_selection_mask(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    bytes
}

/// Unpack an MSB-first packed mask into `n` booleans.
///
/// Fails with [`WireError::Truncated`] if the buffer cannot cover `n`
/// points; extra trailing bytes and bits are ignored.
pub fn unpack_selection_mask(buffer: &[u8], n: usize) -> WireResult<Vec<bool>> {
    let needed = n.div_ceil(8);
    if buffer.len() < needed {
        return Err(WireError::Truncated {
            n,
            needed,
            got: buffer.len(),
        });
    }

    let mut bits = Vec::with_capacity(n);
    for i in 0..n {
        bits.push(buffer[i / 8] & (1 << (7 - (i % 8))) != 0);
    }
    Ok(bits)
}
