//! Fixed-width big-endian encoding of `BigUint` values.

use alloc::vec::Vec;
use num_bigint::BigUint;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Writes `bytes` into the tail of a zeroed buffer of `width` bytes.
fn right_align(bytes: &[u8], width: usize) -> Result<Vec<u8>> {
    let offset = width
        .checked_sub(bytes.len())
        .ok_or(Error::InvalidPadLen)?;

    let mut out = vec![0u8; width];
    out[offset..].copy_from_slice(bytes);
    Ok(out)
}

/// Encodes a public value in exactly `width` bytes.
#[inline]
pub(crate) fn uint_to_be_pad(input: BigUint, width: usize) -> Result<Vec<u8>> {
    right_align(&input.to_bytes_be(), width)
}

/// Encodes a secret value in exactly `width` bytes. Both the integer and its
/// unpadded encoding are zeroed on return.
#[inline]
pub(crate) fn uint_to_zeroizing_be_pad(input: BigUint, width: usize) -> Result<Vec<u8>> {
    let input = Zeroizing::new(input);
    let bytes = Zeroizing::new(input.to_bytes_be());
    right_align(&bytes, width)
}
