//! ANSI X9.31 signature padding.
//!
//! The encoded message is `0x6B || 0xBB.. || 0xBA || H || id || 0xCC`, or
//! `0x6A || H || id || 0xCC` when there is no room for the filler. `id`
//! names the hash function. The trailing `0xCC` makes every encoded message
//! congruent to 12 mod 16, which lets the signer publish `min(s, n - s)`.

use alloc::vec::Vec;
use const_oid::ObjectIdentifier;
use subtle::ConstantTimeEq;

use crate::errors::{Error, Result};

const SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");
const SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");
const SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.2");
const SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.3");

/// Trailer byte, `0xC` in the low nibble.
const TRAILER: u8 = 0xCC;

/// X9.31 hash identifier of the digest with the given OID.
pub(crate) fn x931_hash_id(oid: &ObjectIdentifier) -> Result<u8> {
    const HASH_IDS: [(ObjectIdentifier, u8); 4] =
        [(SHA1, 0x33), (SHA256, 0x34), (SHA384, 0x36), (SHA512, 0x35)];

    HASH_IDS
        .iter()
        .find(|(known, _)| known == oid)
        .map(|(_, id)| *id)
        .ok_or(Error::InvalidPaddingScheme)
}

/// Length of the encoded message for a modulus of `n_bits` bits. The top
/// byte of the encoding is `0x6A` or `0x6B`, so a whole number of bytes
/// below the modulus always keeps the encoding smaller than `n`.
#[inline]
pub(crate) fn x931_em_len(n_bits: usize) -> usize {
    n_bits / 8
}

pub(crate) fn x931_sign_pad(hashed: &[u8], hash_id: u8, em_len: usize) -> Result<Vec<u8>> {
    // header, hash, id, trailer
    if em_len < hashed.len() + 3 {
        return Err(Error::MessageTooLong);
    }
    let fill = em_len - hashed.len() - 3;

    let mut em = Vec::with_capacity(em_len);
    if fill == 0 {
        em.push(0x6A);
    } else {
        em.push(0x6B);
        em.resize(fill, 0xBB);
        em.push(0xBA);
    }
    em.extend_from_slice(hashed);
    em.push(hash_id);
    em.push(TRAILER);

    debug_assert_eq!(em.len(), em_len);
    Ok(em)
}

pub(crate) fn x931_sign_unpad(hash_id: u8, hashed: &[u8], em: &[u8]) -> Result<()> {
    let em_len = em.len();
    if em_len < hashed.len() + 3 {
        return Err(Error::Verification);
    }
    let fill = em_len - hashed.len() - 3;

    let mut ok = em[em_len - 1].ct_eq(&TRAILER);
    ok &= em[em_len - 2].ct_eq(&hash_id);
    ok &= em[fill + 1..em_len - 2].ct_eq(hashed);

    if fill == 0 {
        ok &= em[0].ct_eq(&0x6A);
    } else {
        ok &= em[0].ct_eq(&0x6B);
        for el in &em[1..fill] {
            ok &= el.ct_eq(&0xBB);
        }
        ok &= em[fill].ct_eq(&0xBA);
    }

    if ok.unwrap_u8() != 1 {
        return Err(Error::Verification);
    }

    Ok(())
}
