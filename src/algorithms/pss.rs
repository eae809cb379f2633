//! EMSA-PSS encoding as described in [RFC8017 § 9.1].
//!
//! [RFC8017 § 9.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-9.1

use alloc::vec::Vec;
use digest::DynDigest;
use subtle::{Choice, ConstantTimeEq};

use super::mgf::mgf1_xor;
use crate::errors::{Error, Result};

/// Largest salt that fits an encoding of `em_bits` bits with a hash of
/// `h_len` bytes.
pub(crate) fn max_salt_len(em_bits: usize, h_len: usize) -> usize {
    em_bits.div_ceil(8).saturating_sub(h_len + 2)
}

/// Hashes `M' = 0x00 * 8 || m_hash || salt`.
fn hash_m_prime(hash: &mut dyn DynDigest, m_hash: &[u8], salt: &[u8]) -> alloc::boxed::Box<[u8]> {
    hash.update(&[0u8; 8]);
    hash.update(m_hash);
    hash.update(salt);
    hash.finalize_reset()
}

pub(crate) fn emsa_pss_encode(
    m_hash: &[u8],
    em_bits: usize,
    salt: &[u8],
    hash: &mut dyn DynDigest,
) -> Result<Vec<u8>> {
    let h_len = hash.output_size();
    let s_len = salt.len();
    let em_len = em_bits.div_ceil(8);

    if m_hash.len() != h_len {
        return Err(Error::InputNotHashed);
    }

    if em_len < h_len + s_len + 2 {
        return Err(Error::MessageTooLong);
    }

    let mut em = vec![0; em_len];

    let (db, h) = em.split_at_mut(em_len - h_len - 1);
    let h = &mut h[..h_len];

    h.copy_from_slice(&hash_m_prime(hash, m_hash, salt));

    // DB = PS || 0x01 || salt
    db[em_len - s_len - h_len - 2] = 0x01;
    db[em_len - s_len - h_len - 1..].copy_from_slice(salt);

    mgf1_xor(db, hash, h);

    // clear the bits above em_bits
    db[0] &= 0xFF >> (8 * em_len - em_bits);

    // EM = maskedDB || H || 0xbc
    em[em_len - 1] = 0xBC;

    Ok(em)
}

/// Verifies an encoded message `em` of `key_bits.div_ceil(8)` bytes against
/// `m_hash`, with a known salt length.
pub(crate) fn emsa_pss_verify(
    m_hash: &[u8],
    em: &mut [u8],
    s_len: usize,
    hash: &mut dyn DynDigest,
    key_bits: usize,
) -> Result<()> {
    let em_bits = key_bits - 1;
    let em_len = em_bits.div_ceil(8);
    let key_len = key_bits.div_ceil(8);
    let h_len = hash.output_size();

    if m_hash.len() != h_len || em.len() != key_len {
        return Err(Error::Verification);
    }

    // when em_bits is a multiple of 8 the encoding is one byte shorter than
    // the modulus and that leading byte must be zero
    let (lead, em) = em.split_at_mut(key_len - em_len);
    if lead.iter().any(|b| *b != 0) {
        return Err(Error::Verification);
    }

    if em_len < h_len + s_len + 2 || em[em_len - 1] != 0xBC {
        return Err(Error::Verification);
    }

    let (db, h) = em.split_at_mut(em_len - h_len - 1);
    let h = &mut h[..h_len];

    if db[0] & !(0xFFu8 >> (8 * em_len - em_bits)) != 0 {
        return Err(Error::Verification);
    }

    mgf1_xor(db, hash, h);
    db[0] &= 0xFF >> (8 * em_len - em_bits);

    // DB must be zeroes, then 0x01, then the salt
    let (zeroes, rest) = db.split_at(em_len - h_len - s_len - 2);
    let mut valid: Choice = zeroes
        .iter()
        .fold(Choice::from(1u8), |a, e| a & e.ct_eq(&0x00));
    valid &= rest[0].ct_eq(&0x01);

    let salt = &rest[1..];
    let h0 = hash_m_prime(hash, m_hash, salt);

    if (valid & h0.ct_eq(h)).into() {
        Ok(())
    } else {
        Err(Error::Verification)
    }
}
