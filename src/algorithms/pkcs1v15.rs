//! PKCS#1 v1.5 encoding as described in [RFC8017 § 7.2 and § 9.2].
//!
//! [RFC8017 § 7.2 and § 9.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.2

use alloc::vec::Vec;
use const_oid::AssociatedOid;
use digest::Digest;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Bytes of framing around the message: two header bytes, at least eight
/// bytes of padding and the zero separator.
const OVERHEAD: usize = 11;

/// Fills `data` with random non-zero bytes.
fn non_zero_random_bytes<R: CryptoRngCore + ?Sized>(rng: &mut R, data: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(data)?;

    for byte in data.iter_mut().filter(|byte| **byte == 0) {
        while *byte == 0 {
            rng.try_fill_bytes(core::slice::from_mut(byte))?;
        }
    }

    Ok(())
}

/// `EM = 0x00 || 0x02 || PS || 0x00 || M` with a random non-zero `PS`.
pub(crate) fn pkcs1v15_encrypt_pad<R>(
    rng: &mut R,
    msg: &[u8],
    k: usize,
) -> Result<Zeroizing<Vec<u8>>>
where
    R: CryptoRngCore + ?Sized,
{
    if msg.len() + OVERHEAD > k {
        return Err(Error::MessageTooLong);
    }

    let separator = k - msg.len() - 1;
    let mut em = Zeroizing::new(vec![0u8; k]);
    em[1] = 0x02;
    non_zero_random_bytes(rng, &mut em[2..separator])?;
    em[separator + 1..].copy_from_slice(msg);
    Ok(em)
}

/// Strips the encryption padding.
///
/// The scan over `em` does not branch on its content, but the returned
/// `Result` tells valid from invalid padding, so callers must not expose it
/// to an adaptive attacker.
pub(crate) fn pkcs1v15_encrypt_unpad(em: Vec<u8>, k: usize) -> Result<Vec<u8>> {
    if k < OVERHEAD || em.len() != k {
        return Err(Error::Decryption);
    }

    let mut valid = em[0].ct_eq(&0x00) & em[1].ct_eq(&0x02);

    let mut found = Choice::from(0u8);
    let mut separator = 0u32;
    for (i, byte) in em.iter().enumerate().skip(2) {
        let is_zero = byte.ct_eq(&0x00);
        separator.conditional_assign(&(i as u32), !found & is_zero);
        found |= is_zero;
    }

    // PS starts at offset 2 and is at least 8 bytes long
    valid &= found & !separator.ct_lt(&10);

    if !bool::from(valid) {
        return Err(Error::Decryption);
    }

    Ok(em[separator as usize + 1..].to_vec())
}

/// `EM = 0x00 || 0x01 || 0xFF.. || 0x00 || prefix || hashed`
pub(crate) fn pkcs1v15_sign_pad(prefix: &[u8], hashed: &[u8], k: usize) -> Result<Vec<u8>> {
    let t_len = prefix.len() + hashed.len();
    if t_len + OVERHEAD > k {
        return Err(Error::MessageTooLong);
    }

    let mut em = Vec::with_capacity(k);
    em.extend_from_slice(&[0x00, 0x01]);
    em.resize(k - t_len - 1, 0xFF);
    em.push(0x00);
    em.extend_from_slice(prefix);
    em.extend_from_slice(hashed);
    Ok(em)
}

/// Signature padding is deterministic, so verification rebuilds the
/// expected encoding and compares the two in constant time.
pub(crate) fn pkcs1v15_sign_unpad(prefix: &[u8], hashed: &[u8], em: &[u8], k: usize) -> Result<()> {
    let expected = pkcs1v15_sign_pad(prefix, hashed, k).map_err(|_| Error::Verification)?;

    if em.len() != k || !bool::from(em.ct_eq(&expected)) {
        return Err(Error::Verification);
    }

    Ok(())
}

/// DER encoding of the `DigestInfo` that precedes a digest of type `D`:
/// `SEQUENCE { SEQUENCE { OID, NULL }, OCTET STRING }` up to the digest.
pub(crate) fn pkcs1v15_generate_prefix<D>() -> Vec<u8>
where
    D: Digest + AssociatedOid,
{
    const SEQUENCE: u8 = 0x30;
    const OID: u8 = 0x06;
    const NULL: [u8; 2] = [0x05, 0x00];
    const OCTET_STRING: u8 = 0x04;

    let oid = D::OID.as_bytes();
    let oid_len = oid.len() as u8;
    let digest_len = <D as Digest>::output_size() as u8;

    // AlgorithmIdentifier: tag, length, OID TLV, NULL
    let algorithm_len = 2 + oid_len + 2;

    let mut prefix = Vec::with_capacity(usize::from(algorithm_len) + 6);
    prefix.extend_from_slice(&[SEQUENCE, 2 + algorithm_len + 2 + digest_len]);
    prefix.extend_from_slice(&[SEQUENCE, algorithm_len, OID, oid_len]);
    prefix.extend_from_slice(oid);
    prefix.extend_from_slice(&NULL);
    prefix.extend_from_slice(&[OCTET_STRING, digest_len]);
    prefix
}
