//! `RSASSA-PSS` signatures as specified in [RFC8017 § 8.1].
//!
//! [RFC8017 § 8.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.1

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use digest::{Digest, DynDigest};
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::pad::{uint_to_be_pad, uint_to_zeroizing_be_pad};
use crate::algorithms::pss::{emsa_pss_encode, emsa_pss_verify, max_salt_len};
use crate::algorithms::rsa::{rsa_decrypt_and_check, rsa_encrypt};
use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};
use crate::traits::{PublicKeyParts, SignatureScheme};

/// `RSASSA-PSS` signatures with MGF1 over the same digest.
pub struct Pss {
    /// Digest used for `M'` and for MGF1.
    pub digest: Box<dyn DynDigest + Send + Sync>,

    /// Salt length in bytes; the verifier must use the same value.
    pub salt_len: usize,
}

impl Pss {
    /// PSS over `T` with a salt as long as the digest.
    pub fn new<T: 'static + Digest + DynDigest + Send + Sync>() -> Self {
        Self::new_with_salt::<T>(<T as Digest>::output_size())
    }

    /// PSS over `T` with a salt of `len` bytes.
    pub fn new_with_salt<T: 'static + Digest + DynDigest + Send + Sync>(len: usize) -> Self {
        Self {
            digest: Box::new(T::new()),
            salt_len: len,
        }
    }

    /// New PSS padding for the given digest with the longest salt a modulus of
    /// `key_bits` bits has room for, capped at the digest output size.
    pub fn new_for_key_size<T: 'static + Digest + DynDigest + Send + Sync>(
        key_bits: usize,
    ) -> Self {
        let h_len = <T as Digest>::output_size();
        let room = max_salt_len(key_bits.saturating_sub(1), h_len);
        Self::new_with_salt::<T>(h_len.min(room))
    }
}

impl SignatureScheme for Pss {
    /// PSS needs randomness for the salt, so signing without an `rng` is an
    /// [`Error::InvalidPaddingScheme`].
    fn sign<Rng: CryptoRngCore + ?Sized>(
        mut self,
        rng: Option<&mut Rng>,
        priv_key: &RsaPrivateKey,
        hashed: &[u8],
    ) -> Result<Vec<u8>> {
        sign(
            rng.ok_or(Error::InvalidPaddingScheme)?,
            priv_key,
            hashed,
            self.salt_len,
            &mut *self.digest,
        )
    }

    fn verify(mut self, pub_key: &RsaPublicKey, hashed: &[u8], sig: &[u8]) -> Result<()> {
        verify(pub_key, hashed, sig, &mut *self.digest, self.salt_len)
    }
}

impl fmt::Debug for Pss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PSS")
            .field("digest", &"...")
            .field("salt_len", &self.salt_len)
            .finish()
    }
}

pub(crate) fn verify(
    pub_key: &RsaPublicKey,
    hashed: &[u8],
    sig: &[u8],
    digest: &mut dyn DynDigest,
    salt_len: usize,
) -> Result<()> {
    if sig.len() != pub_key.size() {
        return Err(Error::Verification);
    }

    let sig = BigUint::from_bytes_be(sig);
    if &sig >= pub_key.n() {
        return Err(Error::Verification);
    }

    let mut em = uint_to_be_pad(rsa_encrypt(pub_key, &sig)?, pub_key.size())?;

    emsa_pss_verify(hashed, &mut em, salt_len, digest, pub_key.n().bits())
}

/// Calculates the signature of `hashed` using RSASSA-PSS with a fresh random
/// salt. The same `rng` also blinds the private key operation.
pub(crate) fn sign<T: CryptoRngCore + ?Sized>(
    rng: &mut T,
    priv_key: &RsaPrivateKey,
    hashed: &[u8],
    salt_len: usize,
    digest: &mut dyn DynDigest,
) -> Result<Vec<u8>> {
    let mut salt = Zeroizing::new(vec![0; salt_len]);
    rng.try_fill_bytes(&mut salt[..])?;

    let em_bits = priv_key.n().bits() - 1;
    let em = emsa_pss_encode(hashed, em_bits, &salt, digest)?;

    uint_to_zeroizing_be_pad(
        rsa_decrypt_and_check(priv_key, Some(rng), &BigUint::from_bytes_be(&em))?,
        priv_key.size(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_rng::DummyRng;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use sha2::Sha256;

    #[test]
    fn test_sign_verify() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let priv_key = RsaPrivateKey::new(&mut rng, 768).unwrap();
        let pub_key = priv_key.to_public_key();

        let digest = Sha256::digest(b"hello world");
        let sig1 = priv_key
            .sign_with_rng(&mut rng, Pss::new::<Sha256>(), &digest)
            .unwrap();
        let sig2 = priv_key
            .sign_with_rng(&mut rng, Pss::new::<Sha256>(), &digest)
            .unwrap();

        // salted, so two signatures of the same digest differ
        assert_ne!(sig1, sig2);
        pub_key.verify(Pss::new::<Sha256>(), &digest, &sig1).unwrap();
        pub_key.verify(Pss::new::<Sha256>(), &digest, &sig2).unwrap();

        let other = Sha256::digest(b"hello world!");
        assert_eq!(
            pub_key.verify(Pss::new::<Sha256>(), &other, &sig1),
            Err(Error::Verification)
        );
    }

    #[test]
    fn test_verify_other_key() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let signer = RsaPrivateKey::new(&mut rng, 512).unwrap();
        let other = RsaPrivateKey::new(&mut rng, 512).unwrap().to_public_key();

        let digest = Sha256::digest(b"hello world");
        let sig = signer
            .sign_with_rng(&mut rng, Pss::new_for_key_size::<Sha256>(512), &digest)
            .unwrap();
        assert_eq!(
            other.verify(Pss::new_for_key_size::<Sha256>(512), &digest, &sig),
            Err(Error::Verification)
        );
    }

    #[test]
    fn test_sign_requires_rng() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let priv_key = RsaPrivateKey::new(&mut rng, 512).unwrap();
        let digest = Sha256::digest(b"hello world");

        let res = Pss::new::<Sha256>().sign(None::<&mut DummyRng>, &priv_key, &digest);
        assert_eq!(res, Err(Error::InvalidPaddingScheme));
    }

    #[test]
    fn test_salt_for_key_size() {
        assert_eq!(Pss::new_for_key_size::<Sha256>(2048).salt_len, 32);
        // 512-bit modulus: 64 byte encoding leaves 30 bytes for the salt
        assert_eq!(Pss::new_for_key_size::<Sha256>(512).salt_len, 30);

        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        let priv_key = RsaPrivateKey::new(&mut rng, 512).unwrap();
        let digest = Sha256::digest(b"short key");
        let sig = priv_key
            .sign_with_rng(&mut rng, Pss::new_for_key_size::<Sha256>(512), &digest)
            .unwrap();
        priv_key
            .to_public_key()
            .verify(Pss::new_for_key_size::<Sha256>(512), &digest, &sig)
            .unwrap();
    }
}
