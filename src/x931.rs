//! ANSI X9.31 signatures (rDSA).
//!
//! The signer publishes `min(s, n - s)`. The verifier recovers the encoded
//! message from whichever of `s^e` and `n - s^e` ends in the `0xC` nibble.

use alloc::vec::Vec;
use const_oid::AssociatedOid;
use digest::Digest;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::pad::{uint_to_be_pad, uint_to_zeroizing_be_pad};
use crate::algorithms::rsa::{rsa_decrypt_and_check, rsa_encrypt};
use crate::algorithms::x931::{x931_em_len, x931_hash_id, x931_sign_pad, x931_sign_unpad};
use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};
use crate::traits::{PublicKeyParts, SignatureScheme};

/// Digital signatures using X9.31 padding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct X931Sign {
    /// Length of hash to use.
    pub hash_len: usize,

    /// X9.31 hash identifier placed before the trailer.
    pub hash_id: u8,
}

impl X931Sign {
    /// Create new X9.31 padding for the given digest.
    ///
    /// Only SHA-1, SHA-256, SHA-384 and SHA-512 have an X9.31 identifier;
    /// any other digest is an [`Error::InvalidPaddingScheme`].
    pub fn new<D>() -> Result<Self>
    where
        D: Digest + AssociatedOid,
    {
        Ok(Self {
            hash_len: <D as Digest>::output_size(),
            hash_id: x931_hash_id(&D::OID)?,
        })
    }
}

impl SignatureScheme for X931Sign {
    fn sign<Rng: CryptoRngCore + ?Sized>(
        self,
        rng: Option<&mut Rng>,
        priv_key: &RsaPrivateKey,
        hashed: &[u8],
    ) -> Result<Vec<u8>> {
        if hashed.len() != self.hash_len {
            return Err(Error::InputNotHashed);
        }

        let em = x931_sign_pad(hashed, self.hash_id, x931_em_len(priv_key.n().bits()))?;
        let s = Zeroizing::new(rsa_decrypt_and_check(
            priv_key,
            rng,
            &BigUint::from_bytes_be(&em),
        )?);

        let complement = priv_key.n() - &*s;
        let sig = if complement < *s {
            complement
        } else {
            (*s).clone()
        };

        uint_to_zeroizing_be_pad(sig, priv_key.size())
    }

    fn verify(self, pub_key: &RsaPublicKey, hashed: &[u8], sig: &[u8]) -> Result<()> {
        if hashed.len() != self.hash_len {
            return Err(Error::InputNotHashed);
        }
        if sig.len() != pub_key.size() {
            return Err(Error::Verification);
        }

        let sig = BigUint::from_bytes_be(sig);
        if &sig >= pub_key.n() {
            return Err(Error::Verification);
        }

        let mut t = rsa_encrypt(pub_key, &sig)?;
        if (&t % 16u32) != BigUint::from(12u32) {
            t = pub_key.n() - t;
        }

        let em = uint_to_be_pad(t, x931_em_len(pub_key.n().bits()))
            .map_err(|_| Error::Verification)?;

        x931_sign_unpad(self.hash_id, hashed, &em)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_rng::DummyRng;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use sha2::{Sha256, Sha512};

    #[test]
    fn test_sign_verify() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let priv_key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let pub_key = priv_key.to_public_key();

        for msg in [&b"abc"[..], &b"hello world"[..], &b""[..]] {
            let digest = Sha256::digest(msg);
            let scheme = X931Sign::new::<Sha256>().unwrap();

            let sig = priv_key.sign(scheme, &digest).unwrap();
            assert_eq!(sig.len(), pub_key.size());
            pub_key.verify(scheme, &digest, &sig).unwrap();

            // published signature is the smaller of s and n - s
            let s = BigUint::from_bytes_be(&sig);
            assert!(s <= pub_key.n() - &s);

            let blinded = priv_key
                .sign_with_rng(&mut rng, scheme, &digest)
                .unwrap();
            assert_eq!(sig, blinded);
        }
    }

    #[test]
    fn test_verify_other_key() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let signer = RsaPrivateKey::new(&mut rng, 512).unwrap();
        let other = RsaPrivateKey::new(&mut rng, 512).unwrap().to_public_key();

        let digest = Sha256::digest(b"hello world");
        let scheme = X931Sign::new::<Sha256>().unwrap();
        let sig = signer.sign(scheme, &digest).unwrap();
        assert_eq!(other.verify(scheme, &digest, &sig), Err(Error::Verification));
    }

    #[test]
    fn test_wrong_hash() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let priv_key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let pub_key = priv_key.to_public_key();

        let digest = Sha512::digest(b"hello");
        let sig = priv_key
            .sign(X931Sign::new::<Sha512>().unwrap(), &digest)
            .unwrap();

        let mut tampered = digest.clone();
        tampered[0] ^= 1;
        assert_eq!(
            pub_key.verify(X931Sign::new::<Sha512>().unwrap(), &tampered, &sig),
            Err(Error::Verification)
        );

        // same length, different hash identifier
        let scheme = X931Sign {
            hash_len: 64,
            hash_id: 0x34,
        };
        assert_eq!(
            pub_key.verify(scheme, &digest, &sig),
            Err(Error::Verification)
        );

        assert_eq!(
            X931Sign::new::<Sha256>()
                .unwrap()
                .sign(None::<&mut DummyRng>, &priv_key, &digest),
            Err(Error::InputNotHashed)
        );
    }
}
