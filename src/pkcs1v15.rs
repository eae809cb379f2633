//! PKCS#1 v1.5 support as described in [RFC8017 § 8.2].
//!
//! [RFC8017 § 8.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.2

use alloc::{boxed::Box, vec::Vec};
use const_oid::AssociatedOid;
use digest::Digest;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::pad::{uint_to_be_pad, uint_to_zeroizing_be_pad};
use crate::algorithms::pkcs1v15::*;
use crate::algorithms::rsa::{rsa_decrypt_and_check, rsa_encrypt};
use crate::errors::{Error, Result};
use crate::key::{self, RsaPrivateKey, RsaPublicKey};
use crate::traits::{PaddingScheme, PublicKeyParts, SignatureScheme};

/// `RSAES-PKCS1-v1_5` encryption.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pkcs1v15Encrypt;

impl PaddingScheme for Pkcs1v15Encrypt {
    fn decrypt<Rng: CryptoRngCore + ?Sized>(
        self,
        rng: Option<&mut Rng>,
        priv_key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        decrypt(rng, priv_key, ciphertext)
    }

    fn encrypt<Rng: CryptoRngCore + ?Sized>(
        self,
        rng: &mut Rng,
        pub_key: &RsaPublicKey,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        encrypt(rng, pub_key, msg)
    }
}

/// `RSASSA-PKCS1-v1_5` signatures.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pkcs1v15Sign {
    /// Expected digest length, or `None` to sign any input unchecked.
    pub hash_len: Option<usize>,

    /// DER `DigestInfo` header placed in front of the digest.
    pub prefix: Box<[u8]>,
}

impl Pkcs1v15Sign {
    /// Signatures over digests of type `D`, identified by its OID.
    pub fn new<D>() -> Self
    where
        D: Digest + AssociatedOid,
    {
        Self {
            hash_len: Some(<D as Digest>::output_size()),
            prefix: pkcs1v15_generate_prefix::<D>().into_boxed_slice(),
        }
    }

    /// Signatures over raw input without a `DigestInfo` header. Only for
    /// interoperability with signers that omit it.
    pub fn new_unprefixed() -> Self {
        Self {
            hash_len: None,
            prefix: Box::new([]),
        }
    }
}

impl SignatureScheme for Pkcs1v15Sign {
    fn sign<Rng: CryptoRngCore + ?Sized>(
        self,
        rng: Option<&mut Rng>,
        priv_key: &RsaPrivateKey,
        hashed: &[u8],
    ) -> Result<Vec<u8>> {
        if let Some(hash_len) = self.hash_len {
            if hashed.len() != hash_len {
                return Err(Error::InputNotHashed);
            }
        }

        sign(rng, priv_key, &self.prefix, hashed)
    }

    fn verify(self, pub_key: &RsaPublicKey, hashed: &[u8], sig: &[u8]) -> Result<()> {
        if let Some(hash_len) = self.hash_len {
            if hashed.len() != hash_len {
                return Err(Error::InputNotHashed);
            }
        }

        verify(pub_key, self.prefix.as_ref(), hashed, sig)
    }
}

/// `RSAES-PKCS1-v1_5` encryption; `msg` may be at most `k - 11` bytes.
#[inline]
fn encrypt<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    pub_key: &RsaPublicKey,
    msg: &[u8],
) -> Result<Vec<u8>> {
    key::check_public(pub_key)?;

    let em = pkcs1v15_encrypt_pad(rng, msg, pub_key.size())?;
    let int = Zeroizing::new(BigUint::from_bytes_be(&em));
    uint_to_be_pad(rsa_encrypt(pub_key, &int)?, pub_key.size())
}

/// `RSAES-PKCS1-v1_5` decryption, blinded when `rng` is given.
#[inline]
fn decrypt<R: CryptoRngCore + ?Sized>(
    rng: Option<&mut R>,
    priv_key: &RsaPrivateKey,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    key::check_public(priv_key)?;

    if ciphertext.len() != priv_key.size() {
        return Err(Error::Decryption);
    }

    let em = rsa_decrypt_and_check(priv_key, rng, &BigUint::from_bytes_be(ciphertext))?;
    let em = uint_to_zeroizing_be_pad(em, priv_key.size())?;

    pkcs1v15_encrypt_unpad(em, priv_key.size())
}

/// `RSASSA-PKCS1-v1_5` signature of `prefix || hashed`, blinded when `rng`
/// is given.
#[inline]
fn sign<R: CryptoRngCore + ?Sized>(
    rng: Option<&mut R>,
    priv_key: &RsaPrivateKey,
    prefix: &[u8],
    hashed: &[u8],
) -> Result<Vec<u8>> {
    let em = pkcs1v15_sign_pad(prefix, hashed, priv_key.size())?;

    uint_to_zeroizing_be_pad(
        rsa_decrypt_and_check(priv_key, rng, &BigUint::from_bytes_be(&em))?,
        priv_key.size(),
    )
}

#[inline]
fn verify(pub_key: &RsaPublicKey, prefix: &[u8], hashed: &[u8], sig: &[u8]) -> Result<()> {
    if sig.len() != pub_key.size() {
        return Err(Error::Verification);
    }

    let sig = BigUint::from_bytes_be(sig);
    if &sig >= pub_key.n() {
        return Err(Error::Verification);
    }

    let em = uint_to_be_pad(rsa_encrypt(pub_key, &sig)?, pub_key.size())?;

    pkcs1v15_sign_unpad(prefix, hashed, &em, pub_key.size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_rng::DummyRng;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use sha2::{Sha256, Sha512};

    fn key() -> RsaPrivateKey {
        let mut rng = ChaCha8Rng::from_seed([9; 32]);
        RsaPrivateKey::new(&mut rng, 768).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let priv_key = key();
        let pub_key = priv_key.to_public_key();

        for len in [0usize, 1, 16, pub_key.size() - 11] {
            let msg = vec![0x42u8; len];
            let ciphertext = pub_key.encrypt(&mut rng, Pkcs1v15Encrypt, &msg).unwrap();
            assert_eq!(ciphertext.len(), pub_key.size());

            let plaintext = priv_key.decrypt(Pkcs1v15Encrypt, &ciphertext).unwrap();
            assert_eq!(plaintext, msg);
        }

        let msg = vec![0x42u8; pub_key.size() - 10];
        assert_eq!(
            pub_key.encrypt(&mut rng, Pkcs1v15Encrypt, &msg),
            Err(Error::MessageTooLong)
        );
    }

    #[test]
    fn test_sign_verify() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let priv_key = key();
        let pub_key = priv_key.to_public_key();

        let digest = Sha512::digest(b"hello world");
        let sig = priv_key
            .sign_with_rng(&mut rng, Pkcs1v15Sign::new::<Sha512>(), &digest)
            .unwrap();
        pub_key
            .verify(Pkcs1v15Sign::new::<Sha512>(), &digest, &sig)
            .unwrap();

        // deterministic with or without blinding
        let unblinded = priv_key
            .sign(Pkcs1v15Sign::new::<Sha512>(), &digest)
            .unwrap();
        assert_eq!(sig, unblinded);

        assert_eq!(
            pub_key.verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &sig),
            Err(Error::InputNotHashed)
        );
    }

    #[test]
    fn test_verify_other_key() {
        let signer = key();
        let mut rng = ChaCha8Rng::from_seed([10; 32]);
        let other = RsaPrivateKey::new(&mut rng, 768).unwrap().to_public_key();

        let digest = Sha256::digest(b"hello world");
        let sig = signer.sign(Pkcs1v15Sign::new::<Sha256>(), &digest).unwrap();
        assert_eq!(
            other.verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &sig),
            Err(Error::Verification)
        );
    }

    #[test]
    fn test_unprefixed() {
        let priv_key = key();
        let msg = b"raw digest bytes";
        let sig = Pkcs1v15Sign::new_unprefixed()
            .sign(None::<&mut DummyRng>, &priv_key, msg)
            .unwrap();
        priv_key
            .to_public_key()
            .verify(Pkcs1v15Sign::new_unprefixed(), msg, &sig)
            .unwrap();
    }
}
