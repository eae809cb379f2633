//! Pairwise consistency self-test of a freshly generated key.
//!
//! The key signs a fixed message with every supported signature scheme and
//! verifies the result with its public half, then encrypts the message with
//! the public half and decrypts it with the private half. Any failure means
//! the key must not be released.

use digest::Digest;
use rand_core::CryptoRngCore;
use sha2::Sha256;

use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};
use crate::traits::PublicKeyParts;
use crate::{Pkcs1v15Encrypt, Pkcs1v15Sign, Pss, X931Sign};

/// Not secret; any fixed message works.
const MESSAGE: &[u8] = b"pairwise consistency check";

/// Runs the self-test. Every failure, whatever its cause, is reported as
/// [`Error::SelfTestFailed`].
pub fn validate<R: CryptoRngCore + ?Sized>(key: &RsaPrivateKey, rng: &mut R) -> Result<()> {
    match run(key, rng) {
        Ok(()) => {
            log::debug!("pairwise consistency check passed");
            Ok(())
        }
        Err(err) => {
            log::error!("pairwise consistency check failed: {}", err);
            Err(Error::SelfTestFailed)
        }
    }
}

fn run<R: CryptoRngCore + ?Sized>(key: &RsaPrivateKey, rng: &mut R) -> Result<()> {
    let public = key.to_public_key();
    let digest = Sha256::digest(MESSAGE);

    let sig = key.sign_with_rng(rng, Pkcs1v15Sign::new::<Sha256>(), &digest)?;
    public.verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &sig)?;

    let sig = key.sign_with_rng(rng, X931Sign::new::<Sha256>()?, &digest)?;
    public.verify(X931Sign::new::<Sha256>()?, &digest, &sig)?;

    let sig = key.sign_with_rng(rng, pss_for(&public), &digest)?;
    public.verify(pss_for(&public), &digest, &sig)?;

    let ciphertext = public.encrypt(rng, Pkcs1v15Encrypt, MESSAGE)?;
    if ciphertext.as_slice() == MESSAGE {
        return Err(Error::Internal);
    }

    let plaintext = key.decrypt_blinded(rng, Pkcs1v15Encrypt, &ciphertext)?;
    if plaintext.as_slice() != MESSAGE {
        return Err(Error::Decryption);
    }

    Ok(())
}

/// PSS with the digest-sized salt, or whatever is left by a small modulus.
fn pss_for(public: &RsaPublicKey) -> Pss {
    Pss::new_for_key_size::<Sha256>(public.n().bits())
}
