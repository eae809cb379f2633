//! Encryption and signature scheme traits.

use alloc::vec::Vec;

use rand_core::CryptoRngCore;

use crate::errors::Result;
use crate::key::{RsaPrivateKey, RsaPublicKey};

/// An encryption padding such as [`Pkcs1v15Encrypt`](crate::Pkcs1v15Encrypt).
pub trait PaddingScheme {
    /// Decrypts `ciphertext` with the private key. With `Some(rng)` the
    /// private key operation is blinded.
    fn decrypt<R: CryptoRngCore + ?Sized>(
        self,
        rng: Option<&mut R>,
        priv_key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>>;

    /// Pads `msg` with randomness from `rng` and encrypts it.
    fn encrypt<R: CryptoRngCore + ?Sized>(
        self,
        rng: &mut R,
        pub_key: &RsaPublicKey,
        msg: &[u8],
    ) -> Result<Vec<u8>>;
}

/// A signature padding such as [`Pkcs1v15Sign`](crate::Pkcs1v15Sign),
/// [`X931Sign`](crate::X931Sign) or [`Pss`](crate::Pss).
pub trait SignatureScheme {
    /// Signs the digest `hashed`. Schemes that need randomness fail without
    /// an `rng`; the others use it for blinding.
    fn sign<R: CryptoRngCore + ?Sized>(
        self,
        rng: Option<&mut R>,
        priv_key: &RsaPrivateKey,
        hashed: &[u8],
    ) -> Result<Vec<u8>>;

    /// Checks `sig` against the digest `hashed`. Any mismatch is an
    /// [`Error::Verification`](crate::Error::Verification).
    fn verify(self, pub_key: &RsaPublicKey, hashed: &[u8], sig: &[u8]) -> Result<()>;
}
