#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo_small.png")]
#![warn(missing_docs)]

//! # Modes
//!
//! Key generation runs under a [`KeygenPolicy`]:
//!
//! - [`KeygenPolicy::standard`]: any odd exponent `>= 3`, a modulus of at
//!   least 16 bits, `d` taken modulo `(p-1)(q-1)`.
//! - [`KeygenPolicy::compliance`]: FIPS 186 style. The exponent is at least
//!   65537 and at most 256 bits long, the modulus length is even and at least
//!   1024 bits (2048 when `RSA_KEYGEN_ENFORCE_MODULUS_BITS` is set), the prime
//!   search is bounded, the primes are kept apart and above `√2 · 2^(k-1)`,
//!   `d` is taken modulo `lcm(p-1, q-1)` and has to be at least half as long
//!   as the modulus, and every key passes a pairwise consistency self-test
//!   before it is returned.
//!
//! # Usage
//!
//! ```
//! use rsa_keygen::{generate_rsa_key, BigUint, Phase};
//! use rsa_keygen::traits::PublicKeyParts;
//! use core::ops::ControlFlow;
//! # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//! # let mut rng = ChaCha8Rng::from_seed([42; 32]);
//!
//! let mut found = 0;
//! let mut progress = |phase: Phase, _: usize| {
//!     if phase == Phase::PrimeFound {
//!         found += 1;
//!     }
//!     ControlFlow::Continue(())
//! };
//!
//! let e = BigUint::from(65537u32);
//! let key = generate_rsa_key(1024, &e, &mut rng, Some(&mut progress), true)
//!     .expect("failed to generate a key");
//!
//! assert_eq!(key.n().bits(), 1024);
//! assert_eq!(found, 2);
//! ```
//!
//! ## Signing and encryption
//!
//! The schemes used by the self-test are available on the keys as well.
//!
//! ```
//! use rsa_keygen::{RsaPrivateKey, Pkcs1v15Encrypt, X931Sign};
//! use rsa_keygen::sha2::{Digest, Sha256};
//! # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//! # let mut rng = ChaCha8Rng::from_seed([42; 32]);
//!
//! let private_key = RsaPrivateKey::new(&mut rng, 1024).expect("failed to generate a key");
//! let public_key = private_key.to_public_key();
//!
//! let digest = Sha256::digest(b"hello world");
//! let scheme = X931Sign::new::<Sha256>().expect("SHA-256 has an X9.31 identifier");
//! let signature = private_key.sign_with_rng(&mut rng, scheme, &digest).expect("failed to sign");
//! public_key.verify(scheme, &digest, &signature).expect("failed to verify");
//!
//! let enc = public_key.encrypt(&mut rng, Pkcs1v15Encrypt, b"hello world").expect("failed to encrypt");
//! let dec = private_key.decrypt(Pkcs1v15Encrypt, &enc).expect("failed to decrypt");
//! assert_eq!(&dec[..], b"hello world");
//! ```

#[cfg(doctest)]
pub struct ReadmeDoctests;

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use num_bigint::BigUint;
pub use rand_core;
pub use sha2;

mod algorithms;
pub mod errors;
pub mod pairwise;
pub mod pkcs1v15;
pub mod policy;
pub mod progress;
pub mod pss;
pub mod traits;
pub mod x931;

mod dummy_rng;
mod key;
mod secret;

pub use crate::{
    algorithms::generate::{generate_rsa_key, KeyGenerator},
    algorithms::prime::{BailliePsw, Primality, PrimalityOracle},
    errors::{Error, Result},
    key::{RsaPrivateKey, RsaPublicKey},
    pkcs1v15::{Pkcs1v15Encrypt, Pkcs1v15Sign},
    policy::{KeygenPolicy, TopBits, Totient},
    progress::{NoProgress, Phase, Progress},
    pss::Pss,
    x931::X931Sign,
};

#[cfg(feature = "hazmat")]
pub mod hazmat;
