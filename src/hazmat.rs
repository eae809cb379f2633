//! ⚠️ Raw RSA operations without padding.
//!
//! # ☢️️ WARNING: HAZARDOUS API ☢️
//!
//! These functions exponentiate raw integers with the key. Without a padding
//! scheme RSA is malleable and deterministic, so the only sound use of this
//! module is building a reviewed padding scheme on top of it. The key
//! generator and the pairwise self-test go through the padded schemes in
//! [`crate::pkcs1v15`], [`crate::pss`] and [`crate::x931`].

pub use crate::algorithms::rsa::{rsa_decrypt, rsa_decrypt_and_check, rsa_encrypt};
