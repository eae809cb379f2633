//! Traits shared by the key types and the padding schemes.

pub(crate) mod keys;
mod padding;

pub use keys::{PrivateKeyParts, PublicKeyParts};
pub use padding::{PaddingScheme, SignatureScheme};
