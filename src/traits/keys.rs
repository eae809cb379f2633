//! Accessors for the components of a key.

use num_bigint::BigUint;

/// The public half: modulus and exponent.
pub trait PublicKeyParts {
    /// Modulus `n = p·q`.
    fn n(&self) -> &BigUint;

    /// Public exponent `e`.
    fn e(&self) -> &BigUint;

    /// Length of `n` in bytes, which is also the length of every signature
    /// and ciphertext produced with the key.
    fn size(&self) -> usize {
        self.n().bits().div_ceil(8)
    }
}

/// The private half of a two-prime key.
pub trait PrivateKeyParts: PublicKeyParts {
    /// Private exponent `d`.
    fn d(&self) -> &BigUint;

    /// `[p, q]` with `p > q`.
    fn primes(&self) -> &[BigUint];

    /// `d mod (p-1)`
    fn dp(&self) -> &BigUint;

    /// `d mod (q-1)`
    fn dq(&self) -> &BigUint;

    /// `q^-1 mod p`
    fn qinv(&self) -> &BigUint;
}
