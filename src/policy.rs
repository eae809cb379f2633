//! Mode-specific constants of key generation.
//!
//! A [`KeygenPolicy`] is passed explicitly to the generator. The two presets
//! correspond to the general-purpose algorithm ([`KeygenPolicy::standard`])
//! and the stricter FIPS 186 style variant ([`KeygenPolicy::compliance`]).

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

use crate::errors::{Error, Result};

/// Smallest modulus accepted in standard mode. Below this the search keeps
/// drawing the same handful of primes.
pub const MIN_MODULUS_BITS: usize = 16;

/// Default modulus floor in compliance mode.
pub const COMPLIANCE_MIN_MODULUS_BITS: usize = 1024;

/// Modulus floor in compliance mode when [`ENFORCE_MODULUS_BITS_VAR`] is set.
pub const ENFORCED_MIN_MODULUS_BITS: usize = 2048;

/// The compliance floor can be lowered down to this, and no further: the
/// pairwise check needs room for a SHA-256 PKCS#1 v1.5 signature.
pub const COMPLIANCE_ABSOLUTE_MIN_BITS: usize = 512;

/// Environment variable raising the compliance floor to
/// [`ENFORCED_MIN_MODULUS_BITS`].
pub const ENFORCE_MODULUS_BITS_VAR: &str = "RSA_KEYGEN_ENFORCE_MODULUS_BITS";

/// Default public exponent, F4 = 2^16 + 1.
pub const DEFAULT_EXPONENT: u64 = 65537;

/// The modulus used to derive the private exponent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Totient {
    /// Euler's φ = (p-1)(q-1).
    Euler,
    /// Carmichael's λ = lcm(p-1, q-1).
    Carmichael,
}

/// How many of the most significant bits a prime candidate has forced to one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TopBits {
    /// Only the top bit; too-small candidates are caught by the lower bound.
    One,
    /// The top two bits, so that the product of two candidates never comes
    /// out one bit short.
    Two,
}

/// Strategy value bundling every constant that differs between the standard
/// and the compliance algorithm.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeygenPolicy {
    compliance: bool,
    min_modulus_bits: usize,
    min_public_exponent: u64,
    max_public_exponent_bits: Option<usize>,
    even_modulus: bool,
    totient: Totient,
    top_bits: TopBits,
    lower_bound: bool,
    separation_bits: Option<usize>,
    attempts_per_bit: Option<usize>,
    strong_private_exponent: bool,
    max_regenerations: Option<usize>,
    pairwise_check: bool,
}

impl KeygenPolicy {
    /// General-purpose generation: any odd exponent `>= 3`, φ as the totient,
    /// unbounded prime search and no self-test.
    pub fn standard() -> Self {
        Self {
            compliance: false,
            min_modulus_bits: MIN_MODULUS_BITS,
            min_public_exponent: 3,
            max_public_exponent_bits: None,
            even_modulus: false,
            totient: Totient::Euler,
            top_bits: TopBits::Two,
            lower_bound: false,
            separation_bits: None,
            attempts_per_bit: None,
            strong_private_exponent: false,
            max_regenerations: None,
            pairwise_check: false,
        }
    }

    /// FIPS 186 style generation: `e >= 65537` of at most 256 bits, even
    /// modulus length, λ as the totient, bounded search with a prime lower
    /// bound and minimum separation, private exponent strength check and a
    /// mandatory pairwise self-test.
    pub fn compliance() -> Self {
        Self {
            compliance: true,
            min_modulus_bits: COMPLIANCE_MIN_MODULUS_BITS,
            min_public_exponent: DEFAULT_EXPONENT,
            max_public_exponent_bits: Some(256),
            even_modulus: true,
            totient: Totient::Carmichael,
            top_bits: TopBits::One,
            lower_bound: true,
            separation_bits: Some(100),
            attempts_per_bit: Some(5),
            strong_private_exponent: true,
            max_regenerations: None,
            pairwise_check: true,
        }
    }

    /// Picks [`compliance`](Self::compliance) or [`standard`](Self::standard).
    pub fn for_mode(compliance_mode: bool) -> Self {
        if compliance_mode {
            Self::compliance()
        } else {
            Self::standard()
        }
    }

    /// Overrides the modulus floor. In compliance mode the floor never drops
    /// below [`COMPLIANCE_ABSOLUTE_MIN_BITS`]; in standard mode never below
    /// [`MIN_MODULUS_BITS`].
    pub fn with_min_modulus_bits(mut self, bits: usize) -> Self {
        let floor = if self.compliance {
            COMPLIANCE_ABSOLUTE_MIN_BITS
        } else {
            MIN_MODULUS_BITS
        };
        self.min_modulus_bits = bits.max(floor);
        self
    }

    /// Bounds the number of full regenerations caused by a weak private
    /// exponent. `None` retries until a strong one turns up.
    pub fn with_max_regenerations(mut self, max: Option<usize>) -> Self {
        self.max_regenerations = max;
        self
    }

    /// Raises the compliance floor to [`ENFORCED_MIN_MODULUS_BITS`] if
    /// requested. Has no effect in standard mode.
    pub fn with_enforced_min_modulus(mut self, enforce: bool) -> Self {
        if self.compliance && enforce {
            self.min_modulus_bits = self.min_modulus_bits.max(ENFORCED_MIN_MODULUS_BITS);
        }
        self
    }

    /// Applies [`with_enforced_min_modulus`](Self::with_enforced_min_modulus)
    /// when [`ENFORCE_MODULUS_BITS_VAR`] is present in the environment.
    #[cfg(feature = "std")]
    pub fn enforce_min_modulus_from_env(self) -> Self {
        let enforce = std::env::var_os(ENFORCE_MODULUS_BITS_VAR).is_some();
        self.with_enforced_min_modulus(enforce)
    }

    /// Whether this is the compliance variant.
    pub fn is_compliance(&self) -> bool {
        self.compliance
    }

    /// Smallest accepted modulus length.
    pub fn min_modulus_bits(&self) -> usize {
        self.min_modulus_bits
    }

    /// Modulus used to derive `d`.
    pub fn totient(&self) -> Totient {
        self.totient
    }

    /// Regeneration ceiling, if any.
    pub fn max_regenerations(&self) -> Option<usize> {
        self.max_regenerations
    }

    /// Whether the pairwise self-test runs before the key is released.
    pub fn pairwise_check(&self) -> bool {
        self.pairwise_check
    }

    pub(crate) fn top_bits(&self) -> TopBits {
        self.top_bits
    }

    pub(crate) fn strong_private_exponent(&self) -> bool {
        self.strong_private_exponent
    }

    /// Checks the requested size and exponent, in that order: floor, parity,
    /// exponent.
    pub(crate) fn check_request(&self, bits: usize, exp: &BigUint) -> Result<()> {
        if bits < self.min_modulus_bits {
            return Err(Error::KeyTooSmall);
        }
        if self.even_modulus && bits % 2 != 0 {
            return Err(Error::OddKeyLength);
        }
        if let Some(separation) = self.separation_bits {
            // 2^(pbits - separation) must be a meaningful gap
            if bits / 2 <= separation {
                return Err(Error::KeyTooSmall);
            }
        }
        self.check_exponent(exp)
    }

    pub(crate) fn check_exponent(&self, exp: &BigUint) -> Result<()> {
        if exp < &BigUint::from(self.min_public_exponent) || exp.is_even() {
            return Err(Error::InvalidExponent);
        }
        if let Some(max_bits) = self.max_public_exponent_bits {
            if exp.bits() > max_bits {
                return Err(Error::InvalidExponent);
            }
        }
        Ok(())
    }

    /// Bit lengths of `p` and `q`.
    pub(crate) fn prime_bits(&self, bits: usize) -> (usize, usize) {
        if self.even_modulus {
            (bits / 2, bits / 2)
        } else {
            let pbits = (bits + 1) / 2;
            (pbits, bits - pbits)
        }
    }

    /// Number of attempts allowed to find one prime of `prime_bits` bits.
    pub(crate) fn attempt_budget(&self, prime_bits: usize) -> Option<usize> {
        self.attempts_per_bit.map(|per_bit| per_bit * prime_bits)
    }

    /// Smallest acceptable prime, `0xB504F334 · 2^(prime_bits - 32)`, just
    /// above `√2 · 2^(prime_bits - 1)`. Products of two such primes always
    /// have `2 · prime_bits` bits.
    pub(crate) fn lower_bound(&self, prime_bits: usize) -> Option<BigUint> {
        if !self.lower_bound || prime_bits < 32 {
            return None;
        }
        Some(BigUint::from(0xB504_F334u64) << (prime_bits - 32))
    }

    /// Minimum gap between `p` and `q`, `2^(prime_bits - separation_bits)`.
    pub(crate) fn min_separation(&self, prime_bits: usize) -> Option<BigUint> {
        self.separation_bits
            .filter(|separation| prime_bits > *separation)
            .map(|separation| BigUint::one() << (prime_bits - separation))
    }
}

/// Miller-Rabin rounds for a prime of `prime_bits` bits: smaller primes get
/// one more round.
pub(crate) fn primality_rounds(prime_bits: usize) -> usize {
    if prime_bits > 1024 {
        4
    } else {
        5
    }
}

impl Default for KeygenPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_request() {
        let policy = KeygenPolicy::standard();
        let e = BigUint::from(DEFAULT_EXPONENT);
        assert_eq!(policy.check_request(15, &e), Err(Error::KeyTooSmall));
        assert_eq!(policy.check_request(16, &e), Ok(()));
        assert_eq!(policy.check_request(17, &BigUint::from(3u32)), Ok(()));
        assert_eq!(
            policy.check_request(64, &BigUint::from(4u32)),
            Err(Error::InvalidExponent)
        );
        assert_eq!(
            policy.check_request(64, &BigUint::from(1u32)),
            Err(Error::InvalidExponent)
        );
        assert_eq!(policy.prime_bits(17), (9, 8));
    }

    #[test]
    fn test_compliance_request() {
        let policy = KeygenPolicy::compliance();
        let e = BigUint::from(DEFAULT_EXPONENT);
        assert_eq!(policy.check_request(1022, &e), Err(Error::KeyTooSmall));
        assert_eq!(policy.check_request(2049, &e), Err(Error::OddKeyLength));
        assert_eq!(
            policy.check_request(2048, &BigUint::from(3u32)),
            Err(Error::InvalidExponent)
        );
        assert_eq!(
            policy.check_request(2048, &(BigUint::one() << 256usize | BigUint::one())),
            Err(Error::InvalidExponent)
        );
        assert_eq!(policy.check_request(2048, &e), Ok(()));
        assert_eq!(policy.prime_bits(2048), (1024, 1024));
    }

    #[test]
    fn test_floors() {
        let policy = KeygenPolicy::compliance().with_min_modulus_bits(128);
        assert_eq!(policy.min_modulus_bits(), COMPLIANCE_ABSOLUTE_MIN_BITS);

        let policy = policy.with_enforced_min_modulus(true);
        assert_eq!(policy.min_modulus_bits(), ENFORCED_MIN_MODULUS_BITS);

        let policy = KeygenPolicy::standard().with_enforced_min_modulus(true);
        assert_eq!(policy.min_modulus_bits(), MIN_MODULUS_BITS);
    }

    #[test]
    fn test_bounds() {
        let policy = KeygenPolicy::compliance();
        let bound = policy.lower_bound(256).unwrap();
        assert_eq!(bound.bits(), 256);
        assert_eq!(policy.min_separation(256).unwrap().bits(), 157);
        assert_eq!(policy.attempt_budget(256), Some(1280));

        let policy = KeygenPolicy::standard();
        assert!(policy.lower_bound(256).is_none());
        assert!(policy.min_separation(256).is_none());
        assert!(policy.attempt_budget(256).is_none());
    }

    #[test]
    fn test_rounds() {
        assert_eq!(primality_rounds(512), 5);
        assert_eq!(primality_rounds(1024), 5);
        assert_eq!(primality_rounds(1536), 4);
    }
}
