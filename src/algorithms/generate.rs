//! Generate the prime components of an RSA private key and assemble the key.

use num_bigint::BigUint;
use num_integer::Integer;
use rand_core::CryptoRngCore;

use crate::algorithms::prime::{
    find_prime, BailliePsw, Primality, PrimalityOracle, SearchParams,
};
use crate::errors::{Error, Result};
use crate::key::{compute_crt_values, RsaPrivateKey};
use crate::pairwise;
use crate::policy::{primality_rounds, KeygenPolicy, Totient};
use crate::progress::{NoProgress, Progress};
use crate::secret::{self, ConstTime, Secret};
use crate::traits::PublicKeyParts;

/// Generates RSA key pairs under a [`KeygenPolicy`].
///
/// ```
/// use rsa_keygen::{BigUint, KeyGenerator, KeygenPolicy};
/// use rsa_keygen::traits::PublicKeyParts;
/// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// # let mut rng = ChaCha8Rng::from_seed([42; 32]);
///
/// let policy = KeygenPolicy::compliance().with_min_modulus_bits(512);
/// let key = KeyGenerator::new(policy)
///     .generate(&mut rng, 512, &BigUint::from(65537u32), None)
///     .expect("failed to generate a key");
/// assert_eq!(key.n().bits(), 512);
/// ```
#[derive(Clone, Debug)]
pub struct KeyGenerator<O = BailliePsw> {
    policy: KeygenPolicy,
    oracle: O,
}

impl KeyGenerator<BailliePsw> {
    /// Generator using `policy` and the default primality test.
    pub fn new(policy: KeygenPolicy) -> Self {
        Self {
            policy,
            oracle: BailliePsw,
        }
    }
}

impl<O: PrimalityOracle> KeyGenerator<O> {
    /// Replaces the primality test.
    pub fn with_oracle<P: PrimalityOracle>(self, oracle: P) -> KeyGenerator<P> {
        KeyGenerator {
            policy: self.policy,
            oracle,
        }
    }

    /// The policy this generator enforces.
    pub fn policy(&self) -> &KeygenPolicy {
        &self.policy
    }

    /// Generates a key with a modulus of exactly `bits` bits and the public
    /// exponent `exp`.
    ///
    /// `progress` is told about every rejected candidate and every accepted
    /// prime, and may cancel. A private exponent that is too small starts the
    /// whole search over, up to the policy's regeneration ceiling.
    pub fn generate<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        bits: usize,
        exp: &BigUint,
        progress: Option<&mut dyn Progress>,
    ) -> Result<RsaPrivateKey> {
        self.policy.check_request(bits, exp)?;

        let mut no_progress = NoProgress;
        let progress: &mut dyn Progress = match progress {
            Some(progress) => progress,
            None => &mut no_progress,
        };

        log::debug!(
            "generating {}-bit RSA key, compliance mode: {}",
            bits,
            self.policy.is_compliance()
        );

        let mut counter = 0usize;
        let key = retry_until_strong(self.policy.max_regenerations(), |round| {
            if round > 0 {
                log::debug!("regenerating key, round {}", round);
            }
            self.attempt(rng, bits, exp, &mut *progress, &mut counter)
        })?;

        log::debug!(
            "{}-bit RSA key generated, {} candidates rejected",
            bits,
            counter
        );
        Ok(key)
    }

    /// Checks a caller-supplied prime pair against every constraint the
    /// search enforces. Any violation is an [`Error::InvalidPrime`].
    pub fn check_primes(&self, p: &BigUint, q: &BigUint, exp: &BigUint, bits: usize) -> Result<()> {
        self.policy.check_request(bits, exp)?;

        if p == q {
            return Err(Error::InvalidPrime);
        }
        let (p, q) = if p < q { (q, p) } else { (p, q) };

        let (pbits, qbits) = self.policy.prime_bits(bits);
        if p.bits() != pbits || q.bits() != qbits {
            return Err(Error::InvalidPrime);
        }

        if let Some(bound) = self.policy.lower_bound(qbits) {
            // p >= q, so q alone decides
            if q < &bound {
                return Err(Error::InvalidPrime);
            }
        }

        if let Some(min) = self.policy.min_separation(pbits) {
            if !far_enough(p, q, &min) {
                return Err(Error::InvalidPrime);
            }
        }

        for prime in [p, q] {
            let prime_minus_one = Secret::new(prime - 1u32);
            if secret::invert(&prime_minus_one, exp)?.is_none() {
                return Err(Error::InvalidPrime);
            }
            let rounds = primality_rounds(prime.bits());
            if self.oracle.test(prime, rounds)? != Primality::ProbablyPrime {
                return Err(Error::InvalidPrime);
            }
        }

        if (p * q).bits() != bits {
            return Err(Error::InvalidPrime);
        }

        Ok(())
    }

    /// Assembles a key from a known prime pair, for known-answer testing.
    ///
    /// The pair goes through [`check_primes`](Self::check_primes) first. A
    /// pair that yields a weak private exponent cannot be regenerated and is
    /// rejected as well.
    pub fn from_primes<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        p: &BigUint,
        q: &BigUint,
        exp: &BigUint,
        bits: usize,
    ) -> Result<RsaPrivateKey> {
        self.check_primes(p, q, exp, bits)?;

        let (pbits, _) = self.policy.prime_bits(bits);
        let (p, q) = if p < q { (q, p) } else { (p, q) };
        let p = Secret::new(p.clone());
        let q = Secret::new(q.clone());

        match self.derive(rng, p, q, pbits, exp)? {
            Outcome::Done(key) => Ok(key),
            Outcome::Weak => Err(Error::InvalidPrime),
        }
    }

    /// One full pass: both primes, then every derived value.
    fn attempt<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        bits: usize,
        exp: &BigUint,
        progress: &mut dyn Progress,
        counter: &mut usize,
    ) -> Result<Outcome<RsaPrivateKey>> {
        let (pbits, qbits) = self.policy.prime_bits(bits);
        let top_bits = self.policy.top_bits();
        let p_bound = self.policy.lower_bound(pbits);
        let q_bound = self.policy.lower_bound(qbits);
        let separation = self.policy.min_separation(pbits);

        let p = find_prime(
            rng,
            &SearchParams {
                bits: pbits,
                exp,
                top_bits,
                lower_bound: p_bound.as_ref(),
                budget: self.policy.attempt_budget(pbits),
                index: 0,
            },
            |_| true,
            &self.oracle,
            &mut *progress,
            counter,
        )?;

        let q = find_prime(
            rng,
            &SearchParams {
                bits: qbits,
                exp,
                top_bits,
                lower_bound: q_bound.as_ref(),
                budget: self.policy.attempt_budget(qbits),
                index: 1,
            },
            |candidate| {
                candidate != &*p
                    && separation
                        .as_ref()
                        .map_or(true, |min| far_enough(candidate, &p, min))
            },
            &self.oracle,
            &mut *progress,
            counter,
        )?;

        // Ownership moves with the swap, nothing is copied.
        let (p, q) = if *p < *q { (q, p) } else { (p, q) };

        let key = match self.derive(rng, p, q, pbits, exp)? {
            Outcome::Done(key) => key,
            Outcome::Weak => return Ok(Outcome::Weak),
        };
        debug_assert_eq!(key.n().bits(), bits);

        Ok(Outcome::Done(key))
    }

    /// Derives `n`, `d` and the CRT values from `p > q`, and runs the
    /// pairwise check if the policy asks for it.
    fn derive<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        p: Secret,
        q: Secret,
        pbits: usize,
        exp: &BigUint,
    ) -> Result<Outcome<RsaPrivateKey>> {
        let n = &*p * &*q;

        let lambda = {
            let p_minus_one = Secret::new(&*p - 1u32);
            let q_minus_one = Secret::new(&*q - 1u32);
            match self.policy.totient() {
                Totient::Euler => Secret::new(&*p_minus_one * &*q_minus_one),
                Totient::Carmichael => {
                    let gcd = Secret::new(p_minus_one.gcd(&*q_minus_one));
                    let reduced = Secret::new(&*p_minus_one / &*gcd);
                    Secret::new(&*reduced * &*q_minus_one)
                }
            }
        };

        // gcd(e, p-1) = gcd(e, q-1) = 1 was established by the search, so
        // a missing inverse means the arithmetic broke.
        let d = ConstTime::copy_of(&lambda)
            .invert(exp)?
            .ok_or(Error::ArithmeticFailure)?;
        drop(lambda);

        if self.policy.strong_private_exponent() && d.bits() < pbits {
            log::debug!("private exponent shorter than {} bits", pbits);
            return Ok(Outcome::Weak);
        }

        let crt = compute_crt_values(&d, &p, &q)?;
        let key = RsaPrivateKey::from_parts(n, exp.clone(), d.expose(), p.expose(), q.expose(), crt);

        if self.policy.pairwise_check() {
            // On failure the key is dropped here, which zeroes it.
            pairwise::validate(&key, rng)?;
        }

        Ok(Outcome::Done(key))
    }
}

/// Generates an RSA key pair of `bits` bits with the given public exponent.
///
/// `compliance_mode` picks [`KeygenPolicy::compliance`] over
/// [`KeygenPolicy::standard`]. With the `std` feature the compliance floor
/// is raised to 2048 bits when `RSA_KEYGEN_ENFORCE_MODULUS_BITS` is set.
pub fn generate_rsa_key<R: CryptoRngCore + ?Sized>(
    bits: usize,
    public_exponent: &BigUint,
    rng: &mut R,
    progress: Option<&mut dyn Progress>,
    compliance_mode: bool,
) -> Result<RsaPrivateKey> {
    let policy = KeygenPolicy::for_mode(compliance_mode);
    #[cfg(feature = "std")]
    let policy = policy.enforce_min_modulus_from_env();

    KeyGenerator::new(policy).generate(rng, bits, public_exponent, progress)
}

/// Result of one generation pass.
pub(crate) enum Outcome<T> {
    Done(T),
    /// The private exponent is too small; start over.
    Weak,
}

/// Runs `attempt` until it produces a strong result. `attempt` gets the
/// number of regenerations so far. More than `max_regenerations` of them is
/// [`Error::DidNotConverge`].
pub(crate) fn retry_until_strong<T>(
    max_regenerations: Option<usize>,
    mut attempt: impl FnMut(usize) -> Result<Outcome<T>>,
) -> Result<T> {
    let mut regenerations = 0usize;
    loop {
        match attempt(regenerations)? {
            Outcome::Done(value) => return Ok(value),
            Outcome::Weak => {
                regenerations += 1;
                if let Some(max) = max_regenerations {
                    if regenerations > max {
                        log::warn!("no strong key after {} regenerations", max);
                        return Err(Error::DidNotConverge);
                    }
                }
            }
        }
    }
}

/// `|a - b| > min`
fn far_enough(a: &BigUint, b: &BigUint, min: &BigUint) -> bool {
    let diff = Secret::new(if a > b { a - b } else { b - a });
    &*diff > min
}
