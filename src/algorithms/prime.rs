//! Search for the prime factors of an RSA modulus.

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};
use crate::policy::{primality_rounds, TopBits};
use crate::progress::{Phase, Progress};
use crate::secret::{self, Secret};

/// Verdict of a [`PrimalityOracle`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Primality {
    /// The candidate passed every round.
    ProbablyPrime,
    /// The candidate is certainly composite.
    Composite,
}

/// Probabilistic primality test used by the prime search.
///
/// An `Err` is not a verdict: it aborts the whole key generation.
pub trait PrimalityOracle {
    /// Tests `candidate` with the given number of Miller-Rabin rounds.
    fn test(&self, candidate: &BigUint, rounds: usize) -> Result<Primality>;
}

/// Miller-Rabin with the requested rounds followed by a strong Lucas test,
/// as implemented by `num-bigint-dig`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BailliePsw;

impl PrimalityOracle for BailliePsw {
    fn test(&self, candidate: &BigUint, rounds: usize) -> Result<Primality> {
        if num_bigint::prime::probably_prime(candidate, rounds) {
            Ok(Primality::ProbablyPrime)
        } else {
            Ok(Primality::Composite)
        }
    }
}

/// Parameters of a single prime search.
pub(crate) struct SearchParams<'a> {
    /// Exact bit length of the prime.
    pub bits: usize,
    /// Public exponent; `prime - 1` must be coprime to it.
    pub exp: &'a BigUint,
    pub top_bits: TopBits,
    /// Candidates below this are redrawn for free.
    pub lower_bound: Option<&'a BigUint>,
    /// Maximum number of attempts, `None` for an unbounded search.
    pub budget: Option<usize>,
    /// Counter value reported with [`Phase::PrimeFound`].
    pub index: usize,
}

/// Draws a uniformly random odd integer of exactly `bits` bits, with the top
/// one or two bits set.
pub(crate) fn draw_candidate<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bits: usize,
    top_bits: TopBits,
) -> Result<Secret> {
    if bits < 2 {
        return Err(Error::Internal);
    }

    let mut b = bits % 8;
    if b == 0 {
        b = 8;
    }

    let bytes_len = (bits + 7) / 8;
    let mut bytes = Zeroizing::new(vec![0u8; bytes_len]);
    rng.try_fill_bytes(&mut bytes)?;

    // Clear bits in the first byte so the candidate has at most `bits` bits.
    bytes[0] &= ((1u32 << b) - 1) as u8;

    match top_bits {
        TopBits::One => bytes[0] |= 1u8 << (b - 1),
        TopBits::Two if b >= 2 => bytes[0] |= 3u8 << (b - 2),
        TopBits::Two => {
            // b == 1, the second bit lives in the next byte
            bytes[0] |= 1;
            bytes[1] |= 0x80;
        }
    }

    bytes[bytes_len - 1] |= 1;

    Ok(Secret::new(BigUint::from_bytes_be(&bytes)))
}

/// Searches for a prime `r` of `params.bits` bits with `gcd(r - 1, e) = 1`.
///
/// `accept` is a structural predicate (such as `r != p`); candidates it
/// refuses, like candidates below the lower bound, are redrawn without
/// counting as an attempt. `counter` is the rejection count shared across
/// both primes of a key.
pub(crate) fn find_prime<R, O>(
    rng: &mut R,
    params: &SearchParams<'_>,
    accept: impl Fn(&BigUint) -> bool,
    oracle: &O,
    progress: &mut dyn Progress,
    counter: &mut usize,
) -> Result<Secret>
where
    R: CryptoRngCore + ?Sized,
    O: PrimalityOracle + ?Sized,
{
    let rounds = primality_rounds(params.bits);
    let mut attempts = 0usize;

    loop {
        if let Some(budget) = params.budget {
            if attempts >= budget {
                log::warn!(
                    "no {}-bit prime found within {} attempts",
                    params.bits,
                    budget
                );
                return Err(Error::SearchExhausted);
            }
        }

        let candidate = draw_candidate(rng, params.bits, params.top_bits)?;

        if let Some(bound) = params.lower_bound {
            if *candidate < *bound {
                continue;
            }
        }

        if !accept(&*candidate) {
            continue;
        }

        attempts += 1;

        let coprime = {
            let candidate_minus_one = Secret::new(&*candidate - 1u32);
            secret::invert(&candidate_minus_one, params.exp)?.is_some()
        };

        if coprime && oracle.test(&candidate, rounds)? == Primality::ProbablyPrime {
            log::trace!(
                "found {}-bit prime after {} attempts",
                params.bits,
                attempts
            );
            if progress.report(Phase::PrimeFound, params.index).is_break() {
                return Err(Error::Cancelled);
            }
            return Ok(candidate);
        }

        *counter += 1;
        if progress
            .report(Phase::CandidateRejected, *counter)
            .is_break()
        {
            return Err(Error::Cancelled);
        }
    }
}
