//! Scoped ownership of secret big integers.
//!
//! Every secret intermediate of key generation (prime candidates, `p`, `q`,
//! `λ`, `d` and the CRT values) lives in a [`Secret`] until it is either
//! handed to the finished key or dropped. Dropping zeroes the limbs, so every
//! exit path (success, error, cancellation) scrubs what was computed so far.

use core::fmt;
use core::ops::Deref;

use num_bigint::{BigUint, ModInverse};
use num_traits::Zero;
use zeroize::Zeroize;

use crate::errors::{Error, Result};

/// An owned secret big integer that is zeroed when it goes out of scope.
pub(crate) struct Secret(BigUint);

impl Secret {
    pub(crate) fn new(value: BigUint) -> Self {
        tracker::acquire();
        Secret(value)
    }

    /// Moves the value out of the scope. What stays behind is an empty
    /// integer, so the drop has nothing left to scrub.
    pub(crate) fn expose(mut self) -> BigUint {
        core::mem::replace(&mut self.0, BigUint::zero())
    }
}

impl Deref for Secret {
    type Target = BigUint;

    fn deref(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
        tracker::release();
    }
}

/// Scratch copy of a value for a single arithmetic step on secret data.
///
/// `num-bigint-dig` has no constant-time flag to set on a value, so instead of
/// marking a shared integer, each step works on a private copy taken here.
/// Nothing else can read the copy while the step runs, and the copy is
/// scrubbed as soon as it is dropped, so no alias of the secret outlives the
/// operation.
pub(crate) struct ConstTime(Secret);

impl ConstTime {
    pub(crate) fn copy_of(value: &BigUint) -> Self {
        ConstTime(Secret::new(value.clone()))
    }

    /// Returns `self mod m`.
    pub(crate) fn rem(&self, m: &BigUint) -> Result<Secret> {
        if m.is_zero() {
            return Err(Error::ArithmeticFailure);
        }
        Ok(Secret::new(&*self.0 % m))
    }

    /// Returns `a^-1 mod self`, with `self` as the modulus.
    pub(crate) fn invert(&self, a: &BigUint) -> Result<Option<Secret>> {
        invert(a, &self.0)
    }
}

/// Returns `a^-1 mod m`.
///
/// `Ok(None)` means `gcd(a, m) != 1`, which callers treat as an ordinary
/// rejection. A zero modulus or a result that cannot be brought back into
/// `[0, m)` is an [`Error::ArithmeticFailure`].
pub(crate) fn invert(a: &BigUint, m: &BigUint) -> Result<Option<Secret>> {
    if m.is_zero() {
        return Err(Error::ArithmeticFailure);
    }

    let inverse = (a % m).mod_inverse(m);

    match inverse {
        None => Ok(None),
        Some(mut inverse) => {
            let value = inverse.to_biguint();
            inverse.zeroize();
            match value {
                Some(value) => Ok(Some(Secret::new(value))),
                None => Err(Error::ArithmeticFailure),
            }
        }
    }
}

/// Counts live [`Secret`]s on the current thread so tests can check that
/// every exit path went through the zeroing drop.
#[cfg(test)]
pub(crate) mod tracker {
    use core::cell::Cell;

    std::thread_local! {
        static LIVE: Cell<usize> = Cell::new(0);
    }

    pub(crate) fn acquire() {
        LIVE.with(|live| live.set(live.get() + 1));
    }

    pub(crate) fn release() {
        LIVE.with(|live| live.set(live.get() - 1));
    }

    pub(crate) fn live() -> usize {
        LIVE.with(|live| live.get())
    }
}

#[cfg(not(test))]
mod tracker {
    #[inline(always)]
    pub(crate) fn acquire() {}

    #[inline(always)]
    pub(crate) fn release() {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn test_secret_scope() {
        let before = tracker::live();
        {
            let a = Secret::new(BigUint::from(1234u32));
            let b = ConstTime::copy_of(&a);
            assert_eq!(tracker::live(), before + 2);
            let r = b.rem(&BigUint::from(1000u32)).unwrap();
            assert_eq!(*r, BigUint::from(234u32));
        }
        assert_eq!(tracker::live(), before);
    }

    #[test]
    fn test_expose_releases() {
        let before = tracker::live();
        let a = Secret::new(BigUint::from(77u32));
        let value = a.expose();
        assert_eq!(value, BigUint::from(77u32));
        assert_eq!(tracker::live(), before);
    }

    #[test]
    fn test_invert() {
        let m = BigUint::from(3120u32);
        let inv = invert(&BigUint::from(17u32), &m).unwrap().unwrap();
        assert_eq!((&*inv * 17u32) % &m, BigUint::one());

        // gcd(6, 3120) != 1 is a rejection, not an error
        assert!(invert(&BigUint::from(6u32), &m).unwrap().is_none());

        assert_eq!(
            invert(&BigUint::from(6u32), &BigUint::zero()).unwrap_err(),
            Error::ArithmeticFailure
        );
    }

    #[test]
    fn test_const_time_rem_zero_modulus() {
        let d = ConstTime::copy_of(&BigUint::from(5u32));
        assert_eq!(d.rem(&BigUint::zero()).unwrap_err(), Error::ArithmeticFailure);
    }
}
