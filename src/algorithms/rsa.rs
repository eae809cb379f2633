//! Textbook RSA on integers, with CRT decryption and optional blinding.

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};
use crate::secret::{self, Secret};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// ⚠️ Computes `m^e mod n`. No padding is applied.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Raw RSA is only safe underneath a padding scheme. See the
/// [module-level documentation][crate::hazmat].
#[inline]
pub fn rsa_encrypt<K: PublicKeyParts>(key: &K, m: &BigUint) -> Result<BigUint> {
    if key.n().is_zero() {
        return Err(Error::InvalidModulus);
    }
    Ok(m.modpow(key.e(), key.n()))
}

/// ⚠️ Computes `c^d mod n` through the two primes and the CRT values of the
/// key. No padding is removed and the result is not checked.
///
/// With `Some(rng)` the input is blinded by a random `r^e` first.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Raw RSA is only safe underneath a padding scheme. See the
/// [module-level documentation][crate::hazmat].
pub fn rsa_decrypt<R: CryptoRngCore + ?Sized>(
    rng: Option<&mut R>,
    priv_key: &impl PrivateKeyParts,
    c: &BigUint,
) -> Result<BigUint> {
    let n = priv_key.n();
    if n.is_zero() || c >= n {
        return Err(Error::Decryption);
    }

    let (p, q) = match priv_key.primes() {
        [p, q] => (p, q),
        _ => return Err(Error::InvalidPrime),
    };

    let (input, unblinder) = match rng {
        Some(rng) => {
            let (blinded, unblinder) = blind(rng, priv_key, c)?;
            (Zeroizing::new(blinded), Some(unblinder))
        }
        None => (Zeroizing::new(c.clone()), None),
    };

    let m1 = Zeroizing::new(input.modpow(priv_key.dp(), p));
    let m2 = Zeroizing::new(input.modpow(priv_key.dq(), q));

    // h = qinv · (m1 - m2) mod p, lifted by p to stay non-negative
    let m2_mod_p = Zeroizing::new(&*m2 % p);
    let mut h = Zeroizing::new(&*m1 + p);
    *h -= &*m2_mod_p;
    *h *= priv_key.qinv();
    *h %= p;

    // m = m2 + h · q
    let m = Zeroizing::new(&*m2 + &*h * q);

    Ok(match unblinder {
        Some(unblinder) => (&*m * &*unblinder) % n,
        None => (*m).clone(),
    })
}

/// ⚠️ Like [`rsa_decrypt`], then re-encrypts the result and compares it to
/// `c`. A mismatch means the CRT computation went wrong and is reported as
/// [`Error::Internal`] instead of leaking a faulty result.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Raw RSA is only safe underneath a padding scheme. See the
/// [module-level documentation][crate::hazmat].
#[inline]
pub fn rsa_decrypt_and_check<R: CryptoRngCore + ?Sized>(
    priv_key: &impl PrivateKeyParts,
    rng: Option<&mut R>,
    c: &BigUint,
) -> Result<BigUint> {
    let m = rsa_decrypt(rng, priv_key, c)?;

    if c != &rsa_encrypt(priv_key, &m)? {
        return Err(Error::Internal);
    }

    Ok(m)
}

/// Returns `c · r^e mod n` for a random invertible `r`, and `r^-1 mod n`.
fn blind<R: CryptoRngCore + ?Sized, K: PublicKeyParts>(
    rng: &mut R,
    key: &K,
    c: &BigUint,
) -> Result<(BigUint, Secret)> {
    let n = key.n();

    let (r, unblinder) = loop {
        let r = Secret::new(rng.gen_biguint_below(n));
        if r.is_zero() {
            continue;
        }
        if let Some(unblinder) = secret::invert(&r, n)? {
            break (r, unblinder);
        }
    };

    let r_e = Zeroizing::new(r.modpow(key.e(), n));
    Ok(((c * &*r_e) % n, unblinder))
}
