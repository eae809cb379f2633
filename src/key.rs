use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithms::generate::KeyGenerator;
use crate::dummy_rng::DummyRng;
use crate::errors::{Error, Result};
use crate::policy::{KeygenPolicy, DEFAULT_EXPONENT};
use crate::secret::{ConstTime, Secret};
use crate::traits::{PaddingScheme, PrivateKeyParts, PublicKeyParts, SignatureScheme};

/// Represents the public part of an RSA key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// Modulus: product of prime numbers `p` and `q`
    n: BigUint,
    /// Public exponent: power to which a plaintext message is raised in
    /// order to encrypt it.
    e: BigUint,
}

/// Represents a whole RSA key, public and private parts.
#[derive(Debug, Clone)]
pub struct RsaPrivateKey {
    /// Public components of the private key.
    pubkey_components: RsaPublicKey,
    /// Private exponent
    pub(crate) d: BigUint,
    /// Prime factors of N, `[p, q]` with `p > q`.
    pub(crate) primes: Vec<BigUint>,
    /// CRT values to speed up private operations
    pub(crate) crt: CrtValues,
}

impl Eq for RsaPrivateKey {}
impl PartialEq for RsaPrivateKey {
    #[inline]
    fn eq(&self, other: &RsaPrivateKey) -> bool {
        self.pubkey_components == other.pubkey_components
            && self.d == other.d
            && self.primes == other.primes
    }
}

impl AsRef<RsaPublicKey> for RsaPrivateKey {
    fn as_ref(&self) -> &RsaPublicKey {
        &self.pubkey_components
    }
}

impl Hash for RsaPrivateKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Domain separator for RSA private keys
        state.write(b"RsaPrivateKey");
        Hash::hash(&self.pubkey_components, state);
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.d.zeroize();
        self.primes.zeroize();
        self.crt.zeroize();
    }
}

impl ZeroizeOnDrop for RsaPrivateKey {}

/// Chinese remainder theorem values of a two-prime key.
#[derive(Debug, Clone)]
pub(crate) struct CrtValues {
    /// D mod (P-1)
    pub(crate) dp: BigUint,
    /// D mod (Q-1)
    pub(crate) dq: BigUint,
    /// Q^-1 mod P
    pub(crate) qinv: BigUint,
}

impl Zeroize for CrtValues {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Drop for CrtValues {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl From<RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: RsaPrivateKey) -> Self {
        (&private_key).into()
    }
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: &RsaPrivateKey) -> Self {
        let n = private_key.n().clone();
        let e = private_key.e().clone();
        RsaPublicKey { n, e }
    }
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl RsaPublicKey {
    /// Encrypt the given message.
    pub fn encrypt<R: CryptoRngCore + ?Sized, P: PaddingScheme>(
        &self,
        rng: &mut R,
        padding: P,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        padding.encrypt(rng, self, msg)
    }

    /// Verify a signed message.
    ///
    /// `hashed` must be the result of hashing the input using the hashing function
    /// passed in through `hash`.
    ///
    /// If the message is valid `Ok(())` is returned, otherwise an `Err` indicating failure.
    pub fn verify<S: SignatureScheme>(&self, scheme: S, hashed: &[u8], sig: &[u8]) -> Result<()> {
        scheme.verify(self, hashed, sig)
    }

    /// Create a new public key from its components.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        let k = Self { n, e };
        check_public(&k)?;
        Ok(k)
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.pubkey_components.n
    }

    fn e(&self) -> &BigUint {
        &self.pubkey_components.e
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    fn dp(&self) -> &BigUint {
        &self.crt.dp
    }

    fn dq(&self) -> &BigUint {
        &self.crt.dq
    }

    fn qinv(&self) -> &BigUint {
        &self.crt.qinv
    }
}

impl RsaPrivateKey {
    /// Generate a new RSA key pair of the given bit size using the passed in `rng`,
    /// with the default public exponent 65537 and the standard policy.
    pub fn new<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<RsaPrivateKey> {
        Self::new_with_exp(rng, bit_size, &BigUint::from(DEFAULT_EXPONENT))
    }

    /// Generate a new RSA key pair of the given bit size and the public exponent
    /// using the passed in `rng`, with the standard policy.
    pub fn new_with_exp<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        bit_size: usize,
        exp: &BigUint,
    ) -> Result<RsaPrivateKey> {
        KeyGenerator::new(KeygenPolicy::standard()).generate(rng, bit_size, exp, None)
    }

    /// Constructs an RSA key pair from the individual components.
    ///
    /// The primes may be given in either order. CRT values are derived and
    /// the key is validated before it is returned.
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        mut primes: Vec<BigUint>,
    ) -> Result<RsaPrivateKey> {
        if primes.len() != 2 {
            return Err(Error::InvalidPrime);
        }
        if primes[0] < primes[1] {
            primes.swap(0, 1);
        }

        let crt = compute_crt_values(&d, &primes[0], &primes[1])?;
        let k = RsaPrivateKey {
            pubkey_components: RsaPublicKey { n, e },
            d,
            primes,
            crt,
        };

        k.validate()?;

        Ok(k)
    }

    /// Assembles a key whose values were derived by the generator. Nothing
    /// is recomputed.
    pub(crate) fn from_parts(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
        crt: CrtValues,
    ) -> RsaPrivateKey {
        RsaPrivateKey {
            pubkey_components: RsaPublicKey { n, e },
            d,
            primes: vec![p, q],
            crt,
        }
    }

    /// Get the public key from the private key, cloning `n` and `e`.
    ///
    /// Generally this is not needed since `RsaPrivateKey` implements the `PublicKey` trait,
    /// but it can occasionally be useful to discard the private information entirely.
    pub fn to_public_key(&self) -> RsaPublicKey {
        self.pubkey_components.clone()
    }

    /// Performs basic sanity checks on the key.
    /// Returns `Ok(())` if everything is good, otherwise an appropriate error.
    pub fn validate(&self) -> Result<()> {
        check_public(self)?;

        let p = &self.primes[0];
        let q = &self.primes[1];
        if p <= &BigUint::one() || q <= &BigUint::one() || p == q {
            return Err(Error::InvalidPrime);
        }

        // Check that p·q == n.
        if &(p * q) != self.n() {
            return Err(Error::InvalidModulus);
        }

        // Check that de ≡ 1 mod p-1, for each prime.
        // This implies that e is coprime to each p-1 as e has a multiplicative
        // inverse. Therefore e is coprime to lcm(p-1,q-1).
        let mut de = self.e().clone();
        de *= &self.d;
        for prime in &self.primes {
            let prime_minus_one = Secret::new(prime - BigUint::one());
            let congruence = Secret::new(&de % &*prime_minus_one);
            if !congruence.is_one() {
                de.zeroize();
                return Err(Error::InvalidExponent);
            }
        }
        de.zeroize();

        if !((&self.crt.qinv * q) % p).is_one() {
            return Err(Error::InvalidCoefficient);
        }

        Ok(())
    }

    /// Decrypt the given message.
    pub fn decrypt<P: PaddingScheme>(&self, padding: P, ciphertext: &[u8]) -> Result<Vec<u8>> {
        padding.decrypt(Option::<&mut DummyRng>::None, self, ciphertext)
    }

    /// Decrypt the given message.
    ///
    /// Uses `rng` to blind the decryption process.
    pub fn decrypt_blinded<R: CryptoRngCore + ?Sized, P: PaddingScheme>(
        &self,
        rng: &mut R,
        padding: P,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        padding.decrypt(Some(rng), self, ciphertext)
    }

    /// Sign the given digest.
    pub fn sign<S: SignatureScheme>(&self, padding: S, digest_in: &[u8]) -> Result<Vec<u8>> {
        padding.sign(Option::<&mut DummyRng>::None, self, digest_in)
    }

    /// Sign the given digest using the provided `rng`, which is used in the
    /// following ways depending on the [`SignatureScheme`]:
    ///
    /// - [`Pkcs1v15Sign`][`crate::Pkcs1v15Sign`] and [`X931Sign`][`crate::X931Sign`]:
    ///   uses the RNG to mask the private key operation with random blinding.
    /// - [`Pss`][`crate::Pss`]: uses the RNG to compute a random salt and to
    ///   blind the private key operation.
    pub fn sign_with_rng<R: CryptoRngCore + ?Sized, S: SignatureScheme>(
        &self,
        rng: &mut R,
        padding: S,
        digest_in: &[u8],
    ) -> Result<Vec<u8>> {
        padding.sign(Some(rng), self, digest_in)
    }
}

/// Derives `d mod (p-1)`, `d mod (q-1)` and `q^-1 mod p`, each from a scratch
/// copy of the secret operand.
pub(crate) fn compute_crt_values(d: &BigUint, p: &BigUint, q: &BigUint) -> Result<CrtValues> {
    if p.is_zero() || q.is_zero() {
        return Err(Error::InvalidPrime);
    }

    let p_minus_one = Secret::new(p - BigUint::one());
    let q_minus_one = Secret::new(q - BigUint::one());

    let d_scratch = ConstTime::copy_of(d);
    let dp = d_scratch.rem(&p_minus_one)?;
    let dq = d_scratch.rem(&q_minus_one)?;
    drop(d_scratch);

    let p_scratch = ConstTime::copy_of(p);
    let qinv = p_scratch.invert(q)?.ok_or(Error::InvalidCoefficient)?;

    Ok(CrtValues {
        dp: dp.expose(),
        dq: dq.expose(),
        qinv: qinv.expose(),
    })
}

/// Check that the public key is well formed: a non-zero odd modulus and an
/// odd exponent of at least 3. Small standard-mode moduli may be shorter than
/// the exponent, so `e` is not bounded by `n`.
#[inline]
pub(crate) fn check_public(public_key: &impl PublicKeyParts) -> Result<()> {
    let n = public_key.n();
    if n.is_zero() || n.is_even() {
        return Err(Error::InvalidModulus);
    }

    let e = public_key.e();
    if e < &BigUint::from(3u32) || e.is_even() {
        return Err(Error::InvalidExponent);
    }

    Ok(())
}
