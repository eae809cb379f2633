//! Error types.

/// Alias for [`core::result::Result`] with the `rsa-keygen` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Public exponent is even, below the floor of the active policy, or
    /// longer than its bit ceiling.
    InvalidExponent,

    /// Requested modulus is shorter than the floor of the active policy.
    KeyTooSmall,

    /// Compliance mode requires an even modulus length.
    OddKeyLength,

    /// Prime search ran out of its attempt budget.
    SearchExhausted,

    /// Key generation exceeded the configured number of regenerations.
    DidNotConverge,

    /// The pairwise consistency check rejected the generated key.
    SelfTestFailed,

    /// The progress callback asked to stop.
    Cancelled,

    /// Unexpected failure of the big-integer arithmetic, the primality
    /// oracle or the random source.
    ArithmeticFailure,

    /// Invalid padding scheme.
    InvalidPaddingScheme,

    /// Decryption error.
    Decryption,

    /// Verification error.
    Verification,

    /// Message too long.
    MessageTooLong,

    /// Input must be hashed.
    InputNotHashed,

    /// Invalid prime value.
    InvalidPrime,

    /// Invalid modulus.
    InvalidModulus,

    /// Invalid coefficient.
    InvalidCoefficient,

    /// Invalid padding length.
    InvalidPadLen,

    /// Internal error.
    Internal,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidExponent => write!(f, "invalid public exponent"),
            Error::KeyTooSmall => write!(f, "requested key size is too small"),
            Error::OddKeyLength => write!(f, "modulus length must be even"),
            Error::SearchExhausted => write!(f, "prime search exhausted its attempt budget"),
            Error::DidNotConverge => write!(f, "key generation did not converge"),
            Error::SelfTestFailed => write!(f, "pairwise consistency self-test failed"),
            Error::Cancelled => write!(f, "key generation cancelled"),
            Error::ArithmeticFailure => write!(f, "arithmetic or randomness failure"),
            Error::InvalidPaddingScheme => write!(f, "invalid padding scheme"),
            Error::Decryption => write!(f, "decryption error"),
            Error::Verification => write!(f, "verification error"),
            Error::MessageTooLong => write!(f, "message too long"),
            Error::InputNotHashed => write!(f, "input must be hashed"),
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::InvalidModulus => write!(f, "invalid modulus"),
            Error::InvalidCoefficient => write!(f, "invalid coefficient"),
            Error::InvalidPadLen => write!(f, "invalid padding length"),
            Error::Internal => write!(f, "internal error"),
        }
    }
}

impl From<rand_core::Error> for Error {
    fn from(_: rand_core::Error) -> Error {
        Error::ArithmeticFailure
    }
}
