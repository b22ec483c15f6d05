// RSA Errors
// Error kinds surfaced by arithmetic, key generation, messaging and key files

use num_bigint::BigUint;
use std::io;
use std::path::PathBuf;

/// Errors that can occur during RSA operations
#[derive(Debug, thiserror::Error)]
pub enum RsaError {
    /// Modular inverse requested for inputs that are not coprime
    #[error("no inverse exists: gcd({a}, {m}) = {gcd}")]
    InvalidModulus {
        a: BigUint,
        m: BigUint,
        gcd: BigUint,
    },

    #[error("key generation exhausted: no valid public exponent after {attempts} prime pairs")]
    KeyGenerationExhausted { attempts: u32 },

    #[error("message too large for key: encoded message needs {message_bits} bits, modulus has {modulus_bits}")]
    MessageTooLarge { message_bits: u64, modulus_bits: u64 },

    /// Recovered bytes are not UTF-8: wrong key or corrupted ciphertext
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] std::string::FromUtf8Error),

    #[error("malformed key file {}: {reason}", path.display())]
    MalformedKeyFile { path: PathBuf, reason: String },

    #[error("invalid key size: must be at least {min} bits, got {actual}")]
    InvalidKeySize { min: u64, actual: u64 },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for RSA operations
pub type Result<T> = std::result::Result<T, RsaError>;

impl RsaError {
    pub(crate) fn malformed_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        RsaError::MalformedKeyFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
