//! # Textbook RSA
//!
//! Arbitrary-precision modular arithmetic, prime generation, key generation,
//! and the encrypt/decrypt/sign/verify protocol on single integers below the
//! modulus.
//!
//! There is no padding and no hashing: messages are UTF-8 text interpreted as
//! a big-endian integer, and signatures are computed over that integer
//! directly. This is suitable for teaching, not for protecting data.
//!
//! ## Example
//!
//! ```rust,no_run
//! use textbook_rsa::rsa::{generate_keypair, KeyGenConfig};
//!
//! let keypair = generate_keypair(&KeyGenConfig::default().with_prime_bits(512))?;
//! let ciphertext = keypair.public_key().encrypt("hello")?;
//! assert_eq!(keypair.private_key().decrypt(&ciphertext)?, "hello");
//!
//! let signature = keypair.private_key().sign("hello")?;
//! assert!(keypair.public_key().verify("hello", &signature));
//! # Ok::<(), textbook_rsa::RsaError>(())
//! ```

pub mod demo;
pub mod error;
pub mod logging;
pub mod rsa;
pub mod util;

pub use error::{Result, RsaError};
