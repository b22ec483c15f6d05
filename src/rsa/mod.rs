// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod sign;

// `mod_exp` panics on a zero modulus; key constructors reject n <= 1 so
// the protocol functions never reach that case.
pub use bigint::{extended_gcd, generate_prime, is_probable_prime, mod_exp, mod_inverse, RsaBigInt};
pub use codec::{decode, encode};
pub use decrypt::{decrypt, decrypt_int};
pub use encrypt::{encrypt, encrypt_int};
pub use keygen::{generate_keypair, generate_keys, KeyGenConfig, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use sign::{sign, verify};
