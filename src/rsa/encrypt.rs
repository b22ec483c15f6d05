// RSA Encryption Implementation
// Textbook RSA: c = m^e mod n on the encoded message, no padding

use super::bigint::{mod_exp, RsaBigInt};
use super::codec::{encode, ensure_fits};
use super::keygen::RsaPublicKey;
use crate::error::Result;

/// Encrypt a string using RSA public key
/// Fails with `MessageTooLarge` when the encoded message is not below n
pub fn encrypt(message: &str, public_key: &RsaPublicKey) -> Result<RsaBigInt> {
    encrypt_int(&encode(message), public_key)
}

/// Encrypt an already encoded message
pub fn encrypt_int(m: &RsaBigInt, public_key: &RsaPublicKey) -> Result<RsaBigInt> {
    ensure_fits(m, public_key.n())?;

    // Compute c = m^e mod n
    Ok(mod_exp(m, public_key.e(), public_key.n()))
}
