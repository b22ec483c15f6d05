// RSA Decryption Implementation
// Textbook RSA: m = c^d mod n, then decode the recovered integer

use super::bigint::{mod_exp, RsaBigInt};
use super::codec::decode;
use super::keygen::RsaPrivateKey;
use crate::error::Result;

/// Decrypt ciphertext to a string
///
/// A wrong key and a corrupted ciphertext look the same here: both usually
/// surface as `MalformedMessage`, and neither is guaranteed to be detected.
pub fn decrypt(ciphertext: &RsaBigInt, private_key: &RsaPrivateKey) -> Result<String> {
    decode(&decrypt_int(ciphertext, private_key))
}

/// Recover the encoded message integer without decoding it
///
/// A ciphertext at or above n is reduced mod n first, so `c` and `c + n`
/// decrypt to the same message.
pub fn decrypt_int(ciphertext: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaBigInt {
    mod_exp(ciphertext, private_key.d(), private_key.n())
}
