// RSA Signatures
// Signs the encoded message directly (no digest), s = m^d mod n

use super::bigint::{mod_exp, RsaBigInt};
use super::codec::{encode, ensure_fits};
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::error::Result;

/// Sign a message with the private exponent
/// Fails with `MessageTooLarge` when the encoded message is not below n,
/// since such a signature could never verify
pub fn sign(message: &str, private_key: &RsaPrivateKey) -> Result<RsaBigInt> {
    let m = encode(message);
    ensure_fits(&m, private_key.n())?;

    Ok(mod_exp(&m, private_key.d(), private_key.n()))
}

/// Check that `signature` recovers the encoded message under the public exponent
/// Signatures outside [0, n) are rejected rather than reduced
pub fn verify(message: &str, signature: &RsaBigInt, public_key: &RsaPublicKey) -> bool {
    if signature >= public_key.n() {
        return false;
    }
    let recovered = mod_exp(signature, public_key.e(), public_key.n());
    recovered == encode(message)
}
