// Message Codec
// Maps UTF-8 text to a big-endian integer and back

use super::bigint::{from_bytes, to_bytes, RsaBigInt};
use crate::error::{Result, RsaError};

/// Interpret the UTF-8 bytes of `text` as a big-endian unsigned integer
pub fn encode(text: &str) -> RsaBigInt {
    from_bytes(text.as_bytes())
}

/// Convert an integer back to its minimal big-endian bytes and decode them as UTF-8.
///
/// Leading NUL characters do not survive an encode/decode cycle since they
/// carry no weight in the integer.
pub fn decode(value: &RsaBigInt) -> Result<String> {
    Ok(String::from_utf8(to_bytes(value))?)
}

/// Reject an encoded message that does not fit below the modulus
pub fn ensure_fits(m: &RsaBigInt, modulus: &RsaBigInt) -> Result<()> {
    if m >= modulus {
        return Err(RsaError::MessageTooLarge {
            message_bits: m.bits(),
            modulus_bits: modulus.bits(),
        });
    }
    Ok(())
}
