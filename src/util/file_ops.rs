// File Operations for RSA keys and messages
// Keys are two lines of decimal text, ciphertexts a single decimal integer

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Result, RsaError};
use crate::rsa::bigint::RsaBigInt;

/// Read entire file as text, reporting any failure as a malformed file
fn read_numeric_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| RsaError::malformed_file(path, format!("cannot read file: {}", err)))
}

/// Write data to file, replacing previous contents
fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data)?;
    Ok(())
}

/// Parse one line of unsigned decimal digits
fn parse_decimal(path: &Path, line: Option<&str>, field: &str) -> Result<RsaBigInt> {
    let line = line
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| RsaError::malformed_file(path, format!("missing {} line", field)))?;

    if !line.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RsaError::malformed_file(
            path,
            format!("{} is not a decimal integer", field),
        ));
    }

    line.parse::<RsaBigInt>()
        .map_err(|err| RsaError::malformed_file(path, format!("{}: {}", field, err)))
}

/// Save a key as two lines: exponent, then modulus
pub fn save_key(path: impl AsRef<Path>, exponent: &RsaBigInt, modulus: &RsaBigInt) -> Result<()> {
    let path = path.as_ref();
    write_file(path, format!("{}\n{}\n", exponent, modulus).as_bytes())?;
    info!(path = %path.display(), modulus_bits = modulus.bits(), "saved key");
    Ok(())
}

/// Load a key saved by `save_key`, returning (exponent, modulus)
pub fn load_key(path: impl AsRef<Path>) -> Result<(RsaBigInt, RsaBigInt)> {
    let path = path.as_ref();
    let text = read_numeric_file(path)?;
    let mut lines = text.lines();

    let exponent = parse_decimal(path, lines.next(), "exponent")?;
    let modulus = parse_decimal(path, lines.next(), "modulus")?;

    info!(path = %path.display(), modulus_bits = modulus.bits(), "loaded key");
    Ok((exponent, modulus))
}

/// Save a ciphertext (or signature) as a single decimal integer
pub fn save_ciphertext(path: impl AsRef<Path>, ciphertext: &RsaBigInt) -> Result<()> {
    write_file(path.as_ref(), format!("{}\n", ciphertext).as_bytes())
}

pub fn load_ciphertext(path: impl AsRef<Path>) -> Result<RsaBigInt> {
    let path = path.as_ref();
    let text = read_numeric_file(path)?;
    parse_decimal(path, text.lines().next(), "ciphertext")
}

/// Save plaintext as raw UTF-8
pub fn save_plaintext(path: impl AsRef<Path>, text: &str) -> Result<()> {
    write_file(path.as_ref(), text.as_bytes())
}

pub fn load_plaintext(path: impl AsRef<Path>) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}
