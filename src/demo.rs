// End-to-end walkthrough
// Generates keys, round-trips a message through files, signs it, then self-checks

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context};
use tracing::{info, warn};

use crate::rsa::{decrypt, encrypt, generate_keypair, sign, verify, KeyGenConfig, RsaPrivateKey, RsaPublicKey};
use crate::util::{load_ciphertext, load_plaintext, save_ciphertext, save_plaintext};

/// Messages pushed through encrypt/decrypt and sign/verify after the main walkthrough
pub const SELF_CHECK_MESSAGES: [&str; 10] = [
    "Test 1",
    "Hello, World!",
    "12345",
    "Привет, Мир!",
    "The quick brown fox jumps over the lazy dog.",
    "Это сообщение номер шесть.",
    "7",
    "VIII",
    "九",
    "10/10",
];

/// Configuration for the demo: where files go and how large the key is
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub output_dir: PathBuf,
    pub public_key_file: String,
    pub private_key_file: String,
    pub message_file: String,
    pub ciphertext_file: String,
    pub prime_bits: u64,
    pub message: String,
    pub forged_message: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

impl DemoConfig {
    /// Default file names under `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: dir.into(),
            public_key_file: "public_key.txt".to_string(),
            private_key_file: "private_key.txt".to_string(),
            message_file: "message.txt".to_string(),
            ciphertext_file: "encrypted_message.txt".to_string(),
            prime_bits: 1024,
            message: "Secret message for Bob: meeting at 18:00.".to_string(),
            forged_message: "Forged message: meeting at 12:00.".to_string(),
        }
    }

    pub fn with_prime_bits(mut self, bits: u64) -> Self {
        self.prime_bits = bits;
        self
    }

    pub fn public_key_path(&self) -> PathBuf {
        self.output_dir.join(&self.public_key_file)
    }

    pub fn private_key_path(&self) -> PathBuf {
        self.output_dir.join(&self.private_key_file)
    }

    pub fn message_path(&self) -> PathBuf {
        self.output_dir.join(&self.message_file)
    }

    pub fn ciphertext_path(&self) -> PathBuf {
        self.output_dir.join(&self.ciphertext_file)
    }
}

/// Outcome of the self-check stage
#[derive(Debug, Default)]
pub struct DemoReport {
    pub checked: usize,
    pub failures: Vec<String>,
}

impl DemoReport {
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run every message in `messages` through both protocols, collecting failures
pub fn self_check(messages: &[&str], public_key: &RsaPublicKey, private_key: &RsaPrivateKey) -> DemoReport {
    let mut report = DemoReport::default();

    for (i, &message) in messages.iter().enumerate() {
        report.checked += 1;
        let number = i + 1;

        match encrypt(message, public_key).and_then(|c| decrypt(&c, private_key)) {
            Ok(decrypted) if decrypted == message => {}
            Ok(_) => report.failures.push(format!("check {}: decrypted text differs", number)),
            Err(e) => report.failures.push(format!("check {}: {}", number, e)),
        }

        match sign(message, private_key) {
            Ok(signature) if verify(message, &signature, public_key) => {}
            Ok(_) => report.failures.push(format!("check {}: signature rejected", number)),
            Err(e) => report.failures.push(format!("check {}: {}", number, e)),
        }
    }

    report
}

/// Walk through key generation, file round-trips, signing and the self-checks
pub fn run(config: &DemoConfig) -> anyhow::Result<DemoReport> {
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    // Step 1: keys
    info!(prime_bits = config.prime_bits, "generating key pair");
    let keypair = generate_keypair(&KeyGenConfig::default().with_prime_bits(config.prime_bits))
        .context("key generation failed")?;
    keypair
        .save(config.public_key_path(), config.private_key_path())
        .context("saving key files")?;
    let (public_key, private_key) = keypair.into_keys();

    // Step 2: encrypt through files
    save_plaintext(config.message_path(), &config.message).context("writing message file")?;
    let message = load_plaintext(config.message_path()).context("reading message file")?;

    let ciphertext = encrypt(&message, &public_key).context("encrypting message")?;
    save_ciphertext(config.ciphertext_path(), &ciphertext).context("writing ciphertext file")?;
    info!(path = %config.ciphertext_path().display(), "message encrypted");

    let ciphertext = load_ciphertext(config.ciphertext_path()).context("reading ciphertext file")?;
    let decrypted = decrypt(&ciphertext, &private_key).context("decrypting message")?;
    ensure!(decrypted == message, "decrypted message does not match the original");
    info!(decrypted = %decrypted, "message decrypted");

    // Step 3: signatures
    let signature = sign(&message, &private_key).context("signing message")?;
    ensure!(verify(&message, &signature, &public_key), "signature did not verify");
    ensure!(
        !verify(&config.forged_message, &signature, &public_key),
        "signature verified for a forged message"
    );
    info!("signature verified, forged message rejected");

    // Step 4: self-checks
    let report = self_check(&SELF_CHECK_MESSAGES, &public_key, &private_key);
    for failure in &report.failures {
        warn!("{}", failure);
    }
    info!(checked = report.checked, failed = report.failures.len(), "self-checks finished");

    Ok(report)
}
