// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;
use std::fs;
use std::path::Path;

use num_traits::{One, Zero};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

use super::bigint::{from_u64, gcd, generate_prime_with, mod_inverse, RsaBigInt, DEFAULT_MILLER_RABIN_ROUNDS};
use crate::error::{Result, RsaError};
use crate::util::file_ops::{load_key, save_key};

/// Smallest prime size accepted for key generation
pub const MIN_PRIME_BITS: u64 = 8;

/// Fewest Miller-Rabin rounds accepted for key generation
pub const MIN_MILLER_RABIN_ROUNDS: u32 = 8;

/// Public exponents tried in order for each prime pair
pub const DEFAULT_EXPONENT_CANDIDATES: [u64; 2] = [65537, 65539];

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    e: RsaBigInt, // Public exponent
    n: RsaBigInt, // Modulus
}

/// RSA Private Key
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    d: RsaBigInt, // Private exponent
    n: RsaBigInt, // Modulus (same as public)
}

/// RSA Key Pair, together with the primes it was built from
#[derive(Clone)]
pub struct RsaKeyPair {
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
    p: RsaBigInt,
    q: RsaBigInt,
}

fn check_components(exponent: &RsaBigInt, modulus: &RsaBigInt) -> Result<()> {
    if modulus <= &RsaBigInt::one() {
        return Err(RsaError::InvalidKey("modulus must be greater than one".to_string()));
    }
    if exponent.is_zero() {
        return Err(RsaError::InvalidKey("exponent must be positive".to_string()));
    }
    Ok(())
}

impl RsaPublicKey {
    /// Build a public key from exponent `e` and modulus `n`
    pub fn new(e: RsaBigInt, n: RsaBigInt) -> Result<Self> {
        check_components(&e, &n)?;
        Ok(Self { e, n })
    }

    pub fn e(&self) -> &RsaBigInt {
        &self.e
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    /// Number of significant bits in the modulus
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt a message using this public key
    pub fn encrypt(&self, message: &str) -> Result<RsaBigInt> {
        super::encrypt::encrypt(message, self)
    }

    /// Check a signature produced by the matching private key
    pub fn verify(&self, message: &str, signature: &RsaBigInt) -> bool {
        super::sign::verify(message, signature, self)
    }

    /// Write the key as two decimal lines: e, then n
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_key(path, &self.e, &self.n)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (e, n) = load_key(path)?;
        Self::new(e, n).map_err(|err| RsaError::malformed_file(path, err.to_string()))
    }
}

impl RsaPrivateKey {
    /// Build a private key from exponent `d` and modulus `n`
    pub fn new(d: RsaBigInt, n: RsaBigInt) -> Result<Self> {
        check_components(&d, &n)?;
        Ok(Self { d, n })
    }

    pub fn d(&self) -> &RsaBigInt {
        &self.d
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    /// Number of significant bits in the modulus
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }

    /// Decrypt a ciphertext using this private key
    pub fn decrypt(&self, ciphertext: &RsaBigInt) -> Result<String> {
        super::decrypt::decrypt(ciphertext, self)
    }

    /// Sign a message using this private key
    pub fn sign(&self, message: &str) -> Result<RsaBigInt> {
        super::sign::sign(message, self)
    }

    /// Write the key as two decimal lines: d, then n
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_key(path, &self.d, &self.n)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (d, n) = load_key(path)?;
        Self::new(d, n).map_err(|err| RsaError::malformed_file(path, err.to_string()))
    }
}

// Keep the private exponent out of logs and panic messages
impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("d", &"<redacted>")
            .field("n", &self.n)
            .finish()
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl RsaKeyPair {
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// First prime factor of the modulus
    pub fn p(&self) -> &RsaBigInt {
        &self.p
    }

    /// Second prime factor of the modulus
    pub fn q(&self) -> &RsaBigInt {
        &self.q
    }

    /// Euler's totient (p-1)(q-1)
    pub fn phi(&self) -> RsaBigInt {
        (&self.p - 1u8) * (&self.q - 1u8)
    }

    /// Split into the (public, private) pair, dropping the primes
    pub fn into_keys(self) -> (RsaPublicKey, RsaPrivateKey) {
        (self.public_key, self.private_key)
    }

    /// Persist both halves of the key pair
    /// If the private key cannot be written the public key file is removed again
    pub fn save(&self, public_path: impl AsRef<Path>, private_path: impl AsRef<Path>) -> Result<()> {
        let public_path = public_path.as_ref();
        self.public_key.save(public_path)?;

        if let Err(err) = self.private_key.save(private_path) {
            if let Err(cleanup) = fs::remove_file(public_path) {
                warn!(path = %public_path.display(), error = %cleanup, "could not remove public key file");
            }
            return Err(err);
        }
        Ok(())
    }
}

/// Configuration for key generation
#[derive(Clone, Debug)]
pub struct KeyGenConfig {
    /// Bit length of each of the two primes
    pub prime_bits: u64,
    /// Public exponents tried in order against each prime pair
    pub exponent_candidates: Vec<u64>,
    /// Prime pairs drawn before giving up
    pub max_attempts: u32,
    pub miller_rabin_rounds: u32,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            prime_bits: 1024,
            exponent_candidates: DEFAULT_EXPONENT_CANDIDATES.to_vec(),
            max_attempts: 16,
            miller_rabin_rounds: DEFAULT_MILLER_RABIN_ROUNDS,
        }
    }
}

impl KeyGenConfig {
    pub fn with_prime_bits(mut self, bits: u64) -> Self {
        self.prime_bits = bits;
        self
    }

    pub fn with_exponent_candidates(mut self, candidates: impl Into<Vec<u64>>) -> Self {
        self.exponent_candidates = candidates.into();
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_miller_rabin_rounds(mut self, rounds: u32) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    /// Reject settings that could never yield a valid key
    pub fn validate(&self) -> Result<()> {
        if self.prime_bits < MIN_PRIME_BITS {
            return Err(RsaError::InvalidKeySize {
                min: MIN_PRIME_BITS,
                actual: self.prime_bits,
            });
        }
        if self.exponent_candidates.is_empty() {
            return Err(RsaError::InvalidKey("no public exponent candidates".to_string()));
        }
        if let Some(bad) = self
            .exponent_candidates
            .iter()
            .find(|&&e| e < 3 || e % 2 == 0)
        {
            return Err(RsaError::InvalidKey(format!(
                "public exponent candidate {} must be odd and at least 3",
                bad
            )));
        }
        if self.max_attempts == 0 {
            return Err(RsaError::InvalidKey("max_attempts must be positive".to_string()));
        }
        if self.miller_rabin_rounds < MIN_MILLER_RABIN_ROUNDS {
            return Err(RsaError::InvalidKey(format!(
                "miller_rabin_rounds must be at least {}, got {}",
                MIN_MILLER_RABIN_ROUNDS, self.miller_rabin_rounds
            )));
        }
        Ok(())
    }
}

/// First candidate coprime with φ(n), if any
fn choose_exponent(candidates: &[u64], phi_n: &RsaBigInt) -> Option<RsaBigInt> {
    for &candidate in candidates {
        let e = from_u64(candidate);
        if gcd(&e, phi_n).is_one() {
            return Some(e);
        }
        debug!(exponent = candidate, "public exponent shares a factor with phi(n)");
    }
    None
}

/// Generate two public/private keys from primes of `prime_bits` bits each,
/// using the default exponent candidates
pub fn generate_keys(prime_bits: u64) -> Result<(RsaPublicKey, RsaPrivateKey)> {
    let config = KeyGenConfig::default().with_prime_bits(prime_bits);
    Ok(generate_keypair(&config)?.into_keys())
}

/// Generate RSA key pair using OS randomness
pub fn generate_keypair(config: &KeyGenConfig) -> Result<RsaKeyPair> {
    generate_keypair_with(config, &mut OsRng)
}

/// Generate RSA key pair drawing primes from `rng`
///
/// Each attempt draws a fresh prime pair. An attempt is discarded when the
/// primes coincide or when no exponent candidate is coprime with φ(n); after
/// `max_attempts` discarded attempts this fails with `KeyGenerationExhausted`.
pub fn generate_keypair_with<R>(config: &KeyGenConfig, rng: &mut R) -> Result<RsaKeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    config.validate()?;

    for attempt in 1..=config.max_attempts {
        // Step 1: Generate two random primes p and q
        let p = generate_prime_with(config.prime_bits, config.miller_rabin_rounds, &mut *rng)?;
        let q = generate_prime_with(config.prime_bits, config.miller_rabin_rounds, &mut *rng)?;

        if p == q {
            debug!(attempt, "drew identical primes, retrying");
            continue;
        }

        // Step 2: Compute n = p * q and φ(n) = (p-1)(q-1)
        let n = &p * &q;
        let phi_n = (&p - 1u8) * (&q - 1u8);

        // Step 3: Pick a public exponent coprime with φ(n)
        let Some(e) = choose_exponent(&config.exponent_candidates, &phi_n) else {
            debug!(attempt, "no exponent candidate fits, drawing fresh primes");
            continue;
        };

        // Step 4: Compute d = e^(-1) mod φ(n)
        let d = mod_inverse(&e, &phi_n)?;

        info!(
            prime_bits = config.prime_bits,
            modulus_bits = n.bits(),
            exponent = %e,
            attempt,
            "generated RSA key pair"
        );

        return Ok(RsaKeyPair {
            public_key: RsaPublicKey { e, n: n.clone() },
            private_key: RsaPrivateKey { d, n },
            p,
            q,
        });
    }

    Err(RsaError::KeyGenerationExhausted {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config() -> KeyGenConfig {
        KeyGenConfig::default()
            .with_prime_bits(64)
            .with_miller_rabin_rounds(20)
    }

    #[test]
    fn test_key_generation() {
        let keypair = generate_keypair(&small_config()).unwrap();

        assert_ne!(keypair.p(), keypair.q());
        assert_eq!(keypair.p().bits(), 64);
        assert_eq!(keypair.q().bits(), 64);
        assert!(keypair.public_key().modulus_bits() >= 127);
        assert_eq!(keypair.public_key().e(), &from_u64(65537));
        assert_eq!(keypair.public_key().n(), keypair.private_key().n());
    }

    #[test]
    fn test_key_properties() {
        let mut rng = StdRng::seed_from_u64(42);
        let keypair = generate_keypair_with(&small_config(), &mut rng).unwrap();

        // Verify n = p * q
        assert_eq!(keypair.public_key().n(), &(keypair.p() * keypair.q()));

        // Verify e * d ≡ 1 (mod φ(n))
        let product = keypair.public_key().e() * keypair.private_key().d();
        assert_eq!(product % keypair.phi(), from_u64(1));
    }

    #[test]
    fn test_generate_keys_tuple() {
        let (public_key, private_key) = generate_keys(32).unwrap();
        assert_eq!(public_key.n(), private_key.n());
    }

    #[test]
    fn test_choose_exponent_fallback() {
        // 65537 divides φ, 65539 does not
        let phi_n = from_u64(65537 * 4);
        assert_eq!(
            choose_exponent(&DEFAULT_EXPONENT_CANDIDATES, &phi_n),
            Some(from_u64(65539))
        );

        let phi_n = from_u64(65537) * from_u64(65539) * from_u64(2);
        assert_eq!(choose_exponent(&DEFAULT_EXPONENT_CANDIDATES, &phi_n), None);
    }

    #[test]
    fn test_exhaustion_is_reported() {
        // With e = 3 an attempt fails whenever p ≡ 1 or q ≡ 1 (mod 3)
        let config = KeyGenConfig::default()
            .with_prime_bits(16)
            .with_exponent_candidates(vec![3])
            .with_max_attempts(1);

        let exhausted = (0..64)
            .map(|_| generate_keypair(&config))
            .any(|result| matches!(result, Err(RsaError::KeyGenerationExhausted { attempts: 1 })));
        assert!(exhausted);
    }

    #[test]
    fn test_exponent_failure_draws_fresh_primes() {
        // e = 3 fits only when neither prime is 1 mod 3, so most pairs are discarded
        let config = KeyGenConfig::default()
            .with_prime_bits(16)
            .with_exponent_candidates(vec![3])
            .with_max_attempts(64);

        for _ in 0..10 {
            let keypair = generate_keypair(&config).unwrap();
            assert_eq!(keypair.public_key().e(), &from_u64(3));
            assert_ne!(keypair.p(), keypair.q());
            assert_eq!(
                (keypair.public_key().e() * keypair.private_key().d()) % keypair.phi(),
                from_u64(1)
            );
        }
    }

    /// Emits the same byte forever, so every prime draw is identical
    struct RepeatingRng(u8);

    impl RngCore for RepeatingRng {
        fn next_u32(&mut self) -> u32 {
            u32::from_ne_bytes([self.0; 4])
        }

        fn next_u64(&mut self) -> u64 {
            u64::from_ne_bytes([self.0; 8])
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for RepeatingRng {}

    #[test]
    fn test_identical_primes_are_never_used() {
        // 0x83 = 131 is prime, so every 8-bit draw yields p = q = 131
        let mut rng = RepeatingRng(0x83);
        let config = KeyGenConfig::default().with_prime_bits(8).with_max_attempts(5);

        assert_eq!(generate_prime_with(8, 8, &mut rng).unwrap(), from_u64(131));
        assert!(matches!(
            generate_keypair_with(&config, &mut rng),
            Err(RsaError::KeyGenerationExhausted { attempts: 5 })
        ));
    }

    #[test]
    fn test_save_removes_public_key_when_private_write_fails() {
        let dir = std::env::temp_dir();
        let public_path = dir.join(format!("textbook_rsa_partial_{}_public.txt", std::process::id()));
        let private_path = dir
            .join(format!("textbook_rsa_missing_dir_{}", std::process::id()))
            .join("private_key.txt");

        let keypair = generate_keypair(&small_config()).unwrap();
        assert!(keypair.save(&public_path, &private_path).is_err());
        assert!(!public_path.exists());
    }

    #[test]
    fn test_invalid_config() {
        let too_small = KeyGenConfig::default().with_prime_bits(4);
        assert!(matches!(
            generate_keypair(&too_small),
            Err(RsaError::InvalidKeySize { min: 8, actual: 4 })
        ));

        let even = KeyGenConfig::default().with_exponent_candidates(vec![65537, 4]);
        assert!(matches!(even.validate(), Err(RsaError::InvalidKey(_))));

        let empty = KeyGenConfig::default().with_exponent_candidates(Vec::new());
        assert!(empty.validate().is_err());

        let no_attempts = KeyGenConfig::default().with_max_attempts(0);
        assert!(no_attempts.validate().is_err());

        // Zero rounds would let any sieve survivor through as a "prime"
        let no_rounds = KeyGenConfig::default().with_prime_bits(64).with_miller_rabin_rounds(0);
        assert!(matches!(generate_keypair(&no_rounds), Err(RsaError::InvalidKey(_))));

        let few_rounds = KeyGenConfig::default().with_miller_rabin_rounds(MIN_MILLER_RABIN_ROUNDS - 1);
        assert!(few_rounds.validate().is_err());
        assert!(KeyGenConfig::default()
            .with_miller_rabin_rounds(MIN_MILLER_RABIN_ROUNDS)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_key_constructors_validate() {
        assert!(RsaPublicKey::new(from_u64(17), from_u64(1)).is_err());
        assert!(RsaPublicKey::new(from_u64(0), from_u64(3233)).is_err());
        assert!(RsaPrivateKey::new(from_u64(2753), from_u64(3233)).is_ok());
    }

    #[test]
    fn test_private_key_debug_redacts_exponent() {
        let key = RsaPrivateKey::new(from_u64(2753), from_u64(3233)).unwrap();
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("2753"));
        assert!(rendered.contains("3233"));
    }
}
