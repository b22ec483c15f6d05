// RSA Big Integer Operations
// Modular arithmetic and prime generation on top of num-bigint

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::trace;

use crate::error::{Result, RsaError};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Miller-Rabin rounds used when the caller does not pick a count
pub const DEFAULT_MILLER_RABIN_ROUNDS: u32 = 40;

/// Primes below 256, used to sieve candidates before Miller-Rabin
const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to its minimal big-endian bytes.
/// Zero maps to an empty slice rather than a single zero byte.
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    if n.is_zero() {
        return Vec::new();
    }
    n.to_bytes_be()
}

/// Modular exponentiation: base^exponent mod modulus
/// Uses square-and-multiply, O(log exponent) multiplications
///
/// # Panics
///
/// Panics if `modulus` is zero. `RsaPublicKey::new` and `RsaPrivateKey::new`
/// reject moduli below 2, so the encrypt/decrypt/sign/verify paths never hit this.
pub fn mod_exp(base: &RsaBigInt, exponent: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    assert!(!modulus.is_zero(), "modulus must be positive");

    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exponent.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if a.is_zero() {
        return (b.clone(), BigInt::zero(), BigInt::one());
    }

    let (quotient, remainder) = b.div_mod_floor(a);
    let (gcd, x1, y1) = extended_gcd(&remainder, a);
    let x = y1 - quotient * &x1;

    (gcd, x, x1)
}

/// Compute modular inverse: a^(-1) mod m, normalized into [0, m)
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Result<RsaBigInt> {
    let m_signed = BigInt::from(m.clone());
    let (gcd, x, _) = extended_gcd(&BigInt::from(a.clone()), &m_signed);

    if m.is_zero() || !gcd.is_one() {
        return Err(RsaError::InvalidModulus {
            a: a.clone(),
            m: m.clone(),
            gcd: gcd.magnitude().clone(),
        });
    }

    // Bezout coefficient may be negative
    Ok(x.mod_floor(&m_signed).magnitude().clone())
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Miller-Rabin primality test with OS randomness
/// Returns true if n is probably prime
pub fn is_probable_prime(n: &RsaBigInt, rounds: u32) -> bool {
    is_probable_prime_with(n, rounds, &mut OsRng)
}

/// Miller-Rabin primality test drawing witnesses from `rng`
/// Small factors are sieved out by trial division first
pub fn is_probable_prime_with<R>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool
where
    R: RngCore + CryptoRng + ?Sized,
{
    if n < &RsaBigInt::from(2u8) {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = RsaBigInt::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let two = RsaBigInt::from(2u8);

    'witness: for _ in 0..rounds {
        // Random witness in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = mod_exp(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Generate a probable prime with exactly `bits` significant bits using OS randomness
pub fn generate_prime(bits: u64) -> Result<RsaBigInt> {
    generate_prime_with(bits, DEFAULT_MILLER_RABIN_ROUNDS, &mut OsRng)
}

/// Generate a probable prime with exactly `bits` significant bits.
///
/// Candidates have the top bit and the low bit forced on, so every draw is
/// odd and of full length. Expect on the order of `bits * ln 2 / 2` draws
/// before a prime turns up; most are rejected by the small-prime sieve.
pub fn generate_prime_with<R>(bits: u64, rounds: u32, rng: &mut R) -> Result<RsaBigInt>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if bits < 2 {
        return Err(RsaError::InvalidKeySize {
            min: 2,
            actual: bits,
        });
    }

    let top_bit = RsaBigInt::one() << (bits - 1);
    let mut candidates = 0u64;

    loop {
        candidates += 1;
        let candidate = rng.gen_biguint(bits) | &top_bit | RsaBigInt::one();

        if is_probable_prime_with(&candidate, rounds, &mut *rng) {
            trace!(bits, candidates, "found probable prime");
            return Ok(candidate);
        }
    }
}
