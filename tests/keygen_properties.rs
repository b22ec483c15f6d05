use textbook_rsa::rsa::bigint::{from_u64, is_probable_prime};
use textbook_rsa::rsa::{generate_keypair, KeyGenConfig, RsaKeyPair};

fn check_keypair(keypair: &RsaKeyPair, prime_bits: u64) {
    let (p, q) = (keypair.p(), keypair.q());
    let n = keypair.public_key().n();

    assert_ne!(p, q);
    assert_eq!(p.bits(), prime_bits);
    assert_eq!(q.bits(), prime_bits);
    assert!(is_probable_prime(p, 20));
    assert!(is_probable_prime(q, 20));
    assert_eq!(n, &(p * q));
    assert_eq!(n, keypair.private_key().n());

    let ed = keypair.public_key().e() * keypair.private_key().d();
    assert_eq!(ed % keypair.phi(), from_u64(1));
}

fn check_many(prime_bits: u64, count: usize) {
    let config = KeyGenConfig::default().with_prime_bits(prime_bits);
    for _ in 0..count {
        let keypair = generate_keypair(&config).unwrap();
        check_keypair(&keypair, prime_bits);
    }
}

#[test]
fn keypairs_256_bit_primes() {
    check_many(256, 20);
}

#[test]
fn keypairs_512_bit_primes() {
    check_many(512, 20);
}

#[test]
#[ignore = "slow; run with --ignored in release mode"]
fn keypairs_1024_bit_primes() {
    check_many(1024, 20);
}

#[test]
fn keypairs_with_small_primes_and_alternate_exponent() {
    let config = KeyGenConfig::default()
        .with_prime_bits(24)
        .with_exponent_candidates(vec![3, 5, 7, 65537])
        .with_max_attempts(64);

    for _ in 0..20 {
        let keypair = generate_keypair(&config).unwrap();
        check_keypair(&keypair, 24);
    }
}
