use std::sync::OnceLock;

use proptest::prelude::*;
use textbook_rsa::rsa::{decrypt, encode, encrypt, generate_keypair, sign, verify, KeyGenConfig, RsaKeyPair};
use textbook_rsa::RsaError;

fn keypair() -> &'static RsaKeyPair {
    static KEYPAIR: OnceLock<RsaKeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| {
        generate_keypair(&KeyGenConfig::default().with_prime_bits(512)).expect("key generation failed")
    })
}

fn check_message(s: &str) -> Result<(), TestCaseError> {
    let keys = keypair();
    prop_assume!(encode(s) < *keys.public_key().n());

    let ciphertext = encrypt(s, keys.public_key()).unwrap();
    prop_assert!(ciphertext < *keys.public_key().n());
    prop_assert_eq!(decrypt(&ciphertext, keys.private_key()).unwrap(), s);

    let signature = sign(s, keys.private_key()).unwrap();
    prop_assert!(verify(s, &signature, keys.public_key()));

    let tampered = format!("{}x", s);
    prop_assert!(!verify(&tampered, &signature, keys.public_key()));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn ascii_roundtrip(s in "[ -~]{1,100}") {
        check_message(&s)?;
    }

    #[test]
    fn unicode_roundtrip(s in "\\PC{1,30}") {
        check_message(&s)?;
    }
}

#[test]
fn oversized_message_is_rejected() {
    let keys = keypair();
    // 200 bytes is well past a 1023 or 1024 bit modulus
    let message = "x".repeat(200);

    assert!(matches!(
        encrypt(&message, keys.public_key()),
        Err(RsaError::MessageTooLarge { .. })
    ));
    assert!(matches!(
        sign(&message, keys.private_key()),
        Err(RsaError::MessageTooLarge { .. })
    ));
}

#[test]
fn decrypting_with_wrong_key_does_not_recover_message() {
    let keys = keypair();
    let other = generate_keypair(&KeyGenConfig::default().with_prime_bits(512)).unwrap();

    let ciphertext = encrypt("Hello, RSA!", keys.public_key()).unwrap();
    match decrypt(&ciphertext, other.private_key()) {
        Ok(text) => assert_ne!(text, "Hello, RSA!"),
        Err(err) => assert!(matches!(err, RsaError::MalformedMessage(_))),
    }
}

#[test]
fn signature_from_other_key_is_rejected() {
    let keys = keypair();
    let other = generate_keypair(&KeyGenConfig::default().with_prime_bits(512)).unwrap();

    let signature = sign("Hello, RSA!", other.private_key()).unwrap();
    assert!(!verify("Hello, RSA!", &signature, keys.public_key()));
}
