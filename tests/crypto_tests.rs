//! Integration tests for the TitanVault crypto module.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use sha2::Sha256;

use titanvault::crypto::encoding::{decode, encode};
use titanvault::crypto::kdf::MIN_PBKDF2_ITERATIONS;
use titanvault::crypto::{
    derive_key, generate_nonce, generate_salt, open, seal, DerivedKey, KdfParams, NONCE_LEN,
    SALT_LEN, TAG_LEN,
};
use titanvault::errors::VaultError;
use titanvault::events::NullSink;

const FAST: KdfParams = KdfParams::Pbkdf2Sha256 {
    iterations: MIN_PBKDF2_ITERATIONS,
};

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn encoding_uses_standard_padded_alphabet() {
    assert_eq!(encode(&[0xfb, 0xff]), "+/8=");
    assert_eq!(decode("+/8=").unwrap(), vec![0xfb, 0xff]);
    assert_eq!(encode(&[]), "");
    assert!(decode("").unwrap().is_empty());
}

#[test]
fn decoding_garbage_is_malformed_encoding() {
    for bad in ["not base64!", "-_8=", "abc"] {
        assert!(
            matches!(decode(bad), Err(VaultError::MalformedEncoding)),
            "{bad:?} should be rejected"
        );
    }
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_key_matches_plain_pbkdf2_hmac_sha256() {
    let salt = [0x5Au8; SALT_LEN];
    let key = derive_key(b"correct-horse-battery", &salt, &FAST, &NullSink).unwrap();

    let mut expected = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        b"correct-horse-battery",
        &salt,
        MIN_PBKDF2_ITERATIONS,
        &mut expected,
    );
    assert_eq!(key.as_bytes(), &expected);
}

#[test]
fn derive_key_different_salts_different_keys() {
    let a = derive_key(b"pw", &[1u8; SALT_LEN], &FAST, &NullSink).unwrap();
    let b = derive_key(b"pw", &[2u8; SALT_LEN], &FAST, &NullSink).unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());
}

#[test]
fn derive_key_different_passwords_different_keys() {
    let salt = [7u8; SALT_LEN];
    let a = derive_key(b"password-one", &salt, &FAST, &NullSink).unwrap();
    let b = derive_key(b"password-two", &salt, &FAST, &NullSink).unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());
}

#[test]
fn derive_key_rejects_weak_params() {
    let weak = KdfParams::Pbkdf2Sha256 { iterations: 1 };
    let result = derive_key(b"pw", &[0u8; SALT_LEN], &weak, &NullSink);
    assert!(matches!(result, Err(VaultError::Fatal(_))));
}

#[test]
fn salts_are_fresh() {
    let a = generate_salt().unwrap();
    let b = generate_salt().unwrap();
    assert_eq!(a.len(), 32);
    assert_ne!(a, b);
}

// ---------------------------------------------------------------------------
// Authenticated encryption
// ---------------------------------------------------------------------------

#[test]
fn seal_open_roundtrip() {
    let key = DerivedKey::from_bytes([0xABu8; 32]);
    let nonce = generate_nonce().unwrap();
    let plaintext = br#"[{"name":"GitHub"}]"#;

    let ct = seal(&key, &nonce, plaintext).unwrap();
    assert_eq!(ct.len(), plaintext.len() + TAG_LEN);
    assert_eq!(open(&key, &nonce, &ct).unwrap(), plaintext);
}

#[test]
fn seal_output_is_ciphertext_then_tag() {
    // Same layout as Web Crypto: the 16-byte tag is appended.
    let key = DerivedKey::from_bytes([0x11u8; 32]);
    let nonce = [0x22u8; NONCE_LEN];
    let ours = seal(&key, &nonce, b"hello").unwrap();

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).unwrap();
    let theirs = cipher
        .encrypt(Nonce::from_slice(&nonce), b"hello".as_ref())
        .unwrap();
    assert_eq!(ours, theirs);
}

#[test]
fn open_with_wrong_key_is_access_denied() {
    let nonce = [0u8; NONCE_LEN];
    let ct = seal(&DerivedKey::from_bytes([1u8; 32]), &nonce, b"secret").unwrap();
    let result = open(&DerivedKey::from_bytes([2u8; 32]), &nonce, &ct);
    assert!(matches!(result, Err(VaultError::AccessDenied)));
}

#[test]
fn open_with_any_flipped_bit_is_access_denied() {
    let key = DerivedKey::from_bytes([3u8; 32]);
    let nonce = [4u8; NONCE_LEN];
    let ct = seal(&key, &nonce, b"some plaintext").unwrap();

    for byte in 0..ct.len() {
        let mut tampered = ct.clone();
        tampered[byte] ^= 0x01;
        assert!(
            matches!(open(&key, &nonce, &tampered), Err(VaultError::AccessDenied)),
            "flip at byte {byte} was not detected"
        );
    }
}

#[test]
fn open_truncated_input_is_access_denied() {
    let key = DerivedKey::from_bytes([5u8; 32]);
    let nonce = [6u8; NONCE_LEN];
    assert!(matches!(
        open(&key, &nonce, &[0u8; TAG_LEN - 1]),
        Err(VaultError::AccessDenied)
    ));
    assert!(matches!(
        open(&key, &nonce, &[]),
        Err(VaultError::AccessDenied)
    ));
}

#[test]
fn full_crypto_pipeline() {
    // passphrase -> key -> seal -> base64 -> decode -> open
    let salt = generate_salt().unwrap();
    let nonce = generate_nonce().unwrap();
    let key = derive_key(b"pipeline-pass", &salt, &FAST, &NullSink).unwrap();

    let wire = encode(&seal(&key, &nonce, b"payload").unwrap());

    let again = derive_key(b"pipeline-pass", &salt, &FAST, &NullSink).unwrap();
    let recovered = open(&again, &nonce, &decode(&wire).unwrap()).unwrap();
    assert_eq!(recovered, b"payload");
}
