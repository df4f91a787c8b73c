//! AES-256-GCM authenticated encryption.
//!
//! The caller supplies the nonce.  One seal derives one key and encrypts
//! exactly once, so a fresh random nonce per seal is never reused under
//! the same key.
//!
//! The returned ciphertext carries the 16-byte auth tag at its end.
//! No associated data is used.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use super::keys::DerivedKey;
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt and authenticate `plaintext` as a single unit.
pub fn seal(key: &DerivedKey, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Fatal(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| VaultError::Fatal(format!("encryption error: {e}")))
}

/// Verify the tag and decrypt.
///
/// Any failure (wrong key, flipped bit, truncation) is `AccessDenied`
/// with no further detail and no partial plaintext.
pub fn open(key: &DerivedKey, nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < TAG_LEN {
        return Err(VaultError::AccessDenied);
    }

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::AccessDenied)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| VaultError::AccessDenied)
}

/// Generate a random 12-byte nonce.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    super::random_bytes()
}
