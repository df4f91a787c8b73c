//! Cryptographic primitives for TitanVault.
//!
//! This module provides:
//! - base64 transport encoding for envelope fields (`encoding`)
//! - PBKDF2 / Argon2id password-based key derivation (`kdf`)
//! - AES-256-GCM sealing and opening (`encryption`)
//! - the zeroize-on-drop `DerivedKey` (`keys`)
//! - a random password generator (`generator`)

pub mod encoding;
pub mod encryption;
pub mod generator;
pub mod kdf;
pub mod keys;

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{Result, VaultError};

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, seal, open, KdfParams, ...};
pub use encryption::{generate_nonce, open, seal, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_key, generate_salt, KdfParams, SALT_LEN};
pub use keys::{DerivedKey, KEY_LEN};

/// Fill an `N`-byte array from the OS random source.
///
/// A failing random source is fatal and never retried.
pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| VaultError::Fatal(format!("OS random source unavailable: {e}")))?;
    Ok(buf)
}
