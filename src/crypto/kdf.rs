//! Password-based key derivation.
//!
//! The default is PBKDF2-HMAC-SHA256 at 250 000 iterations.  Argon2id is
//! available as an alternative through `.titanvault.toml`.  Whichever is
//! used, its parameters are written into the envelope so a later build with
//! different defaults still opens old vaults.
//!
//! Derivation is deliberately slow and runs on the caller's thread.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{Result, VaultError};
use crate::events::{emit, EventKind, EventSink};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// PBKDF2 iteration count for new vaults, and for envelopes that predate
/// the stored `kdf` descriptor.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 250_000;

/// Lowest PBKDF2 iteration count accepted anywhere.
pub const MIN_PBKDF2_ITERATIONS: u32 = 10_000;

/// Upper bound so a hostile envelope cannot pin the CPU for hours.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Minimum safe Argon2 memory cost in KiB (8 MB).
const MIN_ARGON2_MEMORY_KIB: u32 = 8_192;

/// Maximum Argon2 memory cost in KiB (4 GB).
const MAX_ARGON2_MEMORY_KIB: u32 = 4 * 1024 * 1024;

const MAX_ARGON2_PARALLELISM: u32 = 16;

/// KDF algorithm plus cost, as stored in the envelope's `kdf` field.
///
/// ```json
/// {"algorithm": "pbkdf2-sha256", "iterations": 250000}
/// {"algorithm": "argon2id", "memoryKib": 65536, "iterations": 3, "parallelism": 4}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum KdfParams {
    #[serde(rename = "pbkdf2-sha256")]
    Pbkdf2Sha256 { iterations: u32 },

    #[serde(rename = "argon2id", rename_all = "camelCase")]
    Argon2id {
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::Pbkdf2Sha256 {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Params assumed for envelopes written without a `kdf` field.
    pub fn legacy() -> Self {
        Self::Pbkdf2Sha256 {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }

    /// Short algorithm name (`pbkdf2-sha256` / `argon2id`).
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Pbkdf2Sha256 { .. } => "pbkdf2-sha256",
            Self::Argon2id { .. } => "argon2id",
        }
    }

    /// Check the cost parameters are inside the accepted bounds.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match *self {
            Self::Pbkdf2Sha256 { iterations } => {
                if !(MIN_PBKDF2_ITERATIONS..=MAX_PBKDF2_ITERATIONS).contains(&iterations) {
                    return Err(format!(
                        "PBKDF2 iterations must be between {MIN_PBKDF2_ITERATIONS} and {MAX_PBKDF2_ITERATIONS} (got {iterations})"
                    ));
                }
            }
            Self::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                if !(MIN_ARGON2_MEMORY_KIB..=MAX_ARGON2_MEMORY_KIB).contains(&memory_kib) {
                    return Err(format!(
                        "Argon2 memory_kib must be between {MIN_ARGON2_MEMORY_KIB} and {MAX_ARGON2_MEMORY_KIB} (got {memory_kib})"
                    ));
                }
                if iterations < 1 {
                    return Err("Argon2 iterations must be at least 1".into());
                }
                if !(1..=MAX_ARGON2_PARALLELISM).contains(&parallelism) {
                    return Err(format!(
                        "Argon2 parallelism must be between 1 and {MAX_ARGON2_PARALLELISM} (got {parallelism})"
                    ));
                }
            }
        }
        Ok(())
    }

    /// Human-readable cost summary for events and `status`.
    pub fn describe(&self) -> String {
        match *self {
            Self::Pbkdf2Sha256 { iterations } => {
                format!("pbkdf2-sha256, {iterations} iterations")
            }
            Self::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => format!("argon2id, m={memory_kib}KiB t={iterations} p={parallelism}"),
        }
    }
}

/// Derive a 32-byte key from a passphrase and salt.
///
/// Deterministic: the same passphrase, salt and params always give the
/// same key.  An empty passphrase is accepted here; length policy belongs
/// to the caller.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
    sink: &dyn EventSink,
) -> Result<DerivedKey> {
    params.validate().map_err(VaultError::Fatal)?;

    emit(
        sink,
        EventKind::CryptoDetail,
        format!("deriving key: {}", params.describe()),
    );

    let mut key = DerivedKey::zeroed();

    match *params {
        KdfParams::Pbkdf2Sha256 { iterations } => {
            pbkdf2::pbkdf2_hmac::<Sha256>(passphrase, salt, iterations, key.as_mut_bytes());
        }
        KdfParams::Argon2id {
            memory_kib,
            iterations,
            parallelism,
        } => {
            let params = Params::new(memory_kib, iterations, parallelism, Some(KEY_LEN))
                .map_err(|e| VaultError::Fatal(format!("invalid Argon2 params: {e}")))?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password_into(passphrase, salt, key.as_mut_bytes())
                .map_err(|e| VaultError::Fatal(format!("Argon2id hashing failed: {e}")))?;
        }
    }

    emit(sink, EventKind::Success, "key derived: aes-256-gcm ready");
    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    super::random_bytes()
}
