//! The persisted envelope.
//!
//! One JSON object holding everything needed to open a vault except the
//! passphrase:
//!
//! ```json
//! {
//!   "salt": "<base64, 32 bytes>",
//!   "iv":   "<base64, 12 bytes>",
//!   "data": "<base64, ciphertext + 16-byte tag>",
//!   "kdf":  {"algorithm": "pbkdf2-sha256", "iterations": 250000}
//! }
//! ```
//!
//! `salt`, `iv` and `data` are required strings.  `kdf` is optional; when
//! absent the envelope predates it and the historical PBKDF2 cost applies.
//! Unknown fields are ignored.
//!
//! Structural validation here never decrypts anything.

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, SALT_LEN};
use crate::crypto::{encoding, NONCE_LEN};
use crate::errors::{Result, VaultError};

/// A sealed vault as stored on disk.  Binary fields are base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub salt: String,

    #[serde(rename = "iv")]
    pub nonce: String,

    #[serde(rename = "data")]
    pub ciphertext: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf: Option<KdfParams>,
}

/// Binary fields of an envelope after transport decoding.
pub struct DecodedEnvelope {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub kdf: KdfParams,
}

impl Envelope {
    /// Parse and structurally validate envelope JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| VaultError::MalformedEnvelope(format!("not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Structurally validate an already-parsed JSON value.
    ///
    /// Requires an object with string `salt`, `iv` and `data` fields.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| VaultError::MalformedEnvelope("expected a JSON object".into()))?;

        for field in ["salt", "iv", "data"] {
            match obj.get(field) {
                Some(serde_json::Value::String(_)) => {}
                Some(_) => {
                    return Err(VaultError::MalformedEnvelope(format!(
                        "field '{field}' must be a string"
                    )))
                }
                None => {
                    return Err(VaultError::MalformedEnvelope(format!(
                        "missing field '{field}'"
                    )))
                }
            }
        }

        serde_json::from_value(value)
            .map_err(|e| VaultError::MalformedEnvelope(format!("kdf descriptor: {e}")))
    }

    /// Compact JSON, as written to the store.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| VaultError::SerializationError(format!("envelope: {e}")))
    }

    /// Indented JSON, as written to backup files.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::SerializationError(format!("envelope: {e}")))
    }

    /// KDF params to open this envelope with.
    pub fn kdf_params(&self) -> KdfParams {
        self.kdf.unwrap_or_else(KdfParams::legacy)
    }

    /// Decode every binary field and check fixed lengths.
    ///
    /// Runs before any key derivation so a damaged file fails fast and
    /// distinctly from a wrong passphrase.
    pub fn decode(&self) -> Result<DecodedEnvelope> {
        let salt = encoding::decode(&self.salt)?;
        let nonce = encoding::decode(&self.nonce)?;
        let ciphertext = encoding::decode(&self.ciphertext)?;

        let salt: [u8; SALT_LEN] = salt.try_into().map_err(|v: Vec<u8>| {
            VaultError::MalformedEnvelope(format!(
                "salt must be {SALT_LEN} bytes, got {}",
                v.len()
            ))
        })?;
        let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|v: Vec<u8>| {
            VaultError::MalformedEnvelope(format!(
                "iv must be {NONCE_LEN} bytes, got {}",
                v.len()
            ))
        })?;

        let kdf = self.kdf_params();
        kdf.validate().map_err(VaultError::MalformedEnvelope)?;

        Ok(DecodedEnvelope {
            salt,
            nonce,
            ciphertext,
            kdf,
        })
    }
}
