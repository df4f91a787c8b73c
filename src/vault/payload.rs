//! The plaintext structure sealed inside an envelope.
//!
//! Current layout (format 2):
//!
//! ```json
//! {"meta": {"formatVersion": "2", "sealedAt": 1718000000000}, "items": [...]}
//! ```
//!
//! Two older layouts still open:
//! - format 1: a bare JSON array
//! - the early object layout `{"meta": {"version", "timestamp"}, "payload": [...]}`
//!
//! Items are opaque JSON values here.  Only the outer shape is checked;
//! `meta` may hold anything truthy, and its fields are read best-effort.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::credential::now_millis;
use crate::errors::{Result, VaultError};

/// Format tag written into `meta.formatVersion` by this build.
pub const FORMAT_VERSION: &str = "2";

/// Versioned payload: free-form metadata plus the item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultPayload {
    pub meta: Value,

    #[serde(alias = "payload")]
    pub items: Vec<Value>,
}

impl VaultPayload {
    /// Wrap `items` with the current format tag, stamped now.
    pub fn current(items: Vec<Value>) -> Self {
        let mut meta = Map::new();
        meta.insert("formatVersion".into(), FORMAT_VERSION.into());
        meta.insert("sealedAt".into(), now_millis().timestamp_millis().into());
        Self {
            meta: Value::Object(meta),
            items,
        }
    }

    /// Canonical byte encoding (compact UTF-8 JSON).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| VaultError::SerializationError(format!("payload: {e}")))
    }

    /// `meta.formatVersion` (or the early `meta.version`), when it is a
    /// string or a number.
    pub fn format_version(&self) -> Option<String> {
        match meta_field(&self.meta, "formatVersion", "version")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `meta.sealedAt` (or the early `meta.timestamp`), when it is a
    /// millisecond count.
    pub fn sealed_at(&self) -> Option<DateTime<Utc>> {
        let millis = meta_field(&self.meta, "sealedAt", "timestamp")?.as_f64()?;
        DateTime::from_timestamp_millis(millis as i64)
    }
}

fn meta_field<'a>(meta: &'a Value, name: &str, early_name: &str) -> Option<&'a Value> {
    meta.get(name).or_else(|| meta.get(early_name))
}

/// JavaScript truthiness, which is what older writers relied on for `meta`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Every plaintext shape `open` understands.
#[derive(Debug, Clone, PartialEq)]
pub enum DecryptedPayload {
    /// Format 1: bare array, no metadata.
    Legacy(Vec<Value>),
    /// Object carrying `meta` and `items`.
    Versioned(VaultPayload),
}

impl DecryptedPayload {
    /// Parse decrypted bytes and dispatch on the outer shape.
    ///
    /// - an array is a legacy payload, returned as is
    /// - an object with a truthy `meta` and an `items` (or early `payload`)
    ///   array is versioned
    ///
    /// Anything else is `UnrecognizedPayloadShape`.
    pub fn parse(plaintext: &[u8]) -> Result<Self> {
        let json: Value =
            serde_json::from_slice(plaintext).map_err(|_| VaultError::UnrecognizedPayloadShape)?;

        match json {
            Value::Array(items) => Ok(Self::Legacy(items)),
            Value::Object(mut obj) => {
                let meta = obj
                    .remove("meta")
                    .filter(is_truthy)
                    .ok_or(VaultError::UnrecognizedPayloadShape)?;
                let items = match obj.remove("items").or_else(|| obj.remove("payload")) {
                    Some(Value::Array(items)) => items,
                    _ => return Err(VaultError::UnrecognizedPayloadShape),
                };
                Ok(Self::Versioned(VaultPayload { meta, items }))
            }
            _ => Err(VaultError::UnrecognizedPayloadShape),
        }
    }

    /// The item list, whatever the format.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Legacy(items) => items,
            Self::Versioned(payload) => payload.items,
        }
    }

    pub fn items(&self) -> &[Value] {
        match self {
            Self::Legacy(items) => items,
            Self::Versioned(payload) => &payload.items,
        }
    }

    /// Format tag: `"1"` for a bare array, otherwise the sealed tag, or
    /// `"unknown"` when `meta` carries none.
    pub fn format_version(&self) -> String {
        match self {
            Self::Legacy(_) => "1".to_string(),
            Self::Versioned(payload) => payload
                .format_version()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    /// When the vault was sealed, if recorded.
    pub fn sealed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Legacy(_) => None,
            Self::Versioned(payload) => payload.sealed_at(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}
