//! Credential records stored inside a vault.
//!
//! The codec seals items as opaque JSON; these types exist so the CLI can
//! build and display entries.  Parsing is lenient about what older writers
//! left out (`category`, timestamps, ids), and unknown JSON fields are kept
//! in `extra`.  Items that still do not parse are handed back as raw JSON
//! by [`from_items`] so they can be sealed again untouched.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{Result, VaultError};

/// The kind of secret a credential holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Login,
    Card,
    Bank,
    Note,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Login => "login",
            Self::Card => "card",
            Self::Bank => "bank",
            Self::Note => "note",
        })
    }
}

/// Default category for new entries.
pub const DEFAULT_CATEGORY: &str = "Other";

/// A single vault entry.  Field names are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ItemType,

    /// Service name, bank name, or card issuer.
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, with = "lenient_millis")]
    pub created_at: DateTime<Utc>,

    #[serde(default, with = "lenient_millis")]
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,

    // Login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    // Card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    // Bank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,

    /// Fields this build does not know about, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Current time truncated to the millisecond precision used on the wire.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Millisecond timestamps: written as integers, read from any JSON number.
mod lenient_millis {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        chrono::serde::ts_milliseconds::serialize(dt, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        DateTime::from_timestamp_millis(millis as i64)
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}")))
    }
}

/// Serialize credentials into the item list the codec seals.
pub fn to_items(credentials: &[Credential]) -> Result<Vec<Value>> {
    credentials
        .iter()
        .map(|c| {
            serde_json::to_value(c)
                .map_err(|e| VaultError::SerializationError(format!("credential: {e}")))
        })
        .collect()
}

/// Split an opened item list into credentials and the items that are not
/// credentials this build understands (unknown `type`, non-objects, ...).
///
/// The second list must be sealed back alongside the first.
pub fn from_items(items: Vec<Value>) -> (Vec<Credential>, Vec<Value>) {
    let mut credentials = Vec::with_capacity(items.len());
    let mut foreign = Vec::new();
    for item in items {
        match Credential::deserialize(&item) {
            Ok(c) => credentials.push(c),
            Err(_) => foreign.push(item),
        }
    }
    (credentials, foreign)
}

impl Credential {
    /// A new, otherwise empty entry with a random UUID and both
    /// timestamps set to now.
    pub fn new(kind: ItemType, name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
            favorite: None,
            username: None,
            password: None,
            url: None,
            cardholder: None,
            number: None,
            expiry: None,
            cvv: None,
            pin: None,
            card_type: None,
            account_number: None,
            routing_number: None,
            swift: None,
            iban: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Bump `updated_at` to now.  Never moves it backwards.
    pub fn touch(&mut self) {
        let now = now_millis();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// The sensitive fields present on this entry, as (label, value).
    pub fn secret_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("password", &self.password),
            ("number", &self.number),
            ("cvv", &self.cvv),
            ("pin", &self.pin),
            ("account number", &self.account_number),
            ("routing number", &self.routing_number),
            ("iban", &self.iban),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }

    /// The non-sensitive descriptive fields present on this entry.
    pub fn public_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("username", &self.username),
            ("url", &self.url),
            ("cardholder", &self.cardholder),
            ("expiry", &self.expiry),
            ("card type", &self.card_type),
            ("swift", &self.swift),
            ("notes", &self.notes),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

/// Find an entry by exact id, falling back to a case-insensitive name match.
///
/// Returns the index into `items`.
pub fn find_credential(items: &[Credential], query: &str) -> Option<usize> {
    items
        .iter()
        .position(|c| c.id == query)
        .or_else(|| {
            items
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(query))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_credential_has_uuid_and_equal_timestamps() {
        let c = Credential::new(ItemType::Login, "GitHub");
        assert!(Uuid::parse_str(&c.id).is_ok());
        assert_eq!(c.created_at, c.updated_at);
        assert_eq!(c.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn serializes_with_camel_case_and_type_tag() {
        let mut c = Credential::new(ItemType::Bank, "Acme Bank");
        c.account_number = Some("123".into());
        let json = serde_json::to_value(&c).unwrap();

        assert_eq!(json["type"], "bank");
        assert_eq!(json["accountNumber"], "123");
        assert!(json["createdAt"].is_i64());
        assert!(json.get("username").is_none(), "None fields are omitted");
    }

    #[test]
    fn parses_minimal_record_and_keeps_unknown_fields() {
        let json = serde_json::json!({
            "id": "abc",
            "type": "note",
            "name": "Wifi",
            "category": "Personal",
            "notes": "hunter2",
            "createdAt": 1_700_000_000_000_i64,
            "updatedAt": 1_700_000_000_500_i64,
            "color": "teal"
        });
        let c: Credential = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(c.kind, ItemType::Note);
        assert_eq!(c.notes.as_deref(), Some("hunter2"));
        assert_eq!(c.extra["color"], "teal");

        assert_eq!(serde_json::to_value(&c).unwrap(), json);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = serde_json::json!({
            "id": "abc", "type": "passport", "name": "x", "category": "Other",
            "createdAt": 0, "updatedAt": 0
        });
        assert!(serde_json::from_value::<Credential>(json).is_err());
    }

    #[test]
    fn missing_category_and_timestamps_take_defaults() {
        let json = serde_json::json!({"id": "abc", "type": "login", "name": "Mail"});
        let c: Credential = serde_json::from_value(json).unwrap();
        assert_eq!(c.category, DEFAULT_CATEGORY);
        assert_eq!(c.created_at, DateTime::<Utc>::default());
        assert_eq!(c.updated_at, DateTime::<Utc>::default());
    }

    #[test]
    fn fractional_timestamps_are_truncated_to_the_millisecond() {
        let json = serde_json::json!({
            "id": "abc", "type": "note", "name": "x",
            "createdAt": 1_700_000_000_000.5, "updatedAt": 1_700_000_000_001_i64
        });
        let c: Credential = serde_json::from_value(json).unwrap();
        assert_eq!(c.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(c.updated_at.timestamp_millis(), 1_700_000_000_001);
    }

    #[test]
    fn from_items_keeps_unreadable_entries_aside() {
        let good = Credential::new(ItemType::Card, "Visa");
        let mut items = to_items(&[good.clone()]).unwrap();
        items.push(serde_json::json!({"id": "p", "type": "passport", "name": "Passport"}));
        items.push(serde_json::json!("bare string"));

        let (credentials, foreign) = from_items(items);
        assert_eq!(credentials, vec![good]);
        assert_eq!(foreign.len(), 2);
        assert_eq!(foreign[0]["type"], "passport");
    }

    #[test]
    fn touch_never_moves_backwards() {
        let mut c = Credential::new(ItemType::Login, "x");
        let future = c.updated_at + chrono::Duration::days(1);
        c.updated_at = future;
        c.touch();
        assert_eq!(c.updated_at, future);
    }

    #[test]
    fn find_by_id_then_name() {
        let a = Credential::new(ItemType::Login, "GitHub");
        let b = Credential::new(ItemType::Card, "Visa");
        let items = vec![a.clone(), b.clone()];

        assert_eq!(find_credential(&items, &b.id), Some(1));
        assert_eq!(find_credential(&items, "github"), Some(0));
        assert_eq!(find_credential(&items, "missing"), None);
    }

    #[test]
    fn secret_fields_only_lists_present_values() {
        let mut c = Credential::new(ItemType::Card, "Visa");
        c.number = Some("4111".into());
        c.cvv = Some("123".into());
        c.cardholder = Some("J Doe".into());

        let labels: Vec<_> = c.secret_fields().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["number", "cvv"]);
        assert_eq!(c.public_fields(), vec![("cardholder", "J Doe")]);
    }
}
