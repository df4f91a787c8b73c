//! Vault module: sealed credential storage.
//!
//! This module provides:
//! - `Credential` records (`credential`)
//! - the versioned plaintext payload (`payload`)
//! - the persisted `Envelope` and its structural validation (`envelope`)
//! - `VaultCodec`, which seals and opens envelopes (`codec`)
//! - single-slot `Store` implementations (`store`)
//! - backup export/import (`transfer`)

pub mod codec;
pub mod credential;
pub mod envelope;
pub mod payload;
pub mod store;
pub mod transfer;

// Re-export the most commonly used items.
pub use codec::VaultCodec;
pub use credential::{find_credential, from_items, to_items, Credential, ItemType};
pub use envelope::Envelope;
pub use payload::{DecryptedPayload, VaultPayload, FORMAT_VERSION};
pub use store::{FileStore, MemoryStore, Store};
