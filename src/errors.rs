use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in TitanVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Envelope / crypto errors ---
    #[error("Malformed encoding: field is not valid base64")]
    MalformedEncoding,

    #[error("Malformed vault envelope: {0}")]
    MalformedEnvelope(String),

    /// Wrong passphrase, tampered data and corrupted ciphertext all land here.
    #[error("Access denied: invalid passphrase or unreadable vault")]
    AccessDenied,

    #[error("Vault decrypted but its contents are in an unrecognized format")]
    UnrecognizedPayloadShape,

    #[error("Fatal crypto failure: {0}")]
    Fatal(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Credential '{0}' not found")]
    CredentialNotFound(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Audit error: {0}")]
    AuditError(String),
}

impl VaultError {
    /// `true` for failures that mean the stored vault itself is damaged
    /// (restore from backup) rather than a wrong passphrase.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::MalformedEncoding | Self::MalformedEnvelope(_) | Self::UnrecognizedPayloadShape
        )
    }
}

/// Convenience type alias for TitanVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
