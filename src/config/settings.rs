use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, DEFAULT_PBKDF2_ITERATIONS};
use crate::errors::{Result, VaultError};

/// Project-level configuration, loaded from `.titanvault.toml`.
///
/// Every field has a sensible default so TitanVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the vault and audit db.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the sealed vault inside `vault_dir`.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// KDF for new seals: `pbkdf2-sha256` or `argon2id`.
    #[serde(default = "default_kdf_algorithm")]
    pub kdf_algorithm: String,

    /// PBKDF2 iteration count (default: 250 000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// File name prefix for `export` backups.
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".titanvault".to_string()
}

fn default_vault_file() -> String {
    "vault.json".to_string()
}

fn default_kdf_algorithm() -> String {
    "pbkdf2-sha256".to_string()
}

fn default_pbkdf2_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_backup_prefix() -> String {
    "titanvault_backup".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            vault_file: default_vault_file(),
            kdf_algorithm: default_kdf_algorithm(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            backup_prefix: default_backup_prefix(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".titanvault.toml";

    /// Load settings from `<project_dir>/.titanvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Build the full path to the vault file.
    ///
    /// Example: `project_dir/.titanvault/vault.json`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir).join(&self.vault_file)
    }

    /// KDF params for new seals, validated.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        let params = match self.kdf_algorithm.as_str() {
            "pbkdf2-sha256" => KdfParams::Pbkdf2Sha256 {
                iterations: self.pbkdf2_iterations,
            },
            "argon2id" => KdfParams::Argon2id {
                memory_kib: self.argon2_memory_kib,
                iterations: self.argon2_iterations,
                parallelism: self.argon2_parallelism,
            },
            other => {
                return Err(VaultError::ConfigError(format!(
                    "unknown kdf_algorithm '{other}' (use 'pbkdf2-sha256' or 'argon2id')"
                )))
            }
        };
        params.validate().map_err(VaultError::ConfigError)?;
        Ok(params)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_dir, ".titanvault");
        assert_eq!(s.vault_file, "vault.json");
        assert_eq!(s.kdf_algorithm, "pbkdf2-sha256");
        assert_eq!(s.pbkdf2_iterations, 250_000);
        assert_eq!(s.argon2_memory_kib, 65_536);
        assert_eq!(s.backup_prefix, "titanvault_backup");
        assert_eq!(s.kdf_params().unwrap(), KdfParams::default());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, ".titanvault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_dir = "secrets"
vault_file = "main.json"
kdf_algorithm = "argon2id"
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 8
backup_prefix = "bk"
"#;
        fs::write(tmp.path().join(".titanvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, "secrets");
        assert_eq!(settings.vault_file, "main.json");
        assert_eq!(settings.backup_prefix, "bk");
        assert_eq!(
            settings.kdf_params().unwrap(),
            KdfParams::Argon2id {
                memory_kib: 131_072,
                iterations: 5,
                parallelism: 8
            }
        );
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".titanvault.toml"),
            "pbkdf2_iterations = 600000\n",
        )
        .unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, ".titanvault");
        assert_eq!(
            settings.kdf_params().unwrap(),
            KdfParams::Pbkdf2Sha256 {
                iterations: 600_000
            }
        );
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".titanvault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn kdf_params_rejects_unknown_algorithm_and_weak_cost() {
        let s = Settings {
            kdf_algorithm: "scrypt".into(),
            ..Settings::default()
        };
        assert!(matches!(s.kdf_params(), Err(VaultError::ConfigError(_))));

        let s = Settings {
            pbkdf2_iterations: 1_000,
            ..Settings::default()
        };
        assert!(matches!(s.kdf_params(), Err(VaultError::ConfigError(_))));
    }

    #[test]
    fn vault_path_builds_correct_path() {
        let s = Settings::default();
        let project = Path::new("/home/user/myproject");
        assert_eq!(
            s.vault_path(project),
            PathBuf::from("/home/user/myproject/.titanvault/vault.json")
        );
    }

    #[test]
    fn vault_path_respects_custom_vault_dir() {
        let s = Settings {
            vault_dir: "secrets".to_string(),
            ..Settings::default()
        };
        let project = Path::new("/home/user/myproject");
        assert_eq!(
            s.vault_path(project),
            PathBuf::from("/home/user/myproject/secrets/vault.json")
        );
    }
}
