//! Backup export and import.
//!
//! Both directions move the envelope verbatim.  Nothing is decrypted:
//! import only checks the file is structurally an envelope, and the
//! passphrase is checked the next time the vault is opened.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::envelope::Envelope;
use super::store::Store;
use crate::errors::{Result, VaultError};

/// File name for a backup taken on `date`: `<prefix>_YYYY-MM-DD.json`.
pub fn backup_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.json", date.format("%Y-%m-%d"))
}

/// Write the stored envelope to `<dir>/<prefix>_<date>.json`.
///
/// Returns the path written.  Fails with `VaultNotFound(dir)` when the
/// store is empty.
pub fn export_backup(
    store: &dyn Store,
    dir: &Path,
    prefix: &str,
    date: NaiveDate,
) -> Result<PathBuf> {
    let envelope = store
        .read()?
        .ok_or_else(|| VaultError::VaultNotFound(dir.to_path_buf()))?;

    let dest = dir.join(backup_file_name(prefix, date));
    fs::write(&dest, envelope.to_json_pretty()?)?;
    Ok(dest)
}

/// Parse and validate a backup file without touching any store.
pub fn read_backup(path: &Path) -> Result<Envelope> {
    let text = fs::read_to_string(path)?;
    Envelope::from_json(&text)
}

/// Validate a backup file, then overwrite the store with it.
///
/// The store is left untouched if validation fails.
pub fn import_backup(store: &dyn Store, path: &Path) -> Result<Envelope> {
    let envelope = read_backup(path)?;
    store.write(&envelope)?;
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::store::MemoryStore;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn file_name_uses_prefix_and_iso_date() {
        assert_eq!(
            backup_file_name("titanvault_backup", date()),
            "titanvault_backup_2024-03-09.json"
        );
    }

    #[test]
    fn export_empty_store_fails() {
        let dir = TempDir::new().unwrap();
        let result = export_backup(&MemoryStore::new(), dir.path(), "b", date());
        assert!(matches!(result, Err(VaultError::VaultNotFound(_))));
    }

    #[test]
    fn import_invalid_file_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::new();
        store.set_raw(r#"{"salt":"a","iv":"b","data":"c"}"#);

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"salt":"a","iv":"b"}"#).unwrap();

        assert!(matches!(
            import_backup(&store, &bad),
            Err(VaultError::MalformedEnvelope(_))
        ));
        assert_eq!(
            store.raw().as_deref(),
            Some(r#"{"salt":"a","iv":"b","data":"c"}"#)
        );
    }

    #[test]
    fn import_accepts_undecryptable_but_well_formed_envelope() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("backup.json");
        fs::write(&file, r#"{"salt":"AA==","iv":"AA==","data":"AA=="}"#).unwrap();

        let store = MemoryStore::new();
        let env = import_backup(&store, &file).unwrap();
        assert_eq!(env.ciphertext, "AA==");
        assert!(store.exists());
    }
}
