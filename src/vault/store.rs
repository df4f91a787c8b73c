//! Single-slot envelope persistence.
//!
//! A store holds at most one envelope.  Every mutation of the credential
//! list re-seals and replaces it wholesale; there is no history.
//!
//! The store is also where concurrent writers would have to be serialized.
//! Neither implementation here locks across processes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::envelope::Envelope;
use crate::errors::{Result, VaultError};

/// Durable home for exactly one envelope.
pub trait Store {
    /// Replace the stored envelope.
    fn write(&self, envelope: &Envelope) -> Result<()>;

    /// The stored envelope, or `None` if the slot is empty.
    fn read(&self) -> Result<Option<Envelope>>;

    /// Whether the slot holds anything.
    fn exists(&self) -> bool;

    /// Empty the slot.  Purging an empty slot is not an error.
    fn purge(&self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// Envelope stored as one JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for FileStore {
    /// Write **atomically**: temp file in the same directory, then rename,
    /// so readers never see a half-written vault.
    fn write(&self, envelope: &Envelope) -> Result<()> {
        let json = envelope.to_json()?;

        let parent = self.path.parent().unwrap_or(Path::new("."));
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));

        let replace = || -> std::io::Result<()> {
            fs::write(&tmp_path, &json)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
            }

            fs::rename(&tmp_path, &self.path)
        };

        if let Err(e) = replace() {
            let _ = fs::remove_file(&tmp_path);
            return Err(VaultError::Io(e));
        }
        Ok(())
    }

    fn read(&self) -> Result<Option<Envelope>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(VaultError::Io(e)),
        };
        Envelope::from_json(&text).map(Some)
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn purge(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::Io(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store.  Keeps the serialized JSON, like a browser's
/// local storage slot would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON currently in the slot.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Put arbitrary text in the slot, bypassing validation (tests).
    pub fn set_raw(&self, text: impl Into<String>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(text.into());
        }
    }
}

fn poisoned() -> VaultError {
    VaultError::Fatal("memory store lock poisoned".into())
}

impl Store for MemoryStore {
    fn write(&self, envelope: &Envelope) -> Result<()> {
        let json = envelope.to_json()?;
        *self.slot.lock().map_err(|_| poisoned())? = Some(json);
        Ok(())
    }

    fn read(&self) -> Result<Option<Envelope>> {
        let slot = self.slot.lock().map_err(|_| poisoned())?;
        slot.as_deref().map(Envelope::from_json).transpose()
    }

    fn exists(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    fn purge(&self) -> Result<()> {
        *self.slot.lock().map_err(|_| poisoned())? = None;
        Ok(())
    }
}

/// Read the envelope or fail with `VaultNotFound(location)`.
pub fn require_envelope(store: &dyn Store, location: &Path) -> Result<Envelope> {
    store
        .read()?
        .ok_or_else(|| VaultError::VaultNotFound(location.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn envelope() -> Envelope {
        Envelope {
            salt: "c2FsdA==".into(),
            nonce: "aXY=".into(),
            ciphertext: "ZGF0YQ==".into(),
            kdf: None,
        }
    }

    #[test]
    fn memory_store_lifecycle() {
        let store = MemoryStore::new();
        assert!(!store.exists());
        assert!(store.read().unwrap().is_none());

        store.write(&envelope()).unwrap();
        assert!(store.exists());
        assert_eq!(store.read().unwrap(), Some(envelope()));

        store.purge().unwrap();
        assert!(!store.exists());
        store.purge().unwrap();
    }

    #[test]
    fn memory_store_read_validates() {
        let store = MemoryStore::new();
        store.set_raw(r#"{"salt":"a","iv":"b"}"#);
        assert!(matches!(store.read(), Err(VaultError::MalformedEnvelope(_))));
    }

    #[test]
    fn file_store_creates_parent_dirs_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("vault.json");
        let store = FileStore::new(&path);

        store.write(&envelope()).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("nested").join(".vault.json.tmp").exists());
        assert_eq!(store.read().unwrap(), Some(envelope()));
    }

    #[test]
    fn failed_replace_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.json");
        // A non-empty directory where the vault file should go makes the
        // rename fail.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        let result = FileStore::new(&path).write(&envelope());
        assert!(matches!(result, Err(VaultError::Io(_))));
        assert!(!dir.path().join(".vault.json.tmp").exists());
        assert!(path.join("occupied").exists());
    }

    #[test]
    fn file_store_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("vault.json"));
        assert!(!store.exists());
        assert!(store.read().unwrap().is_none());
        store.purge().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn file_store_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.json");
        FileStore::new(&path).write(&envelope()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn require_envelope_reports_location() {
        let store = MemoryStore::new();
        let err = require_envelope(&store, Path::new("mem")).unwrap_err();
        assert!(matches!(err, VaultError::VaultNotFound(p) if p == Path::new("mem")));
    }
}
