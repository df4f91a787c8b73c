//! `titanvault import`: replace the vault with a backup file.
//!
//! The file must be a well-formed envelope; it is not decrypted here.

use std::path::Path;

use crate::cli::output;
use crate::cli::{confirm, Cli, VaultContext};
use crate::errors::Result;
use crate::events::EventKind;
use crate::vault::transfer::{import_backup, read_backup};
use crate::vault::Store;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file: &str, force: bool) -> Result<()> {
    let mut ctx = VaultContext::load(cli)?;
    let path = Path::new(file);

    if ctx.store.exists() && !force {
        // Reject a bad file before asking anything.
        read_backup(path)?;
        if !confirm("Replace the existing vault with this backup?")? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    ctx.ensure_dir()?;
    let envelope = import_backup(&ctx.store, path)?;
    ctx.note(
        EventKind::Info,
        format!("imported backup from {}", path.display()),
    );

    output::success(&format!(
        "Imported {} into {}",
        path.display(),
        ctx.store.path().display()
    ));
    if envelope.kdf.is_none() {
        output::info("Backup uses the legacy key derivation setting.");
    }
    output::tip("Unlock it with the master password that was in use when it was exported.");

    Ok(())
}
