//! `titanvault export`: copy the sealed vault to a dated backup file.
//!
//! The backup is the envelope as stored, still encrypted under the current
//! master password.

use std::path::PathBuf;

use chrono::Local;

use crate::cli::output;
use crate::cli::{Cli, VaultContext};
use crate::errors::{Result, VaultError};
use crate::events::EventKind;
use crate::vault::transfer::export_backup;
use crate::vault::Store;

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_dir: Option<&str>) -> Result<()> {
    let ctx = VaultContext::load(cli)?;

    if !ctx.store.exists() {
        return Err(VaultError::VaultNotFound(ctx.store.path().to_path_buf()));
    }

    let dir = match output_dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    if !dir.is_dir() {
        return Err(VaultError::CommandFailed(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let dest = export_backup(
        &ctx.store,
        &dir,
        &ctx.settings.backup_prefix,
        Local::now().date_naive(),
    )?;
    ctx.note(
        EventKind::Info,
        format!("exported backup to {}", dest.display()),
    );

    output::success(&format!("Backup written to {}", dest.display()));
    output::tip("The backup opens with the master password in use today.");

    Ok(())
}
