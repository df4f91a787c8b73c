//! `titanvault purge`: permanently delete the stored vault.

use crate::cli::output;
use crate::cli::{confirm, Cli, VaultContext};
use crate::errors::Result;
use crate::events::EventKind;
use crate::vault::Store;

/// Execute the `purge` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let ctx = VaultContext::load(cli)?;
    let path = ctx.store.path();

    if !ctx.store.exists() {
        output::info(&format!("No vault at {}; nothing to purge.", path.display()));
        return Ok(());
    }

    if !force
        && !confirm(&format!(
            "Permanently delete the vault at {}? This cannot be undone",
            path.display()
        ))?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    ctx.store.purge()?;
    ctx.note(EventKind::Warning, "vault purged");

    output::success(&format!("Vault deleted ({} removed)", path.display()));
    output::tip("Restore a backup with `titanvault import <FILE>`, or start over with `titanvault init`.");

    Ok(())
}
