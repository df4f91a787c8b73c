//! `titanvault delete`: remove an entry from the vault.

use crate::cli::output;
use crate::cli::{confirm, Cli, VaultContext};
use crate::errors::{Result, VaultError};
use crate::events::EventKind;
use crate::vault::find_credential;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, query: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete entry '{query}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let ctx = VaultContext::load(cli)?;
    let mut vault = ctx.unlock()?;

    let index = find_credential(&vault.items, query)
        .ok_or_else(|| VaultError::CredentialNotFound(query.to_string()))?;
    let removed = vault.items.remove(index);

    ctx.reseal(&vault, &vault.passphrase)?;
    ctx.note(
        EventKind::Info,
        format!("deleted {} entry '{}'", removed.kind, removed.name),
    );

    output::success(&format!(
        "Deleted '{}' ({} entries left)",
        removed.name,
        vault.len()
    ));

    Ok(())
}
