//! `titanvault show`: print a single entry.

use crate::cli::output;
use crate::cli::{Cli, VaultContext};
use crate::errors::{Result, VaultError};
use crate::vault::find_credential;

/// Execute the `show` command.
pub fn execute(cli: &Cli, query: &str, reveal: bool) -> Result<()> {
    let ctx = VaultContext::load(cli)?;
    let vault = ctx.unlock()?;

    let index = find_credential(&vault.items, query)
        .ok_or_else(|| VaultError::CredentialNotFound(query.to_string()))?;

    if reveal {
        output::warning("Secret fields are shown in clear text.");
    }
    output::print_credential(&vault.items[index], reveal);

    if !reveal {
        output::tip("Pass --reveal to show secret fields.");
    }

    Ok(())
}
