//! `titanvault init`: create a new, empty vault.

use crate::cli::output;
use crate::cli::{prompt_new_password, Cli, VaultContext, PASSWORD_ENV};
use crate::errors::{Result, VaultError};
use crate::events::EventKind;
use crate::vault::Store;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut ctx = VaultContext::load(cli)?;

    // 1. Refuse to overwrite an existing vault.
    if ctx.store.exists() {
        output::tip("Use `titanvault add <NAME>` to add entries to the existing vault.");
        return Err(VaultError::VaultAlreadyExists(ctx.store.path().to_path_buf()));
    }

    // 2. Check the KDF config before asking for anything.
    let codec = ctx.codec()?;

    // 3. Create the vault directory if it doesn't exist.
    if ctx.ensure_dir()? {
        output::info(&format!(
            "Created vault directory: {}",
            ctx.vault_dir.display()
        ));
    }

    // 4. Prompt for a new password (with confirmation).
    let password = prompt_new_password(PASSWORD_ENV)?;

    // 5. Seal an empty item list and store it.
    let envelope = codec.seal(&[], &password, &ctx.sink())?;
    ctx.store.write(&envelope)?;
    ctx.note(EventKind::Info, "vault initialized");

    output::success(&format!(
        "Vault created at {} ({})",
        ctx.store.path().display(),
        codec.kdf_params().describe()
    ));

    output::tip("Run `titanvault add <NAME>` to add a login.");
    output::tip("Run `titanvault export` regularly to keep a backup.");

    Ok(())
}
