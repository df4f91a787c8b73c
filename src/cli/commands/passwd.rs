//! `titanvault passwd`: change the master password.
//!
//! Opens the vault with the current password, then re-seals every entry
//! under the new one.  Re-sealing draws a fresh salt and nonce and picks up
//! the currently configured KDF, so this is also how an old vault is moved
//! to stronger key derivation.

use crate::cli::output;
use crate::cli::{prompt_new_password, Cli, VaultContext, NEW_PASSWORD_ENV};
use crate::errors::Result;
use crate::events::EventKind;

/// Execute the `passwd` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = VaultContext::load(cli)?;

    // 1. Fail fast on a bad KDF config, before any prompt.
    let kdf = ctx.codec()?.kdf_params();

    // 2. Open the vault with the current password.
    output::info("Enter your current master password.");
    let vault = ctx.unlock()?;

    // 3. Prompt for the new password.
    output::info("Choose your new master password.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;

    // 4. Re-seal and save atomically.
    ctx.reseal(&vault, &new_password)?;
    ctx.note(EventKind::Info, "master password changed");

    output::success(&format!(
        "Master password changed ({} entries re-encrypted, {})",
        vault.len(),
        kdf.describe()
    ));

    Ok(())
}
