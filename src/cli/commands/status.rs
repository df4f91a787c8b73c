//! `titanvault status`: describe the stored vault without unlocking it.

use std::fs;

use chrono::{DateTime, Local};
use console::style;

use crate::cli::output;
use crate::cli::{Cli, VaultContext};
use crate::errors::Result;
use crate::vault::Store;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = VaultContext::load(cli)?;
    let path = ctx.store.path();

    print_field("Vault", &path.display().to_string());

    let Some(envelope) = ctx.store.read()? else {
        output::info("No vault here yet.");
        output::tip("Run `titanvault init` to create one.");
        return Ok(());
    };

    // Structural check only: lengths and base64, no key derivation.
    let decoded = envelope.decode()?;
    let stored_kdf = envelope.kdf_params();

    if let Ok(modified) = fs::metadata(path)?.modified() {
        let modified: DateTime<Local> = modified.into();
        print_field("Modified", &modified.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    print_field("Cipher", "aes-256-gcm, 96-bit nonce");
    print_field("Key derivation", &stored_kdf.describe());
    print_field(
        "Ciphertext",
        &format!("{} bytes", decoded.ciphertext.len()),
    );

    #[cfg(feature = "audit-log")]
    print_field(
        "Audit log",
        &crate::audit::AuditLog::db_path(&ctx.vault_dir)
            .display()
            .to_string(),
    );

    output::success("Envelope is well-formed.");

    if envelope.kdf.is_none() {
        output::warning("Vault predates stored KDF parameters; assuming the legacy setting.");
    }
    match ctx.settings.kdf_params() {
        Ok(configured) if configured != stored_kdf => output::tip(&format!(
            "New seals use {}. Run `titanvault passwd` to re-seal with it.",
            configured.describe()
        )),
        Ok(_) => {}
        Err(e) => output::warning(&e.to_string()),
    }

    Ok(())
}

fn print_field(label: &str, value: &str) {
    println!("{:>15} {}", style(format!("{label}:")).bold(), value);
}
