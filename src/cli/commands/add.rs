//! `titanvault add`: add an entry to the vault.

use crate::cli::output;
use crate::cli::{read_secret, AddArgs, Cli, VaultContext};
use crate::crypto::generator::{generate_password, GeneratorOptions};
use crate::errors::{Result, VaultError};
use crate::events::EventKind;
use crate::vault::{find_credential, Credential, ItemType};

/// Execute the `add` command.
pub fn execute(cli: &Cli, args: &AddArgs) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(VaultError::CommandFailed("entry name cannot be empty".into()));
    }

    let ctx = VaultContext::load(cli)?;
    let mut vault = ctx.unlock()?;

    if find_credential(&vault.items, name).is_some() {
        return Err(VaultError::CommandFailed(format!(
            "an entry named '{name}' already exists"
        )));
    }

    let credential = build_credential(name, args)?;
    let kind = credential.kind;
    vault.items.push(credential);

    ctx.reseal(&vault, &vault.passphrase)?;
    ctx.note(EventKind::Info, format!("added {kind} entry '{name}'"));

    output::success(&format!(
        "Added {kind} '{name}' ({} entries total)",
        vault.len()
    ));
    if args.generate {
        output::tip(&format!("Run `titanvault show \"{name}\" --reveal` to see the generated password."));
    }

    Ok(())
}

/// Fill in a new entry from the flags, prompting for the secret fields
/// the entry type needs.
fn build_credential(name: &str, args: &AddArgs) -> Result<Credential> {
    let mut c = Credential::new(args.kind, name);
    if let Some(category) = &args.category {
        c.category = category.clone();
    }
    c.notes = args.notes.clone();
    c.favorite = args.favorite.then_some(true);

    match args.kind {
        ItemType::Login => {
            c.username = args.username.clone();
            c.url = args.url.clone();
            c.password = if args.generate {
                let opts = GeneratorOptions {
                    length: args.length,
                    ..GeneratorOptions::default()
                };
                Some(generate_password(&opts)?.as_str().to_owned())
            } else {
                read_secret("Password", true)?
            };
        }
        ItemType::Card => {
            c.cardholder = args.cardholder.clone();
            c.expiry = args.expiry.clone();
            c.card_type = args.card_type.clone();
            c.number = read_secret("Card number", true)?;
            c.cvv = read_secret("CVV (optional)", false)?;
            c.pin = read_secret("PIN (optional)", false)?;
        }
        ItemType::Bank => {
            c.swift = args.swift.clone();
            c.account_number = read_secret("Account number", true)?;
            c.routing_number = read_secret("Routing number (optional)", false)?;
            c.iban = read_secret("IBAN (optional)", false)?;
        }
        ItemType::Note => {
            if c.notes.is_none() {
                c.notes = read_secret("Note", true)?;
            }
        }
    }

    Ok(c)
}
