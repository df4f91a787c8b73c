//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use clap::Parser;
use dialoguer::Confirm;
use serde_json::Value;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::events::{emit, EventKind, Fanout, TracingSink};
use crate::vault::store::require_envelope;
use crate::vault::{from_items, to_items, Credential, FileStore, ItemType, Store, VaultCodec};

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Master password for unlocking (and for `init`), read before prompting.
pub const PASSWORD_ENV: &str = "TITANVAULT_PASSWORD";

/// New master password for `passwd`, read before prompting.
pub const NEW_PASSWORD_ENV: &str = "TITANVAULT_NEW_PASSWORD";

/// TitanVault CLI: encrypted local credential vault.
#[derive(Parser)]
#[command(
    name = "titanvault",
    about = "Encrypted local vault for logins, cards, bank details and notes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: `vault_dir` from .titanvault.toml, else .titanvault)
    #[arg(long, global = true, env = "TITANVAULT_DIR")]
    pub vault_dir: Option<String>,

    /// Log each seal/open step to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init,

    /// Add an entry (login, card, bank or note)
    Add(AddArgs),

    /// List entries without revealing secrets
    List {
        /// Only show entries of this type
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<ItemType>,

        /// Only show entries in this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,

        /// Only show favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Show one entry by name or id
    Show {
        /// Entry name or id
        query: String,

        /// Print secret fields in clear text
        #[arg(long)]
        reveal: bool,
    },

    /// Delete an entry by name or id
    Delete {
        /// Entry name or id
        query: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change the master password (re-seals with a fresh salt)
    Passwd,

    /// Show vault location and envelope details without unlocking
    Status,

    /// Copy the sealed vault to a dated backup file
    Export {
        /// Directory for the backup file (default: current directory)
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Replace the vault with a backup file
    Import {
        /// Path to the backup file
        file: String,

        /// Overwrite an existing vault without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Permanently delete the stored vault
    Purge {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Print a random password
    Generate(GenerateArgs),

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },

    /// Show version and vault format details
    Version,
}

/// Arguments for `add`.  Secret fields are always prompted for (or read
/// from piped stdin, one per line), never taken from the command line.
#[derive(clap::Args)]
pub struct AddArgs {
    /// Display name (service, card issuer or bank)
    pub name: String,

    /// Entry type
    #[arg(short = 't', long = "type", value_enum, default_value = "login")]
    pub kind: ItemType,

    /// Category label (default: Other)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Mark as favorite
    #[arg(long)]
    pub favorite: bool,

    /// Login user name
    #[arg(short, long)]
    pub username: Option<String>,

    /// Login URL
    #[arg(long)]
    pub url: Option<String>,

    /// Generate the login password instead of prompting for it
    #[arg(short, long)]
    pub generate: bool,

    /// Length of the generated password
    #[arg(long, default_value = "20")]
    pub length: usize,

    /// Name on the card
    #[arg(long)]
    pub cardholder: Option<String>,

    /// Card expiry (e.g. 04/29)
    #[arg(long)]
    pub expiry: Option<String>,

    /// Card network or kind (e.g. visa, debit)
    #[arg(long)]
    pub card_type: Option<String>,

    /// Bank SWIFT/BIC code
    #[arg(long)]
    pub swift: Option<String>,
}

/// Arguments for `generate`.
#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Password length
    #[arg(short, long, default_value = "16")]
    pub length: usize,

    /// Leave out upper-case letters
    #[arg(long)]
    pub no_upper: bool,

    /// Leave out lower-case letters
    #[arg(long)]
    pub no_lower: bool,

    /// Leave out digits
    #[arg(long)]
    pub no_digits: bool,

    /// Leave out symbols
    #[arg(long)]
    pub no_symbols: bool,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Read a non-empty password from `var`, if set.
fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

fn check_new_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(VaultError::CommandFailed(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Get the master password, trying in order:
/// 1. `TITANVAULT_PASSWORD` env var (scripts, CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation.
///
/// `env_var` is checked first for scripted use.  Enforces a minimum
/// password length either way.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(env_var) {
        check_new_password(&pw)?;
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if check_new_password(&password).is_err() {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Read one secret field.
///
/// Prompts without echo on a terminal; otherwise takes the next line of
/// stdin.  An empty answer is `None` unless `required`.
pub fn read_secret(label: &str, required: bool) -> Result<Option<String>> {
    let value = if io::stdin().is_terminal() {
        dialoguer::Password::new()
            .with_prompt(label)
            .allow_empty_password(!required)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?
    } else {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_string()
    };

    if value.is_empty() {
        if required {
            return Err(VaultError::CommandFailed(format!("{label} is required")));
        }
        return Ok(None);
    }
    Ok(Some(value))
}

/// Yes/no confirmation, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Where the vault lives and how to talk to it, resolved from the CLI
/// flags and `.titanvault.toml`.
pub struct VaultContext {
    pub settings: Settings,
    pub vault_dir: PathBuf,
    pub store: FileStore,
    #[cfg(feature = "audit-log")]
    audit: Option<crate::audit::AuditLog>,
}

/// A vault opened for editing: the passphrase that opened it and its items.
pub struct Unlocked {
    pub passphrase: Zeroizing<String>,
    pub items: Vec<Credential>,
    /// Items that are not credentials this build understands.  They are
    /// sealed back unchanged, after `items`.
    pub foreign: Vec<Value>,
}

impl Unlocked {
    /// Total number of sealed entries, readable or not.
    pub fn len(&self) -> usize {
        self.items.len() + self.foreign.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The full item list to seal.
    pub fn to_items(&self) -> Result<Vec<Value>> {
        let mut items = to_items(&self.items)?;
        items.extend(self.foreign.iter().cloned());
        Ok(items)
    }
}

impl VaultContext {
    /// Resolve settings and paths from the current directory.
    ///
    /// `--vault-dir` wins over the config file.  Nothing is created.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let settings = Settings::load(&cwd)?;
        Ok(Self::resolve(cli, &cwd, settings))
    }

    fn resolve(cli: &Cli, project_dir: &Path, mut settings: Settings) -> Self {
        if let Some(dir) = &cli.vault_dir {
            settings.vault_dir = dir.clone();
        }
        let vault_dir = project_dir.join(&settings.vault_dir);
        let store = FileStore::new(settings.vault_path(project_dir));

        Self {
            #[cfg(feature = "audit-log")]
            audit: crate::audit::AuditLog::open(&vault_dir),
            settings,
            vault_dir,
            store,
        }
    }

    /// Create the vault directory if needed.  Returns `true` if it was
    /// created.
    pub fn ensure_dir(&mut self) -> Result<bool> {
        let created = !self.vault_dir.exists();
        if created {
            fs::create_dir_all(&self.vault_dir)?;
        }

        #[cfg(feature = "audit-log")]
        if self.audit.is_none() {
            self.audit = crate::audit::AuditLog::open(&self.vault_dir);
        }

        Ok(created)
    }

    /// Sink for seal/open events: tracing, plus the audit log when available.
    pub fn sink(&self) -> Fanout<'_> {
        #[allow(unused_mut)]
        let mut sink = Fanout::new().with(&TracingSink);

        #[cfg(feature = "audit-log")]
        if let Some(audit) = &self.audit {
            sink = sink.with(audit);
        }

        sink
    }

    /// Record a command-level event alongside the codec's own.
    pub fn note(&self, kind: EventKind, message: impl Into<String>) {
        emit(&self.sink(), kind, message);
    }

    /// Codec for new seals, using the configured KDF.
    pub fn codec(&self) -> Result<VaultCodec> {
        VaultCodec::new(self.settings.kdf_params()?)
    }

    /// Prompt for the master password and open the stored vault.
    ///
    /// Opening always uses the KDF recorded in the envelope, so a broken
    /// KDF config never locks the user out.
    pub fn unlock(&self) -> Result<Unlocked> {
        let envelope = require_envelope(&self.store, self.store.path())?;
        let passphrase = prompt_password()?;
        let opened = VaultCodec::default().open(&envelope, &passphrase, &self.sink())?;

        let (items, foreign) = from_items(opened);
        if !foreign.is_empty() {
            output::warning(&format!(
                "{} entries are in a format this version cannot read; they are kept as is.",
                foreign.len()
            ));
        }

        Ok(Unlocked {
            passphrase,
            items,
            foreign,
        })
    }

    /// Seal `vault` under `passphrase` and replace the stored vault.
    pub fn reseal(&self, vault: &Unlocked, passphrase: &str) -> Result<()> {
        let envelope = self
            .codec()?
            .seal(&vault.to_items()?, passphrase, &self.sink())?;
        self.store.write(&envelope)
    }
}
