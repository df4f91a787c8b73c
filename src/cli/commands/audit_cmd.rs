//! `titanvault audit`: display the audit log.
//!
//! Usage:
//!   titanvault audit               # show last 50 entries
//!   titanvault audit --last 20     # show last 20
//!   titanvault audit --since 7d    # entries from last 7 days
//!
//! When built without the `audit-log` feature the command reports that
//! auditing is unavailable.

use chrono::Utc;

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

#[cfg(feature = "audit-log")]
use crate::audit::{AuditEntry, AuditLog};
#[cfg(feature = "audit-log")]
use crate::cli::{output, VaultContext};
#[cfg(feature = "audit-log")]
use crate::events::EventKind;

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let ctx = VaultContext::load(cli)?;

    if !AuditLog::db_path(&ctx.vault_dir).exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&ctx.vault_dir)
        .ok_or_else(|| VaultError::AuditError("failed to open audit database".into()))?;

    let since_dt = since.map(parse_duration).transpose()?;
    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Execute the `audit` command (feature disabled).
#[cfg(not(feature = "audit-log"))]
pub fn execute(_cli: &Cli, _last: usize, since: Option<&str>) -> Result<()> {
    if let Some(s) = since {
        parse_duration(s)?;
    }
    Err(VaultError::AuditError(
        "audit logging not available (compile with --features audit-log)".into(),
    ))
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(VaultError::CommandFailed(format!(
            "invalid duration '{input}' (use a format like 7d, 24h, or 30m)"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        VaultError::CommandFailed(format!(
            "invalid duration '{input}': number part is not valid"
        ))
    })?;

    let duration = match unit {
        'd' => chrono::Duration::days(num),
        'h' => chrono::Duration::hours(num),
        _ => chrono::Duration::minutes(num),
    };

    Ok(Utc::now() - duration)
}

/// Print audit entries in a formatted table.
#[cfg(feature = "audit-log")]
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Kind", "Message"]);

    for entry in entries {
        let time = entry
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        table.add_row(vec![time, colorize_kind(entry.kind), entry.message.clone()]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize event kinds for display.
#[cfg(feature = "audit-log")]
fn colorize_kind(kind: EventKind) -> String {
    use console::style;

    let name = kind.as_str();
    match kind {
        EventKind::Success => style(name).green().to_string(),
        EventKind::Info => style(name).blue().to_string(),
        EventKind::Warning => style(name).yellow().to_string(),
        EventKind::Error => style(name).red().to_string(),
        EventKind::CryptoDetail => style(name).dim().to_string(),
    }
}
