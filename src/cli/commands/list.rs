//! `titanvault list`: display entries in a table.

use crate::cli::output;
use crate::cli::{Cli, VaultContext};
use crate::errors::Result;
use crate::vault::{Credential, ItemType};

/// Execute the `list` command.
pub fn execute(
    cli: &Cli,
    kind: Option<ItemType>,
    category: Option<&str>,
    favorites: bool,
) -> Result<()> {
    let ctx = VaultContext::load(cli)?;
    let vault = ctx.unlock()?;

    let shown = filter(&vault.items, kind, category, favorites);

    output::info(&format!(
        "{} of {} entries",
        shown.len(),
        vault.len()
    ));
    output::print_credentials_table(&shown);

    Ok(())
}

/// Entries matching every given filter, sorted by name.
fn filter<'a>(
    items: &'a [Credential],
    kind: Option<ItemType>,
    category: Option<&str>,
    favorites: bool,
) -> Vec<&'a Credential> {
    let mut shown: Vec<&Credential> = items
        .iter()
        .filter(|c| kind.map_or(true, |k| c.kind == k))
        .filter(|c| category.map_or(true, |cat| c.category.eq_ignore_ascii_case(cat)))
        .filter(|c| !favorites || c.favorite == Some(true))
        .collect();
    shown.sort_by_key(|c| c.name.to_lowercase());
    shown
}
