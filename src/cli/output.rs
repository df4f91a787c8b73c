//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::Credential;

const MASK: &str = "\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entries (Name, Type, Category, Updated).  Secret
/// fields never appear here.
pub fn print_credentials_table(items: &[&Credential]) {
    if items.is_empty() {
        info("No matching entries.");
        tip("Run `titanvault add <NAME>` to add an entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Type", "Category", "Updated"]);

    for c in items {
        let name = if c.favorite == Some(true) {
            format!("\u{2605} {}", c.name)
        } else {
            c.name.clone()
        };
        table.add_row(vec![
            name,
            c.kind.to_string(),
            c.category.clone(),
            c.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}

/// Print every field of one entry.  Secret fields are masked unless
/// `reveal` is set.
pub fn print_credential(c: &Credential, reveal: bool) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["name".to_string(), c.name.clone()]);
    table.add_row(vec!["type".to_string(), c.kind.to_string()]);
    table.add_row(vec!["category".to_string(), c.category.clone()]);

    for (label, value) in c.public_fields() {
        table.add_row(vec![label.to_string(), value.to_string()]);
    }
    for (label, value) in c.secret_fields() {
        let shown = if reveal { value } else { MASK };
        table.add_row(vec![label.to_string(), shown.to_string()]);
    }

    table.add_row(vec![
        "created".to_string(),
        c.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    table.add_row(vec![
        "updated".to_string(),
        c.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    table.add_row(vec!["id".to_string(), c.id.clone()]);

    println!("{table}");
}
