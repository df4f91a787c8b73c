//! `titanvault version`: display version and vault format details.

use console::style;

use crate::crypto::KdfParams;
use crate::errors::Result;
use crate::vault::FORMAT_VERSION;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    println!("titanvault {}", env!("CARGO_PKG_VERSION"));
    println!(
        "{} v{FORMAT_VERSION}, aes-256-gcm, {}",
        style("vault format").dim(),
        KdfParams::default().describe()
    );
    Ok(())
}
