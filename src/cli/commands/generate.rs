//! `titanvault generate`: print a random password.

use crate::cli::GenerateArgs;
use crate::crypto::generator::{generate_password, GeneratorOptions};
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(args: &GenerateArgs) -> Result<()> {
    let password = generate_password(&options(args))?;
    println!("{}", password.as_str());
    Ok(())
}

fn options(args: &GenerateArgs) -> GeneratorOptions {
    GeneratorOptions {
        length: args.length,
        upper: !args.no_upper,
        lower: !args.no_lower,
        digits: !args.no_digits,
        symbols: !args.no_symbols,
    }
}
