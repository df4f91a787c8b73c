//! Random password generator.

use rand::seq::SliceRandom;
use rand::Rng;
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 128;

/// Which character classes to draw from, and how many characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub upper: bool,
    pub lower: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            upper: true,
            lower: true,
            digits: true,
            symbols: true,
        }
    }
}

/// Generate a password with at least one character from every selected
/// class, shuffled.  Uses the thread-local CSPRNG.
pub fn generate_password(opts: &GeneratorOptions) -> Result<Zeroizing<String>> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&opts.length) {
        return Err(VaultError::CommandFailed(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH}"
        )));
    }

    let classes: Vec<&[u8]> = [
        (opts.upper, UPPER),
        (opts.lower, LOWER),
        (opts.digits, DIGITS),
        (opts.symbols, SYMBOLS),
    ]
    .into_iter()
    .filter_map(|(on, set)| on.then_some(set))
    .collect();

    if classes.is_empty() {
        return Err(VaultError::CommandFailed(
            "select at least one character class".into(),
        ));
    }

    let pool: Vec<u8> = classes.concat();
    let mut rng = rand::rng();
    let mut out: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::with_capacity(opts.length));

    for set in &classes {
        out.push(set[rng.random_range(0..set.len())]);
    }
    while out.len() < opts.length {
        out.push(pool[rng.random_range(0..pool.len())]);
    }
    out.shuffle(&mut rng);

    // Every byte comes from an ASCII table.
    let password = out.iter().map(|&b| b as char).collect::<String>();
    Ok(Zeroizing::new(password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_every_class() {
        let pw = generate_password(&GeneratorOptions::default()).unwrap();
        assert_eq!(pw.len(), 16);
        assert!(pw.bytes().any(|b| UPPER.contains(&b)));
        assert!(pw.bytes().any(|b| LOWER.contains(&b)));
        assert!(pw.bytes().any(|b| DIGITS.contains(&b)));
        assert!(pw.bytes().any(|b| SYMBOLS.contains(&b)));
    }

    #[test]
    fn respects_disabled_classes() {
        let opts = GeneratorOptions {
            length: 40,
            upper: false,
            symbols: false,
            ..GeneratorOptions::default()
        };
        let pw = generate_password(&opts).unwrap();
        assert!(pw.bytes().all(|b| LOWER.contains(&b) || DIGITS.contains(&b)));
    }

    #[test]
    fn minimum_length_still_covers_all_classes() {
        let opts = GeneratorOptions {
            length: MIN_LENGTH,
            ..GeneratorOptions::default()
        };
        let pw = generate_password(&opts).unwrap();
        assert!(pw.bytes().any(|b| SYMBOLS.contains(&b)));
        assert!(pw.bytes().any(|b| DIGITS.contains(&b)));
    }

    #[test]
    fn rejects_no_classes_and_bad_lengths() {
        let none = GeneratorOptions {
            upper: false,
            lower: false,
            digits: false,
            symbols: false,
            ..GeneratorOptions::default()
        };
        assert!(generate_password(&none).is_err());

        for length in [0, MIN_LENGTH - 1, MAX_LENGTH + 1] {
            let opts = GeneratorOptions {
                length,
                ..GeneratorOptions::default()
            };
            assert!(generate_password(&opts).is_err());
        }
    }

    #[test]
    fn passwords_differ() {
        let a = generate_password(&GeneratorOptions::default()).unwrap();
        let b = generate_password(&GeneratorOptions::default()).unwrap();
        assert_ne!(*a, *b);
    }
}
