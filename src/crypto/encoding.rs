//! Transport encoding for binary envelope fields.
//!
//! Standard base64 with padding.  Nothing binary crosses the persistence
//! boundary except through these two functions.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::{Result, VaultError};

/// Encode bytes as padded standard base64.
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode padded standard base64.
///
/// Characters outside the alphabet, bad padding, or a trailing partial
/// group all fail with `MalformedEncoding`.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    BASE64.decode(text).map_err(|_| VaultError::MalformedEncoding)
}
