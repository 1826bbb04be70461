//! PIN validation and hashing.
//!
//! PINs are hashed with unsalted SHA-256 and stored as standard base64, so
//! the same PIN always produces the same stored value.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::{JournalError, Result};

/// Reject PINs that cannot be set up.
///
/// # Examples
///
/// ```
/// use journal_core::auth::validate_pin;
///
/// assert!(validate_pin("2468").is_ok());
/// assert!(validate_pin("").is_err());
/// ```
pub fn validate_pin(pin: &str) -> Result<()> {
    if pin.is_empty() {
        return Err(JournalError::InvalidInput(
            "PIN cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// SHA-256 of the UTF-8 PIN, base64 encoded.
pub fn hash_pin(pin: &str) -> String {
    let digest = Sha256::digest(pin.as_bytes());
    STANDARD.encode(digest)
}
