//! Identifier validation.
//!
//! Identifiers are used verbatim as file name stems inside the sounds
//! directory, so anything that could name a different directory entry is
//! rejected up front: separators, `..`, leading dots, NUL bytes.

use super::AnnounceError;

pub const MAX_IDENTIFIER_LEN: usize = 64;

pub fn validate_identifier(identifier: &str) -> Result<(), AnnounceError> {
    let valid = !identifier.is_empty()
        && identifier.len() <= MAX_IDENTIFIER_LEN
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AnnounceError::InvalidIdentifier(identifier.to_string()))
    }
}
