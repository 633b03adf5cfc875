//! Error types for Merkle tree operations.

use crate::hasher::HasherError;

/// Errors that can occur while building a tree or generating a proof.
///
/// Verification never produces one of these; a bad proof is just `false`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree needs at least one leaf.
    #[error("cannot build a Merkle tree from zero leaves")]
    EmptyInput,

    /// The underlying hash primitive failed.
    #[error("hashing failed: {0}")]
    Hashing(#[from] HasherError),

    /// No leaf carries the hash of the requested entry.
    #[error("entry not found among leaves: {0}")]
    EntryNotFound(String),
}

impl MerkleError {
    pub(crate) fn entry_not_found(entry: &[u8]) -> Self {
        let shown = match std::str::from_utf8(entry) {
            Ok(text) => text.to_owned(),
            Err(_) => format!("0x{}", hex::encode(entry)),
        };
        Self::EntryNotFound(shown)
    }
}

/// Convenience alias for Merkle results.
pub type MerkleResult<T> = Result<T, MerkleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_shows_text_entries_verbatim() {
        let err = MerkleError::entry_not_found(b"0xabc");
        assert_eq!(err, MerkleError::EntryNotFound("0xabc".into()));
    }

    #[test]
    fn not_found_hex_encodes_binary_entries() {
        let err = MerkleError::entry_not_found(&[0xff, 0x00]);
        assert_eq!(err.to_string(), "entry not found among leaves: 0xff00");
    }

    #[test]
    fn hasher_errors_convert() {
        let err: MerkleError = HasherError::Backend("boom".into()).into();
        assert_eq!(err.to_string(), "hashing failed: hash backend failure: boom");
    }
}
