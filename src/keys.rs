//! Keys-file loading.
//!
//! `autonomy generate-key` writes a JSON array of key records. Only the
//! `address` field of each record is ever read; private key material stays
//! on disk and is never re-serialized by this crate.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// One participant record from the keys file.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantKey {
    /// Account address of the participant.
    pub address: String,
}

/// Errors loading the keys file.
#[derive(Debug, Error)]
pub enum KeysError {
    /// The keys file is missing or unreadable.
    #[error("cannot read keys file {path}")]
    Unreadable {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The keys file is not a JSON array of key records, or a record
    /// lacks an `address` field.
    #[error("keys file {path} is not a JSON array of key records")]
    Malformed {
        /// Path that was attempted.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Load participant key records from `path`.
///
/// An empty JSON array is valid and yields zero records. A record without
/// an `address` field is a parse failure rather than a silent empty entry.
///
/// # Errors
///
/// Returns [`KeysError::Unreadable`] if the file cannot be read and
/// [`KeysError::Malformed`] if it does not parse as an array of records.
pub fn load_keys(path: &Path) -> Result<Vec<ParticipantKey>, KeysError> {
    let content = std::fs::read_to_string(path).map_err(|source| KeysError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| KeysError::Malformed {
        path: path.display().to_string(),
        source,
    })
}
