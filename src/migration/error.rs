//! Migration-specific error types

use crate::changelog::ChangelogError;

/// Migration-specific errors
#[derive(Debug)]
pub enum MigrationError {
    /// Database execution error
    Database(rusqlite::Error),
    /// Changelog loading or validation error
    Changelog(ChangelogError),
    /// Missing or invalid changelog declaration
    InvalidFormat(String),
    /// Checksum mismatch for an already-applied changeset
    ChecksumMismatch {
        id: String,
        author: String,
        stored: String,
        current: String,
    },
    /// Changeset failed during execution
    ExecutionFailed {
        id: String,
        author: String,
        error: String,
    },
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::Database(e) => write!(f, "Database error: {}", e),
            MigrationError::Changelog(e) => write!(f, "Changelog error: {}", e),
            MigrationError::InvalidFormat(msg) => write!(f, "Invalid migration format: {}", msg),
            MigrationError::ChecksumMismatch {
                id,
                author,
                stored,
                current,
            } => {
                write!(
                    f,
                    "Changeset '{}' by '{}' has been modified after being applied.\n\
                     Stored checksum: {}\n\
                     Current checksum: {}\n\
                     This indicates the changelog file was edited after deployment.",
                    id, author, stored, current
                )
            }
            MigrationError::ExecutionFailed { id, author, error } => {
                write!(
                    f,
                    "Changeset '{}' by '{}' failed during execution: {}",
                    id, author, error
                )
            }
        }
    }
}

impl std::error::Error for MigrationError {}

impl From<rusqlite::Error> for MigrationError {
    fn from(error: rusqlite::Error) -> Self {
        MigrationError::Database(error)
    }
}

impl From<ChangelogError> for MigrationError {
    fn from(error: ChangelogError) -> Self {
        MigrationError::Changelog(error)
    }
}
