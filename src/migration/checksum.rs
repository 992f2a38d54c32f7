//! Checksum calculation for changesets

use crate::changelog::ChangeSet;
use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of a changeset
///
/// The checksum covers the changeset identity and every change body, so any
/// edit to an already-applied changeset is detected on the next run.
///
/// # Returns
///
/// Returns the hexadecimal SHA-256 hash of the changeset content.
#[must_use]
pub fn changeset_checksum(change_set: &ChangeSet) -> String {
    let mut hasher = Sha256::new();
    hasher.update(change_set.id.as_bytes());
    hasher.update(b"\0");
    hasher.update(change_set.author.as_bytes());
    for change in &change_set.changes {
        hasher.update(b"\0");
        hasher.update(change.sql.as_bytes());
    }
    let hash = hasher.finalize();
    format!("{:x}", hash)
}
