//! Migrator - Changelog application engine
//!
//! Loads a changelog graph, expands includes, and applies each changeset to
//! the target database exactly once. Re-running against an already migrated
//! database applies nothing; an applied changeset whose content has drifted
//! fails with a checksum mismatch.

use crate::changelog::{load_changesets, LoadedChangeSet};
use crate::config::{MigrationConfig, MIGRATION_CHANGELOG_KEY};
use crate::migration::{
    changeset_checksum, initialize_state_table, ChangesetRecord, MigrationError,
};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Changelog application engine
///
/// The `Migrator` orchestrates changeset loading, checksum validation,
/// execution, and state tracking against a live connection.
#[derive(Debug)]
pub struct Migrator {
    changelog_root: PathBuf,
}

impl Migrator {
    /// Create a new Migrator for the given root changelog file
    pub fn new(changelog_root: impl AsRef<Path>) -> Self {
        Self {
            changelog_root: changelog_root.as_ref().to_path_buf(),
        }
    }

    /// Create a Migrator from a loaded migration configuration
    ///
    /// Reads the `changeLogFile` property.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::InvalidFormat` if the property is absent or
    /// empty.
    pub fn from_config(config: &MigrationConfig) -> Result<Self, MigrationError> {
        match config.get(MIGRATION_CHANGELOG_KEY) {
            Some(path) if !path.is_empty() => Ok(Self::new(path)),
            _ => Err(MigrationError::InvalidFormat(format!(
                "migration configuration declares no '{MIGRATION_CHANGELOG_KEY}' property"
            ))),
        }
    }

    /// Path of the root changelog file
    #[must_use]
    pub fn changelog_root(&self) -> &Path {
        &self.changelog_root
    }

    /// Apply all pending changesets
    ///
    /// Initializes the state table, loads every changeset reachable from the
    /// root changelog (includes expanded in place), and executes the pending
    /// ones in order, each inside its own transaction together with its
    /// state-table record. Already-applied changesets are skipped after
    /// their stored checksum is validated against the current content.
    ///
    /// # Arguments
    ///
    /// * `conn` - The database connection (mutable for transaction scoping)
    ///
    /// # Returns
    ///
    /// Returns the number of changesets applied in this run.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError` if the changelog cannot be loaded, a stored
    /// checksum mismatches, or a change fails to execute. A failed changeset
    /// rolls back atomically and leaves no state-table record.
    pub fn update(&self, conn: &mut Connection) -> Result<usize, MigrationError> {
        initialize_state_table(conn)?;

        let changesets = load_changesets(&self.changelog_root)?;
        let applied = Self::query_applied_checksums(conn)?;
        let mut next_order = Self::max_order_executed(conn)? + 1;

        let mut applied_count = 0;
        for loaded in &changesets {
            let checksum = changeset_checksum(&loaded.change_set);
            let key = Self::changeset_key(loaded);

            if let Some(stored) = applied.get(&key) {
                if *stored != checksum {
                    return Err(MigrationError::ChecksumMismatch {
                        id: loaded.change_set.id.clone(),
                        author: loaded.change_set.author.clone(),
                        stored: stored.clone(),
                        current: checksum,
                    });
                }
                continue;
            }

            Self::apply_changeset(conn, loaded, &checksum, next_order)?;
            next_order += 1;
            applied_count += 1;
        }

        if applied_count > 0 {
            log::info!("Applied {} changeset(s)", applied_count);
        } else {
            log::debug!("No pending changesets to apply");
        }

        Ok(applied_count)
    }

    /// Query all applied changeset records, in execution order
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Database` if the state table cannot be read.
    pub fn applied_changesets(conn: &Connection) -> Result<Vec<ChangesetRecord>, MigrationError> {
        let mut statement = conn.prepare(
            "SELECT id, author, filename, checksum, applied_at, execution_time_ms, order_executed \
             FROM schemaguard_changelog ORDER BY order_executed",
        )?;
        let records = statement
            .query_map([], |row| ChangesetRecord::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn changeset_key(loaded: &LoadedChangeSet) -> (String, String, String) {
        (
            loaded.change_set.id.clone(),
            loaded.change_set.author.clone(),
            loaded.filename.clone(),
        )
    }

    fn query_applied_checksums(
        conn: &Connection,
    ) -> Result<HashMap<(String, String, String), String>, MigrationError> {
        let mut statement =
            conn.prepare("SELECT id, author, filename, checksum FROM schemaguard_changelog")?;
        let rows = statement.query_map([], |row| {
            Ok((
                (
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ),
                row.get::<_, String>(3)?,
            ))
        })?;
        let mut applied = HashMap::new();
        for row in rows {
            let (key, checksum) = row?;
            applied.insert(key, checksum);
        }
        Ok(applied)
    }

    fn max_order_executed(conn: &Connection) -> Result<i64, MigrationError> {
        let max: i64 = conn.query_row(
            "SELECT COALESCE(MAX(order_executed), 0) FROM schemaguard_changelog",
            [],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    fn apply_changeset(
        conn: &mut Connection,
        loaded: &LoadedChangeSet,
        checksum: &str,
        order_executed: i64,
    ) -> Result<(), MigrationError> {
        let start = Instant::now();
        let tx = conn.transaction()?;

        for change in &loaded.change_set.changes {
            tx.execute_batch(&change.sql)
                .map_err(|e| MigrationError::ExecutionFailed {
                    id: loaded.change_set.id.clone(),
                    author: loaded.change_set.author.clone(),
                    error: e.to_string(),
                })?;
        }

        let execution_time_ms = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);
        tx.execute(
            "INSERT INTO schemaguard_changelog \
             (id, author, filename, checksum, applied_at, execution_time_ms, order_executed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                loaded.change_set.id,
                loaded.change_set.author,
                loaded.filename,
                checksum,
                Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                execution_time_ms,
                order_executed,
            ],
        )?;
        tx.commit()?;

        log::debug!(
            "Applied changeset '{}' by '{}' from {}",
            loaded.change_set.id,
            loaded.change_set.author,
            loaded.filename
        );
        Ok(())
    }
}
