//! `ChangesetRecord` - Represents entries in the `schemaguard_changelog` state table

use chrono::{DateTime, Utc};

/// Represents a changeset record in the `schemaguard_changelog` state table
///
/// This struct matches the schema defined in the migration state tracking table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesetRecord {
    /// Changeset identifier
    pub id: String,

    /// Changeset author
    pub author: String,

    /// Changelog file that declared the changeset
    pub filename: String,

    /// `SHA-256` checksum of the changeset content
    pub checksum: String,

    /// When the changeset was applied
    pub applied_at: DateTime<Utc>,

    /// Execution time in milliseconds (`None` if not recorded)
    pub execution_time_ms: Option<i64>,

    /// Position in the overall execution order (1-based)
    pub order_executed: i64,
}

impl ChangesetRecord {
    /// Create a new `ChangesetRecord`
    #[must_use]
    pub fn new(
        id: String,
        author: String,
        filename: String,
        checksum: String,
        applied_at: DateTime<Utc>,
        execution_time_ms: Option<i64>,
        order_executed: i64,
    ) -> Self {
        Self {
            id,
            author,
            filename,
            checksum,
            applied_at,
            execution_time_ms,
            order_executed,
        }
    }

    /// Create a `ChangesetRecord` from a database row
    ///
    /// Expected column order: `id`, `author`, `filename`, `checksum`,
    /// `applied_at`, `execution_time_ms`, `order_executed`
    ///
    /// # Errors
    ///
    /// Returns `rusqlite::Error` if the row data cannot be read or the
    /// stored timestamp does not parse.
    pub fn from_row(row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error> {
        let id: String = row.get(0)?;
        let author: String = row.get(1)?;
        let filename: String = row.get(2)?;
        let checksum: String = row.get(3)?;

        // Timestamps are stored as TEXT; accept both space- and T-separated
        // forms, with or without fractional seconds.
        let applied_at_str: String = row.get(4)?;
        let applied_at = parse_timestamp(&applied_at_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                format!("unrecognized timestamp format: '{applied_at_str}'").into(),
            )
        })?;

        let execution_time_ms: Option<i64> = row.get(5)?;
        let order_executed: i64 = row.get(6)?;

        Ok(Self {
            id,
            author,
            filename,
            checksum,
            applied_at,
            execution_time_ms,
            order_executed,
        })
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|format| chrono::NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}
