//! Migration state table management

use rusqlite::Connection;

/// Name of the changeset tracking table
pub const STATE_TABLE: &str = "schemaguard_changelog";

/// Initialize the migration state table
///
/// Creates the `schemaguard_changelog` table if it doesn't exist. The table
/// stores metadata about applied changesets:
/// - Identity (id, author, filename) as the composite primary key
/// - Checksum (SHA-256 hash of the changeset content)
/// - Applied timestamp
/// - Execution time
/// - Execution order
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns `rusqlite::Error` if table creation fails. If the table already
/// exists, this is a no-op (`IF NOT EXISTS` handles this).
pub fn initialize_state_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    let sql = r#"
        CREATE TABLE IF NOT EXISTS schemaguard_changelog (
            id TEXT NOT NULL,
            author TEXT NOT NULL,
            filename TEXT NOT NULL,
            checksum TEXT NOT NULL,
            applied_at TEXT NOT NULL,
            execution_time_ms INTEGER,
            order_executed INTEGER NOT NULL,
            PRIMARY KEY (id, author, filename)
        )
    "#;

    conn.execute_batch(sql)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_state_table(&conn).unwrap();
        initialize_state_table(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [STATE_TABLE],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
