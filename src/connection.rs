//! Connection Module
//!
//! Provides connection establishment for the embedded SQLite database.
//!
//! This module wraps `rusqlite::Connection` and provides:
//! - Connection URL parsing and validation
//! - Connection establishment
//! - Error handling

use rusqlite::Connection;
use std::fmt;

/// Connection URL for SQLite
///
/// Supports the in-memory form `sqlite::memory:` and the file-backed form
/// `sqlite:<path>` (e.g. `sqlite:/var/lib/app/data.db`).
pub type ConnectionUrl = String;

/// Connection error type
#[derive(Debug)]
pub enum ConnectionError {
    /// Invalid connection URL format
    InvalidConnectionUrl(String),
    /// Driver error from `rusqlite`
    SqliteError(rusqlite::Error),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::InvalidConnectionUrl(s) => {
                write!(f, "Invalid connection URL: {s}")
            }
            ConnectionError::SqliteError(e) => {
                write!(f, "SQLite error: {e}")
            }
        }
    }
}

impl std::error::Error for ConnectionError {}

impl From<rusqlite::Error> for ConnectionError {
    fn from(err: rusqlite::Error) -> Self {
        ConnectionError::SqliteError(err)
    }
}

/// Establishes a connection to SQLite
///
/// # Arguments
///
/// * `url` - Connection URL. Supports:
///   - In-memory: `sqlite::memory:`
///   - File-backed: `sqlite:<path>`
///
/// # Returns
///
/// Returns a `Connection` on success, or a `ConnectionError` on failure.
/// Foreign key enforcement is enabled on every returned connection.
///
/// # Errors
///
/// Returns `ConnectionError::InvalidConnectionUrl` if the URL does not use
/// the `sqlite:` scheme, or `ConnectionError::SqliteError` if the database
/// cannot be opened.
///
/// # Examples
///
/// ```no_run
/// use schemaguard::connection::connect;
///
/// let conn = connect("sqlite::memory:")?;
/// # Ok::<(), schemaguard::connection::ConnectionError>(())
/// ```
pub fn connect(url: &str) -> Result<Connection, ConnectionError> {
    let rest = url.strip_prefix("sqlite:").ok_or_else(|| {
        ConnectionError::InvalidConnectionUrl(format!(
            "expected 'sqlite::memory:' or 'sqlite:<path>', got '{url}'"
        ))
    })?;

    let conn = if rest == ":memory:" {
        Connection::open_in_memory()?
    } else if rest.is_empty() {
        return Err(ConnectionError::InvalidConnectionUrl(format!(
            "missing database path in '{url}'"
        )));
    } else {
        Connection::open(rest)?
    };

    // Join-table integrity relies on foreign keys; SQLite defaults them off.
    conn.pragma_update(None, "foreign_keys", true)?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_in_memory() {
        let conn = connect("sqlite::memory:").expect("in-memory connection should open");
        let one: i64 = conn
            .query_row("SELECT 1", [], |row| row.get(0))
            .expect("trivial query should succeed");
        assert_eq!(one, 1);
    }

    #[test]
    fn test_connect_rejects_unknown_scheme() {
        let err = connect("postgresql://localhost/db").unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidConnectionUrl(_)));
    }

    #[test]
    fn test_connect_rejects_empty_path() {
        let err = connect("sqlite:").unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidConnectionUrl(_)));
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = connect("sqlite::memory:").unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
