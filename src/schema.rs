//! Schema validation ("validate" mode)
//!
//! The read-only counterpart of schema generation: after migrations have
//! run, the live schema must already contain every table and column the
//! entity mapping requires. This module only inspects; it never creates or
//! alters anything.

use rusqlite::Connection;
use std::collections::HashSet;
use std::fmt;

/// Tables and columns the entity mapping requires
///
/// `users` and `roles` back the mapped entities; `users_roles` is the
/// many-to-many join table.
pub const MAPPED_TABLES: &[(&str, &[&str])] = &[
    (
        "users",
        &["id", "email", "password", "first_name", "last_name"],
    ),
    ("roles", &["id", "role"]),
    ("users_roles", &["user_id", "role_id"]),
];

/// Schema validation error type
#[derive(Debug)]
pub enum SchemaError {
    /// A mapped table is absent from the live schema
    MissingTable(String),
    /// A mapped column is absent from an existing table
    MissingColumn { table: String, column: String },
    /// Introspection query failure
    Database(rusqlite::Error),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::MissingTable(table) => {
                write!(
                    f,
                    "Schema validation failed: mapped table '{table}' does not exist. \
                     The schema must pre-exist via migration."
                )
            }
            SchemaError::MissingColumn { table, column } => {
                write!(
                    f,
                    "Schema validation failed: table '{table}' has no '{column}' column."
                )
            }
            SchemaError::Database(e) => {
                write!(f, "Schema introspection error: {e}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

impl From<rusqlite::Error> for SchemaError {
    fn from(error: rusqlite::Error) -> Self {
        SchemaError::Database(error)
    }
}

/// Validate the live schema against the entity mapping
///
/// Introspects each mapped table and requires every mapped column to exist.
/// Extra tables and columns are allowed; only absences fail.
///
/// # Errors
///
/// Returns the first `SchemaError::MissingTable` or
/// `SchemaError::MissingColumn` found, or `SchemaError::Database` if
/// introspection itself fails.
pub fn validate_schema(conn: &Connection) -> Result<(), SchemaError> {
    for &(table, columns) in MAPPED_TABLES {
        let existing = table_columns(conn, table)?;
        if existing.is_empty() {
            return Err(SchemaError::MissingTable(table.to_string()));
        }
        for &column in columns {
            if !existing.contains(column) {
                return Err(SchemaError::MissingColumn {
                    table: table.to_string(),
                    column: column.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<HashSet<String>, SchemaError> {
    let mut statement = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = statement
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(columns)
}
