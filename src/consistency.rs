//! Consistency Verifier
//!
//! Pure validation over the loaded configuration pair. No I/O happens here:
//! the caller loads both configurations (see [`crate::config::ConfigPair`])
//! and this module cross-checks them. Each check is independent; violations
//! are collected rather than short-circuited so a single run reports every
//! problem at once.

use crate::config::{
    ConfigPair, MigrationConfig, OrmConfig, MIGRATION_CHANGELOG_KEY, MIGRATION_PASSWORD_KEY,
    MIGRATION_URL_KEY, MIGRATION_USERNAME_KEY, ORM_PASSWORD_KEY, ORM_SCHEMA_MODE_KEY, ORM_URL_KEY,
    ORM_USERNAME_KEY, ROLE_MAPPING_CLASS, USER_MAPPING_CLASS,
};
use std::fmt;

/// The schema-generation mode the ORM configuration must declare
pub const REQUIRED_SCHEMA_MODE: &str = "validate";

/// A single failed consistency check
///
/// Each variant names the offending field, entity, or file so the operator
/// can correct the source configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A connection setting differs between the two configurations
    ConnectionMismatch {
        field: &'static str,
        orm_value: Option<String>,
        migration_value: Option<String>,
    },
    /// An entity mapping entry is absent from the ORM configuration
    MissingMapping { class: &'static str },
    /// The schema-generation mode is not the read-only "validate" mode
    SchemaModeNotValidate { found: Option<String> },
    /// The migration configuration declares no changelog file
    MissingChangelog,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ConnectionMismatch {
                field,
                orm_value,
                migration_value,
            } => {
                write!(
                    f,
                    "Your ORM and migration connection {field} differs: \
                     ORM config has {orm_value:?}, migration config has {migration_value:?}."
                )
            }
            Violation::MissingMapping { class } => {
                write!(
                    f,
                    "Your ORM configuration doesn't contain a mapping for the \"{class}\" model."
                )
            }
            Violation::SchemaModeNotValidate { found } => {
                write!(
                    f,
                    "You should specify \"{REQUIRED_SCHEMA_MODE}\" for the \
                     \"{ORM_SCHEMA_MODE_KEY}\" property, found {found:?}."
                )
            }
            Violation::MissingChangelog => {
                write!(
                    f,
                    "You should specify a \"{MIGRATION_CHANGELOG_KEY}\" property within your \
                     migration configuration file."
                )
            }
        }
    }
}

/// Run every consistency check over the configuration pair
///
/// Returns all violations found; an empty vector means the pair is
/// consistent.
#[must_use]
pub fn verify(pair: &ConfigPair) -> Vec<Violation> {
    let mut violations = check_connection_settings(&pair.orm, &pair.migration);
    violations.extend(check_entity_mappings(&pair.orm));
    violations.extend(check_schema_mode(&pair.orm));
    violations.extend(check_changelog_declared(&pair.migration));
    violations
}

/// Check that url, username, and password are byte-equal across the pair
///
/// One `Violation::ConnectionMismatch` is reported per differing field; an
/// absent key on either side counts as a mismatch.
#[must_use]
pub fn check_connection_settings(orm: &OrmConfig, migration: &MigrationConfig) -> Vec<Violation> {
    let fields: [(&'static str, &str, &str); 3] = [
        ("url", ORM_URL_KEY, MIGRATION_URL_KEY),
        ("username", ORM_USERNAME_KEY, MIGRATION_USERNAME_KEY),
        ("password", ORM_PASSWORD_KEY, MIGRATION_PASSWORD_KEY),
    ];

    let mut violations = Vec::new();
    for (field, orm_key, migration_key) in fields {
        let orm_value = orm.property(orm_key);
        let migration_value = migration.get(migration_key);
        if orm_value != migration_value {
            violations.push(Violation::ConnectionMismatch {
                field,
                orm_value: orm_value.map(str::to_string),
                migration_value: migration_value.map(str::to_string),
            });
        }
    }
    violations
}

/// Check that both entity mapping entries are declared
#[must_use]
pub fn check_entity_mappings(orm: &OrmConfig) -> Vec<Violation> {
    [USER_MAPPING_CLASS, ROLE_MAPPING_CLASS]
        .into_iter()
        .filter(|class| !orm.has_mapping(class))
        .map(|class| Violation::MissingMapping { class })
        .collect()
}

/// Check that the schema-generation mode is "validate"
///
/// Any other value, including an absent key, is a violation: the schema
/// must pre-exist via migration and never be auto-generated.
#[must_use]
pub fn check_schema_mode(orm: &OrmConfig) -> Vec<Violation> {
    match orm.property(ORM_SCHEMA_MODE_KEY) {
        Some(REQUIRED_SCHEMA_MODE) => Vec::new(),
        found => vec![Violation::SchemaModeNotValidate {
            found: found.map(str::to_string),
        }],
    }
}

/// Check that a non-empty changelog file path is declared
#[must_use]
pub fn check_changelog_declared(migration: &MigrationConfig) -> Vec<Violation> {
    match migration.get(MIGRATION_CHANGELOG_KEY) {
        Some(path) if !path.is_empty() => Vec::new(),
        _ => vec![Violation::MissingChangelog],
    }
}
