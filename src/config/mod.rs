//! Configuration Pair loading
//!
//! Two independent configuration sources must stay consistent:
//! - the ORM mapping configuration (`session-factory` XML document), and
//! - the migration configuration (flat `key=value` properties).
//!
//! [`ConfigPair::load`] builds both once per run; the loaded attribute maps
//! are immutable afterwards and are what the consistency verifier inspects.

pub mod migration;
pub mod orm;

pub use migration::MigrationConfig;
pub use orm::OrmConfig;

use std::fmt;
use std::path::{Path, PathBuf};

/// ORM property key for the connection URL
pub const ORM_URL_KEY: &str = "connection.url";
/// ORM property key for the connection username
pub const ORM_USERNAME_KEY: &str = "connection.username";
/// ORM property key for the connection password
pub const ORM_PASSWORD_KEY: &str = "connection.password";
/// ORM property key for the schema-generation mode
pub const ORM_SCHEMA_MODE_KEY: &str = "hbm2ddl.auto";

/// Migration property key for the connection URL
pub const MIGRATION_URL_KEY: &str = "url";
/// Migration property key for the connection username
pub const MIGRATION_USERNAME_KEY: &str = "username";
/// Migration property key for the connection password
pub const MIGRATION_PASSWORD_KEY: &str = "password";
/// Migration property key for the root changelog path
pub const MIGRATION_CHANGELOG_KEY: &str = "changeLogFile";

/// Fully-qualified identifier of the mapped User entity
pub const USER_MAPPING_CLASS: &str = "schemaguard::model::User";
/// Fully-qualified identifier of the mapped Role entity
pub const ROLE_MAPPING_CLASS: &str = "schemaguard::model::Role";

/// Configuration loading error type
#[derive(Debug)]
pub enum ConfigError {
    /// Required configuration file missing at the expected path
    NotFound(PathBuf),
    /// Malformed configuration content
    Parse { file: String, message: String },
    /// I/O failure while reading a configuration file
    Io { file: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "You should create a following file: {}", path.display())
            }
            ConfigError::Parse { file, message } => {
                write!(f, "Error while parsing {file}: {message}")
            }
            ConfigError::Io { file, message } => {
                write!(f, "Error while reading {file}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a required configuration file to a string
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the path is not an existing file, or
/// `ConfigError::Io` if reading fails.
pub(crate) fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        file: path.display().to_string(),
        message: e.to_string(),
    })
}

/// The two configuration sources loaded together
///
/// Constructed once per run and passed by reference into each check; both
/// members are read-only after loading.
#[derive(Debug)]
pub struct ConfigPair {
    /// ORM mapping configuration attributes
    pub orm: OrmConfig,
    /// Migration configuration properties
    pub migration: MigrationConfig,
}

impl ConfigPair {
    /// Load both configuration files
    ///
    /// # Arguments
    ///
    /// * `orm_path` - Path to the ORM mapping configuration (XML)
    /// * `migration_path` - Path to the migration properties file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either file is missing, unreadable, or
    /// malformed; the error names the offending file.
    pub fn load(
        orm_path: impl AsRef<Path>,
        migration_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let orm = OrmConfig::parse(orm_path.as_ref())?;
        let migration = MigrationConfig::parse(migration_path.as_ref())?;
        Ok(Self { orm, migration })
    }
}
