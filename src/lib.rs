//! # Schemaguard
//!
//! Schema-migration and ORM-mapping consistency verifier with a minimal
//! SQLite persistence layer.
//!
//! Two configuration sources describe the same database: an ORM mapping
//! configuration and a migration configuration pointing at a YAML changelog
//! graph. This crate loads both, cross-checks them (connection settings,
//! entity mappings, schema-validation policy, changelog format), applies the
//! changelog to a live database, and verifies the resulting schema and seed
//! rows through a typed repository.

pub mod changelog;
pub mod config;
pub mod connection;
pub mod consistency;
pub mod migration;
pub mod model;
pub mod repository;
pub mod schema;

pub use changelog::ChangelogError;
pub use config::{ConfigError, ConfigPair};
pub use connection::{connect, ConnectionError};
pub use consistency::{verify, Violation};
pub use migration::{MigrationError, Migrator};
pub use model::{Role, RoleName, User};
pub use repository::{NewUser, RepoError, UserRepository};
pub use schema::{validate_schema, SchemaError};
