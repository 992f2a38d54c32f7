//! Migration system for schemaguard
//!
//! This module provides the infrastructure for applying YAML changelogs to a
//! live database, including:
//! - Changeset checksum calculation and drift detection
//! - Migration state tracking (`schemaguard_changelog` table)
//! - Changeset execution with per-changeset transactions
//!
//! # Example
//!
//! ```rust,no_run
//! use schemaguard::connection::connect;
//! use schemaguard::migration::Migrator;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = connect("sqlite::memory:")?;
//!     let migrator = Migrator::new("resources/db/changelog/changelog-master.yaml");
//!     let applied = migrator.update(&mut conn)?;
//!     println!("applied {applied} changeset(s)");
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod migrator;
pub mod record;
pub mod state_table;

pub use checksum::changeset_checksum;
pub use error::MigrationError;
pub use migrator::Migrator;
pub use record::ChangesetRecord;
pub use state_table::{initialize_state_table, STATE_TABLE};
