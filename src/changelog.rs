//! Changelog graph traversal and format validation
//!
//! A root changelog file holds an ordered `databaseChangeLog` sequence whose
//! entries are either `include` references to other changelog files or
//! inline `changeSet` declarations. Two consumers read it:
//!
//! - the structure checks walk a generic YAML tree and extract one level of
//!   included file paths, validating that every reachable file uses a
//!   database-agnostic format (`.yaml`/`.yml`);
//! - the migration applier (see [`crate::migration`]) loads the typed
//!   changeset declarations, expanding includes recursively.

use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

/// Top-level key holding the ordered change entries
pub const CHANGELOG_KEY: &str = "databaseChangeLog";

/// Changelog loading/validation error type
#[derive(Debug)]
pub enum ChangelogError {
    /// Changelog file missing at the expected path
    NotFound(String),
    /// Changelog file does not use a database-agnostic format
    FormatViolation(String),
    /// Malformed changelog content
    Parse { file: String, message: String },
}

impl fmt::Display for ChangelogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangelogError::NotFound(path) => {
                write!(f, "You should create a following file: {path}")
            }
            ChangelogError::FormatViolation(path) => {
                write!(
                    f,
                    "You should specify your {path} using database-agnostic \
                     file format (.yaml/.yml)"
                )
            }
            ChangelogError::Parse { file, message } => {
                write!(f, "Error while parsing changelog file {file}: {message}")
            }
        }
    }
}

impl std::error::Error for ChangelogError {}

/// Validate that a changelog path uses the `.yaml`/`.yml` extension
///
/// # Errors
///
/// Returns `ChangelogError::FormatViolation` naming the path otherwise
/// (`.sql`, `.xml`, and extensionless paths all fail).
pub fn validate_yaml_extension(path: &str) -> Result<(), ChangelogError> {
    if path.ends_with(".yaml") || path.ends_with(".yml") {
        Ok(())
    } else {
        Err(ChangelogError::FormatViolation(path.to_string()))
    }
}

/// Parse a changelog file into a generic YAML tree
///
/// # Errors
///
/// Returns `ChangelogError::NotFound` for a missing file or
/// `ChangelogError::Parse` with file-name context for malformed YAML.
pub fn read_changelog(path: &Path) -> Result<Value, ChangelogError> {
    if !path.is_file() {
        return Err(ChangelogError::NotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| ChangelogError::Parse {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_yaml::from_str(&content).map_err(|e| ChangelogError::Parse {
        file: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Extract the directly included file paths from a root changelog
///
/// The root path is extension-validated, parsed, and the sequence under
/// `databaseChangeLog` is walked one level deep: every mapping entry holding
/// an `include` mapping with a string `file` value contributes that path, in
/// sequence order, and each extracted path is extension-validated as a side
/// effect. Entries of any other shape are silently skipped. A changelog
/// without the `databaseChangeLog` key yields an empty sequence, not an
/// error.
///
/// # Errors
///
/// Returns `ChangelogError::FormatViolation` if the root or any included
/// path has a non-YAML extension, plus the load errors of
/// [`read_changelog`].
pub fn included_files(root: &Path) -> Result<Vec<String>, ChangelogError> {
    validate_yaml_extension(&root.display().to_string())?;
    let document = read_changelog(root)?;
    let included = filter_included_files(&document);
    for file in &included {
        validate_yaml_extension(file)?;
    }
    Ok(included)
}

/// Collect `{include: {file: <string>}}` entries from a parsed changelog
///
/// Shape mismatches (non-sequence changelog value, non-map entries, non-map
/// `include` values, non-string `file` values) are skipped silently.
#[must_use]
pub fn filter_included_files(document: &Value) -> Vec<String> {
    document
        .get(CHANGELOG_KEY)
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.get("include"))
        .filter_map(|include| include.get("file"))
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// A single change within a changeset
///
/// Only raw SQL changes are supported; the applier executes them verbatim.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Change {
    /// SQL statement to execute
    pub sql: String,
}

/// An atomic, uniquely identified migration step
///
/// Identified by (id, author, filename); applied at most once to a target
/// schema.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChangeSet {
    /// Changeset identifier, unique within its file
    pub id: String,
    /// Changeset author
    pub author: String,
    /// Ordered changes to apply
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
struct IncludeSpec {
    file: String,
}

/// One entry of the `databaseChangeLog` sequence, typed for the applier
///
/// Entries that are neither an include nor a changeset deserialize with both
/// fields absent and are skipped, keeping the same shape-mismatch policy as
/// the generic traversal.
#[derive(Debug, Deserialize)]
struct ChangelogEntry {
    include: Option<IncludeSpec>,
    #[serde(rename = "changeSet")]
    change_set: Option<ChangeSet>,
}

#[derive(Debug, Deserialize)]
struct ChangelogDocument {
    #[serde(rename = "databaseChangeLog", default)]
    database_change_log: Vec<ChangelogEntry>,
}

/// A changeset together with the changelog file that declared it
#[derive(Debug, Clone)]
pub struct LoadedChangeSet {
    /// Path of the declaring changelog file, as written in the include graph
    pub filename: String,
    /// The changeset declaration
    pub change_set: ChangeSet,
}

/// Load every changeset reachable from a root changelog, in order
///
/// Includes are expanded in place, recursively: an included file's
/// changesets appear at the position of the `include` entry. Unlike the
/// structure traversal, this walk must open every reachable file because the
/// applier has to execute nested changesets.
///
/// # Errors
///
/// Returns load errors of [`read_changelog`] for any reachable file, or
/// `ChangelogError::Parse` if a changeset declaration is malformed.
pub fn load_changesets(root: &Path) -> Result<Vec<LoadedChangeSet>, ChangelogError> {
    let mut loaded = Vec::new();
    collect_changesets(root, &mut loaded)?;
    Ok(loaded)
}

fn collect_changesets(
    path: &Path,
    loaded: &mut Vec<LoadedChangeSet>,
) -> Result<(), ChangelogError> {
    if !path.is_file() {
        return Err(ChangelogError::NotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| ChangelogError::Parse {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;
    let document: ChangelogDocument =
        serde_yaml::from_str(&content).map_err(|e| ChangelogError::Parse {
            file: path.display().to_string(),
            message: e.to_string(),
        })?;

    for entry in document.database_change_log {
        if let Some(include) = entry.include {
            collect_changesets(Path::new(&include.file), loaded)?;
        } else if let Some(change_set) = entry.change_set {
            loaded.push(LoadedChangeSet {
                filename: path.display().to_string(),
                change_set,
            });
        }
    }
    Ok(())
}
