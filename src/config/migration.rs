//! Migration configuration parsing
//!
//! The migration configuration is a flat properties file: one `key=value`
//! pair per line, `#`/`!` comment lines and blank lines skipped.

use crate::config::{read_config_file, ConfigError};
use std::collections::HashMap;
use std::path::Path;

/// Parsed migration configuration properties
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    properties: HashMap<String, String>,
}

impl MigrationConfig {
    /// Parse the migration properties file
    ///
    /// A line without a `=` separator records the whole trimmed line as a
    /// key with an empty value, matching flat-properties semantics.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a missing file or
    /// `ConfigError::Io` if reading fails.
    pub fn parse(path: &Path) -> Result<Self, ConfigError> {
        let content = read_config_file(path)?;

        let mut properties = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) => {
                    properties.insert(key.trim().to_string(), value.trim().to_string());
                }
                None => {
                    properties.insert(line.to_string(), String::new());
                }
            }
        }

        Ok(Self { properties })
    }

    /// Get a property value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// All parsed properties
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_properties(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".properties")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_flat_pairs() {
        let file = write_properties(
            "url=sqlite::memory:\nusername=sa\npassword=\nchangeLogFile=resources/changelog-master.yaml\n",
        );
        let config = MigrationConfig::parse(file.path()).unwrap();
        assert_eq!(config.get("url"), Some("sqlite::memory:"));
        assert_eq!(config.get("username"), Some("sa"));
        assert_eq!(config.get("password"), Some(""));
        assert_eq!(
            config.get("changeLogFile"),
            Some("resources/changelog-master.yaml")
        );
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let file = write_properties("# comment\n! also a comment\n\nurl=sqlite::memory:\n");
        let config = MigrationConfig::parse(file.path()).unwrap();
        assert_eq!(config.properties().len(), 1);
    }

    #[test]
    fn test_value_may_contain_separator() {
        let file = write_properties("url=sqlite:file.db?mode=ro\n");
        let config = MigrationConfig::parse(file.path()).unwrap();
        assert_eq!(config.get("url"), Some("sqlite:file.db?mode=ro"));
    }

    #[test]
    fn test_bare_key_has_empty_value() {
        let file = write_properties("password\n");
        let config = MigrationConfig::parse(file.path()).unwrap();
        assert_eq!(config.get("password"), Some(""));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = MigrationConfig::parse(Path::new("no/such/migration.properties")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
