//! ORM mapping configuration parsing
//!
//! The ORM configuration is an XML document with a single `session-factory`
//! container whose direct children are `property` elements (name attribute +
//! text content) and `mapping` elements (class attribute, no value).

use crate::config::{read_config_file, ConfigError};
use std::collections::HashMap;
use std::path::Path;

/// Parsed ORM mapping configuration
///
/// Attribute values are `Some(text)` for `property` entries and `None` for
/// `mapping` entries, so a single map answers both "what is this property
/// set to" and "is this entity mapped".
#[derive(Debug, Clone)]
pub struct OrmConfig {
    attributes: HashMap<String, Option<String>>,
}

impl OrmConfig {
    /// Parse the ORM configuration file
    ///
    /// Locates the `session-factory` element and records every direct child:
    /// `property` children map their `name` attribute to their text content
    /// (an empty element yields an empty string), `mapping` children record
    /// their `class` attribute with no value. Children without the expected
    /// attribute are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a missing file,
    /// `ConfigError::Parse` for malformed XML or a document without a
    /// `session-factory` element.
    pub fn parse(path: &Path) -> Result<Self, ConfigError> {
        let content = read_config_file(path)?;
        let file = path.display().to_string();

        let document = roxmltree::Document::parse(&content).map_err(|e| ConfigError::Parse {
            file: file.clone(),
            message: e.to_string(),
        })?;

        let session_factory = document
            .descendants()
            .find(|node| node.is_element() && node.has_tag_name("session-factory"))
            .ok_or_else(|| ConfigError::Parse {
                file: file.clone(),
                message: "no <session-factory> element found".to_string(),
            })?;

        let mut attributes = HashMap::new();
        for child in session_factory.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "property" => {
                    if let Some(name) = child.attribute("name").filter(|n| !n.is_empty()) {
                        let value = child.text().unwrap_or("").trim().to_string();
                        attributes.insert(name.to_string(), Some(value));
                    }
                }
                "mapping" => {
                    if let Some(class) = child.attribute("class").filter(|c| !c.is_empty()) {
                        attributes.insert(class.to_string(), None);
                    }
                }
                _ => {}
            }
        }

        Ok(Self { attributes })
    }

    /// Get a property value by name
    ///
    /// Returns `None` both for absent keys and for `mapping` entries, which
    /// carry no value.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(|v| v.as_deref())
    }

    /// Check whether a mapping entry exists for the given entity identifier
    #[must_use]
    pub fn has_mapping(&self, class: &str) -> bool {
        self.attributes.contains_key(class)
    }

    /// All parsed attributes (property values and mapping markers)
    #[must_use]
    pub fn attributes(&self) -> &HashMap<String, Option<String>> {
        &self.attributes
    }
}
