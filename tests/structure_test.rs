//! Structure checks over the shipped configuration pair
//!
//! Loads the ORM and migration configurations once and asserts their
//! cross-consistency, mapping presence, schema policy, and changelog format.

use once_cell::sync::Lazy;
use schemaguard::changelog::included_files;
use schemaguard::config::{ConfigPair, MIGRATION_CHANGELOG_KEY};
use schemaguard::consistency::{
    check_changelog_declared, check_connection_settings, check_entity_mappings, check_schema_mode,
    verify,
};
use std::path::Path;

const ORM_CONFIG_PATH: &str = "resources/schemaguard.cfg.xml";
const MIGRATION_CONFIG_PATH: &str = "resources/migration.properties";

static CONFIG: Lazy<ConfigPair> = Lazy::new(|| {
    ConfigPair::load(ORM_CONFIG_PATH, MIGRATION_CONFIG_PATH)
        .expect("configuration pair should load")
});

fn format_violations(violations: &[schemaguard::Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_migration_properties_correspond_to_orm_config() {
    let violations = check_connection_settings(&CONFIG.orm, &CONFIG.migration);
    assert!(
        violations.is_empty(),
        "connection settings differ:\n{}",
        format_violations(&violations)
    );
}

#[test]
fn test_user_and_role_model_mappings_exist() {
    let violations = check_entity_mappings(&CONFIG.orm);
    assert!(
        violations.is_empty(),
        "missing entity mappings:\n{}",
        format_violations(&violations)
    );
}

#[test]
fn test_validate_option_is_used() {
    let violations = check_schema_mode(&CONFIG.orm);
    assert!(
        violations.is_empty(),
        "schema mode violation:\n{}",
        format_violations(&violations)
    );
}

#[test]
fn test_changelog_master_uses_yaml_changesets() {
    let violations = check_changelog_declared(&CONFIG.migration);
    assert!(
        violations.is_empty(),
        "changelog declaration violation:\n{}",
        format_violations(&violations)
    );

    let changelog_path = CONFIG
        .migration
        .get(MIGRATION_CHANGELOG_KEY)
        .expect("changelog path was just checked to be present");

    // Extension-validates the root and every directly included file.
    let included = included_files(Path::new(changelog_path))
        .expect("changelog graph should traverse cleanly");
    assert_eq!(
        included,
        vec![
            "resources/db/changelog/changes/01-create-users-and-roles.yaml".to_string(),
            "resources/db/changelog/changes/02-seed-default-accounts.yaml".to_string(),
        ],
        "included changelog files should be listed in declaration order"
    );
}

#[test]
fn test_full_verification_reports_no_violations() {
    let violations = verify(&CONFIG);
    assert!(
        violations.is_empty(),
        "configuration pair is inconsistent:\n{}",
        format_violations(&violations)
    );
}
