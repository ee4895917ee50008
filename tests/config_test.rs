// tests/config_test.rs
use changesets::config::{ChangesetConfig, WorkflowPaths};
use changesets::graph::DependentsPolicy;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = ChangesetConfig::default();
    assert_eq!(config.source_path, "src");
    assert_eq!(config.manifest_extension, "csproj");
    assert_eq!(config.changelog_file_name, "CHANGELOG.md");
    assert_eq!(config.dependents, DependentsPolicy::Accumulate);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
source_path = "libs"
manifest_extension = ".fsproj"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = ChangesetConfig::load(temp_file.path()).unwrap();
    assert_eq!(config.source_path, "libs");
    assert_eq!(config.manifest_extension, ".fsproj");
    assert_eq!(config.changelog_file_name, "CHANGELOG.md");
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"source_path = [").unwrap();
    temp_file.flush().unwrap();

    assert!(ChangesetConfig::load(temp_file.path()).is_err());
}

#[test]
fn test_dependents_policy_from_fixture() {
    let config = ChangesetConfig::load(Path::new("tests/fixtures/config_with_replace.toml"))
        .expect("Failed to load test config");
    assert_eq!(config.dependents, DependentsPolicy::Replace);
    assert_eq!(config.source_path, "projects");
    assert_eq!(config.changelog_file_name, "HISTORY.md");
    assert_eq!(
        WorkflowPaths::from_root("/repo").source_root(&config),
        Path::new("/repo/projects")
    );
}
