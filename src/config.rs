use crate::error::{ChangesetError, Result};
use crate::graph::DependentsPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding pending changesets and the configuration file
pub const CHANGESET_DIRECTORY_NAME: &str = ".changeset";

/// Configuration file name inside the changeset directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings stored in `.changeset/config.toml`.
///
/// Every key is optional; missing keys fall back to the defaults below.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangesetConfig {
    /// Directory scanned for module manifests, relative to the repository root
    #[serde(default = "default_source_path")]
    pub source_path: String,

    /// File extension identifying a module manifest
    #[serde(default = "default_manifest_extension")]
    pub manifest_extension: String,

    /// Changelog file written next to each manifest
    #[serde(default = "default_changelog_file_name")]
    pub changelog_file_name: String,

    /// How modules referenced by several others are indexed
    #[serde(default)]
    pub dependents: DependentsPolicy,
}

/// Returns the default source path.
fn default_source_path() -> String {
    "src".to_string()
}

/// Returns the default manifest extension.
fn default_manifest_extension() -> String {
    "csproj".to_string()
}

/// Returns the default changelog file name.
fn default_changelog_file_name() -> String {
    "CHANGELOG.md".to_string()
}

impl Default for ChangesetConfig {
    fn default() -> Self {
        ChangesetConfig {
            source_path: default_source_path(),
            manifest_extension: default_manifest_extension(),
            changelog_file_name: default_changelog_file_name(),
            dependents: DependentsPolicy::default(),
        }
    }
}

impl ChangesetConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ChangesetConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// # Returns
    /// * `Ok(ChangesetConfig)` - Parsed configuration
    /// * `Err(NotInitialized)` - If the file does not exist
    /// * `Err` - If the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ChangesetError::NotInitialized(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Write the default configuration to `path`
    pub fn write_default(path: &Path) -> Result<Self> {
        let config = ChangesetConfig::default();
        fs::write(path, toml::to_string_pretty(&config)?)?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.manifest_extension.trim_start_matches('.').is_empty() {
            return Err(ChangesetError::config("manifest_extension must not be empty"));
        }
        if self.changelog_file_name.trim().is_empty() {
            return Err(ChangesetError::config("changelog_file_name must not be empty"));
        }
        Ok(())
    }
}

/// Locations used by a run, all derived from the repository root
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowPaths {
    pub root: PathBuf,
    pub changeset_dir: PathBuf,
    pub config_file: PathBuf,
}

impl WorkflowPaths {
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let changeset_dir = root.join(CHANGESET_DIRECTORY_NAME);
        let config_file = changeset_dir.join(CONFIG_FILE_NAME);
        WorkflowPaths {
            root,
            changeset_dir,
            config_file,
        }
    }

    /// Directory scanned for manifests under the given configuration
    pub fn source_root(&self, config: &ChangesetConfig) -> PathBuf {
        self.root.join(&config.source_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ChangesetConfig::default();
        assert_eq!(config.source_path, "src");
        assert_eq!(config.manifest_extension, "csproj");
        assert_eq!(config.changelog_file_name, "CHANGELOG.md");
        assert_eq!(config.dependents, DependentsPolicy::Accumulate);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = ChangesetConfig::from_toml("source_path = \"modules\"\n").unwrap();
        assert_eq!(config.source_path, "modules");
        assert_eq!(config.manifest_extension, "csproj");
    }

    #[test]
    fn test_dependents_policy_from_file() {
        let config = ChangesetConfig::from_toml("dependents = \"replace\"\n").unwrap();
        assert_eq!(config.dependents, DependentsPolicy::Replace);
        assert!(ChangesetConfig::from_toml("dependents = \"sometimes\"\n").is_err());
    }

    #[test]
    fn test_rejects_empty_extension() {
        let err = ChangesetConfig::from_toml("manifest_extension = \".\"\n").unwrap_err();
        assert!(err.to_string().contains("manifest_extension"));
    }

    #[test]
    fn test_load_missing_file_is_not_initialized() {
        let temp = TempDir::new().unwrap();
        let err = ChangesetConfig::load(&temp.path().join("config.toml")).unwrap_err();
        assert!(matches!(err, ChangesetError::NotInitialized(_)));
    }

    #[test]
    fn test_write_default_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let written = ChangesetConfig::write_default(&path).unwrap();
        assert_eq!(ChangesetConfig::load(&path).unwrap(), written);
    }

    #[test]
    fn test_workflow_paths() {
        let paths = WorkflowPaths::from_root("/repo");
        assert_eq!(paths.changeset_dir, PathBuf::from("/repo/.changeset"));
        assert_eq!(paths.config_file, PathBuf::from("/repo/.changeset/config.toml"));
        assert_eq!(
            paths.source_root(&ChangesetConfig::default()),
            PathBuf::from("/repo/src")
        );
    }
}
