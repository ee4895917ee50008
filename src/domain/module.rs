use crate::domain::{BumpLevel, Version};
use std::path::{Path, PathBuf};

/// A versioned module discovered from its manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    pub version: Version,
    /// Names of modules this one references directly, in manifest order
    pub references: Vec<String>,
    pub manifest_path: PathBuf,
}

impl ModuleDescriptor {
    pub fn new(
        name: impl Into<String>,
        version: Version,
        references: Vec<String>,
        manifest_path: impl Into<PathBuf>,
    ) -> Self {
        ModuleDescriptor {
            name: name.into(),
            version,
            references,
            manifest_path: manifest_path.into(),
        }
    }
}

/// One line of a module changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub description: String,
    pub level: BumpLevel,
}

impl ChangeEntry {
    pub fn new(description: impl Into<String>, level: BumpLevel) -> Self {
        ChangeEntry {
            description: description.into(),
            level,
        }
    }
}

/// Pending changes of a single module, merged from every source that touched it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleChangelog {
    pub module_name: String,
    pub manifest_path: PathBuf,
    pub current_version: Version,
    /// Entries in the order they were appended
    pub changes: Vec<ChangeEntry>,
}

impl ModuleChangelog {
    /// Start an empty changelog for a module
    pub fn for_module(module: &ModuleDescriptor) -> Self {
        ModuleChangelog {
            module_name: module.name.clone(),
            manifest_path: module.manifest_path.clone(),
            current_version: module.version,
            changes: Vec::new(),
        }
    }

    /// Highest bump level among the entries
    pub fn bump_level(&self) -> BumpLevel {
        self.changes
            .iter()
            .map(|change| change.level)
            .max()
            .unwrap_or_default()
    }

    /// Current version raised by the highest bump level
    pub fn new_version(&self) -> Version {
        self.current_version.bump(self.bump_level())
    }

    /// Directory holding the manifest, where the changelog file lives
    pub fn module_directory(&self) -> &Path {
        self.manifest_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Entries grouped by level, highest level first, append order within a level
    pub fn changes_by_level(&self) -> Vec<(BumpLevel, Vec<&str>)> {
        let mut levels: Vec<BumpLevel> = self.changes.iter().map(|c| c.level).collect();
        levels.sort_unstable_by(|a, b| b.cmp(a));
        levels.dedup();

        levels
            .into_iter()
            .map(|level| {
                let descriptions = self
                    .changes
                    .iter()
                    .filter(|change| change.level == level)
                    .map(|change| change.description.as_str())
                    .collect();
                (level, descriptions)
            })
            .collect()
    }
}
