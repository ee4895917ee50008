//! Command workflows
//!
//! Each `changeset` subcommand is a function here taking explicit paths and
//! configuration, so the binary only parses arguments and prints results.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::analyzer::PropagationEngine;
use crate::changelog::write_changelogs;
use crate::changeset_store::{ChangesetStore, README_FILE_NAME};
use crate::cli::ResultCode;
use crate::config::{ChangesetConfig, WorkflowPaths};
use crate::domain::{BumpLevel, Changeset, ModuleChangelog, Version};
use crate::error::{ChangesetError, Result};
use crate::manifest::{apply_versions, scan_modules};
use crate::warning::VersioningWarning;

const CHANGESET_README: &str = "# Changesets\n\n\
This folder holds pending changesets. Each markdown file names the modules it\n\
changes and their bump level, followed by a description for the changelog:\n\n\
```\n---\n\"MyModule\": minor\n---\n\nAdds the new thing\n```\n\n\
Run `changeset version` to apply them.\n";

/// What `init` found and did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Initialized,
    ConfigFileWasGenerated,
    AlreadyInitialized,
}

impl InitOutcome {
    pub fn result_code(self) -> ResultCode {
        match self {
            InitOutcome::Initialized => ResultCode::Success,
            InitOutcome::ConfigFileWasGenerated => ResultCode::ConfigFileWasGenerated,
            InitOutcome::AlreadyInitialized => ResultCode::AlreadyInitialized,
        }
    }
}

/// Create the changeset directory, default configuration and readme.
/// Existing files are never overwritten.
pub fn run_init_workflow(paths: &WorkflowPaths) -> Result<InitOutcome> {
    if paths.changeset_dir.is_dir() {
        if paths.config_file.is_file() {
            return Ok(InitOutcome::AlreadyInitialized);
        }
        ChangesetConfig::write_default(&paths.config_file)?;
        info!(file = %paths.config_file.display(), "Wrote default configuration");
        return Ok(InitOutcome::ConfigFileWasGenerated);
    }

    fs::create_dir_all(&paths.changeset_dir)?;
    ChangesetConfig::write_default(&paths.config_file)?;
    fs::write(paths.changeset_dir.join(README_FILE_NAME), CHANGESET_README)?;
    info!(directory = %paths.changeset_dir.display(), "Initialized changesets");
    Ok(InitOutcome::Initialized)
}

/// Arguments for authoring a changeset without prompts
#[derive(Debug, Clone, PartialEq)]
pub struct AddRequest {
    pub modules: Vec<String>,
    pub bump: BumpLevel,
    pub description: String,
}

/// Write a new changeset after checking every module exists in the source tree.
///
/// Returns the path of the new file.
pub fn run_add_workflow(
    paths: &WorkflowPaths,
    config: &ChangesetConfig,
    request: &AddRequest,
) -> Result<PathBuf> {
    let scan = scan_modules(&paths.source_root(config), &config.manifest_extension)?;
    if let Some(unknown) = request.modules.iter().find(|name| scan.find(name).is_none()) {
        return Err(ChangesetError::UnknownModule(unknown.clone()));
    }

    let store = ChangesetStore::new(&paths.changeset_dir);
    let first = request
        .modules
        .first()
        .ok_or_else(|| ChangesetError::config("A changeset must name at least one module"))?;
    let target = store.new_changeset_path(first);
    store.create(&request.modules, &target, request.bump, &request.description)?;
    Ok(target)
}

/// Pending changesets and the bump each module would receive from them directly
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub changesets: Vec<Changeset>,
    /// Module name and highest pending level, in first-mentioned order
    pub pending: Vec<(String, BumpLevel)>,
}

impl StatusReport {
    pub fn result_code(&self) -> ResultCode {
        if self.changesets.is_empty() {
            ResultCode::NoChangesetsFound
        } else {
            ResultCode::Success
        }
    }
}

/// Summarize the pending changesets
pub fn run_status_workflow(paths: &WorkflowPaths) -> Result<StatusReport> {
    let store = ChangesetStore::new(&paths.changeset_dir);
    let changesets = store.load_all()?;

    let mut pending: Vec<(String, BumpLevel)> = Vec::new();
    for changeset in &changesets {
        for module in &changeset.modules {
            match pending.iter_mut().find(|(name, _)| name == module) {
                Some((_, level)) => *level = (*level).max(changeset.bump),
                None => pending.push((module.clone(), changeset.bump)),
            }
        }
    }

    Ok(StatusReport {
        changesets,
        pending,
    })
}

/// A module's version change produced by a versioning run
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRelease {
    pub name: String,
    pub from: Version,
    pub to: Version,
    pub level: BumpLevel,
    pub entries: usize,
}

impl From<&ModuleChangelog> for ModuleRelease {
    fn from(changelog: &ModuleChangelog) -> Self {
        ModuleRelease {
            name: changelog.module_name.clone(),
            from: changelog.current_version,
            to: changelog.new_version(),
            level: changelog.bump_level(),
            entries: changelog.changes.len(),
        }
    }
}

/// Result of a versioning run
#[derive(Debug, Clone, PartialEq)]
pub struct VersionOutcome {
    pub releases: Vec<ModuleRelease>,
    pub warnings: Vec<VersioningWarning>,
    pub consumed_changesets: usize,
    pub changelog_files: Vec<PathBuf>,
    pub dry_run: bool,
}

impl VersionOutcome {
    pub fn result_code(&self) -> ResultCode {
        if self.consumed_changesets == 0 {
            ResultCode::NoChangesetsFound
        } else {
            ResultCode::Success
        }
    }
}

/// Resolve pending changesets into new versions and changelogs.
///
/// 1. Load changesets (none found: nothing else happens)
/// 2. Scan module manifests under the source path
/// 3. Resolve and propagate bumps
/// 4. Write changelogs and manifest versions, then delete the changesets
///
/// With `dry_run` the plan is computed and returned but no file is touched.
pub fn run_version_workflow(
    paths: &WorkflowPaths,
    config: &ChangesetConfig,
    dry_run: bool,
) -> Result<VersionOutcome> {
    let store = ChangesetStore::new(&paths.changeset_dir);
    let changesets = store.load_all()?;

    if changesets.is_empty() {
        return Ok(VersionOutcome {
            releases: Vec::new(),
            warnings: Vec::new(),
            consumed_changesets: 0,
            changelog_files: Vec::new(),
            dry_run,
        });
    }

    let scan = scan_modules(&paths.source_root(config), &config.manifest_extension)?;
    let mut warnings = scan.warnings.clone();
    for changeset in &changesets {
        for name in &changeset.modules {
            let warning = VersioningWarning::UnknownModule {
                module: name.clone(),
            };
            if scan.find(name).is_none() && !warnings.contains(&warning) {
                warnings.push(warning);
            }
        }
    }

    let changelogs = PropagationEngine::new(config.dependents).resolve(&changesets, &scan.modules);
    let releases: Vec<ModuleRelease> = changelogs.iter().map(ModuleRelease::from).collect();

    let mut changelog_files = Vec::new();
    if !dry_run {
        changelog_files = write_changelogs(&changelogs, &config.changelog_file_name)?;
        warnings.extend(apply_versions(&changelogs)?);
        let deleted = store.delete_all()?;
        info!(
            modules = releases.len(),
            changesets = deleted,
            "Versioning complete"
        );
    }

    Ok(VersionOutcome {
        releases,
        warnings,
        consumed_changesets: changesets.len(),
        changelog_files,
        dry_run,
    })
}
