use crate::domain::{BumpLevel, Changeset};
use crate::error::{ChangesetError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Name of the reserved file that is never read or deleted as a changeset
pub const README_FILE_NAME: &str = "README.md";

/// Reads, writes and deletes changeset files in a single directory
#[derive(Debug, Clone)]
pub struct ChangesetStore {
    directory: PathBuf,
}

impl ChangesetStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        ChangesetStore {
            directory: directory.into(),
        }
    }

    /// Paths of every changeset file, sorted for a stable processing order
    pub fn changeset_files(&self) -> Result<Vec<PathBuf>> {
        if !self.directory.is_dir() {
            return Err(ChangesetError::DirectoryNotFound(self.directory.clone()));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_file() && is_changeset_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parse every changeset in the directory
    pub fn load_all(&self) -> Result<Vec<Changeset>> {
        let files = self.changeset_files()?;
        let mut changesets = Vec::with_capacity(files.len());

        for path in files {
            let content = fs::read_to_string(&path)?;
            let changeset = Changeset::parse(&path, &content)?;
            debug!(
                file = %path.display(),
                modules = ?changeset.modules,
                bump = %changeset.bump,
                "Loaded changeset"
            );
            changesets.push(changeset);
        }

        info!(count = changesets.len(), "Loaded changesets");
        Ok(changesets)
    }

    /// Remove every changeset file, leaving the reserved readme in place
    pub fn delete_all(&self) -> Result<usize> {
        let files = self.changeset_files()?;
        for path in &files {
            fs::remove_file(path)?;
            debug!(file = %path.display(), "Deleted changeset");
        }
        Ok(files.len())
    }

    /// Write a single changeset to `target_path`
    pub fn create(
        &self,
        modules: &[String],
        target_path: &Path,
        bump: BumpLevel,
        description: &str,
    ) -> Result<Changeset> {
        if modules.is_empty() {
            return Err(ChangesetError::config(
                "A changeset must name at least one module",
            ));
        }
        if bump == BumpLevel::None {
            return Err(ChangesetError::config(
                "A changeset must use a patch, minor or major bump",
            ));
        }

        let changeset = Changeset::new(modules.iter().cloned(), bump, description);
        fs::write(target_path, changeset.to_file_content())?;
        info!(file = %target_path.display(), "Created changeset");
        Ok(changeset)
    }

    /// A file path in the store that no existing changeset uses
    pub fn new_changeset_path(&self, first_module: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let slug: String = first_module
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();

        let mut attempt = 0u32;
        loop {
            let file_name = if attempt == 0 {
                format!("{}-{}.md", slug, stamp)
            } else {
                format!("{}-{}-{}.md", slug, stamp, attempt)
            };
            let candidate = self.directory.join(file_name);
            if !candidate.exists() {
                return candidate;
            }
            attempt += 1;
        }
    }
}

fn is_changeset_file(path: &Path) -> bool {
    let is_markdown = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    let is_readme = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(README_FILE_NAME));
    is_markdown && !is_readme
}
