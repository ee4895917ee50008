use std::fmt;
use std::path::PathBuf;

/// Non-fatal issues found while versioning.
/// The run continues; these are reported to the user afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum VersioningWarning {
    /// Manifest has no version element, the module is treated as 0.0.0
    MissingVersion { module: String, manifest: PathBuf },
    /// Manifest version could not be parsed, the module is left out of the scan
    UnparsableVersion {
        module: String,
        value: String,
        manifest: PathBuf,
    },
    /// A second manifest produced a module name already seen
    DuplicateModule {
        module: String,
        kept: PathBuf,
        ignored: PathBuf,
    },
    /// Version rewrite skipped because the manifest has no version element
    MissingVersionField { module: String, manifest: PathBuf },
    /// A changeset names a module that is not in the scanned tree; its entry is dropped
    UnknownModule { module: String },
}

impl fmt::Display for VersioningWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersioningWarning::MissingVersion { module, manifest } => write!(
                f,
                "Module '{}' has no version in {}, assuming 0.0.0",
                module,
                manifest.display()
            ),
            VersioningWarning::UnparsableVersion {
                module,
                value,
                manifest,
            } => write!(
                f,
                "Version '{}' could not be parsed for module '{}' ({}), module skipped",
                value,
                module,
                manifest.display()
            ),
            VersioningWarning::DuplicateModule {
                module,
                kept,
                ignored,
            } => write!(
                f,
                "Module '{}' is defined twice, using {} and ignoring {}",
                module,
                kept.display(),
                ignored.display()
            ),
            VersioningWarning::MissingVersionField { module, manifest } => write!(
                f,
                "Manifest of '{}' has no version element, not updated: {}",
                module,
                manifest.display()
            ),
            VersioningWarning::UnknownModule { module } => write!(
                f,
                "Changeset names unknown module '{}', its entry was skipped",
                module
            ),
        }
    }
}
