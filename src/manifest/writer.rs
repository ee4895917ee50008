use crate::domain::{ModuleChangelog, Version};
use crate::error::Result;
use crate::manifest::discovery::parse_manifest;
use crate::warning::VersioningWarning;
use std::fs;
use tracing::{debug, info};

/// Replace the text of the module version element, leaving all other bytes untouched.
///
/// The element is the one discovery reads the version from. Returns `None`
/// when the manifest has no such element.
pub fn rewrite_version(content: &str, new_version: &Version) -> Result<Option<String>> {
    let Some(span) = parse_manifest(content)?.version_span else {
        return Ok(None);
    };

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..span.start]);
    updated.push_str(&new_version.to_string());
    updated.push_str(&content[span.end..]);
    Ok(Some(updated))
}

/// Write the resolved version of each changelog into its module manifest.
///
/// Manifests without a version element are skipped and reported as warnings.
pub fn apply_versions(changelogs: &[ModuleChangelog]) -> Result<Vec<VersioningWarning>> {
    let mut warnings = Vec::new();

    for changelog in changelogs {
        let path = &changelog.manifest_path;
        let content = fs::read_to_string(path)?;
        let new_version = changelog.new_version();

        match rewrite_version(&content, &new_version)? {
            None => {
                let warning = VersioningWarning::MissingVersionField {
                    module: changelog.module_name.clone(),
                    manifest: path.clone(),
                };
                debug!("{}", warning);
                warnings.push(warning);
            }
            Some(updated) if updated == content => {
                debug!(module = %changelog.module_name, "Manifest version already current");
            }
            Some(updated) => {
                fs::write(path, updated)?;
                info!(
                    module = %changelog.module_name,
                    from = %changelog.current_version,
                    to = %new_version,
                    "Updated manifest version"
                );
            }
        }
    }

    Ok(warnings)
}
