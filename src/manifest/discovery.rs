use crate::domain::{ModuleDescriptor, Version};
use crate::error::{ChangesetError, Result};
use crate::warning::VersioningWarning;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Fields read from a single manifest file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestContents {
    /// Trimmed text of the module version element, if there is one
    pub version: Option<String>,
    /// Byte range of that text in the manifest
    pub version_span: Option<Range<usize>>,
    /// File stems of every `ProjectReference` target
    pub references: Vec<String>,
}

/// Result of scanning a source tree for modules
#[derive(Debug, Default)]
pub struct ModuleScan {
    pub modules: Vec<ModuleDescriptor>,
    pub warnings: Vec<VersioningWarning>,
}

impl ModuleScan {
    pub fn find(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|module| module.name == name)
    }
}

/// Recursively discover manifests with the given extension under `source_root`.
///
/// Modules without a version are kept as 0.0.0; modules whose version exists
/// but does not parse are dropped. Both cases are reported as warnings.
pub fn scan_modules(source_root: &Path, extension: &str) -> Result<ModuleScan> {
    if !source_root.is_dir() {
        return Err(ChangesetError::config(format!(
            "Source path does not exist: {}",
            source_root.display()
        )));
    }

    let mut scan = ModuleScan::default();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || !has_extension(path, extension) {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        if let Some(kept) = seen.get(name) {
            let warning = VersioningWarning::DuplicateModule {
                module: name.to_string(),
                kept: kept.clone(),
                ignored: path.to_path_buf(),
            };
            debug!("{}", warning);
            scan.warnings.push(warning);
            continue;
        }

        let contents = read_manifest(path)?;
        let version = match contents.version {
            None => {
                let warning = VersioningWarning::MissingVersion {
                    module: name.to_string(),
                    manifest: path.to_path_buf(),
                };
                debug!("{}", warning);
                scan.warnings.push(warning);
                Version::default()
            }
            Some(raw) => match Version::parse(&raw) {
                Ok(version) => version,
                Err(_) => {
                    let warning = VersioningWarning::UnparsableVersion {
                        module: name.to_string(),
                        value: raw,
                        manifest: path.to_path_buf(),
                    };
                    debug!("{}", warning);
                    scan.warnings.push(warning);
                    continue;
                }
            },
        };

        debug!(
            module = name,
            %version,
            references = contents.references.len(),
            "Discovered module"
        );
        seen.insert(name.to_string(), path.to_path_buf());
        scan.modules.push(ModuleDescriptor::new(
            name,
            version,
            contents.references,
            path,
        ));
    }

    Ok(scan)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// Read and parse a manifest file
pub fn read_manifest(path: &Path) -> Result<ManifestContents> {
    let xml = fs::read_to_string(path)?;
    parse_manifest(&xml)
        .map_err(|e| ChangesetError::manifest(format!("{}: {}", path.display(), e)))
}

/// Extract the version and referenced module names from manifest XML.
///
/// The module version is the first `Version` element whose parent is a
/// `PropertyGroup` or the root element. `Version` children of package items
/// are not module versions and are ignored.
pub fn parse_manifest(xml: &str) -> Result<ManifestContents> {
    let (body, bom_len) = match xml.strip_prefix('\u{feff}') {
        Some(rest) => (rest, xml.len() - rest.len()),
        None => (xml, 0),
    };
    let mut reader = Reader::from_str(body);

    let mut contents = ManifestContents::default();
    let mut open: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                let name = element.local_name().as_ref().to_vec();
                if name == b"Version" && contents.version.is_none() && holds_version(&open) {
                    let span = match reader.read_to_end(element.name()) {
                        Ok(span) => span,
                        Err(e) => return Err(invalid_xml(reader.buffer_position(), e)),
                    };
                    let start = offset(span.start)? + bom_len;
                    let end = offset(span.end)? + bom_len;
                    let raw = &xml[start..end];
                    let value = raw.trim();
                    let value_start = start + (raw.len() - raw.trim_start().len());
                    contents.version = Some(value.to_string());
                    contents.version_span = Some(value_start..value_start + value.len());
                    continue;
                }
                if name == b"ProjectReference" {
                    push_reference(&element, &mut contents)?;
                }
                open.push(name);
            }
            Ok(Event::Empty(element)) => match element.local_name().as_ref() {
                b"Version" if contents.version.is_none() && holds_version(&open) => {
                    contents.version = Some(String::new());
                }
                b"ProjectReference" => push_reference(&element, &mut contents)?,
                _ => {}
            },
            Ok(Event::End(_)) => {
                open.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(invalid_xml(reader.buffer_position(), e)),
            _ => {}
        }
    }

    Ok(contents)
}

/// Whether a `Version` element under the open elements is the module version
fn holds_version(open: &[Vec<u8>]) -> bool {
    match open {
        [_root] => true,
        [.., parent] => parent.as_slice() == b"PropertyGroup",
        [] => false,
    }
}

fn offset(position: u64) -> Result<usize> {
    usize::try_from(position).map_err(|e| ChangesetError::manifest(e.to_string()))
}

fn invalid_xml(position: u64, error: quick_xml::Error) -> ChangesetError {
    ChangesetError::manifest(format!("invalid XML at position {}: {}", position, error))
}

fn push_reference(element: &BytesStart<'_>, contents: &mut ManifestContents) -> Result<()> {
    let include = element
        .try_get_attribute("Include")
        .map_err(|e| ChangesetError::manifest(e.to_string()))?;

    if let Some(attribute) = include {
        let target = attribute
            .unescape_value()
            .map_err(|e| ChangesetError::manifest(e.to_string()))?;
        if let Some(name) = reference_name(&target) {
            contents.references.push(name);
        }
    }

    Ok(())
}

/// Module name of a reference target: its file stem, with `\` treated as a separator
fn reference_name(target: &str) -> Option<String> {
    let normalized = target.replace('\\', "/");
    Path::new(&normalized)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}
