//! Module manifests on disk
//!
//! - `discovery` - finds manifests and reads version and references
//! - `writer` - rewrites the version element in place

pub mod discovery;
pub mod writer;

pub use discovery::{parse_manifest, read_manifest, scan_modules, ManifestContents, ModuleScan};
pub use writer::{apply_versions, rewrite_version};
