//! Domain logic - pure data types independent of the filesystem

pub mod changeset;
pub mod module;
pub mod version;

pub use changeset::Changeset;
pub use module::{ChangeEntry, ModuleChangelog, ModuleDescriptor};
pub use version::{BumpLevel, Version};
