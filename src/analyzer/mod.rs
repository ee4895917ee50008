//! Resolution engine turning changesets into per-module changelogs

pub mod propagation;

pub use propagation::{dependency_update_description, PropagationEngine};
