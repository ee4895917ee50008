pub mod analyzer;
pub mod changelog;
pub mod changeset_store;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod telemetry;
pub mod ui;
pub mod warning;

pub use error::{ChangesetError, Result};
