//! User interface module - terminal formatting.
//!
//! Commands are non-interactive; every prompt-free display lives in `formatter`.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_not_initialized, display_status, display_status_report,
    display_success, display_version_outcome, display_warning, format_changeset_count,
    format_release,
};
