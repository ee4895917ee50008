//! Command workflows and their result codes, independent of argument parsing

pub mod orchestration;
pub mod result_code;

pub use orchestration::{
    run_add_workflow, run_init_workflow, run_status_workflow, run_version_workflow, AddRequest,
    InitOutcome, ModuleRelease, StatusReport, VersionOutcome,
};
pub use result_code::ResultCode;
