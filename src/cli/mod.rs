//! Workflow layer shared by the binary and integration tests

pub mod orchestration;

pub use orchestration::{
    emit_next_version, persist, plan_changelog, plan_release, ReleaseMode, ReleasePlan,
    WorkflowOptions, WorkflowResult,
};
