//! Sequential workflow execution engine for w3rt.
//!
//! Executes a [`w3rt_dag::Workflow`] stage by stage: evaluates `when`
//! gates, renders `{{ }}` templates against the run context, dispatches
//! tool calls through a caller-supplied [`ToolRegistry`], and pauses at
//! `approval` stages for an external callback.

mod callbacks;
mod cancel;
mod context;
mod engine;
pub mod error;
mod registry;
mod result;

pub use callbacks::{ApprovalHandler, EngineHooks, PolicyCheck, PolicyCheckResult};
pub use cancel::CancelToken;
pub use context::RunContext;
pub use engine::{EngineConfig, WorkflowEngine};
pub use error::{EngineError, EngineResult};
pub use registry::{Tool, ToolMeta, ToolRegistry};
pub use result::RunResult;
