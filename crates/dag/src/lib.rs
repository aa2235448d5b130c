//! Workflow/plan schema, DAG validation, and plan compilation for w3rt.

pub mod compile;
pub mod error;
pub mod schema;
pub mod topo;
pub mod validate;

pub use compile::{compile, CompileOptions};
pub use error::{DagError, DagResult};
pub use schema::{
    Action, Approval, DagAction, DagWorkflow, Plan, PlanMeta, PlanStep, Stage, StageType, Trigger,
    Workflow, PLAN_SCHEMA,
};
pub use validate::validate_dag;
