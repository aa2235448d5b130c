//! Runtime error taxonomy for a single workflow run.

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("approval conditions failed")]
    ApprovalConditionsFailed,

    #[error("approval rejected")]
    ApprovalRejected,

    #[error("no approval handler configured")]
    NoApprovalHandler,

    #[error("Policy blocked: {0}")]
    PolicyBlocked(String),

    #[error("tool failure: {0}")]
    ToolFailure(String),

    #[error("cancelled")]
    Cancelled,
}

impl EngineError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::UnknownTool(_) => "UNKNOWN_TOOL",
            EngineError::ApprovalConditionsFailed => "APPROVAL_CONDITIONS_FAILED",
            EngineError::ApprovalRejected => "APPROVAL_REJECTED",
            EngineError::NoApprovalHandler => "NO_APPROVAL_HANDLER",
            EngineError::PolicyBlocked(_) => "POLICY_BLOCKED",
            EngineError::ToolFailure(_) => "TOOL_FAILURE",
            EngineError::Cancelled => "CANCELLED",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
