//! Error taxonomy for schema parsing, DAG validation, and plan compilation.

/// Errors raised while parsing a workflow document or DAG-form workflow.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DagError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid type for field {field}: expected {expected}")]
    InvalidType { field: String, expected: String },

    #[error("invalid trigger: {0}")]
    InvalidTrigger(String),

    #[error("invalid stage type: {0}")]
    InvalidStageType(String),

    #[error("stages must not be empty")]
    EmptyStages,

    #[error("actions must not be empty")]
    EmptyActions,

    #[error("duplicate action id: {0}")]
    DuplicateId(String),

    #[error("missing dependency: {id} dependsOn {dep}")]
    MissingDependency { id: String, dep: String },

    #[error("cycle detected in dependsOn graph")]
    Cycle,

    #[error("swap_exec requires dependsOn a w3rt_swap_quote step: {0}")]
    SwapExecNoQuote(String),

    #[error("swap_exec missing params.confirm: {0}")]
    SwapExecMissingConfirm(String),

    #[error("swap_exec confirm must be I_CONFIRM: {0}")]
    SwapExecBadConfirm(String),

    #[error("artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("hash mismatch: expected {expected}, found {found}")]
    HashMismatch { expected: String, found: String },
}

impl DagError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            DagError::MissingField(_) => "MISSING_FIELD",
            DagError::InvalidType { .. } => "INVALID_TYPE",
            DagError::InvalidTrigger(_) => "INVALID_TRIGGER",
            DagError::InvalidStageType(_) => "INVALID_STAGE_TYPE",
            DagError::EmptyStages => "EMPTY_STAGES",
            DagError::EmptyActions => "EMPTY_ACTIONS",
            DagError::DuplicateId(_) => "DUPLICATE_ID",
            DagError::MissingDependency { .. } => "MISSING_DEPENDENCY",
            DagError::Cycle => "CYCLE",
            DagError::SwapExecNoQuote(_) => "SWAP_EXEC_NO_QUOTE",
            DagError::SwapExecMissingConfirm(_) => "SWAP_EXEC_MISSING_CONFIRM",
            DagError::SwapExecBadConfirm(_) => "SWAP_EXEC_BAD_CONFIRM",
            DagError::ArtifactNotFound(_) => "ARTIFACT_NOT_FOUND",
            DagError::HashMismatch { .. } => "HASH_MISMATCH",
        }
    }
}

pub type DagResult<T> = Result<T, DagError>;
