//! Policy-side error codes shared with the block/confirm decision codes.
//!
//! Most policy failures are represented as `Decision::Block`/`Confirm`
//! values rather than `Result::Err` — `decide` is total, it never fails.
//! This enum exists for the handful of callers (config parsing) that do
//! need a `Result`.

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PolicyError {
    #[error("invalid policy configuration: {0}")]
    InvalidConfig(String),
}

impl PolicyError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PolicyError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

pub type PolicyResult<T> = Result<T, PolicyError>;
