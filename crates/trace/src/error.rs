//! Storage-layer error taxonomy.

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TraceError {
    #[error("artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("hash mismatch: expected {expected}, found {found}")]
    HashMismatch { expected: String, found: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed trace event: {0}")]
    MalformedEvent(String),
}

impl TraceError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            TraceError::ArtifactNotFound(_) => "ARTIFACT_NOT_FOUND",
            TraceError::HashMismatch { .. } => "HASH_MISMATCH",
            TraceError::Io { .. } => "IO_ERROR",
            TraceError::MalformedEvent(_) => "MALFORMED_EVENT",
        }
    }
}

pub type TraceResult<T> = Result<T, TraceError>;
