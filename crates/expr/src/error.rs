//! Error type for DSL parsing and template rendering.

/// Errors raised while parsing or evaluating a condition expression.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExprError {
    #[error("unexpected end of expression")]
    UnexpectedEof,

    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("expected {expected}, found {found:?}")]
    Unexpected { expected: &'static str, found: String },

    #[error("trailing input after expression: {0:?}")]
    TrailingInput(String),
}

impl ExprError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::UnexpectedEof => "EXPR_UNEXPECTED_EOF",
            ExprError::UnexpectedChar(..) => "EXPR_UNEXPECTED_CHAR",
            ExprError::UnterminatedString => "EXPR_UNTERMINATED_STRING",
            ExprError::Unexpected { .. } => "EXPR_UNEXPECTED_TOKEN",
            ExprError::TrailingInput(_) => "EXPR_TRAILING_INPUT",
        }
    }
}

pub type ExprResult<T> = Result<T, ExprError>;
