//! AST for the condition/rule DSL.
//!
//! Deliberately small: this
//! is not a general-purpose expression evaluator, just enough of a tree to
//! audit at a glance. `cmp` is the only leaf that touches the context;
//! everything else is boolean combination.

/// A literal value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

/// A parsed condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `path op literal`, e.g. `quote.price == 100`.
    Cmp {
        path: String,
        op: CmpOp,
        literal: Literal,
    },
    /// A bare dotted path used as a boolean, e.g. `simulationOk`.
    Truthy(String),
    /// A bare `true`/`false` literal used as a whole expression.
    BoolLiteral(bool),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}
