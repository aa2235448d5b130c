//! Evaluation of a parsed condition expression against a context tree.
//!
//! Missing paths evaluate to undefined, which is falsy and participates in
//! comparisons as follows: every comparison against an
//! undefined value is `false`, except `!=` against the literal `null`,
//! which is `true` (an absent field is not equal to `null`).

use w3rt_core::Value;

use crate::ast::{CmpOp, Expr, Literal};

/// Evaluate `expr` against `ctx`. Never fails — unparseable input is
/// rejected at parse time, not evaluation time.
#[must_use]
pub fn eval(expr: &Expr, ctx: &Value) -> bool {
    match expr {
        Expr::BoolLiteral(b) => *b,
        Expr::Truthy(path) => ctx.get_path(path).is_some_and(Value::is_truthy),
        Expr::Not(inner) => !eval(inner, ctx),
        Expr::And(l, r) => eval(l, ctx) && eval(r, ctx),
        Expr::Or(l, r) => eval(l, ctx) || eval(r, ctx),
        Expr::Cmp { path, op, literal } => eval_cmp(ctx.get_path(path), *op, literal),
    }
}

fn eval_cmp(left: Option<&Value>, op: CmpOp, literal: &Literal) -> bool {
    let Some(left) = left else {
        return op == CmpOp::Ne && matches!(literal, Literal::Null);
    };

    match op {
        CmpOp::Eq => values_equal(left, literal),
        CmpOp::Ne => !values_equal(left, literal),
        CmpOp::Gt | CmpOp::Ge | CmpOp::Lt | CmpOp::Le => order_compare(left, op, literal),
    }
}

fn values_equal(left: &Value, literal: &Literal) -> bool {
    match (left, literal) {
        (Value::Str(s), Literal::Str(l)) => s.as_ref() == l,
        (Value::Int(i), Literal::Num(n)) => (*i as f64) == *n,
        (Value::Float(f), Literal::Num(n)) => f == n,
        (Value::Bool(b), Literal::Bool(l)) => b == l,
        (Value::Null, Literal::Null) => true,
        _ => false,
    }
}

fn order_compare(left: &Value, op: CmpOp, literal: &Literal) -> bool {
    let ordering = match (left, literal) {
        (Value::Int(i), Literal::Num(n)) => (*i as f64).partial_cmp(n),
        (Value::Float(f), Literal::Num(n)) => f.partial_cmp(n),
        (Value::Str(s), Literal::Str(l)) => Some(s.as_ref().cmp(l.as_str())),
        _ => None,
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        CmpOp::Gt => ordering.is_gt(),
        CmpOp::Ge => ordering.is_ge(),
        CmpOp::Lt => ordering.is_lt(),
        CmpOp::Le => ordering.is_le(),
        CmpOp::Eq | CmpOp::Ne => unreachable!("handled in eval_cmp"),
    }
}

/// Parse and evaluate a condition string in one step, returning `false`
/// (fail-closed) and logging a warning on a parse error rather than
/// propagating — callers of `when`/approval conditions treat an
/// unparseable condition the same as a false one.
#[must_use]
pub fn eval_str(src: &str, ctx: &Value) -> bool {
    match crate::parser::parse(src) {
        Ok(expr) => eval(&expr, ctx),
        Err(err) => {
            tracing::warn!(condition = src, error = %err, "condition failed to parse, treating as false");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ctx() -> Value {
        Value::from_json(&serde_json::json!({
            "quote": {"price": 100},
            "chain": "solana",
            "simulationOk": true,
            "empty": "",
        }))
    }

    #[rstest]
    #[case("quote.price == 100", true)]
    #[case("quote.price != 100", false)]
    #[case("quote.price > 50", true)]
    #[case("quote.price < 50", false)]
    #[case("chain == \"solana\"", true)]
    #[case("chain == 'ethereum'", false)]
    #[case("simulationOk", true)]
    #[case("empty", false)]
    #[case("missing.path == 1", false)]
    #[case("missing.path != null", true)]
    #[case("missing.path == null", false)]
    #[case("!simulationOk", false)]
    #[case("quote.price == 100 && chain == \"solana\"", true)]
    #[case("quote.price == 1 || chain == \"solana\"", true)]
    fn evaluates_as_expected(#[case] src: &str, #[case] expected: bool) {
        assert_eq!(eval_str(src, &ctx()), expected);
    }

    #[test]
    fn unparseable_condition_is_false() {
        assert!(!eval_str("quote.price ==", &ctx()));
    }
}
