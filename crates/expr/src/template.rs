//! `{{ dotted.path }}` template rendering.
//!
//! Walks a params value recursively; inside strings, each `{{ expr }}`
//! match is replaced by the stringified value at that dotted path in the
//! current context, or the empty string if the path is absent. Arrays and
//! nested objects are transformed in place; non-string scalars pass
//! through unchanged.

use w3rt_core::Value;

/// Render all `{{ }}` placeholders in `params` against `ctx`.
#[must_use]
pub fn render(params: &Value, ctx: &Value) -> Value {
    match params {
        Value::Str(s) => Value::str(render_str(s, ctx)),
        Value::List(items) => Value::List(items.iter().map(|v| render(v, ctx)).collect()),
        Value::Map(map) => {
            Value::Map(map.iter().map(|(k, v)| (k.clone(), render(v, ctx))).collect())
        }
        other => other.clone(),
    }
}

/// Render placeholders within a single string.
#[must_use]
pub fn render_str(input: &str, ctx: &Value) -> String {
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if input[i..].starts_with("{{") {
            if let Some(rel_end) = input[i + 2..].find("}}") {
                let expr = input[i + 2..i + 2 + rel_end].trim();
                let value = ctx.get_path(expr).map(Value::stringify).unwrap_or_default();
                out.push_str(&value);
                i += 2 + rel_end + 2;
                continue;
            }
        }
        let ch = input[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}
