//! The run context value tree.
//!
//! `Value` is a small tagged tree (scalar | list | map) used everywhere the
//! engine and policy/expression crates need a heterogeneous, dotted-path
//! addressable piece of data: the run context, tool params, policy context,
//! rule DSL literals. It converts to/from `serde_json::Value` once at the
//! process boundary (parsing a workflow document, receiving a tool result)
//! and is otherwise the only representation carried internally.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Number;

/// A dotted path segment separator.
const PATH_SEP: char = '.';

/// A value in the context tree.
///
/// Maps are `BTreeMap` rather than `serde_json::Map` (which preserves
/// insertion order) so that iterating a `Value::Map` always yields keys in
/// sorted order — the same order `w3rt_core::canonical` emits, so there is
/// never a mismatch between "the order this crate sees keys" and "the order
/// the canonical hash sees them".
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    #[must_use]
    pub fn str(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    #[must_use]
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness used by the rule DSL and `when`/approval-condition
    /// evaluation: `null`, `false`, `0`, `0.0`, and the empty string/list/map
    /// are falsy; everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Map(m) => !m.is_empty(),
        }
    }

    /// Render this value as it should appear when substituted into a
    /// `{{ }}` template: numbers in their plain decimal form, strings
    /// unquoted, `null` as the empty string.
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{f:.0}")
                } else {
                    f.to_string()
                }
            }
            Value::Str(s) => s.to_string(),
            Value::List(_) | Value::Map(_) => {
                serde_json::to_string(&self.to_json()).unwrap_or_default()
            }
        }
    }

    /// Look up a dotted path (`"quote.price"`, `"a.b.2.c"`) against this
    /// value. List indices are decimal segments. Missing segments at any
    /// point return `None` — callers treat that as falsy, never as an error.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split(PATH_SEP).filter(|s| !s.is_empty()) {
            current = match current {
                Value::Map(m) => m.get(segment)?,
                Value::List(l) => l.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Set a dotted path, creating intermediate maps as needed. Existing
    /// non-map values along the path are overwritten with a fresh map.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split(PATH_SEP).filter(|s| !s.is_empty()).collect();
        Self::set_path_segments(self, &segments, value);
    }

    fn set_path_segments(current: &mut Value, segments: &[&str], value: Value) {
        let Some((head, rest)) = segments.split_first() else {
            *current = value;
            return;
        };
        if !matches!(current, Value::Map(_)) {
            *current = Value::map();
        }
        let Value::Map(map) = current else {
            unreachable!("just normalized to a map");
        };
        if rest.is_empty() {
            map.insert((*head).to_string(), value);
        } else {
            let child = map.entry((*head).to_string()).or_insert_with(Value::map);
            Self::set_path_segments(child, rest, value);
        }
    }

    /// Convert from a `serde_json::Value`, recursively.
    #[must_use]
    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => number_to_value(n),
            serde_json::Value::String(s) => Value::str(s.clone()),
            serde_json::Value::Array(arr) => Value::List(arr.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(obj) => Value::Map(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert to a `serde_json::Value`, recursively.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::List(l) => serde_json::Value::Array(l.iter().map(Value::to_json).collect()),
            Value::Map(m) => {
                serde_json::Value::Object(m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
        }
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else if let Some(f) = n.as_f64() {
        Value::Float(f)
    } else {
        Value::Null
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from_json(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from_json(&v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn get_path_traverses_nested_maps_and_lists() {
        let v = Value::from_json(&serde_json::json!({
            "quote": { "price": 100, "routes": ["a", "b"] }
        }));
        assert_eq!(v.get_path("quote.price"), Some(&Value::Int(100)));
        assert_eq!(v.get_path("quote.routes.1"), Some(&Value::str("b")));
        assert_eq!(v.get_path("quote.missing"), None);
        assert_eq!(v.get_path("nope.nope"), None);
    }

    #[test]
    fn set_path_creates_intermediate_maps() {
        let mut v = Value::map();
        v.set_path("calc.result", Value::Int(200));
        assert_eq!(v.get_path("calc.result"), Some(&Value::Int(200)));
    }

    #[rstest]
    #[case(Value::Null, false)]
    #[case(Value::Bool(false), false)]
    #[case(Value::Bool(true), true)]
    #[case(Value::Int(0), false)]
    #[case(Value::Int(1), true)]
    #[case(Value::Float(0.0), false)]
    #[case(Value::str(""), false)]
    #[case(Value::str("x"), true)]
    #[case(Value::List(vec![]), false)]
    #[case(Value::List(vec![Value::Int(0)]), true)]
    #[case(Value::map(), false)]
    fn truthiness_matches_dsl_rules(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(value.is_truthy(), expected);
    }

    #[test]
    fn stringify_renders_plain_decimals() {
        assert_eq!(Value::Int(100).stringify(), "100");
        assert_eq!(Value::Float(2.5).stringify(), "2.5");
        assert_eq!(Value::Float(2.0).stringify(), "2");
        assert_eq!(Value::Null.stringify(), "");
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let original = serde_json::json!({"a": [1, 2.5, "s", null, true]});
        let v = Value::from_json(&original);
        assert_eq!(v.to_json(), original);
    }
}
