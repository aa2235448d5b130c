//! Canonical JSON serialization and digests.
//!
//! Implemented once here and reused by the plan compiler (plan hash) and
//! the policy engine (policy hash). Objects are
//! emitted with lexicographically sorted keys and no insignificant
//! whitespace; arrays preserve order; numbers use their shortest
//! round-trippable decimal form. `serde_json`'s own key ordering is never
//! relied upon — keys are collected and sorted explicitly.

use serde_json::Value as Json;
use sha2::{Digest, Sha256};

/// Serialize a JSON value to its canonical byte form.
#[must_use]
pub fn to_canonical_bytes(value: &Json) -> Vec<u8> {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out.into_bytes()
}

/// Compute the `"sha256:<hex>"` digest of a value's canonical form.
#[must_use]
pub fn digest(value: &Json) -> String {
    let bytes = to_canonical_bytes(value);
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

fn write_canonical(value: &Json, out: &mut String) {
    match value {
        Json::Null => out.push_str("null"),
        Json::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Json::Number(n) => out.push_str(&canonical_number(n)),
        Json::String(s) => write_canonical_string(s, out),
        Json::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Json::Object(map) => {
            out.push('{');
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical_string(key, out);
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
    }
}

/// The shortest round-trippable decimal form: integers print without a
/// fractional part, floats use Rust's `Display`, which already produces the
/// shortest string that parses back to the same `f64`.
fn canonical_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(f) = n.as_f64() {
        if f.fract() == 0.0 && f.is_finite() {
            format!("{f:.0}")
        } else {
            f.to_string()
        }
    } else {
        n.to_string()
    }
}

fn write_canonical_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keys_are_sorted_regardless_of_insertion_order() {
        let a = serde_json::json!({"b": 1, "a": 2});
        let b = serde_json::json!({"a": 2, "b": 1});
        assert_eq!(to_canonical_bytes(&a), to_canonical_bytes(&b));
    }

    #[test]
    fn whitespace_does_not_affect_digest() {
        let a: Json = serde_json::from_str(r#"{"a":1,"b":[1,2]}"#).unwrap();
        let b: Json = serde_json::from_str("{  \"a\" : 1,  \"b\": [1, 2]  }").unwrap();
        assert_eq!(digest(&a), digest(&b));
    }

    #[test]
    fn digest_is_prefixed_and_stable() {
        let v = serde_json::json!({"x": 1});
        let d = digest(&v);
        assert!(d.starts_with("sha256:"));
        assert_eq!(d, digest(&v));
    }

    #[test]
    fn different_values_hash_differently() {
        assert_ne!(digest(&serde_json::json!(1)), digest(&serde_json::json!(2)));
    }

    #[test]
    fn canonical_form_snapshot() {
        let v = serde_json::json!({"b": 1, "a": [3, 2, 1], "c": null, "name": "w3rt"});
        let text = String::from_utf8(to_canonical_bytes(&v)).unwrap();
        insta::assert_snapshot!(text, @r#"{"a":[3,2,1],"b":1,"c":null,"name":"w3rt"}"#);
    }

    #[test]
    fn string_escaping_round_trips() {
        let v = serde_json::json!({"s": "a\"b\\c\nd"});
        let bytes = to_canonical_bytes(&v);
        let text = String::from_utf8(bytes).unwrap();
        let reparsed: Json = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, v);
    }

    proptest::proptest! {
        #[test]
        fn array_order_is_preserved(xs in proptest::collection::vec(0i64..1000, 0..10)) {
            let v = serde_json::json!(xs);
            let bytes = to_canonical_bytes(&v);
            let text = String::from_utf8(bytes).unwrap();
            let reparsed: Json = serde_json::from_str(&text).unwrap();
            proptest::prop_assert_eq!(reparsed, v);
        }
    }
}
