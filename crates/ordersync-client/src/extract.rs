//! Total path lookup over loosely structured JSON.
//!
//! Every function here is total: any input shape yields a value, never a
//! panic or an error. A missing key, an explicit `null`, or a segment that
//! lands on a non-object all resolve to the caller's default.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Walks `path` through nested objects, returning `None` as soon as a
/// segment is missing, `null`, or applied to something that is not an object.
///
/// An empty path returns `tree` itself unless it is `null`.
#[must_use]
pub fn lookup<'a>(tree: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = tree;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    (!current.is_null()).then_some(current)
}

/// [`lookup`] with a fallback.
#[must_use]
pub fn get<'a>(tree: &'a Value, path: &[&str], default: &'a Value) -> &'a Value {
    lookup(tree, path).unwrap_or(default)
}

/// First element of the array stored at `key`, or `null` when the key is
/// absent, not an array, or empty.
#[must_use]
pub fn first<'a>(tree: &'a Value, key: &str) -> &'a Value {
    lookup(tree, &[key])
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .unwrap_or(&Value::Null)
}

/// Text rendering of a scalar. Objects, arrays and `null` have none.
///
/// Integral numbers render without a fractional part, so `123` and `123.0`
/// produce the same string.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return Some(n.to_string());
            }
            let f = n.as_f64()?;
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return Some((f as i64).to_string());
            }
            Some(n.to_string())
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text at `path`, or an empty string.
#[must_use]
pub fn text(tree: &Value, path: &[&str]) -> String {
    lookup(tree, path).and_then(scalar_text).unwrap_or_default()
}

/// Decimal at `path` from a JSON number or numeric string, or zero.
#[must_use]
pub fn decimal(tree: &Value, path: &[&str]) -> Decimal {
    lookup(tree, path).and_then(parse_decimal).unwrap_or(Decimal::ZERO)
}

/// Integer at `path` from a JSON number or numeric string, or zero.
///
/// Fractional values are rejected rather than truncated.
#[must_use]
pub fn integer(tree: &Value, path: &[&str]) -> i64 {
    lookup(tree, path).and_then(parse_integer).unwrap_or(0)
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return None,
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

#[allow(clippy::cast_possible_truncation)]
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0 && f.abs() < 9e15).then(|| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                let d = Decimal::from_str(s).ok()?;
                if d.fract().is_zero() {
                    d.to_i64()
                } else {
                    None
                }
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn get_on_null_returns_default() {
        let default = json!("fallback");
        assert_eq!(get(&Value::Null, &["a", "b"], &default), &default);
    }

    #[test]
    fn get_walks_nested_objects() {
        let tree = json!({"a": {"b": 5}});
        let default = json!(0);
        assert_eq!(get(&tree, &["a", "b"], &default), &json!(5));
    }

    #[test]
    fn get_guards_type_mismatch() {
        let tree = json!({"a": 1});
        let default = json!("d");
        assert_eq!(get(&tree, &["a", "b"], &default), &default);
    }

    #[test]
    fn explicit_null_is_treated_as_missing() {
        let tree = json!({"a": {"b": null}});
        let default = json!("d");
        assert_eq!(get(&tree, &["a", "b"], &default), &default);
        assert_eq!(get(&tree, &["a", "missing"], &default), &default);
    }

    #[test]
    fn arrays_are_not_indexed_by_key() {
        let tree = json!({"a": [{"b": 1}]});
        assert!(lookup(&tree, &["a", "b"]).is_none());
        assert!(lookup(&tree, &["a", "0"]).is_none());
    }

    #[test]
    fn empty_path_returns_the_tree() {
        let tree = json!({"a": 1});
        assert_eq!(lookup(&tree, &[]), Some(&tree));
        assert!(lookup(&Value::Null, &[]).is_none());
    }

    #[test]
    fn first_returns_head_or_null() {
        let tree = json!({"items": [{"q": 1}, {"q": 2}], "empty": [], "scalar": 3});
        assert_eq!(first(&tree, "items"), &json!({"q": 1}));
        assert!(first(&tree, "empty").is_null());
        assert!(first(&tree, "scalar").is_null());
        assert!(first(&tree, "missing").is_null());
        assert!(first(&json!([1, 2]), "items").is_null());
    }

    #[test]
    fn text_renders_scalars_and_rejects_containers() {
        let tree = json!({
            "s": "abc", "i": 123, "f": 123.0, "r": 1.5, "b": true,
            "o": {"x": 1}, "a": [1]
        });
        assert_eq!(text(&tree, &["s"]), "abc");
        assert_eq!(text(&tree, &["i"]), "123");
        assert_eq!(text(&tree, &["f"]), "123");
        assert_eq!(text(&tree, &["r"]), "1.5");
        assert_eq!(text(&tree, &["b"]), "true");
        assert_eq!(text(&tree, &["o"]), "");
        assert_eq!(text(&tree, &["a"]), "");
        assert_eq!(text(&tree, &["missing"]), "");
    }

    #[test]
    fn decimal_accepts_numbers_and_numeric_strings() {
        let tree = json!({"n": 10.5, "s": " 7.25 ", "bad": "abc", "sci": 1e3, "b": false});
        assert_eq!(decimal(&tree, &["n"]), Decimal::new(105, 1));
        assert_eq!(decimal(&tree, &["s"]), Decimal::new(725, 2));
        assert_eq!(decimal(&tree, &["sci"]), Decimal::new(1000, 0));
        assert_eq!(decimal(&tree, &["bad"]), Decimal::ZERO);
        assert_eq!(decimal(&tree, &["b"]), Decimal::ZERO);
        assert_eq!(decimal(&tree, &["missing"]), Decimal::ZERO);
    }

    #[test]
    fn integer_accepts_integral_values_only() {
        let tree = json!({"n": 3, "f": 4.0, "s": "12", "sf": "2.00", "frac": 2.5, "x": "two"});
        assert_eq!(integer(&tree, &["n"]), 3);
        assert_eq!(integer(&tree, &["f"]), 4);
        assert_eq!(integer(&tree, &["s"]), 12);
        assert_eq!(integer(&tree, &["sf"]), 2);
        assert_eq!(integer(&tree, &["frac"]), 0);
        assert_eq!(integer(&tree, &["x"]), 0);
    }

    #[test]
    fn never_panics_on_odd_shapes() {
        let shapes = [
            Value::Null,
            json!(1),
            json!("s"),
            json!([]),
            json!([null, {"a": 1}]),
            json!({"a": null}),
            json!({"a": {"b": {"c": [1, 2]}}}),
        ];
        for shape in &shapes {
            let _ = text(shape, &["a", "b", "c"]);
            let _ = decimal(shape, &["a"]);
            let _ = integer(shape, &["a", "b"]);
            let _ = first(shape, "a");
        }
    }
}
