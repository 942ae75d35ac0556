//! Permissive readers for raw answer values.
//!
//! Respondent data is free-form. Each reader here tries to interpret a raw
//! JSON value as the shape a question type expects and returns `None` when
//! it can't, so the caller can exclude the value instead of failing.

use serde_json::Value;
use std::collections::HashSet;

/// Classification of a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

/// Returns the answer if it counts as answered.
///
/// Missing, `null`, `""` and `[]` are "no answer".
pub fn non_empty(answer: Option<&Value>) -> Option<&Value> {
    match answer? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        value => Some(value),
    }
}

/// Single selected option of a multiple-choice answer.
pub fn choice(answer: &Value) -> Option<&str> {
    answer.as_str()
}

/// Distinct selected options of a checkbox answer, in answer order.
///
/// A lone string counts as a single selection; non-string entries are dropped.
pub fn selections(answer: &Value) -> Vec<&str> {
    match answer {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => {
            let mut seen = HashSet::new();
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| seen.insert(*s))
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Integer value of a rating answer.
///
/// Floats are truncated; floats outside the `i64` range are rejected.
pub fn rating(answer: &Value) -> Option<i64> {
    match answer {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .map(f64::trunc)
                .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

/// Yes/no classification, case-insensitive after trimming.
pub fn yes_no(answer: &Value) -> Option<YesNo> {
    let text = answer.as_str()?.trim();
    if text.eq_ignore_ascii_case("yes") {
        Some(YesNo::Yes)
    } else if text.eq_ignore_ascii_case("no") {
        Some(YesNo::No)
    } else {
        None
    }
}

/// Display text of a free-text answer.
///
/// Every non-empty value is kept: numbers and bools use their display form,
/// lists are joined and objects become compact JSON. A text question has no
/// wrong type to exclude.
pub fn text(answer: &Value) -> String {
    match answer {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Parse the leading `[+-]digits` prefix of a string, ignoring whatever follows.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let digits_start = usize::from(raw.starts_with(['+', '-']));
    let digits_len = raw[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits_len == 0 {
        return None;
    }

    raw[..digits_start + digits_len].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_empty() {
        assert!(non_empty(None).is_none());
        assert!(non_empty(Some(&json!(null))).is_none());
        assert!(non_empty(Some(&json!(""))).is_none());
        assert!(non_empty(Some(&json!([]))).is_none());
        assert!(non_empty(Some(&json!(" "))).is_some());
        assert!(non_empty(Some(&json!(0))).is_some());
        assert!(non_empty(Some(&json!(["A"]))).is_some());
    }

    #[test]
    fn test_rating() {
        assert_eq!(rating(&json!(4)), Some(4));
        assert_eq!(rating(&json!(4.7)), Some(4));
        assert_eq!(rating(&json!("5")), Some(5));
        assert_eq!(rating(&json!(" 3 stars")), Some(3));
        assert_eq!(rating(&json!("-2")), Some(-2));
        assert_eq!(rating(&json!("great")), None);
        assert_eq!(rating(&json!("+")), None);
        assert_eq!(rating(&json!(true)), None);
        assert_eq!(rating(&json!(["5"])), None);
        assert_eq!(rating(&json!(1e300)), None);
        assert_eq!(rating(&json!(-1e300)), None);
        assert_eq!(rating(&json!("9223372036854775807")), Some(i64::MAX));
        assert_eq!(rating(&json!("99999999999999999999")), None);
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(&json!("Yes")), Some(YesNo::Yes));
        assert_eq!(yes_no(&json!("NO ")), Some(YesNo::No));
        assert_eq!(yes_no(&json!("maybe")), None);
        assert_eq!(yes_no(&json!(true)), None);
    }

    #[test]
    fn test_selections() {
        assert_eq!(selections(&json!(["A", 3, "B"])), vec!["A", "B"]);
        assert_eq!(selections(&json!("A")), vec!["A"]);
        assert_eq!(selections(&json!(["B", "A", "B", "A"])), vec!["B", "A"]);
        assert!(selections(&json!({"A": true})).is_empty());
        assert_eq!(choice(&json!(["A"])), None);
    }

    #[test]
    fn test_text() {
        assert_eq!(text(&json!("hello")), "hello");
        assert_eq!(text(&json!(42)), "42");
        assert_eq!(text(&json!(["a", "b"])), "a, b");
    }
}
