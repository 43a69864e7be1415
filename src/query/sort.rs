//! Multi-key sorting over serialized entities
//!
//! Sort keys name properties, optionally prefixed with `desc`. Keys are
//! applied stably from least to most significant, so `due, desc created`
//! orders by due date and breaks ties by newest first. Entities missing a
//! property sort after everything that has it, in both directions.

use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub property: String,
    pub descending: bool,
}

impl SortKey {
    /// Parse a single key: `due` or `desc due`
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((prefix, rest)) if prefix.eq_ignore_ascii_case("desc") => Self {
                property: rest.trim().to_string(),
                descending: true,
            },
            _ => Self {
                property: trimmed.to_string(),
                descending: false,
            },
        }
    }

    /// Parse a comma-separated key list, most significant first
    pub fn parse_list(input: &str) -> Vec<Self> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }
}

/// Stable multi-key sort of (entity, serialized) pairs
pub fn sort_by_keys<T>(items: &mut [(T, Value)], keys: &[SortKey]) {
    // least significant key first; stability composes the rest
    for key in keys.iter().rev() {
        items.sort_by(|(_, a), (_, b)| compare_property(a, b, key));
    }
}

fn compare_property(a: &Value, b: &Value, key: &SortKey) -> Ordering {
    let left = present(a.get(&key.property));
    let right = present(b.get(&key.property));
    match (left, right) {
        (None, None) => Ordering::Equal,
        // missing sorts last regardless of direction
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => {
            let ordering = compare_values(l, r);
            if key.descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(v),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(l), Value::Number(r)) => l
            .as_f64()
            .partial_cmp(&r.as_f64())
            .unwrap_or(Ordering::Equal),
        // RFC 3339 timestamps compare correctly as strings
        (Value::String(l), Value::String(r)) => l.cmp(r),
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(values: Vec<Value>) -> Vec<(usize, Value)> {
        values.into_iter().enumerate().collect()
    }

    fn order(items: &[(usize, Value)]) -> Vec<usize> {
        items.iter().map(|(i, _)| *i).collect()
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(
            SortKey::parse("due"),
            SortKey {
                property: "due".to_string(),
                descending: false
            }
        );
        assert_eq!(
            SortKey::parse("desc due"),
            SortKey {
                property: "due".to_string(),
                descending: true
            }
        );
    }

    #[test]
    fn test_parse_list() {
        let keys = SortKey::parse_list("due, desc created");
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].property, "due");
        assert!(!keys[0].descending);
        assert_eq!(keys[1].property, "created");
        assert!(keys[1].descending);
    }

    #[test]
    fn test_ascending_sort() {
        let mut rows = items(vec![
            json!({ "due": "2026-03-12" }),
            json!({ "due": "2026-03-10" }),
            json!({ "due": "2026-03-11" }),
        ]);
        sort_by_keys(&mut rows, &SortKey::parse_list("due"));
        assert_eq!(order(&rows), vec![1, 2, 0]);
    }

    #[test]
    fn test_missing_sorts_last_in_both_directions() {
        let mut rows = items(vec![
            json!({}),
            json!({ "due": "2026-03-10" }),
            json!({ "due": null }),
            json!({ "due": "2026-03-12" }),
        ]);
        sort_by_keys(&mut rows, &SortKey::parse_list("due"));
        assert_eq!(order(&rows), vec![1, 3, 0, 2]);

        let mut rows = items(vec![
            json!({}),
            json!({ "due": "2026-03-10" }),
            json!({ "due": "2026-03-12" }),
        ]);
        sort_by_keys(&mut rows, &SortKey::parse_list("desc due"));
        assert_eq!(order(&rows), vec![2, 1, 0]);
    }

    #[test]
    fn test_multi_key_breaks_ties() {
        let mut rows = items(vec![
            json!({ "due": "2026-03-10", "description": "b" }),
            json!({ "due": "2026-03-10", "description": "a" }),
            json!({ "due": "2026-03-09", "description": "z" }),
        ]);
        sort_by_keys(&mut rows, &SortKey::parse_list("due, description"));
        assert_eq!(order(&rows), vec![2, 1, 0]);
    }

    #[test]
    fn test_numeric_comparison() {
        let mut rows = items(vec![
            json!({ "estimate_minutes": 90 }),
            json!({ "estimate_minutes": 15 }),
            json!({ "estimate_minutes": 30 }),
        ]);
        sort_by_keys(&mut rows, &SortKey::parse_list("estimate_minutes"));
        assert_eq!(order(&rows), vec![1, 2, 0]);
    }

    #[test]
    fn test_incomparable_values_keep_input_order() {
        let mut rows = items(vec![
            json!({ "due": 5 }),
            json!({ "due": "2026-03-10" }),
        ]);
        sort_by_keys(&mut rows, &SortKey::parse_list("due"));
        assert_eq!(order(&rows), vec![0, 1]);
    }
}
