//! Recursive filter DSL
//!
//! Filters are plain-data documents (the `filter_type` tag picks the
//! variant) evaluated against an entity's serialized field map. Evaluation
//! is total and fails closed: a predicate that cannot be answered - missing
//! property, wrong type, bad regex, bad date - is simply false, never an
//! error. `validate` reports the statically checkable problems up front so
//! the CLI can reject a bad document instead of silently matching nothing.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::query::date::{parse_date_input_at, DateParseError};

const STR_INSTRUCTIONS: &[&str] = &["equals", "equals_no_case", "contains", "contains_no_case"];
const DATE_INSTRUCTIONS: &[&str] = &["on", "before", "after"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "filter_type", rename_all = "snake_case")]
pub enum Filter {
    /// All predicates match; vacuously true when empty
    And {
        #[serde(default)]
        predicates: Vec<Filter>,
    },

    /// Any predicate matches; vacuously false when empty
    Or {
        #[serde(default)]
        predicates: Vec<Filter>,
    },

    Not { predicate: Box<Filter> },

    /// String property test; `filter` packs "instruction value"
    Str { property: String, filter: String },

    /// Unanchored regex search over a string property
    StrRegex { property: String, pattern: String },

    /// Date property test; `filter` packs "instruction date-input"
    Date { property: String, filter: String },

    /// Property is null or absent
    Empty { property: String },

    /// Any tag equals the value
    Tag { filter: String },

    /// Any tag matches the pattern
    TagRegex { pattern: String },

    /// Any project equals the value or sits beneath it in the hierarchy
    Project { filter: String },

    /// Any project matches the pattern
    ProjectRegex { pattern: String },
}

#[derive(Debug, Error)]
pub enum FilterValidationError {
    #[error("unknown string instruction '{0}' (expected one of: equals, equals_no_case, contains, contains_no_case)")]
    UnknownStringInstruction(String),

    #[error("unknown date instruction '{0}' (expected one of: on, before, after)")]
    UnknownDateInstruction(String),

    #[error("invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error(transparent)]
    Date(#[from] DateParseError),
}

#[derive(Debug, Error)]
pub enum FilterParseError {
    #[error("malformed filter document: {0}")]
    Malformed(String),

    #[error(transparent)]
    Invalid(#[from] FilterValidationError),
}

impl Filter {
    /// Parse and validate a filter document
    pub fn from_yaml(input: &str) -> Result<Self, FilterParseError> {
        let filter: Filter =
            serde_yml::from_str(input).map_err(|e| FilterParseError::Malformed(e.to_string()))?;
        filter.validate()?;
        Ok(filter)
    }

    /// Evaluate against the current moment
    pub fn matches(&self, entity: &Value) -> bool {
        self.matches_at(entity, Utc::now())
    }

    /// Evaluate against an explicit "now", so one listing resolves every
    /// relative date input to the same moment
    pub fn matches_at(&self, entity: &Value, now: DateTime<Utc>) -> bool {
        match self {
            Filter::And { predicates } => predicates.iter().all(|p| p.matches_at(entity, now)),
            Filter::Or { predicates } => predicates.iter().any(|p| p.matches_at(entity, now)),
            Filter::Not { predicate } => !predicate.matches_at(entity, now),
            Filter::Str { property, filter } => eval_str(entity, property, filter),
            Filter::StrRegex { property, pattern } => {
                string_property(entity, property).is_some_and(|s| regex_matches(pattern, s))
            }
            Filter::Date { property, filter } => eval_date(entity, property, filter, now),
            Filter::Empty { property } => {
                matches!(entity.get(property), None | Some(Value::Null))
            }
            Filter::Tag { filter } => {
                string_items(entity, "tags").any(|tag| tag == filter)
            }
            Filter::TagRegex { pattern } => {
                string_items(entity, "tags").any(|tag| regex_matches(pattern, tag))
            }
            Filter::Project { filter } => {
                string_items(entity, "projects").any(|p| p == filter)
            }
            Filter::ProjectRegex { pattern } => {
                string_items(entity, "projects").any(|p| regex_matches(pattern, p))
            }
        }
    }

    /// Whether any predicate in the tree inspects the given property.
    /// Listings use this to decide if a filter already handles `deleted`.
    pub fn references(&self, property: &str) -> bool {
        match self {
            Filter::And { predicates } | Filter::Or { predicates } => {
                predicates.iter().any(|p| p.references(property))
            }
            Filter::Not { predicate } => predicate.references(property),
            Filter::Str { property: p, .. }
            | Filter::StrRegex { property: p, .. }
            | Filter::Date { property: p, .. }
            | Filter::Empty { property: p } => p == property,
            _ => false,
        }
    }

    /// Check what is statically checkable: instructions, regexes, and the
    /// date inputs embedded in date predicates. Property names are not
    /// schema-checked; an unknown property just never matches.
    pub fn validate(&self) -> Result<(), FilterValidationError> {
        match self {
            Filter::And { predicates } | Filter::Or { predicates } => {
                predicates.iter().try_for_each(|p| p.validate())
            }
            Filter::Not { predicate } => predicate.validate(),
            Filter::Str { filter, .. } => {
                let (instruction, _) = split_instruction(filter);
                if STR_INSTRUCTIONS.contains(&instruction) {
                    Ok(())
                } else {
                    Err(FilterValidationError::UnknownStringInstruction(
                        instruction.to_string(),
                    ))
                }
            }
            Filter::Date { filter, .. } => {
                let (instruction, value) = split_instruction(filter);
                if !DATE_INSTRUCTIONS.contains(&instruction) {
                    return Err(FilterValidationError::UnknownDateInstruction(
                        instruction.to_string(),
                    ));
                }
                parse_date_input_at(value, Local::now())?;
                Ok(())
            }
            Filter::StrRegex { pattern, .. }
            | Filter::TagRegex { pattern }
            | Filter::ProjectRegex { pattern } => regex::Regex::new(pattern)
                .map(|_| ())
                .map_err(|e| FilterValidationError::InvalidRegex {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                }),
            Filter::Empty { .. } | Filter::Tag { .. } | Filter::Project { .. } => Ok(()),
        }
    }
}

/// Split "instruction value" at the first run of whitespace
fn split_instruction(filter: &str) -> (&str, &str) {
    let trimmed = filter.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((instruction, value)) => (instruction, value.trim_start()),
        None => (trimmed, ""),
    }
}

fn string_property<'a>(entity: &'a Value, property: &str) -> Option<&'a str> {
    entity.get(property).and_then(Value::as_str)
}

fn string_items<'a>(entity: &'a Value, property: &str) -> impl Iterator<Item = &'a str> {
    entity
        .get(property)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .unwrap_or_default()
        .filter_map(Value::as_str)
}

fn regex_matches(pattern: &str, haystack: &str) -> bool {
    regex::Regex::new(pattern)
        .map(|re| re.is_match(haystack))
        .unwrap_or(false)
}

fn eval_str(entity: &Value, property: &str, filter: &str) -> bool {
    let Some(actual) = string_property(entity, property) else {
        return false;
    };
    let (instruction, value) = split_instruction(filter);
    match instruction {
        "equals" => actual == value,
        "equals_no_case" => actual.eq_ignore_ascii_case(value),
        "contains" => actual.contains(value),
        "contains_no_case" => actual.to_lowercase().contains(&value.to_lowercase()),
        _ => false,
    }
}

fn eval_date(entity: &Value, property: &str, filter: &str, now: DateTime<Utc>) -> bool {
    let Some(raw) = string_property(entity, property) else {
        return false;
    };
    let Ok(actual) = DateTime::parse_from_rfc3339(raw) else {
        return false;
    };
    let actual = actual.with_timezone(&Utc);

    let (instruction, value) = split_instruction(filter);
    let Ok(operand) = parse_date_input_at(value, now.with_timezone(&Local)) else {
        return false;
    };

    match instruction {
        // calendar-day equality in the local timezone
        "on" => {
            actual.with_timezone(&Local).date_naive()
                == operand.with_timezone(&Local).date_naive()
        }
        "before" => actual < operand,
        "after" => actual > operand,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn task() -> Value {
        json!({
            "id": "TASK-01HQ3K4N5M6P7R8S9T0AVWXYZA",
            "description": "File the quarterly report",
            "due": "2026-03-11T09:00:00Z",
            "projects": ["work.reports"],
            "tags": ["quarterly", "finance"],
        })
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_wire_shape_parses() {
        let filter = Filter::from_yaml(
            "filter_type: and\n\
             predicates:\n\
             - filter_type: str\n\
             \x20 property: description\n\
             \x20 filter: contains report\n\
             - filter_type: not\n\
             \x20 predicate:\n\
             \x20   filter_type: empty\n\
             \x20   property: due\n",
        )
        .unwrap();
        assert!(filter.matches_at(&task(), now()));
    }

    #[test]
    fn test_empty_and_matches_everything() {
        let filter = Filter::And { predicates: vec![] };
        assert!(filter.matches_at(&task(), now()));
    }

    #[test]
    fn test_empty_or_matches_nothing() {
        let filter = Filter::Or { predicates: vec![] };
        assert!(!filter.matches_at(&task(), now()));
    }

    #[test]
    fn test_double_negation() {
        let inner = Filter::Str {
            property: "description".to_string(),
            filter: "contains report".to_string(),
        };
        let filter = Filter::Not {
            predicate: Box::new(Filter::Not {
                predicate: Box::new(inner),
            }),
        };
        assert!(filter.matches_at(&task(), now()));
    }

    #[test]
    fn test_string_instructions() {
        let matches = |filter: &str| {
            Filter::Str {
                property: "description".to_string(),
                filter: filter.to_string(),
            }
            .matches_at(&task(), now())
        };
        assert!(matches("equals File the quarterly report"));
        assert!(!matches("equals file the quarterly report"));
        assert!(matches("equals_no_case FILE THE QUARTERLY REPORT"));
        assert!(matches("contains quarterly"));
        assert!(!matches("contains QUARTERLY"));
        assert!(matches("contains_no_case QUARTERLY"));
    }

    #[test]
    fn test_str_fails_closed() {
        // missing property
        assert!(!Filter::Str {
            property: "nope".to_string(),
            filter: "contains x".to_string(),
        }
        .matches_at(&task(), now()));
        // non-string property
        assert!(!Filter::Str {
            property: "tags".to_string(),
            filter: "contains quarterly".to_string(),
        }
        .matches_at(&task(), now()));
        // unknown instruction
        assert!(!Filter::Str {
            property: "description".to_string(),
            filter: "startswith File".to_string(),
        }
        .matches_at(&task(), now()));
    }

    #[test]
    fn test_str_regex_is_unanchored() {
        let filter = Filter::StrRegex {
            property: "description".to_string(),
            pattern: r"quar\w+ report".to_string(),
        };
        assert!(filter.matches_at(&task(), now()));
    }

    #[test]
    fn test_bad_regex_fails_closed() {
        let filter = Filter::StrRegex {
            property: "description".to_string(),
            pattern: "(".to_string(),
        };
        assert!(!filter.matches_at(&task(), now()));
        assert!(matches!(
            filter.validate().unwrap_err(),
            FilterValidationError::InvalidRegex { .. }
        ));
    }

    #[test]
    fn test_date_on_is_calendar_day() {
        let filter = Filter::Date {
            property: "due".to_string(),
            filter: "on 2026-03-11".to_string(),
        };
        // task is due 2026-03-11 09:00 UTC; calendar-day comparison happens
        // in the local timezone, so pin the operand to the same day
        let entity = json!({
            "due": Local
                .with_ymd_and_hms(2026, 3, 11, 9, 0, 0)
                .unwrap()
                .to_rfc3339(),
        });
        assert!(filter.matches_at(&entity, now()));
    }

    #[test]
    fn test_date_before_and_after_are_instants() {
        let entity = json!({
            "due": Local
                .with_ymd_and_hms(2026, 3, 11, 9, 0, 0)
                .unwrap()
                .to_rfc3339(),
        });
        let before = Filter::Date {
            property: "due".to_string(),
            filter: "before 2026-03-12".to_string(),
        };
        let after = Filter::Date {
            property: "due".to_string(),
            filter: "after 2026-03-12".to_string(),
        };
        assert!(before.matches_at(&entity, now()));
        assert!(!after.matches_at(&entity, now()));
    }

    #[test]
    fn test_date_relative_input_uses_injected_now() {
        let filter = Filter::Date {
            property: "due".to_string(),
            filter: "on tomorrow".to_string(),
        };
        let entity = json!({
            "due": Local
                .with_ymd_and_hms(2026, 3, 11, 9, 0, 0)
                .unwrap()
                .to_rfc3339(),
        });
        let fixed = Local
            .with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert!(filter.matches_at(&entity, fixed));
    }

    #[test]
    fn test_date_fails_closed_on_unparseable_property() {
        let filter = Filter::Date {
            property: "due".to_string(),
            filter: "before today".to_string(),
        };
        assert!(!filter.matches_at(&json!({ "due": "not a date" }), now()));
        assert!(!filter.matches_at(&json!({}), now()));
    }

    #[test]
    fn test_empty_matches_null_and_absent() {
        let filter = Filter::Empty {
            property: "completed".to_string(),
        };
        assert!(filter.matches_at(&json!({}), now()));
        assert!(filter.matches_at(&json!({ "completed": null }), now()));
        assert!(!filter.matches_at(&json!({ "completed": "2026-01-01T00:00:00Z" }), now()));
    }

    #[test]
    fn test_tag_is_exact() {
        let hit = Filter::Tag {
            filter: "finance".to_string(),
        };
        let miss = Filter::Tag {
            filter: "fin".to_string(),
        };
        assert!(hit.matches_at(&task(), now()));
        assert!(!miss.matches_at(&task(), now()));
    }

    #[test]
    fn test_project_is_exact() {
        let filter = Filter::Project {
            filter: "work".to_string(),
        };
        assert!(filter.matches_at(&json!({ "projects": ["work"] }), now()));
        // descendants take a project_regex like "^work\\."
        assert!(!filter.matches_at(&task(), now()));
        assert!(!filter.matches_at(&json!({ "projects": ["workshop"] }), now()));
    }

    #[test]
    fn test_tag_regex() {
        let filter = Filter::TagRegex {
            pattern: "^quart".to_string(),
        };
        assert!(filter.matches_at(&task(), now()));
    }

    #[test]
    fn test_references_sees_through_combinators() {
        let filter = Filter::And {
            predicates: vec![Filter::Not {
                predicate: Box::new(Filter::Empty {
                    property: "deleted".to_string(),
                }),
            }],
        };
        assert!(filter.references("deleted"));
        assert!(!filter.references("due"));

        let tag = Filter::Tag {
            filter: "deleted".to_string(),
        };
        assert!(!tag.references("deleted"));
    }

    #[test]
    fn test_validate_rejects_unknown_instructions() {
        let filter = Filter::Str {
            property: "description".to_string(),
            filter: "startswith x".to_string(),
        };
        assert!(matches!(
            filter.validate().unwrap_err(),
            FilterValidationError::UnknownStringInstruction(_)
        ));

        let filter = Filter::Date {
            property: "due".to_string(),
            filter: "until tomorrow".to_string(),
        };
        assert!(matches!(
            filter.validate().unwrap_err(),
            FilterValidationError::UnknownDateInstruction(_)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_date_value() {
        let filter = Filter::Date {
            property: "due".to_string(),
            filter: "before someday".to_string(),
        };
        assert!(matches!(
            filter.validate().unwrap_err(),
            FilterValidationError::Date(_)
        ));
    }

    #[test]
    fn test_from_yaml_rejects_malformed_documents() {
        assert!(matches!(
            Filter::from_yaml("filter_type: nope").unwrap_err(),
            FilterParseError::Malformed(_)
        ));
        assert!(matches!(
            Filter::from_yaml("filter_type: str\nproperty: a\nfilter: startswith x").unwrap_err(),
            FilterParseError::Invalid(_)
        ));
    }
}
