//! Tracker entry entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};

/// The recorded value of one data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for EntryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryValue::Number(n) => write!(f, "{n}"),
            EntryValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One recorded data point for a tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerEntry {
    /// Unique identifier
    pub id: EntityId,

    /// The tracker this point belongs to
    pub tracker: EntityId,

    /// The moment the point describes
    pub at: DateTime<Utc>,

    /// The recorded value
    pub value: EntryValue,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Optional display color token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DateTime<Utc>>,
}

impl Entity for TrackerEntry {
    const KIND: EntityKind = EntityKind::TrackerEntry;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    fn touch(&mut self) {
        self.modified = Utc::now();
    }

    fn deleted(&self) -> Option<DateTime<Utc>> {
        self.deleted
    }

    fn set_deleted(&mut self, when: Option<DateTime<Utc>>) {
        self.deleted = when;
    }

    fn projects(&self) -> &[String] {
        &self.projects
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl TrackerEntry {
    pub fn new(tracker: EntityId, at: DateTime<Utc>, value: EntryValue) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityKind::TrackerEntry),
            tracker,
            at,
            value,
            projects: Vec::new(),
            tags: Vec::new(),
            color: None,
            created: now,
            modified: now,
            deleted: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_value_roundtrip() {
        let tracker = EntityId::new(EntityKind::Tracker);
        let entry = TrackerEntry::new(tracker, Utc::now(), EntryValue::Number(3.0));

        let yaml = serde_yml::to_string(&entry).unwrap();
        let parsed: TrackerEntry = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.value, EntryValue::Number(3.0));
    }

    #[test]
    fn test_text_value_roundtrip() {
        let tracker = EntityId::new(EntityKind::Tracker);
        let entry = TrackerEntry::new(tracker, Utc::now(), EntryValue::Text("good".to_string()));

        let yaml = serde_yml::to_string(&entry).unwrap();
        let parsed: TrackerEntry = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.value, EntryValue::Text("good".to_string()));
    }
}
