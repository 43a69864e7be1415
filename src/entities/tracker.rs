//! Tracker entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};

/// How often a tracker expects data points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    IntraDay,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Daily
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::IntraDay => write!(f, "intra_day"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Quarterly => write!(f, "quarterly"),
        }
    }
}

/// What kind of value a tracker's entries carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Did it or didn't
    Checkin,
    /// A number (glasses of water, kilometers run)
    Quantity,
    /// One of a fixed set of choices
    MultiSelect,
    /// A small 0-5 style rating
    Pips,
}

impl Default for ValueKind {
    fn default() -> Self {
        ValueKind::Checkin
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Checkin => write!(f, "checkin"),
            ValueKind::Quantity => write!(f, "quantity"),
            ValueKind::MultiSelect => write!(f, "multi_select"),
            ValueKind::Pips => write!(f, "pips"),
        }
    }
}

/// A recurring thing being measured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracker {
    /// Unique identifier
    pub id: EntityId,

    /// What is being tracked
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Expected cadence of entries
    #[serde(default)]
    pub frequency: Frequency,

    /// Shape of entry values
    #[serde(default)]
    pub value_kind: ValueKind,

    /// Allowed values for multi-select trackers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

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

impl Entity for Tracker {
    const KIND: EntityKind = EntityKind::Tracker;

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

impl Tracker {
    pub fn new(name: impl Into<String>, frequency: Frequency, value_kind: ValueKind) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityKind::Tracker),
            name: name.into(),
            description: None,
            frequency,
            value_kind,
            choices: Vec::new(),
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
    fn test_tracker_roundtrip() {
        let mut tracker = Tracker::new("water", Frequency::Daily, ValueKind::Quantity);
        tracker.choices = Vec::new();

        let yaml = serde_yml::to_string(&tracker).unwrap();
        let parsed: Tracker = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(tracker.id, parsed.id);
        assert_eq!(parsed.frequency, Frequency::Daily);
        assert_eq!(parsed.value_kind, ValueKind::Quantity);
    }

    #[test]
    fn test_frequency_serializes_snake_case() {
        let tracker = Tracker::new("mood", Frequency::IntraDay, ValueKind::Pips);
        let yaml = serde_yml::to_string(&tracker).unwrap();
        assert!(yaml.contains("frequency: intra_day"));
        assert!(yaml.contains("value_kind: pips"));
    }
}
