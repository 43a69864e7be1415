//! Log entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};

/// A short journal line. Its moment is the creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    /// Unique identifier
    pub id: EntityId,

    /// The journal line
    pub message: String,

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

impl Entity for Log {
    const KIND: EntityKind = EntityKind::Log;

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

impl Log {
    pub fn new(message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityKind::Log),
            message: message.into(),
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
    fn test_log_roundtrip() {
        let log = Log::new("shipped the release");
        let yaml = serde_yml::to_string(&log).unwrap();
        let parsed: Log = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(log.id, parsed.id);
        assert_eq!(log.message, parsed.message);
    }
}
