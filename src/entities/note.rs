//! Note entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};

/// Free-form text, optionally attached to another entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: EntityId,

    /// The note body
    pub content: String,

    /// Entity this note is attached to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<EntityId>,

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

impl Entity for Note {
    const KIND: EntityKind = EntityKind::Note;

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

impl Note {
    pub fn new(content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityKind::Note),
            content: content.into(),
            attached_to: None,
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
    fn test_attached_note_roundtrip() {
        let mut note = Note::new("remember the charger");
        note.attached_to = Some(EntityId::new(EntityKind::Span));

        let yaml = serde_yml::to_string(&note).unwrap();
        let parsed: Note = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(note.attached_to, parsed.attached_to);
    }
}
