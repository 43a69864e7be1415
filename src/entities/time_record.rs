//! Time record entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};

/// A block of time spent. An open record (no `ended`) is a running timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRecord {
    /// Unique identifier
    pub id: EntityId,

    /// What the time went to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the block started
    pub started: DateTime<Utc>,

    /// When the block ended (unset while running)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended: Option<DateTime<Utc>>,

    /// Tasks this time was spent on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<EntityId>,

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

impl Entity for TimeRecord {
    const KIND: EntityKind = EntityKind::TimeRecord;

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

impl TimeRecord {
    pub fn new(started: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityKind::TimeRecord),
            description: None,
            started,
            ended: None,
            tasks: Vec::new(),
            projects: Vec::new(),
            tags: Vec::new(),
            color: None,
            created: now,
            modified: now,
            deleted: None,
        }
    }

    /// Whether the record is still running
    pub fn is_open(&self) -> bool {
        self.ended.is_none()
    }

    /// Close the record as of the given instant
    pub fn stop(&mut self, ended: DateTime<Utc>) {
        self.ended = Some(ended);
    }
}
