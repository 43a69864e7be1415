//! Task entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};

/// Something to do, optionally scheduled, due, and estimated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: EntityId,

    /// What needs doing
    pub description: String,

    /// Longer free-form details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// When the task is due
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,

    /// When work on the task is planned to start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<DateTime<Utc>>,

    /// When the task was completed (unset means still open)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<DateTime<Utc>>,

    /// Estimated effort in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate_minutes: Option<u32>,

    /// Hierarchical dot-separated projects
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,

    /// Tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Optional display color token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last-modified timestamp
    pub modified: DateTime<Utc>,

    /// Soft-delete timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DateTime<Utc>>,
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

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

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityKind::Task),
            description: description.into(),
            details: None,
            due: None,
            scheduled: None,
            completed: None,
            estimate_minutes: None,
            projects: Vec::new(),
            tags: Vec::new(),
            color: None,
            created: now,
            modified: now,
            deleted: None,
        }
    }

    /// Mark the task complete as of now
    pub fn complete(&mut self) {
        self.completed = Some(Utc::now());
    }

    /// Reopen a completed task
    pub fn reopen(&mut self) {
        self.completed = None;
    }
}
