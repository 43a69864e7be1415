//! Span entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};

/// A multi-day span: a trip, a sprint, an illness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    /// Unique identifier
    pub id: EntityId,

    /// What the span covers
    pub description: String,

    /// When the span begins
    pub start: DateTime<Utc>,

    /// When the span ends (unset while ongoing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,

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

impl Entity for Span {
    const KIND: EntityKind = EntityKind::Span;

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

impl Span {
    pub fn new(description: impl Into<String>, start: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityKind::Span),
            description: description.into(),
            start,
            end: None,
            projects: Vec::new(),
            tags: Vec::new(),
            color: None,
            created: now,
            modified: now,
            deleted: None,
        }
    }
}
