//! Entity identity system using kind-prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// The eight first-class entity kinds managed by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Something to do
    Task,
    /// A block of time spent, optionally linked to tasks
    TimeRecord,
    /// A calendar event
    Event,
    /// A multi-day span (trip, sprint, illness)
    Span,
    /// Free-form text attached to a point in time or another entity
    Note,
    /// A short journal line
    Log,
    /// A recurring thing being measured
    Tracker,
    /// One recorded data point for a tracker
    TrackerEntry,
}

impl EntityKind {
    /// Get the ID prefix for this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Task => "TASK",
            EntityKind::TimeRecord => "TIME",
            EntityKind::Event => "EVNT",
            EntityKind::Span => "SPAN",
            EntityKind::Note => "NOTE",
            EntityKind::Log => "LOG",
            EntityKind::Tracker => "TRKR",
            EntityKind::TrackerEntry => "ENTR",
        }
    }

    /// Get the snake_case name used in documents and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Task => "task",
            EntityKind::TimeRecord => "time_record",
            EntityKind::Event => "event",
            EntityKind::Span => "span",
            EntityKind::Note => "note",
            EntityKind::Log => "log",
            EntityKind::Tracker => "tracker",
            EntityKind::TrackerEntry => "tracker_entry",
        }
    }

    /// File stem of the backing collection for this kind
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityKind::Task => "tasks",
            EntityKind::TimeRecord => "time_records",
            EntityKind::Event => "events",
            EntityKind::Span => "spans",
            EntityKind::Note => "notes",
            EntityKind::Log => "logs",
            EntityKind::Tracker => "trackers",
            EntityKind::TrackerEntry => "tracker_entries",
        }
    }

    /// All kinds, in catalog order
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Task,
            EntityKind::TimeRecord,
            EntityKind::Event,
            EntityKind::Span,
            EntityKind::Note,
            EntityKind::Log,
            EntityKind::Tracker,
            EntityKind::TrackerEntry,
        ]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TASK" => Ok(EntityKind::Task),
            "TIME" | "TIME_RECORD" => Ok(EntityKind::TimeRecord),
            "EVNT" | "EVENT" => Ok(EntityKind::Event),
            "SPAN" => Ok(EntityKind::Span),
            "NOTE" => Ok(EntityKind::Note),
            "LOG" => Ok(EntityKind::Log),
            "TRKR" | "TRACKER" => Ok(EntityKind::Tracker),
            "ENTR" | "TRACKER_ENTRY" => Ok(EntityKind::TrackerEntry),
            _ => Err(IdParseError::InvalidKind(s.to_string())),
        }
    }
}

/// A persistent entity identifier combining a kind prefix and ULID.
///
/// Immutable once assigned and never reused: ULIDs are generated fresh for
/// every entity, so a hard-deleted ID can never come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    kind: EntityKind,
    ulid: Ulid,
}

impl EntityId {
    /// Create a new EntityId for the given kind
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            ulid: Ulid::new(),
        }
    }

    /// Create an EntityId from a kind and existing ULID
    pub fn from_parts(kind: EntityKind, ulid: Ulid) -> Self {
        Self { kind, ulid }
    }

    /// Get the entity kind
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Get the ULID component
    pub fn ulid(&self) -> Ulid {
        self.ulid
    }

    /// Parse an EntityId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.ulid)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind_str, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        let kind = kind_str.parse()?;
        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { kind, ulid })
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing entity IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid entity kind: '{0}' (valid: TASK, TIME, EVNT, SPAN, NOTE, LOG, TRKR, ENTR)")]
    InvalidKind(String),

    #[error("missing '-' delimiter in entity ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id = EntityId::new(EntityKind::Task);
        assert!(id.to_string().starts_with("TASK-"));
        assert_eq!(id.to_string().len(), 31); // TASK- (5) + ULID (26)
    }

    #[test]
    fn test_entity_id_roundtrip() {
        let original = EntityId::new(EntityKind::Tracker);
        let parsed = EntityId::parse(&original.to_string()).unwrap();
        assert_eq!(original, parsed);
        assert_eq!(parsed.kind(), EntityKind::Tracker);
    }

    #[test]
    fn test_entity_id_invalid_kind() {
        let err = EntityId::parse("XXXX-01HQ3K4N5M6P7R8S9T0AVWXYZA").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidKind(_)));
    }

    #[test]
    fn test_entity_id_missing_delimiter() {
        let err = EntityId::parse("TASK01HQ3K4N5M6P7R8S9T0AVWXYZA").unwrap_err();
        assert!(matches!(err, IdParseError::MissingDelimiter(_)));
    }

    #[test]
    fn test_entity_id_invalid_ulid() {
        let err = EntityId::parse("TASK-notaulid").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidUlid(_, _)));
    }

    #[test]
    fn test_all_kinds_parse() {
        for kind in EntityKind::all() {
            let id = EntityId::new(*kind);
            let parsed = EntityId::parse(&id.to_string()).unwrap();
            assert_eq!(parsed.kind(), *kind);
        }
    }

    #[test]
    fn test_ids_order_by_creation() {
        let a = EntityId::new(EntityKind::Note);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = EntityId::new(EntityKind::Note);
        assert!(a < b);
    }
}
