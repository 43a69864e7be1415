//! Entity trait - common interface for all entity kinds

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{EntityId, EntityKind};

/// Common trait for all daybook entities.
///
/// Kind-specific attributes stay on the concrete structs; the query layer
/// addresses them by name through the entity's serialized field map.
pub trait Entity: Clone + Serialize + DeserializeOwned + 'static {
    /// The entity kind this type represents
    const KIND: EntityKind;

    /// Get the entity's persistent ID
    fn id(&self) -> &EntityId;

    /// Get the creation timestamp
    fn created(&self) -> DateTime<Utc>;

    /// Get the last-modified timestamp
    fn modified(&self) -> DateTime<Utc>;

    /// Bump the last-modified timestamp to now
    fn touch(&mut self);

    /// Get the soft-delete timestamp, if any
    fn deleted(&self) -> Option<DateTime<Utc>>;

    /// Set or clear the soft-delete timestamp
    fn set_deleted(&mut self, when: Option<DateTime<Utc>>);

    /// The entity's projects (hierarchical dot-separated strings)
    fn projects(&self) -> &[String];

    /// The entity's tags
    fn tags(&self) -> &[String];
}
