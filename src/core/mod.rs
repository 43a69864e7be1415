//! Core module - storage, identity, and workspace plumbing

pub mod config;
pub mod entity;
pub mod identity;
pub mod index;
pub mod repository;
pub mod shortid;
pub mod store;
pub mod workspace;

pub use config::Config;
pub use entity::Entity;
pub use identity::{EntityId, EntityKind, IdParseError};
pub use index::{ProjectTagIndex, ResyncReport};
pub use repository::{Repository, RepositoryError};
pub use shortid::{parse_id_range, NumberMap, RangeParseError};
pub use store::{Collection, NumberData, RegistryData, Store, StoreError, YamlStore};
pub use workspace::Workspace;
