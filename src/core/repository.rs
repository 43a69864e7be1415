//! Generic entity repository
//!
//! One repository per entity kind, all sharing a [`Store`]. The collection is
//! loaded lazily on first access and held in memory; mutations mark the
//! repository dirty, and `flush` writes the whole collection back at most
//! once per dirty cycle. Soft deletion stamps `deleted` and keeps the record;
//! hard deletion removes it for good.

use chrono::Utc;
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};
use crate::core::index::ProjectTagIndex;
use crate::core::store::{Collection, Store, StoreError};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("malformed {kind} record '{id}': {message}")]
    Malformed {
        kind: EntityKind,
        id: String,
        message: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    fn not_found(kind: EntityKind, id: &EntityId) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub struct Repository<T: Entity> {
    store: Rc<dyn Store>,
    cache: Option<BTreeMap<EntityId, T>>,
    // top-level document fields other than `entities`, written back untouched
    meta: BTreeMap<String, serde_yml::Value>,
    dirty: bool,
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Rc<dyn Store>) -> Self {
        Self {
            store,
            cache: None,
            meta: BTreeMap::new(),
            dirty: false,
        }
    }

    fn ensure_loaded(&mut self) -> Result<&mut BTreeMap<EntityId, T>, RepositoryError> {
        if self.cache.is_none() {
            let collection = self.store.load(T::KIND)?;
            let mut cache = BTreeMap::new();
            for (key, value) in collection.entities {
                let entity: T =
                    serde_yml::from_value(value).map_err(|e| RepositoryError::Malformed {
                        kind: T::KIND,
                        id: key.clone(),
                        message: e.to_string(),
                    })?;
                cache.insert(*entity.id(), entity);
            }
            self.meta = collection.meta;
            self.cache = Some(cache);
        }
        Ok(self.cache.get_or_insert_with(BTreeMap::new))
    }

    /// Fetch one entity by ID
    pub fn get(&mut self, id: &EntityId) -> Result<T, RepositoryError> {
        self.ensure_loaded()?
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(T::KIND, id))
    }

    /// All entities of this kind, deleted ones included, in ID order
    pub fn all(&mut self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.ensure_loaded()?.values().cloned().collect())
    }

    /// Insert or replace an entity. Bumps its modified timestamp and
    /// registers its projects and tags with the index.
    pub fn save(&mut self, mut entity: T, index: &mut ProjectTagIndex) -> Result<(), RepositoryError> {
        entity.touch();
        index.register(entity.projects(), entity.tags())?;
        self.ensure_loaded()?.insert(*entity.id(), entity);
        self.dirty = true;
        Ok(())
    }

    /// Stamp the entity deleted. The record stays in the collection.
    /// Deleting an already-deleted entity keeps the original stamp.
    pub fn soft_delete(&mut self, id: &EntityId) -> Result<T, RepositoryError> {
        let cache = self.ensure_loaded()?;
        let entity = cache
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found(T::KIND, id))?;
        if entity.deleted().is_some() {
            return Ok(entity.clone());
        }
        entity.set_deleted(Some(Utc::now()));
        entity.touch();
        let entity = entity.clone();
        self.dirty = true;
        Ok(entity)
    }

    /// Clear the deleted stamp
    pub fn restore(&mut self, id: &EntityId) -> Result<T, RepositoryError> {
        let cache = self.ensure_loaded()?;
        let entity = cache
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found(T::KIND, id))?;
        entity.set_deleted(None);
        entity.touch();
        let entity = entity.clone();
        self.dirty = true;
        Ok(entity)
    }

    /// Remove the record entirely. The ID is never reused.
    pub fn hard_delete(&mut self, id: &EntityId) -> Result<T, RepositoryError> {
        let cache = self.ensure_loaded()?;
        let entity = cache
            .remove(id)
            .ok_or_else(|| RepositoryError::not_found(T::KIND, id))?;
        self.dirty = true;
        Ok(entity)
    }

    /// Write the collection back if anything changed. Returns whether a
    /// write happened; flushing a clean repository is a no-op.
    pub fn flush(&mut self) -> Result<bool, RepositoryError> {
        if !self.dirty {
            return Ok(false);
        }
        let cache = self.ensure_loaded()?;
        let mut collection = Collection::default();
        for (id, entity) in cache.iter() {
            let value = serde_yml::to_value(entity).map_err(|e| RepositoryError::Malformed {
                kind: T::KIND,
                id: id.to_string(),
                message: e.to_string(),
            })?;
            collection.entities.insert(id.to_string(), value);
        }
        collection.meta = self.meta.clone();
        self.store.store(T::KIND, &collection)?;
        self.dirty = false;
        Ok(true)
    }
}
