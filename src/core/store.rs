//! Backing store boundary
//!
//! Repositories are agnostic to where and how collections are encoded; they
//! talk to a [`Store`], which maps each entity kind to a persisted document.
//! The production store keeps one YAML file per kind under the data
//! directory. Two sidecar documents ride along with the entity collections:
//! the project/tag registry and the synthetic-number map.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::EntityKind;

/// One persisted entity collection: a mapping from persistent-ID string to
/// record, plus arbitrary top-level metadata carried through untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub entities: BTreeMap<String, serde_yml::Value>,

    #[serde(default, flatten)]
    pub meta: BTreeMap<String, serde_yml::Value>,
}

/// Persisted shape of the project/tag registry
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegistryData {
    #[serde(default)]
    pub projects: BTreeSet<String>,

    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Persisted shape of the synthetic-number map: kind -> number -> entity ID
pub type NumberData = BTreeMap<EntityKind, BTreeMap<u32, String>>;

/// Storage backend for entity collections and sidecar documents
pub trait Store {
    /// Load the collection for a kind (empty if never stored)
    fn load(&self, kind: EntityKind) -> Result<Collection, StoreError>;

    /// Write the full collection for a kind
    fn store(&self, kind: EntityKind, collection: &Collection) -> Result<(), StoreError>;

    /// Load the project/tag registry (empty if never stored)
    fn load_registry(&self) -> Result<RegistryData, StoreError>;

    /// Write the project/tag registry
    fn store_registry(&self, registry: &RegistryData) -> Result<(), StoreError>;

    /// Load the synthetic-number map (empty if never stored)
    fn load_numbers(&self) -> Result<NumberData, StoreError>;

    /// Write the synthetic-number map
    fn store_numbers(&self, numbers: &NumberData) -> Result<(), StoreError>;
}

/// Errors crossing the store boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed document {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// File-backed store: one YAML document per collection under a data directory
#[derive(Debug)]
pub struct YamlStore {
    root: PathBuf,
}

impl YamlStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, kind: EntityKind) -> PathBuf {
        self.root.join(format!("{}.yaml", kind.collection_name()))
    }

    fn registry_path(&self) -> PathBuf {
        self.root.join("registry.yaml")
    }

    fn numbers_path(&self) -> PathBuf {
        self.root.join("numbers.yaml")
    }

    fn read_document<T: Default + serde::de::DeserializeOwned + 'static>(
        &self,
        path: &Path,
    ) -> Result<T, StoreError> {
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&content).map_err(|e| StoreError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn write_document<T: Serialize>(&self, path: &Path, document: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Write {
            path: self.root.clone(),
            source,
        })?;
        let content = serde_yml::to_string(document).map_err(|e| StoreError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, content).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Store for YamlStore {
    fn load(&self, kind: EntityKind) -> Result<Collection, StoreError> {
        self.read_document(&self.collection_path(kind))
    }

    fn store(&self, kind: EntityKind, collection: &Collection) -> Result<(), StoreError> {
        self.write_document(&self.collection_path(kind), collection)
    }

    fn load_registry(&self) -> Result<RegistryData, StoreError> {
        self.read_document(&self.registry_path())
    }

    fn store_registry(&self, registry: &RegistryData) -> Result<(), StoreError> {
        self.write_document(&self.registry_path(), registry)
    }

    fn load_numbers(&self) -> Result<NumberData, StoreError> {
        self.read_document(&self.numbers_path())
    }

    fn store_numbers(&self, numbers: &NumberData) -> Result<(), StoreError> {
        self.write_document(&self.numbers_path(), numbers)
    }
}

/// In-memory store for unit tests. Counts writes so flush idempotence is
/// observable.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: std::cell::RefCell<std::collections::HashMap<EntityKind, Collection>>,
    registry: std::cell::RefCell<RegistryData>,
    numbers: std::cell::RefCell<NumberData>,
    writes: std::cell::RefCell<usize>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

#[cfg(test)]
impl Store for MemoryStore {
    fn load(&self, kind: EntityKind) -> Result<Collection, StoreError> {
        Ok(self
            .collections
            .borrow()
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    fn store(&self, kind: EntityKind, collection: &Collection) -> Result<(), StoreError> {
        *self.writes.borrow_mut() += 1;
        self.collections.borrow_mut().insert(kind, collection.clone());
        Ok(())
    }

    fn load_registry(&self) -> Result<RegistryData, StoreError> {
        Ok(self.registry.borrow().clone())
    }

    fn store_registry(&self, registry: &RegistryData) -> Result<(), StoreError> {
        *self.writes.borrow_mut() += 1;
        *self.registry.borrow_mut() = registry.clone();
        Ok(())
    }

    fn load_numbers(&self) -> Result<NumberData, StoreError> {
        Ok(self.numbers.borrow().clone())
    }

    fn store_numbers(&self, numbers: &NumberData) -> Result<(), StoreError> {
        *self.writes.borrow_mut() += 1;
        *self.numbers.borrow_mut() = numbers.clone();
        Ok(())
    }
}
