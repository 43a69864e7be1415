//! Project and tag registry
//!
//! Every project and tag ever attached to an entity is registered here so
//! listings and completions can offer them without scanning all eight
//! collections. Saving an entity only ever widens the registry; entries are
//! dropped exclusively by a full resync.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::core::store::{RegistryData, Store, StoreError};

/// Lazily loaded registry of known projects and tags
pub struct ProjectTagIndex {
    store: Rc<dyn Store>,
    data: Option<RegistryData>,
    dirty: bool,
}

/// What a resync changed, for reporting to the user
#[derive(Debug, Default)]
pub struct ResyncReport {
    pub added_projects: Vec<String>,
    pub dropped_projects: Vec<String>,
    pub added_tags: Vec<String>,
    pub dropped_tags: Vec<String>,
}

impl ResyncReport {
    pub fn is_clean(&self) -> bool {
        self.added_projects.is_empty()
            && self.dropped_projects.is_empty()
            && self.added_tags.is_empty()
            && self.dropped_tags.is_empty()
    }
}

impl ProjectTagIndex {
    pub fn new(store: Rc<dyn Store>) -> Self {
        Self {
            store,
            data: None,
            dirty: false,
        }
    }

    fn ensure_loaded(&mut self) -> Result<&mut RegistryData, StoreError> {
        if self.data.is_none() {
            self.data = Some(self.store.load_registry()?);
        }
        Ok(self.data.get_or_insert_with(RegistryData::default))
    }

    /// All known projects, sorted
    pub fn projects(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(self.ensure_loaded()?.projects.iter().cloned().collect())
    }

    /// All known tags, sorted
    pub fn tags(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(self.ensure_loaded()?.tags.iter().cloned().collect())
    }

    /// Register the projects and tags of a saved entity. Widens only.
    pub fn register(&mut self, projects: &[String], tags: &[String]) -> Result<(), StoreError> {
        let data = self.ensure_loaded()?;
        let mut changed = false;
        for project in projects {
            changed |= data.projects.insert(project.clone());
        }
        for tag in tags {
            changed |= data.tags.insert(tag.clone());
        }
        if changed {
            self.dirty = true;
        }
        Ok(())
    }

    /// Replace the registry with freshly scanned contents and report the
    /// difference. The only operation that can drop entries.
    pub fn replace(
        &mut self,
        projects: BTreeSet<String>,
        tags: BTreeSet<String>,
    ) -> Result<ResyncReport, StoreError> {
        let data = self.ensure_loaded()?;
        let report = ResyncReport {
            added_projects: projects.difference(&data.projects).cloned().collect(),
            dropped_projects: data.projects.difference(&projects).cloned().collect(),
            added_tags: tags.difference(&data.tags).cloned().collect(),
            dropped_tags: data.tags.difference(&tags).cloned().collect(),
        };
        if !report.is_clean() {
            data.projects = projects;
            data.tags = tags;
            self.dirty = true;
        }
        Ok(report)
    }

    /// Write the registry back if it changed. Returns whether a write happened.
    pub fn flush(&mut self) -> Result<bool, StoreError> {
        if !self.dirty {
            return Ok(false);
        }
        let data = self.ensure_loaded()?;
        let snapshot = data.clone();
        self.store.store_registry(&snapshot)?;
        self.dirty = false;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;

    fn index() -> (Rc<MemoryStore>, ProjectTagIndex) {
        let store = Rc::new(MemoryStore::new());
        let index = ProjectTagIndex::new(store.clone() as Rc<dyn Store>);
        (store, index)
    }

    #[test]
    fn test_register_widens() {
        let (_, mut index) = index();
        index
            .register(&["work.reports".to_string()], &["urgent".to_string()])
            .unwrap();
        index.register(&["home".to_string()], &[]).unwrap();

        assert_eq!(index.projects().unwrap(), vec!["home", "work.reports"]);
        assert_eq!(index.tags().unwrap(), vec!["urgent"]);
    }

    #[test]
    fn test_flush_is_idempotent() {
        let (store, mut index) = index();
        index.register(&["work".to_string()], &[]).unwrap();

        assert!(index.flush().unwrap());
        let writes = store.write_count();
        assert!(!index.flush().unwrap());
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn test_register_existing_entry_stays_clean() {
        let (store, mut index) = index();
        index.register(&["work".to_string()], &[]).unwrap();
        index.flush().unwrap();
        let writes = store.write_count();

        index.register(&["work".to_string()], &[]).unwrap();
        assert!(!index.flush().unwrap());
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn test_replace_reports_difference() {
        let (_, mut index) = index();
        index
            .register(
                &["work".to_string(), "stale".to_string()],
                &["old".to_string()],
            )
            .unwrap();

        let mut projects = BTreeSet::new();
        projects.insert("work".to_string());
        projects.insert("fresh".to_string());
        let report = index.replace(projects, BTreeSet::new()).unwrap();

        assert_eq!(report.added_projects, vec!["fresh"]);
        assert_eq!(report.dropped_projects, vec!["stale"]);
        assert_eq!(report.dropped_tags, vec!["old"]);
        assert_eq!(index.projects().unwrap(), vec!["fresh", "work"]);
    }

    #[test]
    fn test_replace_with_identical_contents_stays_clean() {
        let (_, mut index) = index();
        index.register(&["work".to_string()], &[]).unwrap();
        index.flush().unwrap();

        let mut projects = BTreeSet::new();
        projects.insert("work".to_string());
        let report = index.replace(projects, BTreeSet::new()).unwrap();
        assert!(report.is_clean());
        assert!(!index.flush().unwrap());
    }
}
