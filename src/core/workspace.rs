//! Workspace - the eight repositories wired over one store
//!
//! Commands open a workspace, mutate through its repositories, and flush
//! once at the end. Dropping a workspace flushes best-effort so a forgotten
//! flush cannot silently lose work.

use std::collections::BTreeSet;
use std::path::Path;
use std::rc::Rc;

use crate::core::entity::Entity;
use crate::core::index::{ProjectTagIndex, ResyncReport};
use crate::core::repository::{Repository, RepositoryError};
use crate::core::shortid::NumberMap;
use crate::core::store::{Store, YamlStore};
use crate::entities::{Event, Log, Note, Span, Task, TimeRecord, Tracker, TrackerEntry};

pub struct Workspace {
    pub tasks: Repository<Task>,
    pub time_records: Repository<TimeRecord>,
    pub events: Repository<Event>,
    pub spans: Repository<Span>,
    pub notes: Repository<Note>,
    pub logs: Repository<Log>,
    pub trackers: Repository<Tracker>,
    pub tracker_entries: Repository<TrackerEntry>,
    pub index: ProjectTagIndex,
    pub numbers: NumberMap,
}

impl Workspace {
    pub fn open(store: Rc<dyn Store>) -> Self {
        Self {
            tasks: Repository::new(store.clone()),
            time_records: Repository::new(store.clone()),
            events: Repository::new(store.clone()),
            spans: Repository::new(store.clone()),
            notes: Repository::new(store.clone()),
            logs: Repository::new(store.clone()),
            trackers: Repository::new(store.clone()),
            tracker_entries: Repository::new(store.clone()),
            index: ProjectTagIndex::new(store.clone()),
            numbers: NumberMap::new(store),
        }
    }

    pub fn open_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::open(Rc::new(YamlStore::new(data_dir.as_ref())))
    }

    /// Flush every dirty component. Safe to call repeatedly; a second call
    /// with nothing new writes nothing. Returns whether anything was written.
    pub fn flush_all(&mut self) -> Result<bool, RepositoryError> {
        let mut wrote = false;
        wrote |= self.tasks.flush()?;
        wrote |= self.time_records.flush()?;
        wrote |= self.events.flush()?;
        wrote |= self.spans.flush()?;
        wrote |= self.notes.flush()?;
        wrote |= self.logs.flush()?;
        wrote |= self.trackers.flush()?;
        wrote |= self.tracker_entries.flush()?;
        wrote |= self.index.flush()?;
        wrote |= self.numbers.flush()?;
        Ok(wrote)
    }

    /// Rebuild the project/tag registry from a full scan of every
    /// collection, soft-deleted entities included (a restore brings their
    /// projects back, so they still count).
    pub fn resync_index(&mut self) -> Result<ResyncReport, RepositoryError> {
        let mut projects = BTreeSet::new();
        let mut tags = BTreeSet::new();

        collect(&mut self.tasks, &mut projects, &mut tags)?;
        collect(&mut self.time_records, &mut projects, &mut tags)?;
        collect(&mut self.events, &mut projects, &mut tags)?;
        collect(&mut self.spans, &mut projects, &mut tags)?;
        collect(&mut self.notes, &mut projects, &mut tags)?;
        collect(&mut self.logs, &mut projects, &mut tags)?;
        collect(&mut self.trackers, &mut projects, &mut tags)?;
        collect(&mut self.tracker_entries, &mut projects, &mut tags)?;

        Ok(self.index.replace(projects, tags)?)
    }
}

fn collect<T: Entity>(
    repo: &mut Repository<T>,
    projects: &mut BTreeSet<String>,
    tags: &mut BTreeSet<String>,
) -> Result<(), RepositoryError> {
    for entity in repo.all()? {
        projects.extend(entity.projects().iter().cloned());
        tags.extend(entity.tags().iter().cloned());
    }
    Ok(())
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(e) = self.flush_all() {
            eprintln!("warning: failed to flush workspace: {e}");
        }
    }
}
