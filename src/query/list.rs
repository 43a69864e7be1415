//! Listing facade: filter, sort, number
//!
//! Every `list` command funnels through here so the semantics stay uniform:
//! soft-deleted entities are excluded unless the caller opts in or the
//! filter itself talks about `deleted`, sort keys are applied stably with
//! missing values last, and the survivors are numbered in display order.

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};
use crate::core::repository::{Repository, RepositoryError};
use crate::core::shortid::{parse_id_range, NumberMap, RangeParseError};
use crate::core::store::StoreError;
use crate::query::filter::Filter;
use crate::query::sort::{sort_by_keys, SortKey};

#[derive(Debug, Default)]
pub struct ListOptions {
    pub filter: Option<Filter>,

    /// Include soft-deleted entities even when the filter is silent on them
    pub include_deleted: bool,

    /// Sort keys, most significant first; empty keeps ID (creation) order
    pub sort: Vec<SortKey>,

    /// Reuse the current numbering epoch instead of starting a fresh one
    pub keep_numbers: bool,
}

/// One listing row: the entity plus the number it was handed
pub struct ListedEntity<T> {
    pub number: u32,
    pub entity: T,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no current {kind} listing assigns number{} {}", plural(.numbers), join(.numbers))]
    UnknownNumbers { kind: EntityKind, numbers: Vec<u32> },

    #[error("expected a {expected} but {id} is a {found}")]
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
        id: String,
    },

    #[error("could not serialize {kind} {id}: {message}")]
    Serialize {
        kind: EntityKind,
        id: String,
        message: String,
    },

    #[error(transparent)]
    Range(#[from] RangeParseError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn plural(numbers: &[u32]) -> &'static str {
    if numbers.len() == 1 {
        ""
    } else {
        "s"
    }
}

fn join(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// List a collection: filter, sort, and hand out numbers in display order
pub fn list<T: Entity>(
    repo: &mut Repository<T>,
    numbers: &mut NumberMap,
    options: &ListOptions,
) -> Result<Vec<ListedEntity<T>>, QueryError> {
    let now = Utc::now();

    // the filter only overrides the default exclusion when it actually
    // inspects `deleted`; a filter about other properties keeps it
    let exclude_deleted = !options.include_deleted
        && !options
            .filter
            .as_ref()
            .is_some_and(|f| f.references("deleted"));

    let mut rows: Vec<(T, Value)> = Vec::new();
    for entity in repo.all()? {
        if exclude_deleted && entity.deleted().is_some() {
            continue;
        }
        let value = serde_json::to_value(&entity).map_err(|e| QueryError::Serialize {
            kind: T::KIND,
            id: entity.id().to_string(),
            message: e.to_string(),
        })?;
        if let Some(filter) = &options.filter {
            if !filter.matches_at(&value, now) {
                continue;
            }
        }
        rows.push((entity, value));
    }

    sort_by_keys(&mut rows, &options.sort);

    if !options.keep_numbers {
        numbers.reset(T::KIND)?;
    }

    let mut listed = Vec::with_capacity(rows.len());
    for (entity, _) in rows {
        let number = numbers.assign(*entity.id())?;
        listed.push(ListedEntity { number, entity });
    }
    Ok(listed)
}

/// Resolve a command operand - either a full entity ID or a number
/// selection like `1,3-5` - to persistent IDs. Unknown numbers are
/// collected and reported together.
pub fn resolve_operand(
    numbers: &mut NumberMap,
    kind: EntityKind,
    input: &str,
) -> Result<Vec<EntityId>, QueryError> {
    if let Ok(id) = EntityId::parse(input.trim()) {
        if id.kind() != kind {
            return Err(QueryError::KindMismatch {
                expected: kind,
                found: id.kind(),
                id: id.to_string(),
            });
        }
        return Ok(vec![id]);
    }

    let selection = parse_id_range(input)?;
    let mut ids = Vec::with_capacity(selection.len());
    let mut unknown = Vec::new();
    for number in selection {
        match numbers.resolve(kind, number)? {
            Some(id) => ids.push(id),
            None => unknown.push(number),
        }
    }
    if !unknown.is_empty() {
        return Err(QueryError::UnknownNumbers {
            kind,
            numbers: unknown,
        });
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::index::ProjectTagIndex;
    use crate::core::store::{MemoryStore, Store};
    use crate::entities::Task;
    use std::rc::Rc;

    struct Fixture {
        repo: Repository<Task>,
        index: ProjectTagIndex,
        numbers: NumberMap,
    }

    fn fixture() -> Fixture {
        let store = Rc::new(MemoryStore::new());
        Fixture {
            repo: Repository::new(store.clone() as Rc<dyn Store>),
            index: ProjectTagIndex::new(store.clone() as Rc<dyn Store>),
            numbers: NumberMap::new(store as Rc<dyn Store>),
        }
    }

    fn save(fx: &mut Fixture, description: &str) -> EntityId {
        let task = Task::new(description);
        let id = *task.id();
        fx.repo.save(task, &mut fx.index).unwrap();
        id
    }

    #[test]
    fn test_default_listing_excludes_deleted() {
        let mut fx = fixture();
        save(&mut fx, "keep");
        let gone = save(&mut fx, "drop");
        fx.repo.soft_delete(&gone).unwrap();

        let rows = list(&mut fx.repo, &mut fx.numbers, &ListOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity.description, "keep");
    }

    #[test]
    fn test_include_deleted_flag() {
        let mut fx = fixture();
        let gone = save(&mut fx, "drop");
        fx.repo.soft_delete(&gone).unwrap();

        let options = ListOptions {
            include_deleted: true,
            ..Default::default()
        };
        let rows = list(&mut fx.repo, &mut fx.numbers, &options).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_filter_about_deleted_overrides_default_exclusion() {
        let mut fx = fixture();
        save(&mut fx, "alive");
        let gone = save(&mut fx, "in the bin");
        fx.repo.soft_delete(&gone).unwrap();

        let options = ListOptions {
            filter: Some(Filter::Not {
                predicate: Box::new(Filter::Empty {
                    property: "deleted".to_string(),
                }),
            }),
            ..Default::default()
        };
        let rows = list(&mut fx.repo, &mut fx.numbers, &options).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity.description, "in the bin");
    }

    #[test]
    fn test_filter_about_other_properties_keeps_default_exclusion() {
        let mut fx = fixture();
        save(&mut fx, "report draft");
        let gone = save(&mut fx, "report final");
        fx.repo.soft_delete(&gone).unwrap();

        let options = ListOptions {
            filter: Some(Filter::Str {
                property: "description".to_string(),
                filter: "contains report".to_string(),
            }),
            ..Default::default()
        };
        let rows = list(&mut fx.repo, &mut fx.numbers, &options).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity.description, "report draft");
    }

    #[test]
    fn test_listing_numbers_rows_in_display_order() {
        let mut fx = fixture();
        save(&mut fx, "b");
        save(&mut fx, "a");

        let options = ListOptions {
            sort: SortKey::parse_list("description"),
            ..Default::default()
        };
        let rows = list(&mut fx.repo, &mut fx.numbers, &options).unwrap();
        assert_eq!(rows[0].entity.description, "a");
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[1].entity.description, "b");
        assert_eq!(rows[1].number, 2);
    }

    #[test]
    fn test_listing_resets_the_epoch_by_default() {
        let mut fx = fixture();
        let first = save(&mut fx, "first");
        save(&mut fx, "second");

        list(&mut fx.repo, &mut fx.numbers, &ListOptions::default()).unwrap();
        // second listing filtered to one row renumbers from 1
        let options = ListOptions {
            filter: Some(Filter::Str {
                property: "description".to_string(),
                filter: "equals second".to_string(),
            }),
            ..Default::default()
        };
        let rows = list(&mut fx.repo, &mut fx.numbers, &options).unwrap();
        assert_eq!(rows[0].number, 1);
        assert_ne!(rows[0].entity.id, first);
        // the old epoch's numbers no longer resolve to the old entities
        assert_ne!(
            fx.numbers.resolve(EntityKind::Task, 1).unwrap(),
            Some(first)
        );
    }

    #[test]
    fn test_keep_numbers_preserves_the_epoch() {
        let mut fx = fixture();
        let first = save(&mut fx, "first");
        save(&mut fx, "second");

        list(&mut fx.repo, &mut fx.numbers, &ListOptions::default()).unwrap();
        let options = ListOptions {
            keep_numbers: true,
            ..Default::default()
        };
        list(&mut fx.repo, &mut fx.numbers, &options).unwrap();
        assert_eq!(
            fx.numbers.resolve(EntityKind::Task, 1).unwrap(),
            Some(first)
        );
    }

    #[test]
    fn test_resolve_operand_accepts_full_ids() {
        let mut fx = fixture();
        let id = save(&mut fx, "by id");
        let resolved =
            resolve_operand(&mut fx.numbers, EntityKind::Task, &id.to_string()).unwrap();
        assert_eq!(resolved, vec![id]);
    }

    #[test]
    fn test_resolve_operand_rejects_wrong_kind() {
        let mut fx = fixture();
        let note_id = EntityId::new(EntityKind::Note);
        let err =
            resolve_operand(&mut fx.numbers, EntityKind::Task, &note_id.to_string()).unwrap_err();
        assert!(matches!(err, QueryError::KindMismatch { .. }));
    }

    #[test]
    fn test_resolve_operand_aggregates_unknown_numbers() {
        let mut fx = fixture();
        save(&mut fx, "only one");
        list(&mut fx.repo, &mut fx.numbers, &ListOptions::default()).unwrap();

        let err = resolve_operand(&mut fx.numbers, EntityKind::Task, "1,99").unwrap_err();
        match err {
            QueryError::UnknownNumbers { numbers, .. } => assert_eq!(numbers, vec![99]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(resolve_operand(&mut fx.numbers, EntityKind::Task, "98-99")
            .unwrap_err()
            .to_string()
            .contains("98, 99"));
    }

    #[test]
    fn test_resolve_operand_selection() {
        let mut fx = fixture();
        let a = save(&mut fx, "a");
        let b = save(&mut fx, "b");
        let c = save(&mut fx, "c");
        list(&mut fx.repo, &mut fx.numbers, &ListOptions::default()).unwrap();

        let resolved = resolve_operand(&mut fx.numbers, EntityKind::Task, "1,3").unwrap();
        assert_eq!(resolved, vec![a, c]);
        let resolved = resolve_operand(&mut fx.numbers, EntityKind::Task, "1-2").unwrap();
        assert_eq!(resolved, vec![a, b]);
    }
}
