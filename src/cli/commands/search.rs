//! `daybook search` command - cross-kind text search
//!
//! A convenience wrapper over the filter language: case-insensitive
//! substring match against each kind's text fields, optionally widened to
//! tags and project names. Anything more precise takes a `--filter`.

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde_json::Value;

use crate::cli::helpers::{open_workspace, truncate_str, Table};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityKind;
use crate::core::repository::Repository;

/// Fields that carry prose, across all kinds
const TEXT_PROPERTIES: &[&str] = &["description", "content", "message", "name"];

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive substring)
    pub query: String,

    /// Kinds to search (repeatable; default: all)
    #[arg(long = "kind", short = 'k')]
    pub kinds: Vec<KindArg>,

    /// Also match against tags
    #[arg(long)]
    pub tags: bool,

    /// Also match against project names
    #[arg(long)]
    pub projects: bool,

    /// Include soft-deleted entities
    #[arg(long)]
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    Task,
    Record,
    Event,
    Span,
    Note,
    Log,
    Tracker,
}

impl From<KindArg> for EntityKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Task => EntityKind::Task,
            KindArg::Record => EntityKind::TimeRecord,
            KindArg::Event => EntityKind::Event,
            KindArg::Span => EntityKind::Span,
            KindArg::Note => EntityKind::Note,
            KindArg::Log => EntityKind::Log,
            KindArg::Tracker => EntityKind::Tracker,
        }
    }
}

struct Hit {
    kind: EntityKind,
    id: String,
    text: String,
    projects: String,
}

pub fn run(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let (_, mut ws) = open_workspace(global);
    let needle = args.query.to_lowercase();

    let wanted = |kind: EntityKind| {
        args.kinds.is_empty() || args.kinds.iter().any(|k| EntityKind::from(*k) == kind)
    };

    let mut hits = Vec::new();
    if wanted(EntityKind::Task) {
        collect(&mut ws.tasks, &args, &needle, &mut hits)?;
    }
    if wanted(EntityKind::TimeRecord) {
        collect(&mut ws.time_records, &args, &needle, &mut hits)?;
    }
    if wanted(EntityKind::Event) {
        collect(&mut ws.events, &args, &needle, &mut hits)?;
    }
    if wanted(EntityKind::Span) {
        collect(&mut ws.spans, &args, &needle, &mut hits)?;
    }
    if wanted(EntityKind::Note) {
        collect(&mut ws.notes, &args, &needle, &mut hits)?;
    }
    if wanted(EntityKind::Log) {
        collect(&mut ws.logs, &args, &needle, &mut hits)?;
    }
    if wanted(EntityKind::Tracker) {
        collect(&mut ws.trackers, &args, &needle, &mut hits)?;
    }

    if hits.is_empty() {
        println!("No matches for '{}'", style(&args.query).yellow());
        return Ok(());
    }

    let mut table = Table::new(&["kind", "id", "match", "projects"]);
    for hit in &hits {
        table.row(vec![
            hit.kind.to_string(),
            hit.id.clone(),
            truncate_str(&hit.text, 50),
            hit.projects.clone(),
        ]);
    }
    table.print("match");
    Ok(())
}

fn collect<T: Entity>(
    repo: &mut Repository<T>,
    args: &SearchArgs,
    needle: &str,
    hits: &mut Vec<Hit>,
) -> Result<()> {
    for entity in repo.all().into_diagnostic()? {
        if !args.deleted && entity.deleted().is_some() {
            continue;
        }
        let value = serde_json::to_value(&entity).into_diagnostic()?;
        if let Some(text) = matched_text(&value, needle, args) {
            hits.push(Hit {
                kind: T::KIND,
                id: entity.id().to_string(),
                text,
                projects: entity.projects().join(", "),
            });
        }
    }
    Ok(())
}

/// The first text field (then tag, then project, if widened) containing
/// the needle, for the match column
fn matched_text(entity: &Value, needle: &str, args: &SearchArgs) -> Option<String> {
    for property in TEXT_PROPERTIES {
        if let Some(text) = entity.get(property).and_then(Value::as_str) {
            if text.to_lowercase().contains(needle) {
                return Some(text.to_string());
            }
        }
    }
    if args.tags {
        if let Some(tag) = string_item_match(entity, "tags", needle) {
            return Some(tag);
        }
    }
    if args.projects {
        if let Some(project) = string_item_match(entity, "projects", needle) {
            return Some(project);
        }
    }
    None
}

fn string_item_match(entity: &Value, property: &str, needle: &str) -> Option<String> {
    entity
        .get(property)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .find(|item| item.to_lowercase().contains(needle))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(query: &str) -> SearchArgs {
        SearchArgs {
            query: query.to_string(),
            kinds: Vec::new(),
            tags: false,
            projects: false,
            deleted: false,
        }
    }

    #[test]
    fn test_matches_text_fields_case_insensitive() {
        let task = json!({ "description": "File the Quarterly report" });
        assert!(matched_text(&task, "quarterly", &args("quarterly")).is_some());
        assert!(matched_text(&task, "annual", &args("annual")).is_none());

        let log = json!({ "message": "standup notes" });
        assert!(matched_text(&log, "standup", &args("standup")).is_some());
    }

    #[test]
    fn test_tags_and_projects_only_when_widened() {
        let task = json!({
            "description": "sand the bench",
            "tags": ["woodwork"],
            "projects": ["workshop"],
        });
        assert!(matched_text(&task, "woodwork", &args("woodwork")).is_none());

        let mut widened = args("woodwork");
        widened.tags = true;
        assert_eq!(
            matched_text(&task, "woodwork", &widened),
            Some("woodwork".to_string())
        );

        let mut widened = args("workshop");
        widened.projects = true;
        assert_eq!(
            matched_text(&task, "workshop", &widened),
            Some("workshop".to_string())
        );
    }
}
