//! `daybook view` command - saved view documents
//!
//! A view is a small YAML file naming a kind, an optional filter, and
//! optional sort keys, so recurring queries live next to the data instead
//! of in shell history:
//!
//! ```yaml
//! kind: task
//! sort: due, desc created
//! filter:
//!   filter_type: and
//!   predicates:
//!     - filter_type: project
//!       filter: work.reports
//!     - filter_type: empty
//!       property: completed
//! ```

use miette::{IntoDiagnostic, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::cli::helpers::{format_date, open_workspace, truncate_str, Table};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityKind;
use crate::core::repository::Repository;
use crate::core::shortid::NumberMap;
use crate::query::{list, Filter, ListOptions, SortKey};

#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    /// Path to the view document
    pub file: PathBuf,

    /// Include soft-deleted entities
    #[arg(long)]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
struct ViewDoc {
    kind: EntityKind,

    #[serde(default)]
    filter: Option<Filter>,

    #[serde(default)]
    sort: Option<String>,
}

pub fn run(args: ViewArgs, global: &GlobalOpts) -> Result<()> {
    let document = std::fs::read_to_string(&args.file).into_diagnostic()?;
    let doc: ViewDoc = serde_yml::from_str(&document)
        .map_err(|e| miette::miette!("malformed view document {}: {e}", args.file.display()))?;
    if let Some(filter) = &doc.filter {
        filter.validate().into_diagnostic()?;
    }

    let (config, mut ws) = open_workspace(global);
    let options = ListOptions {
        filter: doc.filter,
        include_deleted: args.deleted,
        sort: doc
            .sort
            .as_deref()
            .map(SortKey::parse_list)
            .unwrap_or_default(),
        keep_numbers: config.keep_numbers(),
    };

    match doc.kind {
        EntityKind::Task => render(&mut ws.tasks, &mut ws.numbers, &options, "task")?,
        EntityKind::TimeRecord => {
            render(&mut ws.time_records, &mut ws.numbers, &options, "time record")?
        }
        EntityKind::Event => render(&mut ws.events, &mut ws.numbers, &options, "event")?,
        EntityKind::Span => render(&mut ws.spans, &mut ws.numbers, &options, "span")?,
        EntityKind::Note => render(&mut ws.notes, &mut ws.numbers, &options, "note")?,
        EntityKind::Log => render(&mut ws.logs, &mut ws.numbers, &options, "log")?,
        EntityKind::Tracker => render(&mut ws.trackers, &mut ws.numbers, &options, "tracker")?,
        EntityKind::TrackerEntry => {
            render(&mut ws.tracker_entries, &mut ws.numbers, &options, "entry")?
        }
    }

    ws.flush_all().into_diagnostic()?;
    Ok(())
}

fn render<T: Entity>(
    repo: &mut Repository<T>,
    numbers: &mut NumberMap,
    options: &ListOptions,
    noun: &str,
) -> Result<()> {
    let rows = list(repo, numbers, options).into_diagnostic()?;

    let mut table = Table::new(&["#", "id", "created", "summary"]);
    for row in &rows {
        let value = serde_json::to_value(&row.entity).into_diagnostic()?;
        table.row(vec![
            row.number.to_string(),
            row.entity.id().to_string(),
            format_date(row.entity.created()),
            truncate_str(&summary(&value), 60),
        ]);
    }
    table.print(noun);
    Ok(())
}

/// Best-effort one-line summary from whichever text field the kind carries
fn summary(value: &Value) -> String {
    for property in ["description", "name", "message", "content"] {
        if let Some(text) = value.get(property).and_then(Value::as_str) {
            return text.to_string();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_doc_parses() {
        let doc: ViewDoc = serde_yml::from_str(
            "kind: task\n\
             sort: due, desc created\n\
             filter:\n\
             \x20 filter_type: empty\n\
             \x20 property: completed\n",
        )
        .unwrap();
        assert_eq!(doc.kind, EntityKind::Task);
        assert!(doc.filter.is_some());
        assert_eq!(doc.sort.as_deref(), Some("due, desc created"));
    }

    #[test]
    fn test_summary_picks_the_text_field() {
        assert_eq!(
            summary(&serde_json::json!({ "message": "hi" })),
            "hi".to_string()
        );
        assert_eq!(summary(&serde_json::json!({ "at": 1 })), String::new());
    }
}
