//! `daybook entry` command - tracker data points

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_date, open_workspace, status_ok, QueryArgs, Table};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityKind;
use crate::entities::{EntryValue, Tracker, TrackerEntry, ValueKind};
use crate::query::{list, parse_date_input, resolve_operand};

#[derive(Subcommand, Debug)]
pub enum EntryCommands {
    /// Record a data point for a tracker
    Add(AddArgs),

    /// List tracker entries
    List(ListArgs),

    /// Soft-delete entries
    Delete(SelectArgs),

    /// Restore soft-deleted entries
    Restore(SelectArgs),

    /// Permanently remove entries
    Purge(SelectArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Tracker (number from the last tracker listing or a full ID)
    pub tracker: String,

    /// The value; checkin trackers may omit it
    pub value: Option<String>,

    /// The moment the point describes (default: now)
    #[arg(long, default_value = "now")]
    pub at: String,

    /// Tags (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(clap::Args, Debug)]
pub struct SelectArgs {
    /// Numbers from the last listing (e.g. "3" or "1,3-5") or a full ID
    pub selection: String,
}

pub fn run(cmd: EntryCommands, global: &GlobalOpts) -> Result<()> {
    let (config, mut ws) = open_workspace(global);

    match cmd {
        EntryCommands::Add(args) => {
            let ids = resolve_operand(&mut ws.numbers, EntityKind::Tracker, &args.tracker)
                .into_diagnostic()?;
            if ids.len() != 1 {
                return Err(miette::miette!("expected exactly one tracker"));
            }
            let tracker = ws.trackers.get(&ids[0]).into_diagnostic()?;
            let value = entry_value(&tracker, args.value.as_deref())?;

            let at = parse_date_input(&args.at).into_diagnostic()?;
            let mut entry = TrackerEntry::new(*tracker.id(), at, value);
            entry.projects = tracker.projects.clone();
            entry.tags = args.tags;

            let id = *entry.id();
            ws.tracker_entries
                .save(entry, &mut ws.index)
                .into_diagnostic()?;
            if !global.quiet {
                status_ok(&format!(
                    "Recorded {} for {}",
                    style(id).cyan(),
                    style(&tracker.name).yellow()
                ));
            }
        }
        EntryCommands::List(args) => {
            let options = args.query.to_options(&config)?;
            let rows =
                list(&mut ws.tracker_entries, &mut ws.numbers, &options).into_diagnostic()?;

            let mut table = Table::new(&["#", "at", "tracker", "value", "tags"]);
            for row in &rows {
                let entry = &row.entity;
                table.row(vec![
                    row.number.to_string(),
                    format_date(entry.at),
                    entry.tracker.to_string(),
                    entry.value.to_string(),
                    entry.tags.join(", "),
                ]);
            }
            table.print("entry");
        }
        EntryCommands::Delete(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::TrackerEntry, &args.selection)
                .into_diagnostic()?
            {
                ws.tracker_entries.soft_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Deleted {}", style(id).cyan()));
                }
            }
        }
        EntryCommands::Restore(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::TrackerEntry, &args.selection)
                .into_diagnostic()?
            {
                ws.tracker_entries.restore(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Restored {}", style(id).cyan()));
                }
            }
        }
        EntryCommands::Purge(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::TrackerEntry, &args.selection)
                .into_diagnostic()?
            {
                ws.tracker_entries.hard_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Purged {}", style(id).cyan()));
                }
            }
        }
    }

    ws.flush_all().into_diagnostic()?;
    Ok(())
}

/// Interpret the raw value against the tracker's value kind
fn entry_value(tracker: &Tracker, raw: Option<&str>) -> Result<EntryValue> {
    match tracker.value_kind {
        ValueKind::Checkin => match raw {
            None => Ok(EntryValue::Number(1.0)),
            Some(v) => Err(miette::miette!(
                "'{}' is a checkin tracker and takes no value (got '{v}')",
                tracker.name
            )),
        },
        ValueKind::Quantity => {
            let raw = raw
                .ok_or_else(|| miette::miette!("'{}' needs a numeric value", tracker.name))?;
            let number: f64 = raw
                .parse()
                .map_err(|_| miette::miette!("'{raw}' is not a number"))?;
            Ok(EntryValue::Number(number))
        }
        ValueKind::Pips => {
            let raw = raw
                .ok_or_else(|| miette::miette!("'{}' needs a 0-5 rating", tracker.name))?;
            let pips: u8 = raw
                .parse()
                .map_err(|_| miette::miette!("'{raw}' is not a 0-5 rating"))?;
            if pips > 5 {
                return Err(miette::miette!("'{raw}' is not a 0-5 rating"));
            }
            Ok(EntryValue::Number(f64::from(pips)))
        }
        ValueKind::MultiSelect => {
            let raw = raw.ok_or_else(|| {
                miette::miette!(
                    "'{}' needs one of: {}",
                    tracker.name,
                    tracker.choices.join(", ")
                )
            })?;
            if !tracker.choices.iter().any(|c| c == raw) {
                return Err(miette::miette!(
                    "'{raw}' is not a choice for '{}' (choices: {})",
                    tracker.name,
                    tracker.choices.join(", ")
                ));
            }
            Ok(EntryValue::Text(raw.to_string()))
        }
    }
}
