//! `daybook tracker` command - trackers

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_workspace, status_ok, truncate_str, QueryArgs, Table};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityKind;
use crate::entities::{Frequency, Tracker, ValueKind};
use crate::query::{list, resolve_operand};

#[derive(Subcommand, Debug)]
pub enum TrackerCommands {
    /// Create a new tracker
    New(NewArgs),

    /// List trackers
    List(ListArgs),

    /// Soft-delete trackers
    Delete(SelectArgs),

    /// Restore soft-deleted trackers
    Restore(SelectArgs),

    /// Permanently remove trackers
    Purge(SelectArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    IntraDay,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl From<FrequencyArg> for Frequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::IntraDay => Frequency::IntraDay,
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Monthly => Frequency::Monthly,
            FrequencyArg::Quarterly => Frequency::Quarterly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ValueKindArg {
    Checkin,
    Quantity,
    MultiSelect,
    Pips,
}

impl From<ValueKindArg> for ValueKind {
    fn from(arg: ValueKindArg) -> Self {
        match arg {
            ValueKindArg::Checkin => ValueKind::Checkin,
            ValueKindArg::Quantity => ValueKind::Quantity,
            ValueKindArg::MultiSelect => ValueKind::MultiSelect,
            ValueKindArg::Pips => ValueKind::Pips,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// What is being tracked
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Expected cadence of entries
    #[arg(long, short = 'f', default_value = "daily")]
    pub frequency: FrequencyArg,

    /// Shape of entry values
    #[arg(long, short = 'k', default_value = "checkin")]
    pub kind: ValueKindArg,

    /// Allowed values for multi-select trackers (repeatable)
    #[arg(long = "choice")]
    pub choices: Vec<String>,

    /// Projects (repeatable)
    #[arg(long = "project", short = 'p')]
    pub projects: Vec<String>,

    /// Tags (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Display color token (e.g. "blue")
    #[arg(long)]
    pub color: Option<String>,
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

pub fn run(cmd: TrackerCommands, global: &GlobalOpts) -> Result<()> {
    let (config, mut ws) = open_workspace(global);

    match cmd {
        TrackerCommands::New(args) => {
            let kind: ValueKind = args.kind.into();
            if kind == ValueKind::MultiSelect && args.choices.is_empty() {
                return Err(miette::miette!(
                    "multi-select trackers need at least one --choice"
                ));
            }
            if kind != ValueKind::MultiSelect && !args.choices.is_empty() {
                return Err(miette::miette!(
                    "--choice only applies to multi-select trackers"
                ));
            }

            let mut tracker = Tracker::new(args.name, args.frequency.into(), kind);
            tracker.description = args.description;
            tracker.choices = args.choices;
            tracker.projects = args.projects;
            tracker.tags = args.tags;
            tracker.color = args.color;

            let id = *tracker.id();
            ws.trackers.save(tracker, &mut ws.index).into_diagnostic()?;
            if !global.quiet {
                status_ok(&format!("Created tracker {}", style(id).cyan()));
            }
        }
        TrackerCommands::List(args) => {
            let options = args.query.to_options(&config)?;
            let rows = list(&mut ws.trackers, &mut ws.numbers, &options).into_diagnostic()?;

            let mut table = Table::new(&["#", "name", "frequency", "kind", "choices"]);
            for row in &rows {
                let tracker = &row.entity;
                table.row(vec![
                    row.number.to_string(),
                    truncate_str(&tracker.name, 30),
                    tracker.frequency.to_string(),
                    tracker.value_kind.to_string(),
                    tracker.choices.join(", "),
                ]);
            }
            table.print("tracker");
        }
        TrackerCommands::Delete(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Tracker, &args.selection)
                .into_diagnostic()?
            {
                ws.trackers.soft_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Deleted {}", style(id).cyan()));
                }
            }
        }
        TrackerCommands::Restore(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Tracker, &args.selection)
                .into_diagnostic()?
            {
                ws.trackers.restore(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Restored {}", style(id).cyan()));
                }
            }
        }
        TrackerCommands::Purge(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Tracker, &args.selection)
                .into_diagnostic()?
            {
                ws.trackers.hard_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Purged {}", style(id).cyan()));
                }
            }
        }
    }

    ws.flush_all().into_diagnostic()?;
    Ok(())
}
