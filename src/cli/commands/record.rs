//! `daybook record` command - time records and timers

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    format_date, format_opt_date, open_workspace, status_ok, truncate_str, QueryArgs, Table,
};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};
use crate::core::Workspace;
use crate::entities::TimeRecord;
use crate::query::{list, parse_date_input, resolve_operand};

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// Start a running timer
    Start(StartArgs),

    /// Stop the running timer
    Stop(StopArgs),

    /// Log a finished block of time
    New(NewArgs),

    /// List time records
    List(ListArgs),

    /// Soft-delete time records
    Delete(SelectArgs),

    /// Restore soft-deleted time records
    Restore(SelectArgs),

    /// Permanently remove time records
    Purge(SelectArgs),
}

#[derive(clap::Args, Debug)]
pub struct StartArgs {
    /// What the time is going to
    pub description: Option<String>,

    /// Start moment (default: now)
    #[arg(long, default_value = "now")]
    pub at: String,

    /// Tasks this time is spent on (number or full ID, repeatable)
    #[arg(long = "task")]
    pub tasks: Vec<String>,

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
pub struct StopArgs {
    /// End moment (default: now)
    #[arg(long, default_value = "now")]
    pub at: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// What the time went to
    pub description: Option<String>,

    /// Start moment
    #[arg(long)]
    pub from: String,

    /// End moment
    #[arg(long)]
    pub to: String,

    /// Tasks this time was spent on (number or full ID, repeatable)
    #[arg(long = "task")]
    pub tasks: Vec<String>,

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

pub fn run(cmd: RecordCommands, global: &GlobalOpts) -> Result<()> {
    let (config, mut ws) = open_workspace(global);

    match cmd {
        RecordCommands::Start(args) => {
            let started = parse_date_input(&args.at).into_diagnostic()?;
            let mut record = TimeRecord::new(started);
            record.description = args.description;
            record.tasks = resolve_task_links(&mut ws, &args.tasks)?;
            record.projects = args.projects;
            record.tags = args.tags;
            record.color = args.color;

            let id = *record.id();
            ws.time_records
                .save(record, &mut ws.index)
                .into_diagnostic()?;
            if !global.quiet {
                status_ok(&format!("Started {}", style(id).cyan()));
            }
        }
        RecordCommands::Stop(args) => {
            let ended = parse_date_input(&args.at).into_diagnostic()?;
            // newest open record wins; IDs order by creation
            let open = ws
                .time_records
                .all()
                .into_diagnostic()?
                .into_iter()
                .filter(|r| r.deleted.is_none() && r.is_open())
                .last();
            match open {
                Some(mut record) => {
                    record.stop(ended);
                    let id = *record.id();
                    ws.time_records
                        .save(record, &mut ws.index)
                        .into_diagnostic()?;
                    if !global.quiet {
                        status_ok(&format!("Stopped {}", style(id).cyan()));
                    }
                }
                None => return Err(miette::miette!("no running timer")),
            }
        }
        RecordCommands::New(args) => {
            let started = parse_date_input(&args.from).into_diagnostic()?;
            let ended = parse_date_input(&args.to).into_diagnostic()?;
            if ended < started {
                return Err(miette::miette!("record ends before it starts"));
            }
            let mut record = TimeRecord::new(started);
            record.stop(ended);
            record.description = args.description;
            record.tasks = resolve_task_links(&mut ws, &args.tasks)?;
            record.projects = args.projects;
            record.tags = args.tags;
            record.color = args.color;

            let id = *record.id();
            ws.time_records
                .save(record, &mut ws.index)
                .into_diagnostic()?;
            if !global.quiet {
                status_ok(&format!("Recorded {}", style(id).cyan()));
            }
        }
        RecordCommands::List(args) => {
            let options = args.query.to_options(&config)?;
            let rows =
                list(&mut ws.time_records, &mut ws.numbers, &options).into_diagnostic()?;

            let mut table = Table::new(&["#", "started", "ended", "description", "projects"]);
            for row in &rows {
                let record = &row.entity;
                table.row(vec![
                    row.number.to_string(),
                    format_date(record.started),
                    if record.is_open() {
                        "(running)".to_string()
                    } else {
                        format_opt_date(record.ended)
                    },
                    truncate_str(record.description.as_deref().unwrap_or(""), 40),
                    record.projects.join(", "),
                ]);
            }
            table.print("time record");
        }
        RecordCommands::Delete(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::TimeRecord, &args.selection)
                .into_diagnostic()?
            {
                ws.time_records.soft_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Deleted {}", style(id).cyan()));
                }
            }
        }
        RecordCommands::Restore(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::TimeRecord, &args.selection)
                .into_diagnostic()?
            {
                ws.time_records.restore(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Restored {}", style(id).cyan()));
                }
            }
        }
        RecordCommands::Purge(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::TimeRecord, &args.selection)
                .into_diagnostic()?
            {
                ws.time_records.hard_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Purged {}", style(id).cyan()));
                }
            }
        }
    }

    ws.flush_all().into_diagnostic()?;
    Ok(())
}

/// Resolve `--task` operands and check that they name real tasks
fn resolve_task_links(ws: &mut Workspace, operands: &[String]) -> Result<Vec<EntityId>> {
    let mut ids = Vec::new();
    for operand in operands {
        for id in
            resolve_operand(&mut ws.numbers, EntityKind::Task, operand).into_diagnostic()?
        {
            ws.tasks.get(&id).into_diagnostic()?;
            ids.push(id);
        }
    }
    Ok(ids)
}
