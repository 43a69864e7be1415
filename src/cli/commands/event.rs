//! `daybook event` command - calendar events

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    format_date, format_opt_date, open_workspace, status_ok, truncate_str, QueryArgs, Table,
};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityKind;
use crate::entities::Event;
use crate::query::{list, parse_date_input, resolve_operand};

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Create a new event
    New(NewArgs),

    /// List events
    List(ListArgs),

    /// Soft-delete events
    Delete(SelectArgs),

    /// Restore soft-deleted events
    Restore(SelectArgs),

    /// Permanently remove events
    Purge(SelectArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// What the event is
    pub description: String,

    /// Start moment (e.g. "tomorrow", "2026-05-01 09:00")
    #[arg(long)]
    pub start: String,

    /// End moment (optional for point-in-time events)
    #[arg(long)]
    pub end: Option<String>,

    /// Where the event takes place
    #[arg(long)]
    pub location: Option<String>,

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

pub fn run(cmd: EventCommands, global: &GlobalOpts) -> Result<()> {
    let (config, mut ws) = open_workspace(global);

    match cmd {
        EventCommands::New(args) => {
            let start = parse_date_input(&args.start).into_diagnostic()?;
            let mut event = Event::new(args.description, start);
            if let Some(input) = &args.end {
                let end = parse_date_input(input).into_diagnostic()?;
                if end < start {
                    return Err(miette::miette!("event ends before it starts"));
                }
                event.end = Some(end);
            }
            event.location = args.location;
            event.projects = args.projects;
            event.tags = args.tags;
            event.color = args.color;

            let id = *event.id();
            ws.events.save(event, &mut ws.index).into_diagnostic()?;
            if !global.quiet {
                status_ok(&format!("Created event {}", style(id).cyan()));
            }
        }
        EventCommands::List(args) => {
            let options = args.query.to_options(&config)?;
            let rows = list(&mut ws.events, &mut ws.numbers, &options).into_diagnostic()?;

            let mut table = Table::new(&["#", "start", "end", "description", "location"]);
            for row in &rows {
                let event = &row.entity;
                table.row(vec![
                    row.number.to_string(),
                    format_date(event.start),
                    format_opt_date(event.end),
                    truncate_str(&event.description, 40),
                    event.location.clone().unwrap_or_default(),
                ]);
            }
            table.print("event");
        }
        EventCommands::Delete(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Event, &args.selection)
                .into_diagnostic()?
            {
                ws.events.soft_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Deleted {}", style(id).cyan()));
                }
            }
        }
        EventCommands::Restore(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Event, &args.selection)
                .into_diagnostic()?
            {
                ws.events.restore(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Restored {}", style(id).cyan()));
                }
            }
        }
        EventCommands::Purge(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Event, &args.selection)
                .into_diagnostic()?
            {
                ws.events.hard_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Purged {}", style(id).cyan()));
                }
            }
        }
    }

    ws.flush_all().into_diagnostic()?;
    Ok(())
}
