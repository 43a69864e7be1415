//! `daybook log` command - journal lines

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    format_date, open_workspace, status_ok, truncate_str, QueryArgs, Table,
};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityKind;
use crate::entities::Log;
use crate::query::{list, resolve_operand};

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Write a journal line
    New(NewArgs),

    /// List journal lines
    List(ListArgs),

    /// Soft-delete journal lines
    Delete(SelectArgs),

    /// Restore soft-deleted journal lines
    Restore(SelectArgs),

    /// Permanently remove journal lines
    Purge(SelectArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// The journal line
    pub message: String,

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

pub fn run(cmd: LogCommands, global: &GlobalOpts) -> Result<()> {
    let (config, mut ws) = open_workspace(global);

    match cmd {
        LogCommands::New(args) => {
            let mut log = Log::new(args.message);
            log.projects = args.projects;
            log.tags = args.tags;
            log.color = args.color;

            let id = *log.id();
            ws.logs.save(log, &mut ws.index).into_diagnostic()?;
            if !global.quiet {
                status_ok(&format!("Logged {}", style(id).cyan()));
            }
        }
        LogCommands::List(args) => {
            let options = args.query.to_options(&config)?;
            let rows = list(&mut ws.logs, &mut ws.numbers, &options).into_diagnostic()?;

            let mut table = Table::new(&["#", "when", "message", "projects", "tags"]);
            for row in &rows {
                let log = &row.entity;
                table.row(vec![
                    row.number.to_string(),
                    format_date(log.created),
                    truncate_str(&log.message, 60),
                    log.projects.join(", "),
                    log.tags.join(", "),
                ]);
            }
            table.print("log");
        }
        LogCommands::Delete(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Log, &args.selection)
                .into_diagnostic()?
            {
                ws.logs.soft_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Deleted {}", style(id).cyan()));
                }
            }
        }
        LogCommands::Restore(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Log, &args.selection)
                .into_diagnostic()?
            {
                ws.logs.restore(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Restored {}", style(id).cyan()));
                }
            }
        }
        LogCommands::Purge(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Log, &args.selection)
                .into_diagnostic()?
            {
                ws.logs.hard_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Purged {}", style(id).cyan()));
                }
            }
        }
    }

    ws.flush_all().into_diagnostic()?;
    Ok(())
}
