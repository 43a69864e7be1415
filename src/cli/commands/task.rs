//! `daybook task` command - task management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    format_opt_date, open_workspace, status_ok, truncate_str, QueryArgs, Table,
};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityKind;
use crate::core::Workspace;
use crate::entities::Task;
use crate::query::{list, parse_date_input, resolve_operand};

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a new task
    New(NewArgs),

    /// List tasks
    List(ListArgs),

    /// Mark tasks done
    Done(SelectArgs),

    /// Reopen completed tasks
    Reopen(SelectArgs),

    /// Soft-delete tasks (restorable)
    Delete(SelectArgs),

    /// Restore soft-deleted tasks
    Restore(SelectArgs),

    /// Permanently remove tasks
    Purge(SelectArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// What needs doing
    pub description: String,

    /// Longer free-form details
    #[arg(long)]
    pub details: Option<String>,

    /// Due date (e.g. "tomorrow", "2026-05-01 09:00")
    #[arg(long)]
    pub due: Option<String>,

    /// Scheduled start (same forms as --due)
    #[arg(long)]
    pub scheduled: Option<String>,

    /// Estimated effort in minutes
    #[arg(long, value_name = "MINUTES")]
    pub estimate: Option<u32>,

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

pub fn run(cmd: TaskCommands, global: &GlobalOpts) -> Result<()> {
    let (config, mut ws) = open_workspace(global);

    match cmd {
        TaskCommands::New(args) => new(&mut ws, global, args)?,
        TaskCommands::List(args) => {
            let options = args.query.to_options(&config)?;
            let rows = list(&mut ws.tasks, &mut ws.numbers, &options)
                .into_diagnostic()?;

            let mut table = Table::new(&["#", "description", "due", "done", "projects", "tags"]);
            for row in &rows {
                let task = &row.entity;
                table.row(vec![
                    row.number.to_string(),
                    truncate_str(&task.description, 50),
                    format_opt_date(task.due),
                    if task.completed.is_some() { "✓" } else { "" }.to_string(),
                    task.projects.join(", "),
                    task.tags.join(", "),
                ]);
            }
            table.print("task");
        }
        TaskCommands::Done(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Task, &args.selection)
                .into_diagnostic()?
            {
                let mut task = ws.tasks.get(&id).into_diagnostic()?;
                task.complete();
                ws.tasks
                    .save(task, &mut ws.index)
                    .into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Done {}", style(id).cyan()));
                }
            }
        }
        TaskCommands::Reopen(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Task, &args.selection)
                .into_diagnostic()?
            {
                let mut task = ws.tasks.get(&id).into_diagnostic()?;
                task.reopen();
                ws.tasks
                    .save(task, &mut ws.index)
                    .into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Reopened {}", style(id).cyan()));
                }
            }
        }
        TaskCommands::Delete(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Task, &args.selection)
                .into_diagnostic()?
            {
                ws.tasks
                    .soft_delete(&id)
                    .into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Deleted {}", style(id).cyan()));
                }
            }
        }
        TaskCommands::Restore(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Task, &args.selection)
                .into_diagnostic()?
            {
                ws.tasks.restore(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Restored {}", style(id).cyan()));
                }
            }
        }
        TaskCommands::Purge(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Task, &args.selection)
                .into_diagnostic()?
            {
                ws.tasks
                    .hard_delete(&id)
                    .into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Purged {}", style(id).cyan()));
                }
            }
        }
    }

    ws.flush_all().into_diagnostic()?;
    Ok(())
}

fn new(ws: &mut Workspace, global: &GlobalOpts, args: NewArgs) -> Result<()> {
    let mut task = Task::new(args.description);
    task.details = args.details;
    if let Some(input) = &args.due {
        task.due = Some(parse_date_input(input).into_diagnostic()?);
    }
    if let Some(input) = &args.scheduled {
        task.scheduled = Some(parse_date_input(input).into_diagnostic()?);
    }
    task.estimate_minutes = args.estimate;
    task.projects = args.projects;
    task.tags = args.tags;
    task.color = args.color;

    let id = *task.id();
    ws.tasks
        .save(task, &mut ws.index)
        .into_diagnostic()?;
    if !global.quiet {
        status_ok(&format!("Created task {}", style(id).cyan()));
    } else {
        println!("{id}");
    }
    Ok(())
}
