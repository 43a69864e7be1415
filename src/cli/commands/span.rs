//! `daybook span` command - multi-day spans

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    format_date, format_opt_date, open_workspace, status_ok, truncate_str, QueryArgs, Table,
};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityKind;
use crate::entities::Span;
use crate::query::{list, parse_date_input, resolve_operand};

#[derive(Subcommand, Debug)]
pub enum SpanCommands {
    /// Create a new span
    New(NewArgs),

    /// Close an open span
    End(EndArgs),

    /// List spans
    List(ListArgs),

    /// Soft-delete spans
    Delete(SelectArgs),

    /// Restore soft-deleted spans
    Restore(SelectArgs),

    /// Permanently remove spans
    Purge(SelectArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// What the span covers
    pub description: String,

    /// When the span begins (default: today)
    #[arg(long, default_value = "today")]
    pub start: String,

    /// When the span ends (optional while ongoing)
    #[arg(long)]
    pub end: Option<String>,

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
pub struct EndArgs {
    /// Numbers from the last listing or a full ID
    pub selection: String,

    /// End moment (default: today)
    #[arg(long, default_value = "today")]
    pub at: String,
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

pub fn run(cmd: SpanCommands, global: &GlobalOpts) -> Result<()> {
    let (config, mut ws) = open_workspace(global);

    match cmd {
        SpanCommands::New(args) => {
            let start = parse_date_input(&args.start).into_diagnostic()?;
            let mut span = Span::new(args.description, start);
            if let Some(input) = &args.end {
                let end = parse_date_input(input).into_diagnostic()?;
                if end < start {
                    return Err(miette::miette!("span ends before it starts"));
                }
                span.end = Some(end);
            }
            span.projects = args.projects;
            span.tags = args.tags;
            span.color = args.color;

            let id = *span.id();
            ws.spans.save(span, &mut ws.index).into_diagnostic()?;
            if !global.quiet {
                status_ok(&format!("Created span {}", style(id).cyan()));
            }
        }
        SpanCommands::End(args) => {
            let end = parse_date_input(&args.at).into_diagnostic()?;
            for id in resolve_operand(&mut ws.numbers, EntityKind::Span, &args.selection)
                .into_diagnostic()?
            {
                let mut span = ws.spans.get(&id).into_diagnostic()?;
                span.end = Some(end);
                ws.spans.save(span, &mut ws.index).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Ended {}", style(id).cyan()));
                }
            }
        }
        SpanCommands::List(args) => {
            let options = args.query.to_options(&config)?;
            let rows = list(&mut ws.spans, &mut ws.numbers, &options).into_diagnostic()?;

            let mut table = Table::new(&["#", "start", "end", "description", "projects"]);
            for row in &rows {
                let span = &row.entity;
                table.row(vec![
                    row.number.to_string(),
                    format_date(span.start),
                    if span.end.is_none() {
                        "(ongoing)".to_string()
                    } else {
                        format_opt_date(span.end)
                    },
                    truncate_str(&span.description, 40),
                    span.projects.join(", "),
                ]);
            }
            table.print("span");
        }
        SpanCommands::Delete(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Span, &args.selection)
                .into_diagnostic()?
            {
                ws.spans.soft_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Deleted {}", style(id).cyan()));
                }
            }
        }
        SpanCommands::Restore(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Span, &args.selection)
                .into_diagnostic()?
            {
                ws.spans.restore(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Restored {}", style(id).cyan()));
                }
            }
        }
        SpanCommands::Purge(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Span, &args.selection)
                .into_diagnostic()?
            {
                ws.spans.hard_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Purged {}", style(id).cyan()));
                }
            }
        }
    }

    ws.flush_all().into_diagnostic()?;
    Ok(())
}
