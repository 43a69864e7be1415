//! `daybook note` command - free-form notes

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    format_date, open_workspace, status_ok, truncate_str, QueryArgs, Table,
};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};
use crate::entities::Note;
use crate::query::{list, resolve_operand};

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Create a new note
    New(NewArgs),

    /// Show a note in full
    Show(SelectArgs),

    /// Edit a note's body in your editor
    Edit(SelectArgs),

    /// List notes
    List(ListArgs),

    /// Soft-delete notes
    Delete(SelectArgs),

    /// Restore soft-deleted notes
    Restore(SelectArgs),

    /// Permanently remove notes
    Purge(SelectArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// The note body
    pub content: String,

    /// Entity to attach the note to (full ID of any kind)
    #[arg(long)]
    pub attach: Option<String>,

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

pub fn run(cmd: NoteCommands, global: &GlobalOpts) -> Result<()> {
    let (config, mut ws) = open_workspace(global);

    match cmd {
        NoteCommands::New(args) => {
            let mut note = Note::new(args.content);
            if let Some(target) = &args.attach {
                note.attached_to = Some(EntityId::parse(target).into_diagnostic()?);
            }
            note.projects = args.projects;
            note.tags = args.tags;
            note.color = args.color;

            let id = *note.id();
            ws.notes.save(note, &mut ws.index).into_diagnostic()?;
            if !global.quiet {
                status_ok(&format!("Created note {}", style(id).cyan()));
            }
        }
        NoteCommands::Show(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Note, &args.selection)
                .into_diagnostic()?
            {
                let note = ws.notes.get(&id).into_diagnostic()?;
                println!("{}", style(id).cyan());
                println!("{}", style(format_date(note.created)).dim());
                if let Some(target) = note.attached_to {
                    println!("{}", style(format!("attached to {target}")).dim());
                }
                println!();
                println!("{}", note.content);
            }
        }
        NoteCommands::Edit(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Note, &args.selection)
                .into_diagnostic()?
            {
                let mut note = ws.notes.get(&id).into_diagnostic()?;
                let scratch = std::env::temp_dir().join(format!("{id}.md"));
                std::fs::write(&scratch, &note.content).into_diagnostic()?;

                let status = config.run_editor(&scratch).into_diagnostic()?;
                if !status.success() {
                    return Err(miette::miette!("editor exited with {status}"));
                }
                note.content = std::fs::read_to_string(&scratch)
                    .into_diagnostic()?
                    .trim_end()
                    .to_string();
                let _ = std::fs::remove_file(&scratch);

                ws.notes.save(note, &mut ws.index).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Updated {}", style(id).cyan()));
                }
            }
        }
        NoteCommands::List(args) => {
            let options = args.query.to_options(&config)?;
            let rows = list(&mut ws.notes, &mut ws.numbers, &options).into_diagnostic()?;

            let mut table = Table::new(&["#", "created", "content", "attached to", "tags"]);
            for row in &rows {
                let note = &row.entity;
                table.row(vec![
                    row.number.to_string(),
                    format_date(note.created),
                    truncate_str(&note.content, 50),
                    note.attached_to
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                    note.tags.join(", "),
                ]);
            }
            table.print("note");
        }
        NoteCommands::Delete(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Note, &args.selection)
                .into_diagnostic()?
            {
                ws.notes.soft_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Deleted {}", style(id).cyan()));
                }
            }
        }
        NoteCommands::Restore(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Note, &args.selection)
                .into_diagnostic()?
            {
                ws.notes.restore(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Restored {}", style(id).cyan()));
                }
            }
        }
        NoteCommands::Purge(args) => {
            for id in resolve_operand(&mut ws.numbers, EntityKind::Note, &args.selection)
                .into_diagnostic()?
            {
                ws.notes.hard_delete(&id).into_diagnostic()?;
                if !global.quiet {
                    status_ok(&format!("Purged {}", style(id).cyan()));
                }
            }
        }
    }

    ws.flush_all().into_diagnostic()?;
    Ok(())
}
