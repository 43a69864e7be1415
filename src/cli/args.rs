//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs,
    entry::EntryCommands,
    event::EventCommands,
    index::{ProjectsArgs, ResyncArgs, TagsArgs},
    init::InitArgs,
    log::LogCommands,
    note::NoteCommands,
    record::RecordCommands,
    search::SearchArgs,
    span::SpanCommands,
    task::TaskCommands,
    tracker::TrackerCommands,
    view::ViewArgs,
};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(author, version, about = "Daybook - personal records as plain text")]
#[command(
    long_about = "A personal record-keeping tool: tasks, time, events, spans, notes, logs, and trackers stored as plain-text YAML and queried through one filter language."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Data directory (default: config file, then the platform data dir)
    #[arg(long, global = true, env = "DAYBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the data directory
    Init(InitArgs),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Time record management (timers and logged blocks)
    #[command(subcommand)]
    Record(RecordCommands),

    /// Calendar event management
    #[command(subcommand)]
    Event(EventCommands),

    /// Multi-day span management (trips, sprints, illnesses)
    #[command(subcommand)]
    Span(SpanCommands),

    /// Note management
    #[command(subcommand)]
    Note(NoteCommands),

    /// Journal log management
    #[command(subcommand)]
    Log(LogCommands),

    /// Tracker management
    #[command(subcommand)]
    Tracker(TrackerCommands),

    /// Tracker entry management (recorded data points)
    #[command(subcommand)]
    Entry(EntryCommands),

    /// Search text across all kinds
    Search(SearchArgs),

    /// Run a saved view document (filter + sort against one kind)
    View(ViewArgs),

    /// List known projects
    Projects(ProjectsArgs),

    /// List known tags
    Tags(TagsArgs),

    /// Rebuild the project/tag registry from the collections
    Resync(ResyncArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}
