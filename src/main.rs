use clap::Parser;
use daybook::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => daybook::cli::commands::init::run(args, &global),
        Commands::Task(cmd) => daybook::cli::commands::task::run(cmd, &global),
        Commands::Record(cmd) => daybook::cli::commands::record::run(cmd, &global),
        Commands::Event(cmd) => daybook::cli::commands::event::run(cmd, &global),
        Commands::Span(cmd) => daybook::cli::commands::span::run(cmd, &global),
        Commands::Note(cmd) => daybook::cli::commands::note::run(cmd, &global),
        Commands::Log(cmd) => daybook::cli::commands::log::run(cmd, &global),
        Commands::Tracker(cmd) => daybook::cli::commands::tracker::run(cmd, &global),
        Commands::Entry(cmd) => daybook::cli::commands::entry::run(cmd, &global),
        Commands::Search(args) => daybook::cli::commands::search::run(args, &global),
        Commands::View(args) => daybook::cli::commands::view::run(args, &global),
        Commands::Projects(args) => daybook::cli::commands::index::run_projects(args, &global),
        Commands::Tags(args) => daybook::cli::commands::index::run_tags(args, &global),
        Commands::Resync(args) => daybook::cli::commands::index::run_resync(args, &global),
        Commands::Completions(args) => daybook::cli::commands::completions::run(args),
    }
}
