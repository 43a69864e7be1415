//! `daybook projects` / `tags` / `resync` - registry maintenance

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_workspace, status_ok};
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct ProjectsArgs {}

#[derive(clap::Args, Debug)]
pub struct TagsArgs {}

#[derive(clap::Args, Debug)]
pub struct ResyncArgs {}

pub fn run_projects(_args: ProjectsArgs, global: &GlobalOpts) -> Result<()> {
    let (_, mut ws) = open_workspace(global);
    let projects = ws.index.projects().into_diagnostic()?;
    if projects.is_empty() && !global.quiet {
        println!("No projects registered");
        return Ok(());
    }
    for project in projects {
        println!("{project}");
    }
    Ok(())
}

pub fn run_tags(_args: TagsArgs, global: &GlobalOpts) -> Result<()> {
    let (_, mut ws) = open_workspace(global);
    let tags = ws.index.tags().into_diagnostic()?;
    if tags.is_empty() && !global.quiet {
        println!("No tags registered");
        return Ok(());
    }
    for tag in tags {
        println!("{tag}");
    }
    Ok(())
}

pub fn run_resync(_args: ResyncArgs, global: &GlobalOpts) -> Result<()> {
    let (_, mut ws) = open_workspace(global);
    let report = ws.resync_index().into_diagnostic()?;
    ws.flush_all().into_diagnostic()?;

    if global.quiet {
        return Ok(());
    }
    if report.is_clean() {
        status_ok("Registry already in sync");
        return Ok(());
    }
    for project in &report.added_projects {
        println!("{} project {}", style("+").green(), project);
    }
    for project in &report.dropped_projects {
        println!("{} project {}", style("-").red(), project);
    }
    for tag in &report.added_tags {
        println!("{} tag {}", style("+").green(), tag);
    }
    for tag in &report.dropped_tags {
        println!("{} tag {}", style("-").red(), tag);
    }
    status_ok("Registry resynced");
    Ok(())
}
