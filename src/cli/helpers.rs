//! Shared helper functions for CLI commands
//!
//! Workspace opening, the shared query flags, and the aligned-column table
//! used by every list command live here so the per-kind command modules
//! stay thin.

use chrono::{DateTime, Local, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::core::{Config, Workspace};
use crate::query::{Filter, ListOptions, SortKey};

/// Open the workspace named by the global flags, falling back to config
pub fn open_workspace(global: &GlobalOpts) -> (Config, Workspace) {
    let config = Config::load();
    let data_dir = global
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data_dir());
    (config, Workspace::open_dir(data_dir))
}

/// Query flags shared by every `list` subcommand
#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Filter document (inline YAML, or @path to read a file)
    #[arg(long, short = 'F')]
    pub filter: Option<String>,

    /// Sort keys, most significant first (e.g. "due, desc created")
    #[arg(long, short = 's')]
    pub sort: Option<String>,

    /// Include soft-deleted entities
    #[arg(long)]
    pub deleted: bool,

    /// Keep the current numbering instead of renumbering
    #[arg(long)]
    pub keep_numbers: bool,
}

impl QueryArgs {
    pub fn to_options(&self, config: &Config) -> Result<ListOptions> {
        let filter = match &self.filter {
            Some(input) => Some(parse_filter_arg(input)?),
            None => None,
        };
        let sort = self
            .sort
            .as_deref()
            .map(SortKey::parse_list)
            .unwrap_or_default();
        Ok(ListOptions {
            filter,
            include_deleted: self.deleted,
            sort,
            keep_numbers: self.keep_numbers || config.keep_numbers(),
        })
    }
}

/// Parse a `--filter` argument: inline YAML, or `@path` for a file
pub fn parse_filter_arg(input: &str) -> Result<Filter> {
    let document = match input.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).into_diagnostic()?,
        None => input.to_string(),
    };
    Filter::from_yaml(&document).into_diagnostic()
}

/// Format a UTC instant in the local timezone for display
pub fn format_date(when: DateTime<Utc>) -> String {
    when.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_opt_date(when: Option<DateTime<Utc>>) -> String {
    when.map(format_date).unwrap_or_default()
}

/// Truncate to at most max_len characters, adding "..." if truncated.
/// Cuts on char boundaries so multibyte text stays valid.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let end = s
        .char_indices()
        .nth(keep)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    format!("{}...", &s[..end])
}

/// Print a green-check status line
pub fn status_ok(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Aligned-column table for list output
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Print the table with a dimmed header and a count summary
    pub fn print(&self, noun: &str) {
        if self.rows.is_empty() {
            println!("No {noun}s found");
            return;
        }

        let mut widths: Vec<usize> = self.headers.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }

        let header = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", style(header).dim());

        for row in &self.rows {
            let line = row
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{:width$}", cell, width = widths[i]))
                .collect::<Vec<_>>()
                .join("  ");
            println!("{}", line.trim_end());
        }

        println!();
        println!(
            "{} {noun}{}",
            self.rows.len(),
            if self.rows.len() == 1 { "" } else { "s" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("ééé", 4), "ééé");
        assert_eq!(truncate_str("ééééé", 4), "é...");
        assert_eq!(truncate_str("über lange Überschrift", 8), "über ...");
    }

    #[test]
    fn test_parse_filter_arg_inline() {
        let filter = parse_filter_arg("filter_type: tag\nfilter: urgent").unwrap();
        assert!(matches!(filter, Filter::Tag { .. }));
    }

    #[test]
    fn test_parse_filter_arg_rejects_bad_document() {
        assert!(parse_filter_arg("filter_type: nope").is_err());
    }
}
