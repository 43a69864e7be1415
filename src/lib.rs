//! Daybook: personal records as plain text
//!
//! Tasks, time records, events, spans, notes, logs, and trackers stored as
//! plain-text YAML collections and queried through one filter language.

pub mod cli;
pub mod core;
pub mod entities;
pub mod query;
