//! Command implementations

pub mod completions;
pub mod entry;
pub mod event;
pub mod index;
pub mod init;
pub mod log;
pub mod note;
pub mod record;
pub mod search;
pub mod span;
pub mod task;
pub mod tracker;
pub mod view;
