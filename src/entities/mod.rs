//! Entity type definitions
//!
//! Daybook records eight kinds of entity:
//!
//! - [`Task`] - things to do, with due dates and estimates
//! - [`TimeRecord`] - blocks of time spent, optionally linked to tasks
//! - [`Event`] - calendar events
//! - [`Span`] - multi-day spans (trips, sprints, illnesses)
//! - [`Note`] - free-form text, optionally attached to another entity
//! - [`Log`] - short journal lines
//! - [`Tracker`] - recurring things being measured
//! - [`TrackerEntry`] - individual data points for a tracker

pub mod event;
pub mod log;
pub mod note;
pub mod span;
pub mod task;
pub mod time_record;
pub mod tracker;
pub mod tracker_entry;

pub use event::Event;
pub use log::Log;
pub use note::Note;
pub use span::Span;
pub use task::Task;
pub use time_record::TimeRecord;
pub use tracker::{Frequency, Tracker, ValueKind};
pub use tracker_entry::{EntryValue, TrackerEntry};
