//! Query module - filtering, sorting, and listing

pub mod date;
pub mod filter;
pub mod list;
pub mod sort;

pub use date::{parse_date_input, parse_date_input_at, DateParseError};
pub use filter::{Filter, FilterParseError, FilterValidationError};
pub use list::{list, resolve_operand, ListOptions, ListedEntity, QueryError};
pub use sort::{sort_by_keys, SortKey};
