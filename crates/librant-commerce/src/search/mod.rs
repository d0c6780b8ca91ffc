//! Book browsing filters.
//!
//! Parses filter checkbox values, filters and sorts fetched books, and renders
//! the backend query string.

mod filter;
mod query;

pub use filter::{FilterParseError, FilterToggle, PriceRange};
pub use query::{BookFilter, SortOption};
