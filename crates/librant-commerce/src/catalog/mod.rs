//! Book catalog module.

mod book;

pub use book::{Book, BookRecord};
