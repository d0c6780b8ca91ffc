//! Type-safe Key-Value caching layer for the Librant storefront.
//!
//! Values are stored as JSON bytes in a pluggable [`KvStore`]. The storefront
//! uses it to keep the shopping cart across page reloads.
//!
//! # Example
//!
//! ```rust
//! use librant_cache::{cache_key, Cache};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Draft {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::in_memory();
//! let key = cache_key!("cart", "user123");
//!
//! cache.set(&key, &Draft { items: vec!["book-1".into()] }).unwrap();
//! let draft: Option<Draft> = cache.get(&key).unwrap();
//! assert_eq!(draft.unwrap().items, vec!["book-1".to_string()]);
//!
//! cache.delete(&key).unwrap();
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KvStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use store::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvStore};
}
