//! Cache layer for the scraped website batch.
//!
//! - [`KeyValueStore`]: backend trait (get / set with TTL / delete / purge)
//! - [`CacheDb`]: SQLite backend via tokio-rusqlite, WAL mode, versioned schema
//! - [`MemoryStore`]: in-process backend
//! - [`TypedCache`]: JSON encoding, read failures downgraded to misses

pub mod connection;
pub mod entries;
pub mod store;
pub mod typed;

pub use crate::Error;

pub use connection::CacheDb;
pub use store::{KeyValueStore, MemoryStore};
pub use typed::TypedCache;
