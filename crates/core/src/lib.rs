//! Core types and shared functionality for radar.
//!
//! This crate provides:
//! - The `Website` record model
//! - Key-value cache backends (SQLite and in-memory) with a typed JSON wrapper
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod website;

pub use cache::{CacheDb, KeyValueStore, MemoryStore, TypedCache};
pub use config::AppConfig;
pub use error::Error;
pub use website::{ReviewedOn, WEBSITES_CACHE_KEY, Website};
