//! Scrape pipeline for radar.
//!
//! This crate fetches the source page, extracts the embedded website literal,
//! parses it leniently, and validates it into typed records.

pub mod extract;
pub mod fetch;
pub mod pipeline;

pub use extract::{AssignmentExtractor, Extractor, parse_lenient, validate_batch};
pub use fetch::{FetchClient, FetchConfig, PageSource};
pub use pipeline::{ScrapePipeline, WebsiteSource};
