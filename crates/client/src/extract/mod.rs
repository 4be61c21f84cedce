//! Extraction of the embedded website data from the source page.
//!
//! ### Stages
//! - [`literal`]: locate the `const websites = [...]` assignment in raw page text.
//! - [`lenient`]: parse the literal as JSON, with one normalization retry.
//! - [`validate`]: check the parsed array against the `Website` schema.
//!
//! ### Stable Abstraction
//! The [`Extractor`] trait decouples the pipeline from the extraction strategy,
//! so a page redesign means a new implementation rather than pipeline changes.

pub mod lenient;
pub mod literal;
pub mod validate;

pub use lenient::{normalize_literal, parse_lenient};
pub use literal::AssignmentExtractor;
pub use validate::validate_batch;

use radar_core::Error;

/// Strategy for pulling the data literal out of unstructured page text.
pub trait Extractor: Send + Sync {
    /// Return the literal substring, borrowed from `page`.
    fn extract<'a>(&self, page: &'a str) -> Result<&'a str, Error>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
