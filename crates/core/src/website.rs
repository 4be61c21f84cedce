//! Tracked website records.

use serde::{Deserialize, Serialize};

/// Cache key under which the current website batch is stored.
pub const WEBSITES_CACHE_KEY: &str = "websites_data";

/// A tracked website as published on the source page.
///
/// Unknown fields in the source data are ignored. Optional fields that are
/// absent or `null` deserialize to `None` and are omitted on output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Website {
    /// Unique hostname, used as the lookup key (e.g. `github.com`).
    pub hostname: String,
    /// Display name.
    pub name: String,
    /// Logo URL or path. Not validated as a URL.
    pub logo: String,
    pub description: String,
    /// Average rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Review payload, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_on: Option<ReviewedOn>,
}

/// Review date: an ISO-8601 date string or a numeric Unix timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReviewedOn {
    Date(String),
    Timestamp(serde_json::Number),
}
