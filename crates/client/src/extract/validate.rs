//! Whole-batch validation of parsed website data.
//!
//! Every element must deserialize into [`Website`]; one bad element rejects
//! the batch. Extra fields are ignored, optional fields may be missing or
//! null, and `logo` accepts any string.

use radar_core::{Error, Website};
use serde_json::Value;

/// Validate a parsed literal into a typed batch.
pub fn validate_batch(value: Value) -> Result<Vec<Website>, Error> {
    let Value::Array(items) = value else {
        return Err(Error::ValidationFailed(format!("expected an array, got {}", kind_of(&value))));
    };

    let mut websites = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let website: Website = serde_json::from_value(item)
            .map_err(|e| Error::ValidationFailed(format!("element {index}: {e}")))?;

        if website.hostname.is_empty() {
            return Err(Error::ValidationFailed(format!("element {index}: hostname must not be empty")));
        }

        websites.push(website);
    }

    Ok(websites)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
