//! Lenient parsing of JavaScript array literals.
//!
//! The literal is tried as strict JSON first. If that fails, one
//! normalization pass rewrites the common non-JSON forms and the parse is
//! retried exactly once:
//!
//! 1. every `'` becomes `"`
//! 2. bareword keys after `{` or `,` are quoted (`hostname:` -> `"hostname":`)
//! 3. trailing commas before `]` or `}` are removed
//!
//! Step 1 is not string-aware: a value containing an apostrophe ends up with
//! an unbalanced quote and the whole literal fails to parse. Step 2 can also
//! rewrite a `, word:` sequence inside a string value. Both failures surface
//! as `DeserializeFailed`; no further fallback is attempted.

use radar_core::Error;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static BAREWORD_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\{,]\s*)([A-Za-z_$][A-Za-z0-9_$]*)\s*:").expect("invalid bareword key pattern"));

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]\}])").expect("invalid trailing comma pattern"));

/// Rewrite a JavaScript literal into JSON as far as the simple rules allow.
pub fn normalize_literal(literal: &str) -> String {
    let swapped = literal.replace('\'', "\"");
    let quoted = BAREWORD_KEY.replace_all(&swapped, "${1}\"${2}\":");
    TRAILING_COMMA.replace_all(&quoted, "${1}").into_owned()
}

/// Parse a literal as JSON, retrying once after [`normalize_literal`].
pub fn parse_lenient(literal: &str) -> Result<Value, Error> {
    match serde_json::from_str(literal) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            tracing::debug!(error = %strict_err, "strict JSON parse failed, retrying with normalization");
            serde_json::from_str(&normalize_literal(literal))
                .map_err(|e| Error::DeserializeFailed(format!("failed to parse websites data: {e}")))
        }
    }
}
