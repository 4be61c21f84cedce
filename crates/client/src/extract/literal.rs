//! Script-assignment literal extraction.
//!
//! The source page embeds its data as an inline script statement,
//! `const websites = [ ... ];`, rather than serving JSON. Extraction therefore
//! works on the raw text with a regular expression.
//!
//! Only the first assignment in document order is used. The match is
//! non-greedy and stops at the first `];` after the opening `[`, so a `];`
//! inside a string value truncates the literal and the parse stage rejects it.

use super::Extractor;
use radar_core::Error;
use regex::Regex;

/// Extracts the array literal assigned to a named `const`.
#[derive(Debug, Clone)]
pub struct AssignmentExtractor {
    variable: String,
    pattern: Regex,
}

impl AssignmentExtractor {
    /// Extractor for `const <variable> = [...];`.
    pub fn new(variable: &str) -> Self {
        let pattern = Regex::new(&format!(r"(?s)const\s+{}\s*=\s*(\[.*?\]);", regex::escape(variable)))
            .expect("invalid assignment pattern");
        Self { variable: variable.to_string(), pattern }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl Default for AssignmentExtractor {
    fn default() -> Self {
        Self::new("websites")
    }
}

impl Extractor for AssignmentExtractor {
    fn extract<'a>(&self, page: &'a str) -> Result<&'a str, Error> {
        self.pattern
            .captures(page)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::ExtractFailed(format!("could not find `const {} = [...]` in page", self.variable)))
    }

    fn name(&self) -> &str {
        "assignment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_literal() {
        let page = r#"<html><script>const websites = [{"hostname":"a.com"}];</script></html>"#;
        let literal = AssignmentExtractor::default().extract(page).unwrap();
        assert_eq!(literal, r#"[{"hostname":"a.com"}]"#);
    }

    #[test]
    fn test_extract_multiline_literal() {
        let page = "<script>\n  const   websites=[\n    { hostname: 'a.com' },\n    { hostname: 'b.com' },\n  ];\n  render(websites);\n</script>";
        let literal = AssignmentExtractor::default().extract(page).unwrap();
        assert!(literal.starts_with('['));
        assert!(literal.ends_with(']'));
        assert!(literal.contains("b.com"));
        assert!(!literal.contains("render"));
    }

    #[test]
    fn test_extract_first_occurrence_wins() {
        let page = "const websites = [1];\nconst websites = [2];";
        assert_eq!(AssignmentExtractor::default().extract(page).unwrap(), "[1]");
    }

    #[test]
    fn test_extract_stops_at_first_close() {
        let page = "const websites = [[1], [2]];const other = [3];";
        assert_eq!(AssignmentExtractor::default().extract(page).unwrap(), "[[1], [2]]");
    }

    #[test]
    fn test_extract_missing_literal() {
        let page = "<html><script>let websites = fetch('/api');</script></html>";
        let result = AssignmentExtractor::default().extract(page);
        assert!(matches!(result, Err(Error::ExtractFailed(_))));
    }

    #[test]
    fn test_extract_other_variable_ignored() {
        let page = "const tools = [1];";
        assert!(AssignmentExtractor::default().extract(page).is_err());
        assert_eq!(AssignmentExtractor::new("tools").extract(page).unwrap(), "[1]");
    }
}
