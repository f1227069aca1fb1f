//! Free-text search over a schema's searchable fields.

use crate::value::Value;

/// Prepared search text: trimmed and case-folded once per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText {
    needle: String,
}

impl SearchText {
    /// Normalizes raw search input. Returns `None` when nothing is left after
    /// trimming, which makes the search stage a pass-through.
    pub fn new(raw: &str) -> Option<SearchText> {
        let needle = normalize(raw);
        (!needle.is_empty()).then_some(SearchText { needle })
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Returns `true` if the needle is a substring of the value, or of any
    /// of its tags.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match value {
            Value::Text(text) => normalize(text).contains(&self.needle),
            Value::Tags(tags) => tags
                .iter()
                .any(|tag| normalize(tag).contains(&self.needle)),
            _ => false,
        }
    }
}

/// Case-folds and trims text for comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
