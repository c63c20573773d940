//! Validation utilities for generated identifiers

use miette::SourceSpan;

use crate::{Result, SourceContext};

/// Keywords of the target language that cannot name a package, type or field.
pub(crate) const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var",
];

/// Check if a name is a reserved keyword
pub(crate) fn is_keyword(name: &str) -> bool {
    GO_KEYWORDS.contains(&name)
}

impl SourceContext {
    /// Find the span of a table key such as `[types.User]`.
    pub(crate) fn find_key_span(&self, name: &str) -> Option<SourceSpan> {
        find_name_span(self.src(), name)
    }

    /// Spans of every `"value"` string literal at or after `from`.
    pub(crate) fn find_quoted_spans(&self, value: &str, from: usize) -> Vec<SourceSpan> {
        let src = self.src();
        let needle = format!("\"{}\"", value);
        let from = from.min(src.len());
        src[from..]
            .match_indices(&needle)
            // +1 to skip the opening quote
            .map(|(pos, _)| SourceSpan::from((from + pos + 1, value.len())))
            .collect()
    }

    /// Span of the first occurrence of `text` at or after `from`.
    pub(crate) fn find_text_span(&self, text: &str, from: usize) -> Option<SourceSpan> {
        let src = self.src();
        let from = from.min(src.len());
        src[from..]
            .find(text)
            .map(|pos| SourceSpan::from((from + pos, text.len())))
    }

    /// Validate that a name is a valid identifier.
    pub(crate) fn validate_name(
        &self,
        name: &str,
        kind: &str,
        span: Option<SourceSpan>,
    ) -> Result<()> {
        if is_keyword(name) {
            return Err(self.reserved_keyword_error(name, kind, span));
        }

        if let Some(reason) = validate_identifier(name) {
            return Err(self.invalid_identifier_error(name, kind, reason, span));
        }

        Ok(())
    }
}

/// Find the span of a name in the TOML source
/// Searches for patterns like `.name]`, `.name.`, or `.name =`
pub(crate) fn find_name_span(src: &str, name: &str) -> Option<SourceSpan> {
    let patterns = [
        format!(".{}]", name), // [types.name]
        format!(".{}.", name), // [types.name.something]
        format!(".{} ", name),
        format!(".{}=", name),
    ];

    for pattern in &patterns {
        if let Some(pos) = src.find(pattern) {
            // +1 to skip the leading dot
            let start = pos + 1;
            return Some(SourceSpan::from((start, name.len())));
        }
    }

    src.find(name)
        .map(|pos| SourceSpan::from((pos, name.len())))
}

/// Validate that a name is a valid identifier
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    if chars.any(|c| !(c.is_alphanumeric() || c == '_')) {
        return Some("name must contain only letters, numbers, and underscores");
    }

    None
}
