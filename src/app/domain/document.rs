use std::sync::Arc;

use crate::app::services::syntax::classifier::{self, PLAINTEXT};

/// The text being presented. Immutable once built; swapping documents means
/// building a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    text: Arc<str>,
    language_tag: String,
    file_name: String,
    char_len: usize,
}

impl SourceDocument {
    pub fn new(text: impl Into<Arc<str>>, language_tag: impl Into<String>, file_name: impl Into<String>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self {
            text,
            language_tag: language_tag.into(),
            file_name: file_name.into(),
            char_len,
        }
    }

    /// Build a document, deriving the language from the file name.
    pub fn from_file(file_name: &str, text: impl Into<Arc<str>>) -> Self {
        Self::new(text, classifier::classify(file_name), file_name)
    }

    pub fn empty() -> Self {
        Self::new("", PLAINTEXT, "")
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language_tag(&self) -> &str {
        &self.language_tag
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// The first `chars` characters. Clamped to the whole text.
    pub fn prefix(&self, chars: usize) -> &str {
        if chars >= self.char_len {
            return &self.text;
        }
        let end = self
            .text
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    /// Same name and language, new text.
    pub fn with_text(&self, text: impl Into<Arc<str>>) -> Self {
        Self::new(text, self.language_tag.clone(), self.file_name.clone())
    }
}

impl Default for SourceDocument {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_classifies() {
        let doc = SourceDocument::from_file("demo.py", "print(1)");
        assert_eq!(doc.language_tag(), "python");
        assert_eq!(doc.file_name(), "demo.py");
        assert_eq!(doc.len(), 8);
    }

    #[test]
    fn test_prefix_counts_characters() {
        let doc = SourceDocument::new("héllo wörld", "plaintext", "a.txt");
        assert_eq!(doc.len(), 11);
        assert_eq!(doc.prefix(0), "");
        assert_eq!(doc.prefix(2), "hé");
        assert_eq!(doc.prefix(8), "héllo wö");
        assert_eq!(doc.prefix(50), "héllo wörld");
    }

    #[test]
    fn test_empty_document() {
        let doc = SourceDocument::empty();
        assert!(doc.is_empty());
        assert_eq!(doc.language_tag(), PLAINTEXT);
        assert_eq!(doc.prefix(3), "");
    }

    #[test]
    fn test_with_text_keeps_identity() {
        let doc = SourceDocument::from_file("a.js", "let a");
        let edited = doc.with_text("let b = 2;");
        assert_eq!(edited.file_name(), "a.js");
        assert_eq!(edited.language_tag(), "javascript");
        assert_eq!(edited.len(), 10);
    }
}
