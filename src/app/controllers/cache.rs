use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::app::services::syntax::styled::StyledText;

/// Identifies the rendering of one document prefix.
/// Keys minted before a `clear()` carry an older generation and never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    generation: u64,
    language_tag: String,
    position: usize,
}

impl CacheKey {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn language_tag(&self) -> &str {
        &self.language_tag
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub generation: u64,
}

/// Memoizes highlighted prefixes of the current document.
/// Grows until `clear()`; the owner clears it whenever the document changes.
#[derive(Debug, Default)]
pub struct HighlightCache {
    entries: HashMap<CacheKey, Arc<StyledText>>,
    generation: u64,
    hits: u64,
    misses: u64,
}

impl HighlightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self, language_tag: &str, position: usize) -> CacheKey {
        CacheKey {
            generation: self.generation,
            language_tag: language_tag.to_string(),
            position,
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<StyledText>> {
        match self.entries.get(key) {
            Some(styled) => {
                self.hits += 1;
                Some(Arc::clone(styled))
            }
            None => {
                self.misses += 1;
                debug!(tag = %key.language_tag, position = key.position, "highlight cache miss");
                None
            }
        }
    }

    /// Store a rendering. Returns false, storing nothing, for a stale key.
    pub fn put(&mut self, key: CacheKey, styled: Arc<StyledText>) -> bool {
        if key.generation != self.generation {
            return false;
        }
        self.entries.insert(key, styled);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(text: &str) -> Arc<StyledText> {
        Arc::new(StyledText::escaped(text))
    }

    #[test]
    fn test_get_after_put() {
        let mut cache = HighlightCache::new();
        let key = cache.key("javascript", 3);
        assert!(cache.get(&key).is_none());
        assert!(cache.put(key.clone(), styled("let")));
        assert_eq!(cache.get(&key).unwrap().plain_text(), "let");
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_key_distinguishes_tag_and_position() {
        let mut cache = HighlightCache::new();
        cache.put(cache.key("javascript", 3), styled("let"));
        assert!(cache.get(&cache.key("python", 3)).is_none());
        assert!(cache.get(&cache.key("javascript", 2)).is_none());
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut cache = HighlightCache::new();
        cache.put(cache.key("javascript", 1), styled("l"));
        cache.put(cache.key("javascript", 2), styled("le"));
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&cache.key("javascript", 1)).is_none());
    }

    #[test]
    fn test_stale_key_rejected_after_clear() {
        let mut cache = HighlightCache::new();
        let stale = cache.key("javascript", 5);
        cache.clear();
        assert!(!cache.put(stale.clone(), styled("hello")));
        assert!(cache.is_empty());
        assert!(cache.get(&stale).is_none());
        assert_eq!(cache.stats().generation, 1);
    }
}
