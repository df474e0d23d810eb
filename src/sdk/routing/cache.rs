use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// Suggestion lists keyed by the exact text that produced them.
///
/// Clones share the same map, so a background lookup can fill it while the
/// control flow reads it. Entries live for the whole process; nothing is
/// evicted and nothing is written to disk.
#[derive(Debug, Clone, Default)]
pub struct SuggestionCache {
    suggestions: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl SuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str) -> Option<Vec<String>> {
        self.suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(query)
            .cloned()
    }

    pub fn put(&self, query: &str, names: Vec<String>) {
        self.suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(query.to_string(), names);
    }

    pub fn len(&self) -> usize {
        self.suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_returns_the_same_list() {
        let cache = SuggestionCache::new();
        let names = vec!["Berlin, Deutschland".to_string(), "Berlingen".to_string()];
        cache.put("berl", names.clone());
        assert_eq!(cache.get("berl"), Some(names));
    }

    #[test]
    fn keys_are_exact_strings() {
        let cache = SuggestionCache::new();
        cache.put("Berl", vec!["Berlin".to_string()]);
        assert_eq!(cache.get("berl"), None);
        assert_eq!(cache.get("Berl "), None);
        assert!(cache.get("Berl").is_some());
    }

    #[test]
    fn clones_share_entries() {
        let cache = SuggestionCache::new();
        let writer = cache.clone();
        writer.put("pari", Vec::new());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("pari"), Some(Vec::new()));
    }
}
