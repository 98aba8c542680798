//! Session-lifetime memoization of episode lists per show.

use crate::types::{Episode, ShowId};
use std::collections::HashMap;
use std::sync::Arc;

/// Show id to episode list.
///
/// Entries are added on the first successful fetch and are never evicted or
/// replaced for the rest of the session.
#[derive(Debug, Default)]
pub struct EpisodeCache {
    entries: HashMap<ShowId, Arc<[Episode]>>,
}

impl EpisodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached episodes for `show_id`, shared with the cache.
    pub fn get(&self, show_id: ShowId) -> Option<Arc<[Episode]>> {
        self.entries.get(&show_id).cloned()
    }

    /// Store the episodes of `show_id` and return the cached list.
    ///
    /// If the show is already cached the existing list is kept and returned.
    pub fn put(&mut self, show_id: ShowId, episodes: Vec<Episode>) -> Arc<[Episode]> {
        Arc::clone(
            self.entries
                .entry(show_id)
                .or_insert_with(|| Arc::from(episodes)),
        )
    }

    pub fn contains(&self, show_id: ShowId) -> bool {
        self.entries.contains_key(&show_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episodes(names: &[&str]) -> Vec<Episode> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Episode {
                season: 1,
                number: i as u32 + 1,
                name: name.to_string(),
                summary: None,
                image_url: None,
            })
            .collect()
    }

    #[test]
    fn test_get_miss_on_empty_cache() {
        let cache = EpisodeCache::new();
        assert!(cache.get(82).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_then_get_keeps_order() {
        let mut cache = EpisodeCache::new();
        cache.put(82, episodes(&["Pilot", "Second", "Third"]));

        let cached = cache.get(82).unwrap();
        let names: Vec<&str> = cached.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Pilot", "Second", "Third"]);
        assert!(cache.contains(82));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_does_not_replace_existing_entry() {
        let mut cache = EpisodeCache::new();
        let first = cache.put(82, episodes(&["Pilot"]));
        let second = cache.put(82, episodes(&["Other"]));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.get(82).unwrap()[0].name, "Pilot");
    }

    #[test]
    fn test_get_returns_shared_list() {
        let mut cache = EpisodeCache::new();
        let stored = cache.put(1, episodes(&["A"]));
        assert!(Arc::ptr_eq(&stored, &cache.get(1).unwrap()));
    }
}
