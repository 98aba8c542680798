//! Fetch-or-cache orchestration for shows and episode lists.

use crate::api::CatalogSource;
use crate::cache::EpisodeCache;
use crate::error::LoadError;
use crate::types::{Episode, Show, ShowId};
use log::{debug, warn};
use std::future::Future;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercased name with accents removed, so "Élite" files under "e".
fn collation_key(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Sort shows by name, ignoring case and then accents, keeping source order
/// for ties.
pub fn sort_shows(shows: &mut [Show]) {
    shows.sort_by_cached_key(|show| (collation_key(&show.name), show.name.to_lowercase()));
}

/// Loads shows and episode lists, memoizing episode lists per show.
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    cache: EpisodeCache,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            cache: EpisodeCache::new(),
        }
    }

    /// Fetch every show, sorted by name.
    ///
    /// On failure no partial list is returned; callers treat it as zero shows.
    pub async fn load_shows(&self) -> Result<Vec<Show>, LoadError> {
        let mut shows = self.source.fetch_shows().await.inspect_err(|e| {
            warn!("{}", e);
        })?;
        sort_shows(&mut shows);
        Ok(shows)
    }

    /// Episodes of `show_id`, from the cache when possible.
    ///
    /// A miss issues one fetch and caches the result on success. A failure
    /// leaves the cache untouched, so calling again retries.
    pub async fn load_episodes(&mut self, show_id: ShowId) -> Result<Arc<[Episode]>, LoadError> {
        if let Some(cached) = self.cached_episodes(show_id) {
            return Ok(cached);
        }
        let fetched = self.fetch_detached(show_id).await;
        self.store_episodes(show_id, fetched)
    }

    /// Cache lookup only.
    pub fn cached_episodes(&self, show_id: ShowId) -> Option<Arc<[Episode]>> {
        let hit = self.cache.get(show_id);
        if hit.is_some() {
            debug!("Episode cache hit for show {}", show_id);
        } else {
            debug!("Episode cache miss for show {}", show_id);
        }
        hit
    }

    /// A fetch for `show_id` that does not borrow the loader.
    ///
    /// Lets the UI run the request on another task and hand the result back
    /// to [`store_episodes`](Self::store_episodes).
    pub fn fetch_detached(
        &self,
        show_id: ShowId,
    ) -> impl Future<Output = Result<Vec<Episode>, LoadError>> + Send + 'static + use<> {
        let source = Arc::clone(&self.source);
        async move { source.fetch_episodes(show_id).await }
    }

    /// Cache a successful fetch, or pass the failure through untouched.
    pub fn store_episodes(
        &mut self,
        show_id: ShowId,
        result: Result<Vec<Episode>, LoadError>,
    ) -> Result<Arc<[Episode]>, LoadError> {
        match result {
            Ok(episodes) => Ok(self.cache.put(show_id, episodes)),
            Err(e) => {
                warn!("{}", e);
                Err(e)
            }
        }
    }

    pub fn cache(&self) -> &EpisodeCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FakeSource {
        shows: Vec<Show>,
        fail: AtomicBool,
        episode_calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(names: &[&str]) -> Self {
            let shows = names
                .iter()
                .enumerate()
                .map(|(i, name)| Show {
                    id: i as ShowId + 1,
                    name: name.to_string(),
                    summary: None,
                    genres: Vec::new(),
                    status: "Ended".to_string(),
                    rating: None,
                    runtime: None,
                    image_url: None,
                })
                .collect();
            Self {
                shows,
                fail: AtomicBool::new(false),
                episode_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn fetch_shows(&self) -> Result<Vec<Show>, LoadError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(LoadError::new("shows", "offline"));
            }
            Ok(self.shows.clone())
        }

        async fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, LoadError> {
            self.episode_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(LoadError::new(format!("episodes for show {}", show_id), "offline"));
            }
            Ok(vec![Episode {
                season: 1,
                number: 1,
                name: format!("Pilot of {}", show_id),
                summary: None,
                image_url: None,
            }])
        }
    }

    fn names(shows: &[Show]) -> Vec<&str> {
        shows.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_sort_shows_case_insensitive() {
        let source = FakeSource::new(&["banshee", "Archer", "castle", "Alf"]);
        let mut shows = source.shows;
        sort_shows(&mut shows);
        assert_eq!(names(&shows), ["Alf", "Archer", "banshee", "castle"]);
    }

    #[test]
    fn test_sort_shows_accented_names_with_base_letter() {
        let source = FakeSource::new(&["Zoo", "Élite", "Fargo", "Ångström"]);
        let mut shows = source.shows;
        sort_shows(&mut shows);
        assert_eq!(names(&shows), ["Ångström", "Élite", "Fargo", "Zoo"]);
    }

    #[test]
    fn test_sort_shows_unaccented_before_accented() {
        let source = FakeSource::new(&["Élite", "elite", "Emma"]);
        let mut shows = source.shows;
        sort_shows(&mut shows);
        assert_eq!(names(&shows), ["elite", "Élite", "Emma"]);
    }

    #[test]
    fn test_sort_shows_is_stable_for_ties() {
        let source = FakeSource::new(&["Lost", "LOST", "lost"]);
        let mut shows = source.shows;
        sort_shows(&mut shows);
        let ids: Vec<ShowId> = shows.iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_load_shows_sorted() {
        let loader = CatalogLoader::new(Arc::new(FakeSource::new(&["Zoo", "archer", "Bones"])));
        let shows = loader.load_shows().await.unwrap();
        assert_eq!(names(&shows), ["archer", "Bones", "Zoo"]);
    }

    #[tokio::test]
    async fn test_load_shows_failure_has_no_data() {
        let source = FakeSource::new(&["Zoo"]);
        source.fail.store(true, Ordering::SeqCst);
        let loader = CatalogLoader::new(Arc::new(source));
        let err = loader.load_shows().await.unwrap_err();
        assert_eq!(err.context(), "shows");
    }

    #[tokio::test]
    async fn test_load_episodes_fetches_once() {
        let source = Arc::new(FakeSource::new(&[]));
        let mut loader = CatalogLoader::new(source.clone());

        let first = loader.load_episodes(82).await.unwrap();
        let second = loader.load_episodes(82).await.unwrap();

        assert_eq!(source.episode_calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert!(loader.cache().contains(82));
    }

    #[tokio::test]
    async fn test_load_episodes_failure_leaves_cache_empty() {
        let source = Arc::new(FakeSource::new(&[]));
        source.fail.store(true, Ordering::SeqCst);
        let mut loader = CatalogLoader::new(source.clone());

        assert!(loader.load_episodes(82).await.is_err());
        assert!(!loader.cache().contains(82));

        source.fail.store(false, Ordering::SeqCst);
        let episodes = loader.load_episodes(82).await.unwrap();
        assert_eq!(episodes[0].name, "Pilot of 82");
        assert_eq!(source.episode_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_detached_fetch_then_store() {
        let source = Arc::new(FakeSource::new(&[]));
        let mut loader = CatalogLoader::new(source.clone());

        assert!(loader.cached_episodes(7).is_none());
        let result = tokio::spawn(loader.fetch_detached(7)).await.unwrap();
        loader.store_episodes(7, result).unwrap();

        assert!(loader.cached_episodes(7).is_some());
    }
}
