//! API client for the TVMaze catalog.
//!
//! The catalog is read-only and unauthenticated: one endpoint lists shows,
//! another lists the episodes of a show. [`CatalogSource`] is the seam the
//! rest of the crate talks to; [`TvMazeClient`] is the HTTP implementation.

use crate::config::Config;
use crate::error::{LoadError, Result};
use crate::types::{Episode, RawEpisode, RawShow, Show, ShowId};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

const USER_AGENT: &str = concat!("episode-browser/", env!("CARGO_PKG_VERSION"));
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// A provider of show and episode lists.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every show, in source order.
    async fn fetch_shows(&self) -> std::result::Result<Vec<Show>, LoadError>;

    /// Fetch the episodes of one show, in source order.
    async fn fetch_episodes(&self, show_id: ShowId)
    -> std::result::Result<Vec<Episode>, LoadError>;
}

/// Check if an error is retryable (network errors, timeouts, server errors).
fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_timeout()
        || error.is_connect()
        || error.is_request()
        || error.status().map(|s| s.is_server_error()).unwrap_or(false)
}

/// Delay before retry number `attempt + 1`, doubling from `base_delay` and
/// capped at [`MAX_BACKOFF`].
fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    base_delay
        .saturating_mul(2_u32.saturating_pow(attempt))
        .min(MAX_BACKOFF)
}

/// Retry an async operation with exponential backoff.
///
/// Retries the operation up to `max_retries` times on retryable errors,
/// doubling `base_delay` after each attempt. Non-retryable errors and the
/// last failure are reported as a [`LoadError`] for `context`.
async fn retry_with_backoff<T, F, Fut>(
    context: &str,
    max_retries: u32,
    base_delay: Duration,
    f: F,
) -> std::result::Result<T, LoadError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, reqwest::Error>>,
{
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => {
                if attempt > 0 {
                    info!("Loading {} succeeded after {} attempts", context, attempt + 1);
                }
                return Ok(result);
            }
            Err(e) if attempt < max_retries && is_retryable_error(&e) => {
                let delay = backoff_delay(base_delay, attempt);
                warn!(
                    "Loading {} failed (attempt {}/{}): {}. Retrying in {:?}...",
                    context,
                    attempt + 1,
                    max_retries + 1,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                let reason = match e.status() {
                    Some(status) => format!("HTTP {}", status),
                    None => e.to_string(),
                };
                return Err(LoadError::new(context, reason));
            }
        }
    }
}

/// HTTP client for the TVMaze REST API.
#[derive(Debug, Clone)]
pub struct TvMazeClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl TvMazeClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.catalog_base.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        })
    }

    /// URL of the show listing.
    pub fn shows_url(&self) -> String {
        format!("{}/shows", self.base_url)
    }

    /// URL of a show's episode listing.
    pub fn episodes_url(&self, show_id: ShowId) -> String {
        format!("{}/shows/{}/episodes", self.base_url, show_id)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> std::result::Result<T, LoadError> {
        let resp = retry_with_backoff(context, self.max_retries, self.retry_delay, || {
            let request = self.client.get(url);
            async move { request.send().await?.error_for_status() }
        })
        .await?;

        resp.json::<T>()
            .await
            .map_err(|e| LoadError::new(context, format!("malformed response: {}", e)))
    }
}

#[async_trait]
impl CatalogSource for TvMazeClient {
    async fn fetch_shows(&self) -> std::result::Result<Vec<Show>, LoadError> {
        let url = self.shows_url();
        debug!("Fetching shows from {}", url);

        let raw: Vec<RawShow> = self.get_json(&url, "shows").await?;
        let shows: Vec<Show> = raw.into_iter().map(Show::from).collect();

        debug!("Fetched {} shows", shows.len());
        Ok(shows)
    }

    async fn fetch_episodes(
        &self,
        show_id: ShowId,
    ) -> std::result::Result<Vec<Episode>, LoadError> {
        let url = self.episodes_url(show_id);
        debug!("Fetching episodes for show {} from {}", show_id, url);

        let context = format!("episodes for show {}", show_id);
        let raw: Vec<RawEpisode> = self.get_json(&url, &context).await?;
        let episodes: Vec<Episode> = raw.into_iter().map(Episode::from).collect();

        debug!("Fetched {} episodes for show {}", episodes.len(), show_id);
        Ok(episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> TvMazeClient {
        let config = Config {
            catalog_base: base.to_string(),
            timeout_secs: 1,
            max_retries: 0,
            retry_delay_ms: 1,
        };
        TvMazeClient::new(&config).unwrap()
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 2), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 10), MAX_BACKOFF);
        assert_eq!(backoff_delay(base, 40), MAX_BACKOFF);
        assert_eq!(backoff_delay(base, u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn test_urls_from_default_base() {
        let client = TvMazeClient::new(&Config::new()).unwrap();
        assert_eq!(client.shows_url(), "https://api.tvmaze.com/shows");
        assert_eq!(
            client.episodes_url(82),
            "https://api.tvmaze.com/shows/82/episodes"
        );
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let client = client_for("http://localhost:9000/");
        assert_eq!(client.shows_url(), "http://localhost:9000/shows");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_load_error() {
        // Port 9 (discard) on loopback is closed on test machines.
        let client = client_for("http://127.0.0.1:9");
        let err = client.fetch_episodes(82).await.unwrap_err();
        assert_eq!(err.context(), "episodes for show 82");
    }

    #[test]
    fn test_episode_list_payload_decodes() {
        let json = r#"[
            {"id": 4952, "season": 1, "number": 1, "name": "Winter is Coming",
             "summary": "<p>Lord Eddard Stark...</p>",
             "image": {"medium": "https://static.tvmaze.com/ep1.jpg", "original": null}},
            {"id": 4953, "season": 1, "number": 2, "name": "The Kingsroad",
             "summary": null, "image": null}
        ]"#;

        let raw: Vec<RawEpisode> = serde_json::from_str(json).unwrap();
        let episodes: Vec<Episode> = raw.into_iter().map(Episode::from).collect();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].to_display(), "S01E01 - Winter is Coming");
        assert_eq!(
            episodes[0].image_url.as_deref(),
            Some("https://static.tvmaze.com/ep1.jpg")
        );
        assert!(episodes[1].summary.is_none());
    }
}
