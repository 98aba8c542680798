//! Catalog view state: shows, the active episode list, filter and selection.

use crate::error::{AppError, Result};
use crate::projection::{Projection, project, project_shows};
use crate::types::{Episode, Show, ShowId};
use std::collections::HashMap;
use std::sync::Arc;

/// Identifies one episode fetch; later requests supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Session view state.
///
/// Invariant: `selected_episode_index` is cleared whenever the episode list
/// is replaced or the filter term changes. At most one fetch per show is
/// outstanding at a time.
#[derive(Debug)]
pub struct CatalogState {
    shows: Vec<Show>,
    selected_show: Option<ShowId>,
    current_episodes: Arc<[Episode]>,
    filter_term: String,
    selected_episode_index: Option<usize>,
    last_token: u64,
    in_flight: Option<(RequestToken, ShowId)>,
    fetching: HashMap<ShowId, RequestToken>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self {
            shows: Vec::new(),
            selected_show: None,
            current_episodes: Arc::from(Vec::new()),
            filter_term: String::new(),
            selected_episode_index: None,
            last_token: 0,
            in_flight: None,
            fetching: HashMap::new(),
        }
    }

    /// Replace the show listing. Expects shows already sorted by name.
    pub fn set_shows(&mut self, shows: Vec<Show>) {
        self.shows = shows;
    }

    /// Switch to `show_id` with its episode list, or back to no show.
    ///
    /// The episode selection is cleared; the filter term is kept. Any
    /// in-flight episode request becomes stale.
    pub fn select_show(&mut self, show_id: Option<ShowId>, episodes: Arc<[Episode]>) {
        self.selected_show = show_id;
        self.current_episodes = match show_id {
            Some(_) => episodes,
            None => Arc::from(Vec::new()),
        };
        self.selected_episode_index = None;
        self.in_flight = None;
    }

    /// Set the search term. Search takes precedence over a single selection.
    pub fn set_filter_term(&mut self, term: impl Into<String>) {
        self.filter_term = term.into();
        self.selected_episode_index = None;
    }

    /// Select one episode by index into the current list, or `None` for all.
    ///
    /// An index outside the current list is rejected and nothing changes.
    pub fn select_episode_index(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(i) = index {
            if i >= self.current_episodes.len() {
                return Err(AppError::InvalidInput(format!(
                    "episode index {} out of range for {} episodes",
                    i,
                    self.current_episodes.len()
                )));
            }
        }
        self.selected_episode_index = index;
        Ok(())
    }

    /// Make `show_id` the request the view waits for, superseding any other.
    ///
    /// Returns the token for a new fetch, or `None` when a fetch for that
    /// show is still running; that fetch becomes current again.
    pub fn begin_request(&mut self, show_id: ShowId) -> Option<RequestToken> {
        if let Some(&running) = self.fetching.get(&show_id) {
            self.in_flight = Some((running, show_id));
            return None;
        }
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.fetching.insert(show_id, token);
        self.in_flight = Some((token, show_id));
        Some(token)
    }

    /// Whether a completion for `token` should still be applied.
    ///
    /// The fetch is no longer running either way. Clears the in-flight
    /// marker when the completion is current.
    pub fn finish_request(&mut self, token: RequestToken) -> bool {
        self.fetching.retain(|_, running| *running != token);
        match self.in_flight {
            Some((current, _)) if current == token => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Whether an episode request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Show whose episodes the view is waiting for, if any.
    pub fn pending_show(&self) -> Option<ShowId> {
        self.in_flight.map(|(_, id)| id)
    }

    /// Whether a fetch for `show_id` is still running, current or not.
    pub fn is_fetching(&self, show_id: ShowId) -> bool {
        self.fetching.contains_key(&show_id)
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn selected_show(&self) -> Option<ShowId> {
        self.selected_show
    }

    /// The selected show's record, if it is in the listing.
    pub fn selected_show_info(&self) -> Option<&Show> {
        self.find_show(self.selected_show?)
    }

    pub fn find_show(&self, show_id: ShowId) -> Option<&Show> {
        self.shows.iter().find(|s| s.id == show_id)
    }

    pub fn current_episodes(&self) -> &[Episode] {
        &self.current_episodes
    }

    pub fn filter_term(&self) -> &str {
        &self.filter_term
    }

    pub fn selected_episode_index(&self) -> Option<usize> {
        self.selected_episode_index
    }

    /// Visible episodes for the current filter and selection.
    pub fn projection(&self) -> Projection<'_, Episode> {
        project(
            &self.current_episodes,
            &self.filter_term,
            self.selected_episode_index,
        )
    }

    /// The show listing.
    pub fn show_projection(&self) -> Projection<'_, Show> {
        project_shows(&self.shows)
    }
}
