//! Command dispatch over the catalog loader and view state.
//!
//! Input handlers translate user events into a [`Command`]; the
//! [`Catalog`] applies it, fetching episode lists when the cache misses.

use crate::api::CatalogSource;
use crate::error::{LoadError, Result};
use crate::loader::CatalogLoader;
use crate::state::{CatalogState, RequestToken};
use crate::types::{Episode, ShowId};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;

/// A state transition requested by an input collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch to a show, or back to the show listing with `None`
    SelectShow(Option<ShowId>),
    /// Change the episode search term
    SetFilterTerm(String),
    /// Pick one episode by index into the current list, or `None` for all
    SelectEpisode(Option<usize>),
}

/// An episode fetch the caller must run and hand back to [`Catalog::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFetch {
    pub token: RequestToken,
    pub show_id: ShowId,
}

/// Result of [`Catalog::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// The state already reflects the command, or a running fetch covers it
    Done,
    /// Episodes must be fetched first
    Fetch(PendingFetch),
}

/// Result of applying a finished fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The episode list is now current
    Applied,
    /// A newer selection superseded the request; nothing visible changed
    Stale,
    /// The current request failed; prior state is intact
    Failed(LoadError),
}

/// Owns the loader and the view state for one session.
pub struct Catalog {
    loader: CatalogLoader,
    state: CatalogState,
}

impl Catalog {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            loader: CatalogLoader::new(source),
            state: CatalogState::new(),
        }
    }

    /// Load the show listing.
    ///
    /// On failure the listing stays empty and the error is returned for
    /// display; the catalog remains usable.
    pub async fn start(&mut self) -> std::result::Result<usize, LoadError> {
        match self.loader.load_shows().await {
            Ok(shows) => {
                let count = shows.len();
                info!("Loaded {} shows", count);
                self.state.set_shows(shows);
                Ok(count)
            }
            Err(e) => {
                self.state.set_shows(Vec::new());
                Err(e)
            }
        }
    }

    /// Apply `command`, or start an episode request when it needs one.
    ///
    /// A show whose fetch is still running gets no second fetch; the running
    /// one is awaited instead.
    pub fn dispatch(&mut self, command: Command) -> Result<Dispatched> {
        debug!("Dispatching {:?}", command);
        match command {
            Command::SelectShow(None) => {
                self.state.select_show(None, Arc::from(Vec::<Episode>::new()));
                Ok(Dispatched::Done)
            }
            Command::SelectShow(Some(show_id)) => match self.loader.cached_episodes(show_id) {
                Some(episodes) => {
                    self.state.select_show(Some(show_id), episodes);
                    Ok(Dispatched::Done)
                }
                None => match self.state.begin_request(show_id) {
                    Some(token) => Ok(Dispatched::Fetch(PendingFetch { token, show_id })),
                    None => {
                        debug!("Episodes for show {} already loading", show_id);
                        Ok(Dispatched::Done)
                    }
                },
            },
            Command::SetFilterTerm(term) => {
                self.state.set_filter_term(term);
                Ok(Dispatched::Done)
            }
            Command::SelectEpisode(index) => {
                self.state.select_episode_index(index)?;
                Ok(Dispatched::Done)
            }
        }
    }

    /// The network work for `pending`, detached from the catalog.
    pub fn fetch(
        &self,
        pending: &PendingFetch,
    ) -> impl Future<Output = std::result::Result<Vec<Episode>, LoadError>> + Send + 'static + use<>
    {
        self.loader.fetch_detached(pending.show_id)
    }

    /// Apply a finished fetch.
    ///
    /// Successful lists are cached even when stale so a later switch to that
    /// show is a cache hit. Only the current request may change the view.
    pub fn complete(
        &mut self,
        pending: PendingFetch,
        result: std::result::Result<Vec<Episode>, LoadError>,
    ) -> Completion {
        let stored = self.loader.store_episodes(pending.show_id, result);
        let current = self.state.finish_request(pending.token);

        match (stored, current) {
            (Ok(episodes), true) => {
                self.state.select_show(Some(pending.show_id), episodes);
                Completion::Applied
            }
            (Err(e), true) => Completion::Failed(e),
            (_, false) => {
                warn!(
                    "Ignoring stale episode response for show {}",
                    pending.show_id
                );
                Completion::Stale
            }
        }
    }

    /// Dispatch and, if a fetch is needed, run it to completion inline.
    ///
    /// A fetch already running for the show is left to whoever started it.
    pub async fn dispatch_and_wait(&mut self, command: Command) -> Result<Completion> {
        match self.dispatch(command)? {
            Dispatched::Done => Ok(Completion::Applied),
            Dispatched::Fetch(pending) => {
                let result = self.fetch(&pending).await;
                Ok(self.complete(pending, result))
            }
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn loader(&self) -> &CatalogLoader {
        &self.loader
    }
}
