//! A terminal browser for the TVMaze show and episode catalog.
//!
//! episode-browser fetches the public TVMaze show listing, lets you pick a
//! show, and lists its episodes with a free-text search and a single-episode
//! picker. The interesting part lives in the library: a small view-state
//! manager that owns the show list, a per-show episode cache and the current
//! filter/selection, and projects them into what the UI should display.
//!
//! # Features
//!
//! - Show listing sorted by name, with genres, status, rating and runtime
//! - Episode lists cached per show for the whole session
//! - Case-insensitive search over episode names and summaries
//! - Single-episode selection that overrides the search
//! - Stale episode fetches are ignored when the user has moved on
//!
//! # Usage
//!
//! ```bash
//! # Interactive terminal UI
//! cargo run
//!
//! # Print the episodes of show 82 that mention "dragon"
//! cargo run -- --plain --show 82 --search dragon
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod loader;
pub mod projection;
pub mod state;
pub mod tui;
pub mod types;
