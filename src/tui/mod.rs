//! Terminal User Interface for episode-browser using ratatui.
//!
//! A show picker on the left, show cards or episodes on the right, and a
//! search bar that filters episodes as you type.

mod render;
mod state;
mod types;

pub use render::draw;
pub use state::{App, LOADING_EPISODES};
pub use types::{Action, Focus, Screen};

use crossterm::event::{self, Event};
use std::io;
use std::time::Duration;

/// Poll for keyboard events with a timeout.
pub fn poll_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
