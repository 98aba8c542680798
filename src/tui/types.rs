//! TUI type definitions for screens, focus, and actions.

use crate::controller::Command;

/// The current screen/view of the application.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Waiting for the show listing
    Loading,
    /// Show cards, no show selected
    ShowList,
    /// Episodes of the selected show
    EpisodeList,
}

/// Focus state for split-panel views.
#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    Sidebar,
    Main,
}

/// Actions that can be returned from the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action, continue running
    None,
    /// Quit the application
    Quit,
    /// Apply a catalog command
    Dispatch(Command),
}
