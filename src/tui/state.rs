//! Application state management and input handling.

use crate::controller::{Catalog, Command};
use crate::types::ShowId;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use super::types::{Action, Focus, Screen};

/// Header text while an episode list is being fetched.
pub const LOADING_EPISODES: &str = "Loading episodes...";

/// Application state for the TUI.
pub struct App {
    /// Current screen being displayed
    pub screen: Screen,
    /// Current focus (sidebar or main)
    pub focus: Focus,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Catalog view state and loader
    pub catalog: Catalog,
    /// Text in the episode search bar
    pub search_input: String,
    /// Whether search bar is focused
    pub search_focused: bool,
    /// Sidebar show picker; row 0 is "All shows"
    pub show_list_state: ListState,
    /// Show cards in the main panel
    pub card_list_state: ListState,
    /// Visible episodes in the main panel
    pub episode_list_state: ListState,
    /// Loading message
    pub loading_message: String,
    /// Error message to display
    pub error_message: Option<String>,
    /// Whether help modal is shown
    pub show_help: bool,
}

impl App {
    /// Create a new App around a catalog whose shows are not loaded yet.
    pub fn new(catalog: Catalog) -> Self {
        let mut show_list_state = ListState::default();
        show_list_state.select(Some(0));

        Self {
            screen: Screen::Loading,
            focus: Focus::Main,
            should_quit: false,
            catalog,
            search_input: String::new(),
            search_focused: false,
            show_list_state,
            card_list_state: ListState::default(),
            episode_list_state: ListState::default(),
            loading_message: String::new(),
            error_message: None,
            show_help: false,
        }
    }

    /// Set the loading message shown in the header or loading screen.
    pub fn set_loading(&mut self, message: &str) {
        self.loading_message = message.to_string();
    }

    /// Set an error message.
    pub fn set_error(&mut self, message: &str) {
        self.error_message = Some(message.to_string());
    }

    /// Clear error message.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Leave the loading screen once the show listing is settled.
    pub fn shows_loaded(&mut self) {
        self.loading_message.clear();
        self.screen = Screen::ShowList;
        let has_shows = !self.catalog.state().shows().is_empty();
        self.card_list_state.select(if has_shows { Some(0) } else { None });
        self.show_list_state.select(Some(0));
    }

    /// Bring screen and list cursors in line with the catalog state.
    pub fn sync_screen(&mut self) {
        if self.catalog.state().is_loading() {
            self.set_loading(LOADING_EPISODES);
        } else {
            self.loading_message.clear();
        }

        let state = self.catalog.state();
        self.screen = match state.selected_show() {
            Some(_) => Screen::EpisodeList,
            None => Screen::ShowList,
        };

        let visible = state.projection().len();
        self.episode_list_state
            .select(if visible > 0 { Some(0) } else { None });

        let sidebar_row = state
            .selected_show()
            .and_then(|id| state.shows().iter().position(|s| s.id == id))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.show_list_state.select(Some(sidebar_row));
    }

    /// Show id behind a sidebar row, `None` for the "All shows" row.
    fn sidebar_show(&self, row: usize) -> Option<ShowId> {
        if row == 0 {
            None
        } else {
            self.catalog.state().shows().get(row - 1).map(|s| s.id)
        }
    }

    /// Handle keyboard input and return an action.
    pub fn handle_input(&mut self, key: KeyEvent) -> Action {
        // Global quit with Ctrl+C or Ctrl+Q
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Action::Quit;
                }
                _ => {}
            }
        }

        // Any key dismisses the error popup
        if self.error_message.is_some() {
            self.clear_error();
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                return Action::None;
            }
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return Action::None;
        }

        if self.search_focused {
            return self.handle_search_bar_input(key);
        }

        if self.screen == Screen::Loading {
            if key.code == KeyCode::Char('q') {
                self.should_quit = true;
                return Action::Quit;
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Char('?') => {
                self.show_help = true;
                return Action::None;
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Main,
                    Focus::Main => Focus::Sidebar,
                };
                return Action::None;
            }
            KeyCode::Char('/') => {
                self.search_focused = true;
                return Action::None;
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Action::Quit;
            }
            _ => {}
        }

        if self.focus == Focus::Sidebar {
            return self.handle_sidebar_input(key);
        }

        match self.screen {
            Screen::ShowList => self.handle_show_list_input(key),
            Screen::EpisodeList => self.handle_episode_list_input(key),
            Screen::Loading => Action::None,
        }
    }

    fn handle_search_bar_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => {
                self.search_focused = false;
                self.focus = Focus::Main;
                Action::None
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                Action::Dispatch(Command::SetFilterTerm(self.search_input.clone()))
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                Action::Dispatch(Command::SetFilterTerm(self.search_input.clone()))
            }
            KeyCode::Esc => {
                self.search_input.clear();
                self.search_focused = false;
                Action::Dispatch(Command::SetFilterTerm(String::new()))
            }
            _ => Action::None,
        }
    }

    fn handle_sidebar_input(&mut self, key: KeyEvent) -> Action {
        let rows = self.catalog.state().shows().len() + 1;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                move_up(&mut self.show_list_state);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                move_down(&mut self.show_list_state, rows);
                Action::None
            }
            KeyCode::Enter => {
                let row = self.show_list_state.selected().unwrap_or(0);
                self.focus = Focus::Main;
                Action::Dispatch(Command::SelectShow(self.sidebar_show(row)))
            }
            _ => Action::None,
        }
    }

    fn handle_show_list_input(&mut self, key: KeyEvent) -> Action {
        let shows = self.catalog.state().shows();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                move_up(&mut self.card_list_state);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                move_down(&mut self.card_list_state, shows.len());
                Action::None
            }
            KeyCode::Enter => match self.card_list_state.selected().and_then(|i| shows.get(i)) {
                Some(show) => Action::Dispatch(Command::SelectShow(Some(show.id))),
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    fn handle_episode_list_input(&mut self, key: KeyEvent) -> Action {
        let view = self.catalog.state().projection();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                move_up(&mut self.episode_list_state);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                move_down(&mut self.episode_list_state, view.len());
                Action::None
            }
            KeyCode::Enter => {
                match self
                    .episode_list_state
                    .selected()
                    .and_then(|row| view.source_index(row))
                {
                    Some(index) => Action::Dispatch(Command::SelectEpisode(Some(index))),
                    None => Action::None,
                }
            }
            KeyCode::Char('a') => Action::Dispatch(Command::SelectEpisode(None)),
            KeyCode::Backspace | KeyCode::Esc => Action::Dispatch(Command::SelectShow(None)),
            _ => Action::None,
        }
    }
}

fn move_up(list: &mut ListState) {
    let i = list.selected().unwrap_or(0);
    if i > 0 {
        list.select(Some(i - 1));
    }
}

fn move_down(list: &mut ListState, len: usize) {
    let i = list.selected().unwrap_or(0);
    if i < len.saturating_sub(1) {
        list.select(Some(i + 1));
    }
}
