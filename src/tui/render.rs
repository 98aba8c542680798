//! UI rendering functions for the TUI.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use super::state::App;
use super::types::{Focus, Screen};

const ATTRIBUTION: &str = "Data from TVMaze.com";

/// Draw the UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Content (sidebar + main)
            Constraint::Length(3), // Footer
        ])
        .split(size);

    draw_header(frame, app, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30), // Show picker
            Constraint::Min(0),     // Main content
        ])
        .split(chunks[2]);

    draw_sidebar(frame, app, content_chunks[0]);

    match app.screen {
        Screen::Loading => draw_loading(frame, app, content_chunks[1]),
        Screen::ShowList => draw_show_list_main(frame, app, content_chunks[1]),
        Screen::EpisodeList => draw_episode_list_main(frame, app, content_chunks[1]),
    }

    draw_footer(frame, app, chunks[3]);

    if let Some(error) = &app.error_message {
        draw_error_popup(frame, error);
    }

    if app.show_help {
        draw_help_modal(frame);
    }
}

fn highlight() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.catalog.state();
    let show_name = state
        .selected_show_info()
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "All shows".to_string());

    let mut spans = vec![
        Span::styled(
            "episode-browser",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", show_name), Style::default().fg(Color::Cyan)),
    ];

    if !app.loading_message.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            app.loading_message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.catalog.state();

    let search_text = if app.search_input.is_empty() && !app.search_focused {
        "Press '/' to search episodes..."
    } else {
        &app.search_input
    };

    // A picked episode overrides the search until the term changes.
    let title = if state.selected_episode_index().is_some() && !state.filter_term().is_empty() {
        "Search (overridden by episode selection)"
    } else {
        "Search"
    };

    let search = Paragraph::new(search_text)
        .style(if app.search_focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(panel_border(app.search_focused)),
        );

    frame.render_widget(search, area);

    if app.search_focused {
        frame.set_cursor_position((
            area.x + app.search_input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

fn draw_sidebar(frame: &mut Frame, app: &mut App, area: Rect) {
    let state = app.catalog.state();

    let mut items = vec![ListItem::new("All shows")];
    items.extend(state.shows().iter().map(|s| {
        // Truncate name if too long (use chars to avoid UTF-8 panics)
        let name = s.to_display();
        if name.chars().count() > 24 {
            ListItem::new(format!("{}...", name.chars().take(21).collect::<String>()))
        } else {
            ListItem::new(name)
        }
    }));

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Shows")
                .border_style(panel_border(app.focus == Focus::Sidebar)),
        )
        .highlight_style(highlight())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.show_list_state);
}

fn draw_loading(frame: &mut Frame, app: &App, area: Rect) {
    let loading = Paragraph::new(app.loading_message.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Loading"));

    frame.render_widget(loading, area);
}

fn draw_show_list_main(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let state = app.catalog.state();
    let view = state.show_projection();

    let items: Vec<ListItem> = view.visible().map(|s| ListItem::new(s.to_display())).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view.count_label())
                .border_style(panel_border(app.focus == Focus::Main)),
        )
        .highlight_style(highlight())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], &mut app.card_list_state);

    let details = match app.card_list_state.selected().and_then(|i| view.get(i)) {
        Some(show) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    show.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Genres: {}", show.genres_display())),
                Line::from(format!("Status: {}", show.status_display())),
                Line::from(format!("Rating: {}", show.rating_display())),
                Line::from(format!("Runtime: {}", show.runtime_display())),
            ];
            if let Some(url) = &show.image_url {
                lines.push(Line::from(Span::styled(
                    format!("Image: {}", url),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(show.summary_text()));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Press Enter to view episodes",
                Style::default().fg(Color::DarkGray),
            )));
            lines
        }
        None => vec![Line::from("No shows available")],
    };

    let details_widget = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });

    frame.render_widget(details_widget, chunks[1]);
}

fn draw_episode_list_main(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let state = app.catalog.state();
    let view = state.projection();

    let items: Vec<ListItem> = view.visible().map(|e| ListItem::new(e.to_display())).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view.count_label())
                .border_style(panel_border(app.focus == Focus::Main)),
        )
        .highlight_style(highlight())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], &mut app.episode_list_state);

    let details = match app.episode_list_state.selected().and_then(|i| view.get(i)) {
        Some(episode) => {
            let mut lines = vec![Line::from(Span::styled(
                episode.to_display(),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            if let Some(url) = &episode.image_url {
                lines.push(Line::from(Span::styled(
                    format!("Image: {}", url),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(episode.summary_text()));
            lines
        }
        None => vec![Line::from("No episodes match")],
    };

    let details_widget = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Episode"))
        .wrap(Wrap { trim: true });

    frame.render_widget(details_widget, chunks[1]);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.search_focused {
        "[Enter] done  [Esc] clear  [?] help"
    } else if app.focus == Focus::Sidebar {
        "[Tab] switch  [↑↓] navigate  [Enter] pick show  [/] search  [?] help  [q] quit"
    } else {
        match app.screen {
            Screen::Loading => "[q] quit",
            Screen::ShowList => {
                "[Tab] switch  [↑↓] navigate  [Enter] episodes  [/] search  [?] help  [q] quit"
            }
            Screen::EpisodeList => {
                "[↑↓] navigate  [Enter] pick  [a] all  [Bksp] shows  [/] search  [?] help  [q] quit"
            }
        }
    };

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(help_text, Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(ATTRIBUTION, Style::default().fg(Color::Blue)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn draw_error_popup(frame: &mut Frame, error: &str) {
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);

    let popup = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(popup, area);
}

fn draw_help_modal(frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let help_text = Paragraph::new(help_content())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help_text, area);
}

fn help_content() -> &'static str {
    "\
Global Commands
───────────────
  ?           Show/hide this help
  Ctrl+C      Force quit
  /           Search episodes
  Tab         Switch between show picker and main panel
  q           Quit

Search Bar
──────────
  (Type)      Filter episodes by name or summary
  Enter       Keep the search and leave the bar
  Esc         Clear the search

Shows
─────
  j / ↓       Move down
  k / ↑       Move up
  Enter       Show the episodes of this show

Episodes
────────
  Enter       Show only this episode
  a           Show all episodes again
  Backspace   Back to all shows

Press ? to close"
}

/// Helper function to create a centered rect.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
