//! Main entry point for the episode-browser CLI application.

use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use episode_browser::api::TvMazeClient;
use episode_browser::config::Config;
use episode_browser::controller::{Catalog, Command, Completion, Dispatched, PendingFetch};
use episode_browser::error::{AppError, LoadError};
use episode_browser::tui::{Action, App, LOADING_EPISODES, draw, poll_event};
use episode_browser::types::{Episode, ShowId};
use log::{debug, info, warn};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const SHOWS_ERROR: &str = "Error loading shows. Try again later.";
const EPISODES_ERROR: &str = "Error loading episodes. Try again later.";

/// Command-line arguments for the episode-browser application.
#[derive(Parser, Debug)]
#[command(
    name = "episode-browser",
    version,
    about = "Browse TV shows and episodes from TVMaze",
    long_about = "Browse the TVMaze show catalog, pick a show, and search its episodes in a TUI."
)]
struct Args {
    /// Log verbosity level: 0=error, 1=warn, 2=info, 3=debug, 4=trace
    #[arg(short, long, default_value_t = 1)]
    log: u8,

    /// Catalog API base URL (overrides config)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Print to stdout instead of starting the TUI
    #[arg(short, long)]
    plain: bool,

    /// Show whose episodes to print (plain mode)
    #[arg(short, long, requires = "plain")]
    show: Option<ShowId>,

    /// Episode search term (plain mode)
    #[arg(long, requires = "show")]
    search: Option<String>,

    /// Print only the episode at this index of the show's list (plain mode)
    #[arg(short, long, requires = "show")]
    episode: Option<usize>,

    /// Write a default config file if none exists and print its path
    #[arg(long)]
    init_config: bool,
}

/// A finished episode fetch coming back from a spawned task.
struct FetchDone {
    pending: PendingFetch,
    result: Result<Vec<Episode>, LoadError>,
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    debug!("Log level set to {:?}", log_level);

    if args.init_config {
        let path = Config::create_default_if_missing()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Load config
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        Config::new()
    });

    // Merge config with CLI args
    if let Some(base_url) = &args.base_url {
        config.catalog_base = base_url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    info!("Using catalog at {}", config.catalog_base);

    let client = TvMazeClient::new(&config)?;
    let catalog = Catalog::new(Arc::new(client));

    if args.plain {
        return match run_plain(catalog, &args).await {
            Ok(()) => Ok(()),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
    }

    let mut terminal = init_terminal()?;
    let mut app = App::new(catalog);

    let result = run_app(&mut terminal, &mut app).await;

    restore_terminal()?;

    result
}

/// Print the show listing or one show's episode projection to stdout.
async fn run_plain(mut catalog: Catalog, args: &Args) -> Result<(), AppError> {
    catalog.start().await?;

    let Some(show_id) = args.show else {
        let view = catalog.state().show_projection();
        println!("{}", view.count_label());
        for show in view.visible() {
            println!(
                "{:>6}  {}  [{}] {} | {} | {}",
                show.id,
                show.name,
                show.genres_display(),
                show.status_display(),
                show.rating_display(),
                show.runtime_display()
            );
        }
        return Ok(());
    };

    if let Completion::Failed(e) = catalog
        .dispatch_and_wait(Command::SelectShow(Some(show_id)))
        .await?
    {
        return Err(e.into());
    }
    if let Some(term) = &args.search {
        catalog.dispatch(Command::SetFilterTerm(term.clone()))?;
    }
    if args.episode.is_some() {
        catalog.dispatch(Command::SelectEpisode(args.episode))?;
    }

    let state = catalog.state();
    if let Some(show) = state.selected_show_info() {
        println!("{}", show.name);
    }
    let view = state.projection();
    println!("{}", view.count_label());
    for episode in view.visible() {
        println!("{}", episode.to_display());
        let summary = episode.summary_text();
        if !summary.is_empty() {
            println!("    {}", summary);
        }
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    app.set_loading("Loading shows...");
    terminal.draw(|f| draw(f, app))?;

    if let Err(e) = app.catalog.start().await {
        warn!("{}", e);
        app.set_error(SHOWS_ERROR);
    }
    app.shows_loaded();

    let (tx, mut rx) = mpsc::unbounded_channel::<FetchDone>();

    loop {
        terminal.draw(|f| draw(f, app))?;

        // Apply finished fetches before reading more input
        while let Ok(done) = rx.try_recv() {
            match app.catalog.complete(done.pending, done.result) {
                Completion::Applied => app.sync_screen(),
                Completion::Stale => debug!("Dropped stale episodes for show {}", done.pending.show_id),
                Completion::Failed(e) => {
                    warn!("{}", e);
                    app.sync_screen();
                    app.set_error(EPISODES_ERROR);
                }
            }
        }

        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(100))? {
            match app.handle_input(key) {
                Action::Quit => break,
                Action::None => {}
                Action::Dispatch(command) => match app.catalog.dispatch(command) {
                    Ok(Dispatched::Done) => app.sync_screen(),
                    Ok(Dispatched::Fetch(pending)) => {
                        app.set_loading(LOADING_EPISODES);
                        let fetch = app.catalog.fetch(&pending);
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let result = fetch.await;
                            // The receiver is gone only when the app is exiting.
                            let _ = tx.send(FetchDone { pending, result });
                        });
                    }
                    Err(e) => app.set_error(&e.to_string()),
                },
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
