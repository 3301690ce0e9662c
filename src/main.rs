//! quotebox - random quotes in the terminal
//!
//! A TUI that fetches random quotes and fades them in.
//!
//! Features:
//! - Optional author filter with bounded retries
//! - Favorites saved across sessions
//! - Light/dark theme toggle
//! - Copy and share the current quote
//!
//! Usage: quotebox [--author NAME] [--print]

mod app;
mod clipboard;
mod config;
mod quotes;
mod session;
mod store;
mod types;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use quotes::{FetchPolicy, HttpQuoteSource, QuoteFetcher};
use ratatui::prelude::*;
use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use store::{FileStorage, SharedStorage};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Frame interval; also the resolution of fade timing
const TICK: Duration = Duration::from_millis(33);

/// quotebox - random quotes with author filter, favorites, and themes
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Only show quotes whose author contains this text
    #[arg(short, long, default_value = "")]
    author: String,

    /// Print one quote to stdout and exit
    #[arg(short, long)]
    print: bool,

    /// Config file (default: ~/.config/quotebox/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for favorites and theme (default: ~/.local/share/quotebox)
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let result = run(args).await;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    // Load configuration
    let config = match &args.config {
        Some(path) => config::Config::load_from(path),
        None => config::Config::load(),
    }
    .context("Failed to load configuration")?;

    let storage_dir = match args.storage_dir.clone().or_else(|| config.storage.dir.clone()) {
        Some(dir) => dir,
        None => FileStorage::default_dir()?,
    };

    let level = if args.debug { "debug" } else { config.log.level.as_str() };
    init_logging(level, (!args.print).then_some(storage_dir.as_path()))?;
    tracing::info!("quotebox {} starting", env!("CARGO_PKG_VERSION"));

    let source = HttpQuoteSource::new(config.fetch.endpoint.clone())
        .context("Failed to create HTTP client")?;
    let fetcher = QuoteFetcher::new(Arc::new(source), FetchPolicy::from(&config.fetch));

    if args.print {
        println!("{}", fetcher.fetch_quote(&args.author).await);
        return Ok(());
    }

    let storage: SharedStorage = Arc::new(FileStorage::new(&storage_dir));
    let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
    let mut app = App::new(
        config,
        fetcher,
        storage,
        clipboard::Clipboard::new(),
        fetch_tx,
        &args.author,
    );

    run_tui(&mut app, fetch_rx).await
}

/// Send logs to stderr, or to `<dir>/quotebox.log` while the TUI owns the terminal
fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory {:?}", dir))?;
            let path = dir.join("quotebox.log");
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_target(false)
                .init();
        }
    }

    Ok(())
}

async fn run_tui(app: &mut App, fetch_rx: mpsc::UnboundedReceiver<String>) -> Result<()> {
    // Restore the terminal before a panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .context("Failed to create terminal")?;

    // Run main loop
    let result = main_loop(&mut terminal, app, fetch_rx).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

async fn main_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut fetch_rx: mpsc::UnboundedReceiver<String>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // Initial quote
    app.request_quote(Instant::now());

    loop {
        // Render UI
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                // Only handle key press events (not release)
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => break,
            },
            Some(quote) = fetch_rx.recv() => {
                app.on_quote_ready(quote, Instant::now());
            }
            _ = ticker.tick() => {}
        }

        // Fades, flash expiry, save confirmation
        app.tick(Instant::now());

        // Check if should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
