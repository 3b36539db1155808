//! imgrev: terminal image review.
//!
//! Entry point for the `imgrev` binary. Wires together the command line
//! (`clap`), configuration (`config`), the image source and review session
//! (`imgrev-core`), the terminal lifecycle (`tui`), the unified event bus
//! (`event`), the auto-advance timer (`scheduler`), and the SQLite submission
//! sink (`sink`).
//!
//! # Startup sequence
//!
//! 1. Parse the command line and install file logging under `.imgrev/`.
//! 2. Load config; CLI flags override it.
//! 3. Load the image set and build the session. Failures here are reported on
//!    a normal terminal, before raw mode.
//! 4. Open the WAL-mode database and spawn its writer task.
//! 5. `install_panic_hook()`, `register_sigterm()`, then `init_tui()`.
//! 6. Spawn the terminal event task and run the event loop.
//!
//! # Safety
//!
//! `restore_tui()` is called after the event loop exits (quit key, SIGTERM,
//! or channel close). Draw errors are captured, not propagated with `?`, so
//! the terminal is always restored first. The panic hook covers panics.

mod app;
mod config;
mod event;
mod scheduler;
mod sink;
mod theme;
mod tui;
mod ui;

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use imgrev_core::{db, source, ReviewSession};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::{AppState, Role};
use crate::config::Config;
use crate::event::AppEvent;
use crate::scheduler::AdvanceScheduler;
use crate::ui::keybindings::{self, KeyAction};

/// Directory for the log file and the default database.
const STATE_DIR: &str = ".imgrev";

#[derive(Parser, Debug)]
#[command(
    name = "imgrev",
    version,
    about = "Review a batch of images in the terminal",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Directory of images, or a TOML manifest of `[[images]]` entries.
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Reviewing role (overrides the config file).
    #[arg(long, value_enum)]
    role: Option<Role>,

    /// Config file to use instead of the XDG default.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored submissions, newest first.
    History,
}

fn init_tracing() -> anyhow::Result<()> {
    std::fs::create_dir_all(STATE_DIR).with_context(|| format!("creating {STATE_DIR}"))?;
    let log_path = Path::new(STATE_DIR).join("imgrev.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env("IMGREV_LOG")
        .unwrap_or_else(|_| EnvFilter::new("imgrev=info,imgrev_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(std::sync::Mutex::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config_file = cli.config.clone().unwrap_or_else(config::config_path);
    let mut config = Config::load(&config_file);
    if let Some(role) = cli.role {
        config.role = role;
    }

    match cli.command {
        Some(Command::History) => run_history(&config).await,
        None => run_review(&cli.path, config).await,
    }
}

async fn open_database(config: &Config) -> anyhow::Result<tokio_rusqlite::Connection> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    db::open_db(&config.db_path.to_string_lossy())
        .await
        .with_context(|| format!("opening database {}", config.db_path.display()))
}

/// Prints stored submissions to stdout.
async fn run_history(config: &Config) -> anyhow::Result<()> {
    let conn = open_database(config).await?;
    let summaries = db::list_submissions(&conn).await.context("listing submissions")?;
    if summaries.is_empty() {
        println!("no submissions stored in {}", config.db_path.display());
        return Ok(());
    }
    println!("{:<36}  {:<16}  {:>8}  {:>7}  {:>8}", "ID", "SUBMITTED", "APPROVED", "FLAGGED", "COMMENTS");
    for s in summaries {
        println!(
            "{:<36}  {:<16}  {:>8}  {:>7}  {:>8}",
            s.id,
            s.submitted_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
            s.approved,
            s.flagged,
            s.comments,
        );
    }
    Ok(())
}

async fn run_review(path: &Path, config: Config) -> anyhow::Result<()> {
    let images = source::discover(path).with_context(|| format!("loading images from {}", path.display()))?;
    let session = ReviewSession::new(images).context("building the review session")?;
    tracing::info!(path = %path.display(), images = session.len(), role = config.role.label(), "review started");

    let theme = theme::Theme::from_name(&config.theme);
    let mut state = AppState::new(session, config.role);
    if state.session.is_empty() {
        state.set_message(format!("no images found in {}", path.display()));
    }

    let handler = event::EventHandler::new();
    let mut rx = handler.rx;
    let conn = open_database(&config).await?;
    let (mut sink, writer) = sink::spawn_db_writer(conn, handler.tx.clone());
    let mut scheduler = AdvanceScheduler::new(Duration::from_millis(config.auto_advance_ms), handler.tx.clone());

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("registering SIGTERM handler")?;
    let mut terminal = tui::init_tui().context("initialising the terminal")?;
    event::spawn_event_task(handler.tx);

    // Exits only via `break`, so `restore_tui()` below always runs.
    let mut outcome: anyhow::Result<()> = Ok(());
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50 ms even when idle.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            outcome = Err(e).context("drawing a frame");
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => {
                        match keybindings::handle_key(key, &mut state) {
                            KeyAction::Quit => break 'event_loop,
                            KeyAction::ScheduleAdvance(token) => scheduler.schedule(token),
                            KeyAction::Submit => state.submit(&mut sink),
                            KeyAction::Continue => {}
                        }
                        if state.pending_advance.is_none() {
                            scheduler.cancel();
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        keybindings::handle_mouse(mouse, &mut state);
                    }
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => {}
                    Some(AppEvent::AutoAdvance(token)) => {
                        state.apply_auto_advance(token);
                    }
                    Some(AppEvent::SubmissionStored(result)) => state.on_submission_stored(result),
                    Some(AppEvent::Quit) | None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tui::restore_tui().context("restoring the terminal")?;

    // Let the writer finish a submission that is still being stored.
    scheduler.cancel();
    drop(sink);
    if tokio::time::timeout(Duration::from_secs(5), writer).await.is_err() {
        tracing::warn!("database writer did not finish in time");
    }
    tracing::info!(submitted = state.session.is_closed(), "review ended");
    outcome
}
