//! Event bus for imgrev.
//!
//! All user input, render ticks, and background-task results are normalised
//! into a single `AppEvent` enum and sent over a tokio unbounded MPSC channel.
//! The main loop receives from this channel and applies each event to
//! `AppState` synchronously, so the review session is never touched from more
//! than one place.
//!
//! Background producers:
//! - the terminal task spawned by [`spawn_event_task`] (keys, mouse, resize,
//!   and a 33 ms render interval),
//! - the auto-advance timer in `scheduler.rs`,
//! - the database writer in `sink.rs`.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::sink::StoreFailure;

/// All events the application can receive from any source.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    ///
    /// Release and repeat events are filtered in [`spawn_event_task`] to avoid
    /// double-firing on Windows, which synthesises both press and release for
    /// every keystroke.
    Key(KeyEvent),
    /// A mouse event from the terminal (click, scroll, move).
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Render tick that triggers a `terminal.draw()` call (≈30 FPS / 33 ms).
    Render,
    /// The auto-advance timer armed with this token has elapsed.
    AutoAdvance(u64),
    /// Outcome of storing a submission: its id, or the snapshot that could not
    /// be written together with the error.
    SubmissionStored(Result<String, StoreFailure>),
    /// Quit signal.
    Quit,
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender (`tx`) is cloned and distributed to background tasks;
/// the receiver (`rx`) is owned by the main event loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Creates a new `EventHandler` with a fresh unbounded channel.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background tokio task that feeds terminal input and render
/// ticks into the event channel.
///
/// # Key implementation choices
///
/// - `reader.next().fuse()` keeps `tokio::select!` from polling a completed
///   future if the crossterm stream terminates unexpectedly.
/// - `KeyEventKind::Press` filter: Windows fires both `Press` and `Release`
///   for every keystroke. Without the filter, every key press appears twice.
/// - The task exits once the receiver is gone and a send fails.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = render_tick => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(w, h))) => tx.send(AppEvent::Resize(w, h)),
                    Some(Ok(Event::Mouse(mouse))) => tx.send(AppEvent::Mouse(mouse)),
                    Some(Err(e)) => {
                        tracing::warn!("terminal event stream error: {e}");
                        Ok(())
                    }
                    None => tx.send(AppEvent::Quit),
                    _ => Ok(()),
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
