//! Delayed auto-advance after a decision.
//!
//! The review session only recommends moving on; this module owns the timing.
//! At most one timer is alive at a time. Scheduling a new token or cancelling
//! aborts the previous timer task. A timer that fires anyway (the abort raced
//! with the send) is harmless because `AppState::apply_auto_advance` ignores
//! any token that is no longer pending.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::event::AppEvent;

/// Default delay between a decision and the automatic move to the next image.
pub const DEFAULT_DELAY_MS: u64 = 500;

pub struct AdvanceScheduler {
    delay: Duration,
    tx: mpsc::UnboundedSender<AppEvent>,
    timer: Option<JoinHandle<()>>,
}

impl AdvanceScheduler {
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            delay,
            tx,
            timer: None,
        }
    }

    /// Sends `AppEvent::AutoAdvance(token)` after the configured delay,
    /// replacing any timer still running.
    pub fn schedule(&mut self, token: u64) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        tracing::debug!(token, delay_ms = delay.as_millis() as u64, "auto-advance scheduled");
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::AutoAdvance(token));
        }));
    }

    /// Aborts the running timer, if any.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for AdvanceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
