//! Central application state for imgrev.
//!
//! This module owns all mutable UI state: the review session itself, the active
//! filter and role, the current mode, which panel has focus, scroll offsets,
//! panel width percentages, the draft comment, and the pending auto-advance
//! token. No ratatui rendering logic lives here. `app.rs` is pure state that is
//! read by the render module and mutated by the keybinding dispatcher and the
//! main event loop.
//!
//! Every reviewing intent goes through [`ReviewSession`]; `AppState` only keeps
//! the presentation around it (gallery selection, draft text, messages) in step
//! with whatever the session reports.

use std::path::Path;

use clap::ValueEnum;
use imgrev_core::{
    Decision, Direction, FollowUp, ReviewError, ReviewFilter, ReviewSession, Submission,
    SubmissionSink,
};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use serde::Deserialize;

use crate::sink::StoreFailure;

/// Who is using the tool, which decides the reviewing keys that are active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Approves or flags images, comments on them, and submits the review.
    #[default]
    Verifier,
    /// Marks images as saved and moves on. Cannot flag, comment, or submit.
    Annotator,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Verifier => "verifier",
            Role::Annotator => "annotator",
        }
    }
}

/// Editor mode controlling which keybinding set is active.
///
/// The default mode is `Normal`. Transitions are driven by the keybinding dispatcher.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Gallery navigation and reviewing keys (default).
    #[default]
    Normal,
    /// Typing a comment for the open image.
    Insert,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
    /// Quit-confirmation dialog shown when a draft or unsubmitted decisions exist.
    ConfirmQuit,
    /// Submit-confirmation dialog shown once every image has a decision.
    ConfirmSubmit,
}

/// Which panel currently has keyboard focus.
///
/// Navigation cycles through Gallery → Viewer → Comments → Gallery via `next()`
/// and in reverse via `prev()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel listing the images in the active filter.
    #[default]
    Gallery,
    /// Centre panel describing the open image.
    Viewer,
    /// Right panel with the open image's comment thread.
    Comments,
}

impl PanelFocus {
    /// Returns the panel that precedes `self` in the cycle (wraps around).
    pub fn prev(self) -> Self {
        match self {
            PanelFocus::Gallery => PanelFocus::Comments,
            PanelFocus::Viewer => PanelFocus::Gallery,
            PanelFocus::Comments => PanelFocus::Viewer,
        }
    }

    /// Returns the panel that follows `self` in the cycle (wraps around).
    pub fn next(self) -> Self {
        match self {
            PanelFocus::Gallery => PanelFocus::Viewer,
            PanelFocus::Viewer => PanelFocus::Comments,
            PanelFocus::Comments => PanelFocus::Gallery,
        }
    }
}

/// Facts about the open image that are expensive to compute per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub image_id: String,
    /// Pixel size, known only for readable local files.
    pub dimensions: Option<(u32, u32)>,
}

/// All mutable UI state passed through every render cycle.
///
/// The render function receives a single mutable reference (to cache viewport
/// geometry) and the keybinding dispatcher receives a single mutable reference.
pub struct AppState {
    /// The review pass itself. Only mutated through its own operations.
    pub session: ReviewSession,
    /// View used for the gallery and for every navigation call.
    pub filter: ReviewFilter,
    pub role: Role,

    /// Current editor mode governing which keybindings are active.
    pub mode: Mode,
    /// Which panel currently receives keyboard scroll/navigation events.
    pub focus: PanelFocus,

    /// Selection in the gallery, as a position within the active filter's view.
    pub gallery_state: ListState,
    /// Vertical scroll offset for the comments `Paragraph` widget (right panel).
    pub comments_scroll: u16,
    /// Vertical scroll offset for the help overlay.
    pub help_scroll: u16,

    /// Inner height of the gallery panel after borders, cached after each render.
    pub gallery_viewport_height: u16,
    /// Inner height of the comments panel after borders, cached after each render.
    pub comments_viewport_height: u16,

    /// Width percentage allocated to the left (gallery) panel. Default: 25.
    pub left_pct: u16,
    /// Width percentage allocated to the centre (viewer) panel. Default: 45.
    pub center_pct: u16,
    /// Width percentage allocated to the right (comments) panel. Default: 30.
    pub right_pct: u16,
    /// Panel rects from the last render, used for click-to-focus.
    pub panel_rects: [Rect; 3],

    /// Comment text being typed in Insert mode. Cleared when the open image changes.
    pub draft: String,
    /// One-line feedback shown in the status bar until the next key press.
    pub message: Option<String>,
    pub preview: Option<Preview>,

    /// Submitted review not yet confirmed as stored. Kept until the writer
    /// reports success, so a failed write can be retried with `S`.
    pub unstored: Option<Submission>,
    /// A delivery of `unstored` is queued and its outcome not yet reported.
    pub storing: bool,

    /// Token of the auto-advance that is still allowed to fire.
    pub pending_advance: Option<u64>,
    advance_seq: u64,
}

impl AppState {
    /// Wraps `session` with default presentation state for `role`.
    ///
    /// The first gallery row is selected when the session has images.
    pub fn new(session: ReviewSession, role: Role) -> Self {
        let mut gallery_state = ListState::default();
        if !session.is_empty() {
            gallery_state.select(Some(0));
        }
        Self {
            session,
            filter: ReviewFilter::default(),
            role,
            mode: Mode::default(),
            focus: PanelFocus::default(),
            gallery_state,
            comments_scroll: 0,
            help_scroll: 0,
            gallery_viewport_height: 0,
            comments_viewport_height: 0,
            left_pct: 25,
            center_pct: 45,
            right_pct: 30,
            panel_rects: [Rect::default(); 3],
            draft: String::new(),
            message: None,
            preview: None,
            unstored: None,
            storing: false,
            pending_advance: None,
            advance_seq: 0,
        }
    }

    /// `true` when quitting now would lose work: a draft comment, decisions
    /// that were never submitted, or a submission that is not stored yet.
    pub fn has_unsaved_work(&self) -> bool {
        !self.draft.trim().is_empty()
            || (!self.session.is_closed() && self.session.counts().decided() > 0)
            || self.unstored.is_some()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Shows a session error in the status bar.
    pub fn report(&mut self, err: &ReviewError) {
        tracing::debug!("rejected: {err}");
        self.set_message(err.to_string());
    }

    pub fn view_len(&self) -> usize {
        self.session.view(self.filter).len()
    }

    // -----------------------------------------------------------------------
    // Gallery and scrolling
    // -----------------------------------------------------------------------

    /// Points the gallery selection at the open image when it is in the view,
    /// otherwise clamps the current selection to the view.
    pub fn sync_selection(&mut self) {
        if let Some(position) = self.session.focus_position(self.filter) {
            self.gallery_state.select(Some(position));
            return;
        }
        let len = self.view_len();
        if len == 0 {
            self.gallery_state.select(None);
        } else {
            let current = self.gallery_state.selected().unwrap_or(0);
            self.gallery_state.select(Some(current.min(len - 1)));
        }
    }

    /// Moves the gallery selection by `delta` rows, clamped to the view.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.view_len();
        if len == 0 {
            self.gallery_state.select(None);
            return;
        }
        let current = self.gallery_state.selected().unwrap_or(0) as isize;
        let target = (current + delta).clamp(0, len as isize - 1);
        self.gallery_state.select(Some(target as usize));
    }

    /// Scrolls the focused panel down by `lines` rows.
    ///
    /// The gallery moves its selection; the comments panel scrolls its text.
    /// The viewer has nothing to scroll.
    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Gallery => self.move_selection(lines as isize),
            PanelFocus::Viewer => {}
            PanelFocus::Comments => {
                self.comments_scroll = self.comments_scroll.saturating_add(lines);
            }
        }
    }

    /// Scrolls the focused panel up by `lines` rows.
    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Gallery => self.move_selection(-(lines as isize)),
            PanelFocus::Viewer => {}
            PanelFocus::Comments => {
                self.comments_scroll = self.comments_scroll.saturating_sub(lines);
            }
        }
    }

    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Gallery => self.move_selection(isize::MIN / 2),
            PanelFocus::Viewer => {}
            PanelFocus::Comments => self.comments_scroll = 0,
        }
    }

    /// For `Comments`, sets the offset to `u16::MAX` and lets ratatui clamp it.
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Gallery => self.move_selection(isize::MAX / 2),
            PanelFocus::Viewer => {}
            PanelFocus::Comments => self.comments_scroll = u16::MAX,
        }
    }

    /// Scrolls the focused panel down by half its visible height.
    ///
    /// Uses the viewport height cached from the previous render. If the cached
    /// height is zero (first frame), scrolls by 1 to avoid a no-op.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.focused_viewport_height() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.focused_viewport_height() / 2).max(1));
    }

    fn focused_viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Gallery | PanelFocus::Viewer => self.gallery_viewport_height,
            PanelFocus::Comments => self.comments_viewport_height,
        }
    }

    // -----------------------------------------------------------------------
    // Session intents
    // -----------------------------------------------------------------------

    /// Opens the image selected in the gallery.
    pub fn open_selected(&mut self) {
        let Some(index) = self.gallery_state.selected() else {
            self.set_message(format!("no images match the {} filter", self.filter.label()));
            return;
        };
        self.cancel_advance();
        match self.session.open_item(self.filter, index) {
            Ok(_) => {
                self.on_focus_changed();
                self.focus = PanelFocus::Viewer;
            }
            Err(e) => self.report(&e),
        }
    }

    /// Moves to the next or previous image in the active filter.
    pub fn navigate(&mut self, direction: Direction) {
        self.cancel_advance();
        match self.session.advance(self.filter, direction) {
            Ok(_) => self.on_focus_changed(),
            Err(e) => self.report(&e),
        }
    }

    /// Closes the detail view and returns focus to the gallery.
    pub fn close_detail(&mut self) {
        self.cancel_advance();
        self.session.close_item();
        self.discard_draft();
        self.preview = None;
        self.comments_scroll = 0;
        self.focus = PanelFocus::Gallery;
    }

    /// Switches to the next filter (All → Saved → Unsaved).
    pub fn cycle_filter(&mut self) {
        self.cancel_advance();
        self.filter = self.filter.next();
        self.sync_selection();
        self.set_message(format!("showing {} images", self.filter.label().to_lowercase()));
    }

    /// Records a verifier decision on the open image and acts on the follow-up.
    ///
    /// Returns the token of a newly armed auto-advance, which the caller must
    /// schedule. A completed view either opens the submit dialog or reports
    /// how many images are still undecided. Nothing is ever submitted here.
    pub fn decide(&mut self, decision: Decision) -> Option<u64> {
        let follow_up = match self.session.set_status(self.filter, decision) {
            Ok(follow_up) => follow_up,
            Err(e) => {
                self.report(&e);
                return None;
            }
        };
        self.sync_selection();
        match follow_up {
            FollowUp::Advance => Some(self.arm_advance()),
            FollowUp::ReviewComplete { ready: true } => {
                self.cancel_advance();
                self.mode = Mode::ConfirmSubmit;
                None
            }
            FollowUp::ReviewComplete { ready: false } => {
                self.cancel_advance();
                let remaining = self.session.counts().unreviewed;
                self.set_message(format!("end of view; {remaining} image(s) still unreviewed"));
                None
            }
        }
    }

    /// Annotator save: approves the open image and closes the detail view.
    pub fn annotator_save(&mut self) {
        match self.session.set_status(self.filter, Decision::Approve) {
            Ok(_) => {
                let id = self
                    .session
                    .focused()
                    .map(|item| item.id().to_owned())
                    .unwrap_or_default();
                self.close_detail();
                self.sync_selection();
                self.set_message(format!("saved {id}"));
            }
            Err(e) => self.report(&e),
        }
    }

    /// Posts the draft as a comment on the open image and leaves Insert mode.
    ///
    /// A blank draft is discarded without touching the thread.
    pub fn post_draft(&mut self) {
        match self.session.add_comment(&self.draft) {
            Ok(_) => {
                self.draft.clear();
                self.mode = Mode::Normal;
                self.comments_scroll = u16::MAX;
            }
            Err(e) => {
                self.mode = Mode::Normal;
                self.report(&e);
            }
        }
    }

    /// Enters Insert mode for the open image.
    pub fn begin_comment(&mut self) {
        if self.session.is_closed() {
            self.report(&ReviewError::SessionClosed);
            return;
        }
        if self.session.focused().is_none() {
            self.report(&ReviewError::NoFocusedItem);
            return;
        }
        self.cancel_advance();
        self.mode = Mode::Insert;
        self.focus = PanelFocus::Comments;
    }

    /// Opens the submit dialog when the review is complete, otherwise says why not.
    ///
    /// After a failed write the dialog offers to store the same snapshot again.
    pub fn request_submit(&mut self) {
        if self.storing {
            self.set_message("the submission is still being saved");
        } else if self.unstored.is_some() {
            self.mode = Mode::ConfirmSubmit;
        } else if self.session.is_closed() {
            self.report(&ReviewError::SessionClosed);
        } else if self.session.is_empty() {
            self.report(&ReviewError::NoActiveSession);
        } else if !self.session.is_submission_ready() {
            let unreviewed = self
                .session
                .unreviewed_ids()
                .into_iter()
                .map(str::to_owned)
                .collect();
            self.report(&ReviewError::IncompleteReview { unreviewed });
        } else {
            self.cancel_advance();
            self.mode = Mode::ConfirmSubmit;
        }
    }

    /// Finalizes the review into `sink`, or hands an unstored snapshot to it
    /// again.
    ///
    /// On success the detail view is closed; the session refuses any further
    /// changes, and the snapshot is held in `unstored` until the writer
    /// confirms it. On failure the session is still open and the error is
    /// shown.
    pub fn submit(&mut self, sink: &mut dyn SubmissionSink) {
        self.mode = Mode::Normal;
        self.cancel_advance();
        if let Some(submission) = &self.unstored {
            let delivered = sink.deliver(submission).map(|()| submission.id.clone());
            match delivered {
                Ok(id) => {
                    self.storing = true;
                    self.set_message(format!("saving {id} again"));
                }
                Err(e) => self.report(&ReviewError::Sink(e)),
            }
            return;
        }
        match self.session.submit(sink) {
            Ok(submission) => {
                self.draft.clear();
                self.preview = None;
                self.focus = PanelFocus::Gallery;
                self.set_message(format!(
                    "submitted {} decision(s), saving {}",
                    submission.items.len(),
                    submission.id
                ));
                self.unstored = Some(submission);
                self.storing = true;
            }
            Err(e) => self.report(&e),
        }
    }

    /// Applies the storage outcome reported by the database writer.
    pub fn on_submission_stored(&mut self, result: Result<String, StoreFailure>) {
        self.storing = false;
        match result {
            Ok(id) => {
                if self.unstored.as_ref().is_some_and(|s| s.id == id) {
                    self.unstored = None;
                }
                self.set_message(format!("submission {id} saved"));
            }
            Err(failure) => {
                tracing::warn!(submission = %failure.submission.id, "submission was not stored: {}", failure.error);
                self.set_message(format!(
                    "submission was not stored: {}; press S to retry",
                    failure.error
                ));
                self.unstored = Some(failure.submission);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Auto-advance
    // -----------------------------------------------------------------------

    fn arm_advance(&mut self) -> u64 {
        self.advance_seq += 1;
        self.pending_advance = Some(self.advance_seq);
        self.advance_seq
    }

    /// Forgets the pending auto-advance, so its timer event will be ignored.
    pub fn cancel_advance(&mut self) {
        if let Some(token) = self.pending_advance.take() {
            tracing::debug!(token, "auto-advance cancelled");
        }
    }

    /// Handles an auto-advance timer event.
    ///
    /// Returns `false` and does nothing when `token` is not the pending one:
    /// the reviewer navigated, changed the filter, or decided again since the
    /// timer was armed.
    pub fn apply_auto_advance(&mut self, token: u64) -> bool {
        if self.pending_advance != Some(token) {
            tracing::debug!(token, "stale auto-advance ignored");
            return false;
        }
        self.pending_advance = None;
        match self.session.advance(self.filter, Direction::Next) {
            Ok(_) => self.on_focus_changed(),
            Err(e) => self.report(&e),
        }
        true
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Resets presentation state tied to the previously open image.
    fn on_focus_changed(&mut self) {
        self.discard_draft();
        self.comments_scroll = 0;
        self.refresh_preview();
        self.sync_selection();
    }

    /// Drops the draft of the image being left, saying so when it had text.
    fn discard_draft(&mut self) {
        if !self.draft.trim().is_empty() {
            self.set_message("unposted comment discarded");
        }
        self.draft.clear();
    }

    fn refresh_preview(&mut self) {
        self.preview = self.session.focused().map(|item| Preview {
            image_id: item.id().to_owned(),
            dimensions: local_dimensions(item.source()),
        });
    }

    /// Shrinks the viewer (centre) panel by transferring 5% to the side panels.
    ///
    /// The centre panel will not shrink below 20%.
    pub fn shrink_viewer(&mut self) {
        const MIN_CENTER: u16 = 20;
        const STEP: u16 = 5;
        if self.center_pct <= MIN_CENTER {
            return;
        }
        let transfer = STEP.min(self.center_pct - MIN_CENTER);
        self.center_pct -= transfer;
        let left_gain = transfer / 2;
        self.left_pct += left_gain;
        self.right_pct += transfer - left_gain;
    }

    /// Grows the viewer (centre) panel by pulling from both side panels.
    ///
    /// The centre panel will not grow above 80% and no side panel drops below 5%.
    pub fn grow_viewer(&mut self) {
        const MAX_CENTER: u16 = 80;
        const MIN_SIDE: u16 = 5;
        const STEP: u16 = 5;
        if self.center_pct >= MAX_CENTER {
            return;
        }
        let transfer = STEP.min(MAX_CENTER - self.center_pct);
        let left_give = (transfer / 2).min(self.left_pct.saturating_sub(MIN_SIDE));
        let right_give = (transfer - transfer / 2).min(self.right_pct.saturating_sub(MIN_SIDE));
        self.left_pct -= left_give;
        self.right_pct -= right_give;
        self.center_pct += left_give + right_give;
    }
}

/// Reads the pixel size of `uri` when it names a local file.
///
/// Remote URIs are never fetched.
fn local_dimensions(uri: &str) -> Option<(u32, u32)> {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return None;
    }
    let path = Path::new(uri);
    if !path.is_file() {
        return None;
    }
    match image::image_dimensions(path) {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            tracing::debug!(uri, "could not read image dimensions: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgrev_core::{ImageRef, ReviewStatus, Submission};

    fn state(role: Role) -> AppState {
        let session = ReviewSession::new(
            ["a", "b", "c"].map(|id| ImageRef::new(id, format!("https://example.test/{id}.png"))),
        )
        .unwrap();
        AppState::new(session, role)
    }

    #[test]
    fn decision_arms_a_fresh_token_each_time() {
        let mut state = state(Role::Verifier);
        state.open_selected();
        let first = state.decide(Decision::Approve).unwrap();
        let second = state.decide(Decision::Flag).unwrap();
        assert_ne!(first, second);
        assert_eq!(state.pending_advance, Some(second));
        assert!(!state.apply_auto_advance(first), "older token is stale");
        assert!(state.apply_auto_advance(second));
        assert_eq!(state.session.focused().map(|i| i.id()), Some("b"));
    }

    #[test]
    fn manual_navigation_cancels_pending_advance() {
        let mut state = state(Role::Verifier);
        state.open_selected();
        let token = state.decide(Decision::Approve).unwrap();
        state.navigate(Direction::Prev);
        assert_eq!(state.pending_advance, None);
        let focused = state.session.focused_index();
        assert!(!state.apply_auto_advance(token));
        assert_eq!(state.session.focused_index(), focused);
    }

    #[test]
    fn last_decision_opens_submit_dialog_only_when_ready() {
        let mut state = state(Role::Verifier);
        state.open_selected();
        state.navigate(Direction::Prev);
        assert_eq!(state.session.focused().map(|i| i.id()), Some("c"));
        assert_eq!(state.decide(Decision::Approve), None);
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.message.as_deref().unwrap_or("").contains("2 image(s)"));

        state.navigate(Direction::Next);
        state.decide(Decision::Approve);
        state.navigate(Direction::Next);
        state.decide(Decision::Approve);
        assert_eq!(state.session.focused().map(|i| i.id()), Some("b"));
        state.navigate(Direction::Next);
        assert_eq!(state.decide(Decision::Flag), None);
        assert_eq!(state.mode, Mode::ConfirmSubmit);
        assert!(!state.session.is_closed(), "dialog never submits by itself");
    }

    #[test]
    fn annotator_save_approves_and_closes() {
        let mut state = state(Role::Annotator);
        state.open_selected();
        state.annotator_save();
        assert_eq!(state.session.focused(), None);
        assert_eq!(state.session.items()[0].status(), ReviewStatus::Approved);
        assert_eq!(state.focus, PanelFocus::Gallery);
        assert_eq!(state.pending_advance, None);
    }

    #[test]
    fn opening_another_image_discards_the_draft() {
        let mut state = state(Role::Verifier);
        state.open_selected();
        state.begin_comment();
        state.draft.push_str("half-typed");
        state.mode = Mode::Normal;
        state.navigate(Direction::Next);
        assert!(state.draft.is_empty());
        assert_eq!(state.message.as_deref(), Some("unposted comment discarded"));
    }

    #[test]
    fn closing_the_image_reports_a_discarded_draft() {
        let mut state = state(Role::Verifier);
        state.open_selected();
        state.close_detail();
        assert_eq!(state.message, None, "nothing typed, nothing to report");

        state.open_selected();
        state.begin_comment();
        state.draft.push_str("half-typed");
        state.mode = Mode::Normal;
        state.close_detail();
        assert!(state.draft.is_empty());
        assert_eq!(state.message.as_deref(), Some("unposted comment discarded"));
    }

    #[test]
    fn unsaved_work_tracks_draft_and_submission() {
        let mut state = state(Role::Verifier);
        assert!(!state.has_unsaved_work());
        state.open_selected();
        state.draft.push_str("x");
        assert!(state.has_unsaved_work());
        state.draft.clear();
        for _ in 0..3 {
            state.decide(Decision::Approve);
            state.navigate(Direction::Next);
        }
        assert!(state.has_unsaved_work());

        let mut sink: Vec<Submission> = Vec::new();
        state.request_submit();
        assert_eq!(state.mode, Mode::ConfirmSubmit);
        state.submit(&mut sink);
        assert_eq!(sink.len(), 1);
        assert!(state.session.is_closed());
        assert!(state.has_unsaved_work(), "not stored until the writer confirms");

        state.on_submission_stored(Ok(sink[0].id.clone()));
        assert!(!state.has_unsaved_work());
    }

    #[test]
    fn failed_store_keeps_the_snapshot_for_retry() {
        let mut state = state(Role::Verifier);
        state.open_selected();
        for _ in 0..3 {
            state.decide(Decision::Approve);
            state.navigate(Direction::Next);
        }
        let mut first: Vec<Submission> = Vec::new();
        state.request_submit();
        state.submit(&mut first);
        let submission = first.remove(0);

        state.on_submission_stored(Err(StoreFailure {
            submission: submission.clone(),
            error: "disk I/O error".to_owned(),
        }));
        assert!(state.has_unsaved_work());
        assert!(state.session.is_closed());

        state.request_submit();
        assert_eq!(state.mode, Mode::ConfirmSubmit);
        let mut retry: Vec<Submission> = Vec::new();
        state.submit(&mut retry);
        assert_eq!(retry, [submission.clone()], "same snapshot is delivered again");

        state.request_submit();
        assert_eq!(state.mode, Mode::Normal, "no second delivery while one is queued");

        state.on_submission_stored(Ok(submission.id));
        assert!(!state.has_unsaved_work());
    }

    #[test]
    fn submit_before_ready_lists_missing_ids() {
        let mut state = state(Role::Verifier);
        state.request_submit();
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(
            state.message.as_deref(),
            Some("3 image(s) still unreviewed: a, b, c")
        );
    }

    #[test]
    fn filter_change_keeps_selection_in_range() {
        let mut state = state(Role::Verifier);
        state.open_selected();
        state.decide(Decision::Approve);
        state.cycle_filter();
        assert_eq!(state.filter, ReviewFilter::SavedOnly);
        assert_eq!(state.gallery_state.selected(), Some(0));
        state.cycle_filter();
        assert_eq!(state.filter, ReviewFilter::UnsavedOnly);
        // a was decided, so it is not in the unsaved view.
        assert_eq!(state.view_len(), 2);
        assert!(state.gallery_state.selected().is_some_and(|s| s < 2));
    }

    #[test]
    fn viewer_resizing_respects_bounds() {
        let mut state = state(Role::Verifier);
        for _ in 0..20 {
            state.grow_viewer();
        }
        assert!(state.center_pct <= 80);
        assert!(state.left_pct >= 5 && state.right_pct >= 5);
        for _ in 0..20 {
            state.shrink_viewer();
        }
        assert_eq!(state.center_pct, 20);
        assert_eq!(state.left_pct + state.center_pct + state.right_pct, 100);
    }
}
