//! UI rendering module for imgrev.
//!
//! This is the module root for `ui/`. It re-exports `render()` as the single entry
//! point called by the event loop's `terminal.draw()` closure.
//!
//! All layout arithmetic lives in `layout.rs`. Each panel has its own module:
//! `gallery.rs` (left), `viewer.rs` (centre), `comments.rs` (right). Modal
//! layers (`help.rs`, `dialog.rs`) are drawn last so they sit on top.

mod comments;
mod dialog;
mod gallery;
mod help;
pub mod keybindings;
mod layout;
mod viewer;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: 3-panel layout, status bar, and any overlay.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()`.
///
/// Viewport heights and panel rects are written back into `state` before the
/// panels are drawn so that the *next* keypress or click can use them.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [left, center, right, status_bar] = compute_layout(frame, state);

    state.gallery_viewport_height = inner_rect(left).height;
    state.comments_viewport_height = inner_rect(right).height;
    state.panel_rects = [left, center, right];

    let focus = state.focus;

    if left.width > 0 {
        gallery::render_gallery(frame, left, focus, state, theme);
    }
    viewer::render_viewer(frame, center, focus, state, theme);
    if right.width > 0 {
        comments::render_comments(frame, right, focus, state, theme);
    }

    render_status_bar(frame, status_bar, state, theme);

    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll, state.role),
        Mode::ConfirmQuit => dialog::render_confirm_quit(frame, state, theme),
        Mode::ConfirmSubmit => dialog::render_confirm_submit(frame, state, theme),
        Mode::Normal | Mode::Insert => {}
    }
}
