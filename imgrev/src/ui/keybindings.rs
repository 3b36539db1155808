//! Keybinding dispatcher for imgrev.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop what else to do: quit, start an
//! auto-advance timer, or deliver the submission. The dispatcher never spawns
//! tasks or touches the sink itself, so every path here is testable without a
//! runtime. It branches first on `state.mode` so that HelpOverlay, ConfirmQuit,
//! ConfirmSubmit, Insert, and Normal all have isolated handler functions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use imgrev_core::{Decision, Direction};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus, Role};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
    /// Start the auto-advance timer for this token.
    ScheduleAdvance(u64),
    /// The reviewer confirmed the submit dialog; deliver the review to the sink.
    Submit,
}

/// Dispatches a key event to the handler matching the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::ConfirmSubmit => handle_confirm_submit(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event while in Normal mode.
///
/// The previous status message is cleared first. Scroll keys are delegated to
/// `handle_scroll_key`, reviewing keys to `handle_review_key`; navigation,
/// focus, resize, and mode transitions are handled inline.
fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    state.message = None;

    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    if let Some(action) = handle_review_key(key, state) {
        return action;
    }

    match key.code {
        // Open / close
        KeyCode::Enter | KeyCode::Char('l') => state.open_selected(),
        KeyCode::Esc | KeyCode::Char('h') => state.close_detail(),

        // Image navigation within the active filter
        KeyCode::Char('n') | KeyCode::Char('}') => state.navigate(Direction::Next),
        KeyCode::Char('p') | KeyCode::Char('{') => state.navigate(Direction::Prev),

        KeyCode::Tab => state.cycle_filter(),

        // Panel focus
        KeyCode::Char('H') => state.focus = state.focus.prev(),
        KeyCode::Char('L') => state.focus = state.focus.next(),

        // Viewer panel resize
        KeyCode::Char('<') => state.shrink_viewer(),
        KeyCode::Char('>') => state.grow_viewer(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }

        KeyCode::Char('q') => {
            if state.has_unsaved_work() {
                state.mode = Mode::ConfirmQuit;
            } else {
                return KeyAction::Quit;
            }
        }

        _ => {}
    }
    KeyAction::Continue
}

/// Handles the reviewing keys, gated on the active role.
///
/// Returns `None` for keys that are not reviewing keys.
fn handle_review_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let role = state.role;
    let action = match (key.code, role) {
        (KeyCode::Char('a'), Role::Verifier) => advance_after(state.decide(Decision::Approve)),
        (KeyCode::Char('f'), Role::Verifier) => advance_after(state.decide(Decision::Flag)),
        (KeyCode::Char('c') | KeyCode::Char('i'), Role::Verifier) => {
            state.begin_comment();
            KeyAction::Continue
        }
        (KeyCode::Char('S'), Role::Verifier) => {
            state.request_submit();
            KeyAction::Continue
        }
        (KeyCode::Char('s'), Role::Annotator) => {
            state.annotator_save();
            KeyAction::Continue
        }
        (KeyCode::Char('a' | 'f' | 'c' | 'i' | 'S'), Role::Annotator) => {
            state.set_message("annotators can only save (s)");
            KeyAction::Continue
        }
        (KeyCode::Char('s'), Role::Verifier) => {
            state.set_message("verifiers decide with a (approve) or f (flag)");
            KeyAction::Continue
        }
        _ => return None,
    };
    Some(action)
}

fn advance_after(token: Option<u64>) -> KeyAction {
    token.map_or(KeyAction::Continue, KeyAction::ScheduleAdvance)
}

/// Handles scroll-related keys in Normal mode: j / k / g / G and Ctrl-d / Ctrl-u.
///
/// Returns `Some(KeyAction)` when the key was consumed, `None` when the key
/// should fall through to the rest of the Normal handler.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') => state.scroll_top(),
        KeyCode::Char('G') => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is visible.
///
/// `j`/`k`/`g`/`G` scroll the overlay; `?`, `Esc`, or `q` dismiss it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Confirmation dialogs
// ---------------------------------------------------------------------------

/// `y` confirms the quit; `n` or `Esc` returns to Normal mode.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

/// `y` or `Enter` submits; `n` or `Esc` keeps reviewing.
fn handle_confirm_submit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => KeyAction::Submit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            state.set_message("submit cancelled; press S to submit later");
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Handles a key event while typing a comment.
///
/// `Enter` posts the draft, `Esc` leaves Insert mode keeping the draft,
/// `Backspace` deletes the last character, and any other printable character
/// is appended.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Enter => state.post_draft(),
        KeyCode::Backspace => {
            state.draft.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => state.draft.push(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: click-to-focus and scroll-wheel.
///
/// Left click on a panel sets focus to that panel. The scroll wheel moves the
/// focused panel by 3 rows, or the help overlay when it is open.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_mouse_click(mouse.column, mouse.row, state),
        MouseEventKind::ScrollUp if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        MouseEventKind::ScrollDown if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}

/// Sets panel focus based on the clicked screen position.
///
/// Panels with zero width are skipped so collapsed panels cannot receive focus.
fn handle_mouse_click(col: u16, row: u16, state: &mut AppState) {
    let pos = Position { x: col, y: row };
    let [left, center, right] = state.panel_rects;

    if left.width > 0 && left.contains(pos) {
        state.focus = PanelFocus::Gallery;
    } else if center.contains(pos) {
        state.focus = PanelFocus::Viewer;
    } else if right.width > 0 && right.contains(pos) {
        state.focus = PanelFocus::Comments;
    }
}
