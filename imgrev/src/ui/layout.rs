//! Responsive 3-panel layout engine for imgrev.
//!
//! This module is pure layout arithmetic plus the status bar. It is called
//! inside `terminal.draw()` on every render so every frame gets a fresh layout
//! that reflects the current terminal size.
//!
//! # Panel geometry
//!
//! At `>= 100` columns all three panels are visible with widths driven by
//! `AppState.left_pct / center_pct / right_pct` (defaults 25 / 45 / 30).
//! Narrower terminals show only the gallery and the viewer.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single column.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Returns `[left, center, right, status_bar]` panel `Rect`s for the current frame.
///
/// | Terminal width | Layout |
/// |----------------|--------|
/// | `< 100` cols   | Comments collapsed; gallery 35%, viewer fills the rest |
/// | `>= 100` cols  | 3-panel split using `state.left_pct / center_pct / right_pct` |
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 4] {
    let term_width = frame.area().width;

    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let horizontal = if term_width >= 100 {
        Layout::horizontal([
            Constraint::Percentage(state.left_pct),
            Constraint::Percentage(state.center_pct),
            Constraint::Percentage(state.right_pct),
        ])
    } else {
        Layout::horizontal([
            Constraint::Percentage(35),
            Constraint::Fill(1),
            Constraint::Length(0),
        ])
    }
    .spacing(Spacing::Overlap(1));

    let [left, center, right] = main_area.layout(&horizontal);

    [left, center, right, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Applies `BorderType::Thick` when the panel is focused and `BorderType::Plain`
/// otherwise. `MergeStrategy::Fuzzy` is required because `Exact` produces
/// incorrect junctions when mixing `Thick` and `Plain` borders.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Layout: `[mode] role · filter · counts · readiness   message`. Overlays
/// display `NORMAL` because they are transient layers over Normal mode.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay | Mode::ConfirmQuit | Mode::ConfirmSubmit => {
            (" NORMAL ", theme.status_mode_normal)
        }
    };

    let counts = state.session.counts();
    let readiness = if state.session.is_closed() {
        Span::styled("submitted", Style::default().fg(theme.status_approved))
    } else if state.session.is_submission_ready() && !state.session.is_empty() {
        Span::styled("ready to submit", Style::default().fg(theme.status_approved))
    } else {
        Span::raw(format!("{} to go", counts.unreviewed))
    };

    let sep = || Span::styled(" · ", Style::default().fg(theme.text_muted));
    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::raw(state.role.label()),
        sep(),
        Span::raw(format!("{} ({})", state.filter.label(), state.view_len())),
        sep(),
        Span::styled(format!("✓{}", counts.approved), Style::default().fg(theme.status_approved)),
        Span::raw(" "),
        Span::styled(format!("⚑{}", counts.flagged), Style::default().fg(theme.status_flagged)),
        Span::raw(format!(" / {}", counts.total())),
        sep(),
        readiness,
    ];
    if let Some(message) = &state.message {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(message.clone(), Style::default().fg(theme.status_message)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
