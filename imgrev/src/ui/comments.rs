//! Comments panel renderer for imgrev.
//!
//! Lists the open image's thread oldest first with local timestamps, followed by
//! the draft being typed when in Insert mode (or a kept draft after `Esc`).

use chrono::Local;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Paragraph does not clamp its scroll offset, so the stored offset is clamped
/// here to keep the last line reachable after jumping to the bottom.
pub fn render_comments(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Comments;
    let Some(item) = state.session.focused() else {
        frame.render_widget(panel_block("Comments", is_focused, theme), area);
        return;
    };

    let title = format!("Comments ({})", item.comments().len());
    let muted = Style::default().fg(theme.text_muted);

    let mut lines: Vec<Line> = Vec::new();
    if item.comments().is_empty() && state.mode != Mode::Insert {
        lines.push(Line::styled("No comments yet.", muted));
    }
    for comment in item.comments() {
        let stamp = comment.created_at.with_timezone(&Local).format("%H:%M");
        lines.push(Line::from(vec![
            Span::styled(format!("{} {stamp}  ", comment.id), muted),
            Span::raw(comment.text.clone()),
        ]));
    }

    if state.mode == Mode::Insert || !state.draft.is_empty() {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        let cursor = if state.mode == Mode::Insert { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.status_mode_insert)),
            Span::raw(format!("{}{cursor}", state.draft)),
        ]));
    }

    let max_scroll = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_sub(inner_rect(area).height);
    state.comments_scroll = state.comments_scroll.min(max_scroll);

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(panel_block(title, is_focused, theme))
            .wrap(Wrap { trim: false })
            .scroll((state.comments_scroll, 0)),
        area,
    );
}
