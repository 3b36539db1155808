//! Detail panel renderer for imgrev.
//!
//! Shows the open image's id, source, decision, and where it sits in the active
//! filter. Pixel dimensions come from the cached `AppState::preview`, so no file
//! is read during rendering.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::app::{AppState, PanelFocus, Role};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

pub fn render_viewer(frame: &mut Frame, area: Rect, focus: PanelFocus, state: &AppState, theme: &Theme) {
    let is_focused = focus == PanelFocus::Viewer;
    let block = panel_block("Image", is_focused, theme);

    let Some(item) = state.session.focused() else {
        let hint = if state.session.is_closed() {
            "Review submitted. Press q to quit."
        } else {
            "No image open. Select one in the gallery and press Enter."
        };
        let paragraph = Paragraph::new(Line::styled(hint, Style::default().fg(theme.text_muted)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let label = |name: &'static str| Span::styled(format!("{name:<10}"), Style::default().fg(theme.text_muted));

    let position = match state.session.focus_position(state.filter) {
        Some(p) => format!("{} of {} in {}", p + 1, state.view_len(), state.filter.label()),
        None => format!("not in the {} view", state.filter.label()),
    };
    let dimensions = state
        .preview
        .as_ref()
        .filter(|preview| preview.image_id == item.id())
        .and_then(|preview| preview.dimensions)
        .map_or_else(|| "unknown".to_owned(), |(w, h)| format!("{w} × {h}"));

    let status = item.status();
    let mut lines = vec![
        Line::from(Span::styled(
            item.id().to_owned(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![label("Source"), Span::raw(item.source().to_owned())]),
        Line::from(vec![label("Size"), Span::raw(dimensions)]),
        Line::from(vec![
            label("Status"),
            Span::styled(status.as_str(), Style::default().fg(theme.status_color(status))),
        ]),
        Line::from(vec![label("Position"), Span::raw(position)]),
        Line::from(vec![label("Comments"), Span::raw(item.comments().len().to_string())]),
        Line::raw(""),
    ];
    let keys = match state.role {
        Role::Verifier => "a approve · f flag · c comment · n/p next/prev · Esc close",
        Role::Annotator => "s save · n/p next/prev · Esc close",
    };
    lines.push(Line::styled(keys, Style::default().fg(theme.text_muted)));

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
