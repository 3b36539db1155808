//! Gallery panel renderer for imgrev.
//!
//! Renders the left panel from the active filter's view. Each row shows a
//! status badge, the image id, and the number of comments. The open image is
//! marked with `▸` so it stays visible even when the selection moves away.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use imgrev_core::{ReviewItem, ReviewStatus};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the gallery panel, titled with the filter and its size, e.g. "Unsaved (3)".
pub fn render_gallery(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Gallery;
    let open_id = state.session.focused().map(|item| item.id().to_owned());
    let view = state.session.view(state.filter);
    let title = format!("{} ({})", state.filter.label(), view.len());

    let items: Vec<ListItem> = if view.is_empty() {
        let msg = if state.session.is_empty() {
            "No images found"
        } else {
            "Nothing matches this filter (Tab)"
        };
        vec![ListItem::new(Line::styled(msg, Style::default().fg(theme.text_muted)))]
    } else {
        view.iter()
            .map(|item| gallery_row(item, open_id.as_deref() == Some(item.id()), theme))
            .collect()
    };

    let list = List::new(items)
        .block(panel_block(title, is_focused, theme))
        .highlight_style(Style::default().fg(theme.selection).add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(list, area, &mut state.gallery_state);
}

/// Format: `▸ [✓] dog-01.jpg  2c`.
fn gallery_row(item: &ReviewItem, is_open: bool, theme: &Theme) -> ListItem<'static> {
    let marker = if is_open { "▸ " } else { "  " };
    let badge = match item.status() {
        ReviewStatus::Unreviewed => "[ ] ",
        ReviewStatus::Approved => "[✓] ",
        ReviewStatus::Flagged => "[⚑] ",
    };
    let mut spans = vec![
        Span::raw(marker),
        Span::styled(badge, Style::default().fg(theme.status_color(item.status()))),
        Span::raw(item.id().to_owned()),
    ];
    let comments = item.comments().len();
    if comments > 0 {
        spans.push(Span::styled(
            format!("  {comments}c"),
            Style::default().fg(theme.text_muted),
        ));
    }
    ListItem::new(Line::from(spans))
}
