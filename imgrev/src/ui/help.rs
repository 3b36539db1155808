//! Help overlay renderer for imgrev.
//!
//! Draws a centred modal box over the panel layout using ratatui's `Clear`
//! widget to erase the background first, inside the same `terminal.draw()`
//! closure as all other panels.

use ratatui::{
    Frame,
    layout::Constraint,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::app::Role;
use crate::theme::Theme;

/// Renders the help overlay as a centred modal on top of the 3-panel layout.
///
/// Skipped on terminals narrower than 60 columns to avoid a zero-height `Rect`.
/// `help_scroll` is the vertical offset that j/k adjust in HelpOverlay mode.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16, role: Role) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to dismiss ")
        .border_style(Style::default().fg(theme.border_active))
        .style(Style::default().bg(theme.background));

    frame.render_widget(
        Paragraph::new(build_help_text(role))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

/// Builds the help text, listing only the reviewing keys `role` can use.
fn build_help_text(role: Role) -> Text<'static> {
    let mut lines = vec![
        Line::from("Gallery"),
        Line::from("  j / k         Move selection down / up"),
        Line::from("  g / G         Jump to first / last image"),
        Line::from("  Ctrl-d / u    Move half a page down / up"),
        Line::from("  Enter / l     Open selected image"),
        Line::from("  Tab           Cycle filter: All -> Saved -> Unsaved"),
        Line::from(""),
        Line::from("Open image"),
        Line::from("  n / }         Next image in the filter (wraps)"),
        Line::from("  p / {         Previous image in the filter (wraps)"),
        Line::from("  Esc / h       Close the image"),
        Line::from(""),
    ];
    match role {
        Role::Verifier => lines.extend([
            Line::from("Reviewing (verifier)"),
            Line::from("  a             Approve, then move on after a short delay"),
            Line::from("  f             Flag, then move on after a short delay"),
            Line::from("  c / i         Write a comment (Enter posts, Esc leaves)"),
            Line::from("  S             Submit once every image is decided, or retry a failed save"),
        ]),
        Role::Annotator => lines.extend([
            Line::from("Annotating"),
            Line::from("  s             Save the image and close it"),
        ]),
    }
    lines.extend([
        Line::from(""),
        Line::from("Layout"),
        Line::from("  H / L         Move panel focus left / right"),
        Line::from("  < / >         Shrink / grow the image panel by 5%"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q             Quit (confirms if work would be lost)"),
    ]);
    Text::from(lines)
}
