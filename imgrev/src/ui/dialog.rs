//! Confirmation dialogs for quitting and submitting.
//!
//! Both are small centred modals drawn with `Clear` underneath, like the help
//! overlay. Key handling lives in `keybindings.rs`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::theme::Theme;

pub fn render_confirm_quit(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let mut lines = Vec::new();
    if !state.draft.trim().is_empty() {
        lines.push(Line::from("Your draft comment has not been posted."));
    }
    let decided = state.session.counts().decided();
    if decided > 0 && !state.session.is_closed() {
        lines.push(Line::from(format!("{decided} decision(s) have not been submitted.")));
    }
    if state.unstored.is_some() {
        lines.push(Line::from("The submitted review has not been saved."));
    }
    lines.push(Line::from(""));
    lines.push(answer_line("Quit anyway?", theme));
    render_dialog(frame, " Quit ", Text::from(lines), theme);
}

pub fn render_confirm_submit(frame: &mut Frame, state: &AppState, theme: &Theme) {
    if let Some(submission) = &state.unstored {
        let text = Text::from(vec![
            Line::from("The submitted review could not be saved."),
            Line::from(format!("{} decision(s) in {}", submission.items.len(), submission.id)),
            Line::from(""),
            answer_line("Try saving it again?", theme),
        ]);
        render_dialog(frame, " Save ", text, theme);
        return;
    }
    let counts = state.session.counts();
    let text = Text::from(vec![
        Line::from("Every image has a decision."),
        Line::from(vec![
            Span::styled(format!("{} approved", counts.approved), Style::default().fg(theme.status_approved)),
            Span::raw(", "),
            Span::styled(format!("{} flagged", counts.flagged), Style::default().fg(theme.status_flagged)),
        ]),
        Line::from(""),
        answer_line("Submit the review?", theme),
    ]);
    render_dialog(frame, " Submit ", text, theme);
}

fn answer_line(question: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::raw(question),
        Span::raw("  "),
        Span::styled("y", Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD)),
        Span::raw(" / "),
        Span::styled("n", Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD)),
    ])
}

fn render_dialog(frame: &mut Frame, title: &'static str, text: Text<'static>, theme: &Theme) {
    let height = u16::try_from(text.lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let area: Rect = frame
        .area()
        .centered(Constraint::Length(48), Constraint::Length(height));

    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(theme.border_active))
        .style(Style::default().bg(theme.background));
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
