//! Landing screen shown before the task list.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::theme::TuiTheme;

const FEATURES: [(&str, &str); 3] = [
    ("Create tasks", "add what needs to be done in a keystroke"),
    ("Track progress", "check tasks off and see what is left"),
    ("Stay organized", "rename or remove tasks as plans change"),
];

pub fn build_home_lines(backend_label: &str, theme: &TuiTheme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Taskdeck",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Manage your tasks efficiently with a simple terminal todo app",
            Style::default().fg(theme.text_base),
        )),
        Line::from(""),
    ];

    for (name, detail) in FEATURES {
        lines.push(Line::from(vec![
            Span::styled(
                format!("• {name}"),
                Style::default()
                    .fg(theme.text_strong)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(": {detail}"), Style::default().fg(theme.text_muted)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] Get Started →",
        Style::default()
            .fg(theme.success)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Backend: {backend_label}   [q] quit"),
        Style::default().fg(theme.text_muted),
    )));
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, backend_label: &str, theme: &TuiTheme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_normal));
    let paragraph = Paragraph::new(build_home_lines(backend_label, theme))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
