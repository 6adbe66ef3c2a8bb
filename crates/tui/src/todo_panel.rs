//! Task list screen: header counters, add box, banner and task rows.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use taskdeck_core::Task;
use taskdeck_runtime::{RowState, TaskListController};

use crate::theme::TuiTheme;

const INPUT_PLACEHOLDER: &str = "What needs to be done?";

/// Checkbox for a task row.
fn state_icon(completed: bool) -> &'static str {
    if completed { "✓" } else { "☐" }
}

pub fn build_header_line(controller: &TaskListController, theme: &TuiTheme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            " My Tasks ",
            Style::default()
                .fg(theme.text_strong)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} Active ", controller.active_count()),
            Style::default().fg(theme.primary),
        ),
        Span::styled(
            format!(" {} Done ", controller.done_count()),
            Style::default().fg(theme.success),
        ),
        Span::styled(
            format!(" [{}]", controller.store().name()),
            Style::default().fg(theme.text_muted),
        ),
    ])
}

/// Add box content. While a create is in flight the box is disabled.
pub fn build_input_line(
    input: &str,
    focused: bool,
    adding_in_flight: bool,
    theme: &TuiTheme,
) -> Line<'static> {
    if adding_in_flight {
        return Line::from(Span::styled(
            "Adding...",
            Style::default().fg(theme.warning),
        ));
    }
    if input.is_empty() {
        let hint = if focused {
            INPUT_PLACEHOLDER.to_string()
        } else {
            format!("{INPUT_PLACEHOLDER}  [a] add task")
        };
        return Line::from(Span::styled(hint, Style::default().fg(theme.text_muted)));
    }
    Line::from(Span::styled(
        input.to_string(),
        Style::default().fg(theme.text_strong),
    ))
}

fn row_line(
    controller: &TaskListController,
    task: &Task,
    selected: bool,
    theme: &TuiTheme,
) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let mut spans = vec![Span::styled(
        marker,
        Style::default().fg(theme.primary),
    )];

    match controller.row_state(task.id) {
        RowState::Viewing => {
            let icon_color = if task.completed {
                theme.success
            } else {
                theme.text_base
            };
            let mut title_style = Style::default().fg(theme.text_strong);
            if task.completed {
                title_style = title_style
                    .fg(theme.text_muted)
                    .add_modifier(Modifier::CROSSED_OUT);
            }
            spans.push(Span::styled(
                format!("{} ", state_icon(task.completed)),
                Style::default().fg(icon_color),
            ));
            spans.push(Span::styled(task.title.clone(), title_style));
            spans.push(Span::styled(
                format!("  ID: {}", task.id),
                Style::default().fg(theme.text_muted),
            ));
        }
        RowState::Editing => {
            let draft = controller
                .edit_session()
                .map(|e| e.draft.clone())
                .unwrap_or_default();
            spans.push(Span::styled("✎ ", Style::default().fg(theme.warning)));
            spans.push(Span::styled(
                format!("{draft}▏"),
                Style::default()
                    .fg(theme.text_strong)
                    .add_modifier(Modifier::UNDERLINED),
            ));
            spans.push(Span::styled(
                "  [Enter] save  [Esc] cancel",
                Style::default().fg(theme.text_muted),
            ));
        }
        RowState::PendingEditConfirm => {
            let draft = controller
                .edit_session()
                .map(|e| e.draft.trim().to_string())
                .unwrap_or_default();
            spans.push(Span::styled(
                format!("? Rename to \"{draft}\"? [y/n]"),
                Style::default().fg(theme.warning),
            ));
        }
        RowState::PendingDeleteConfirm => {
            spans.push(Span::styled(
                format!("✗ Delete \"{}\"? [y/n]", task.title),
                Style::default()
                    .fg(theme.danger)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }
    Line::from(spans)
}

pub fn build_task_lines(
    controller: &TaskListController,
    selected: usize,
    theme: &TuiTheme,
) -> Vec<Line<'static>> {
    if controller.is_loading() && controller.tasks().is_empty() {
        return vec![Line::from(Span::styled(
            "Loading todos...",
            Style::default().fg(theme.text_muted),
        ))];
    }
    if controller.tasks().is_empty() {
        return vec![Line::from(Span::styled(
            "No tasks yet. Add one above!",
            Style::default().fg(theme.text_muted),
        ))];
    }
    controller
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| row_line(controller, task, i == selected, theme))
        .collect()
}

pub fn build_hint_line(theme: &TuiTheme) -> Line<'static> {
    Line::from(Span::styled(
        " [a] add  [space] toggle  [e] edit  [d] delete  [r] reload  [h] home  [q] quit",
        Style::default().fg(theme.text_muted),
    ))
}

/// Render the list screen into `area`.
pub fn render_task_screen(
    frame: &mut Frame,
    area: Rect,
    controller: &TaskListController,
    input: &str,
    input_focused: bool,
    selected: usize,
    theme: &TuiTheme,
) {
    let banner_height = if controller.banner().is_some() { 3 } else { 0 };
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(build_header_line(controller, theme))
            .style(Style::default().bg(theme.bar_bg)),
        areas[0],
    );

    let input_border = if input_focused && !controller.is_adding() {
        theme.border_active
    } else {
        theme.border_normal
    };
    let input_block = Block::default()
        .title(" Add Task ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border));
    frame.render_widget(
        Paragraph::new(build_input_line(
            input,
            input_focused,
            controller.is_adding(),
            theme,
        ))
        .block(input_block),
        areas[1],
    );
    if input_focused && !controller.is_adding() {
        let x = areas[1].x + 1 + input.chars().count() as u16;
        frame.set_cursor_position((x.min(areas[1].right().saturating_sub(2)), areas[1].y + 1));
    }

    if let Some(banner) = controller.banner() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                banner.to_string(),
                Style::default().fg(theme.danger),
            ))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.danger)),
            ),
            areas[2],
        );
    }

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_normal));
    let inner_height = list_block.inner(areas[3]).height as usize;
    let scroll = selected.saturating_sub(inner_height.saturating_sub(1));
    frame.render_widget(
        Paragraph::new(build_task_lines(controller, selected, theme))
            .block(list_block)
            .scroll((scroll as u16, 0)),
        areas[3],
    );

    frame.render_widget(Paragraph::new(build_hint_line(theme)), areas[4]);

    if let Some(alert) = controller.alert() {
        render_alert(frame, area, alert, theme);
    }
}

/// Blocking alert box, dismissed with Enter or Esc.
fn render_alert(frame: &mut Frame, area: Rect, message: &str, theme: &TuiTheme) {
    let width = area.width.min(60);
    let height = 5.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.text_strong),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] OK",
            Style::default().fg(theme.text_muted),
        )),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Error ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.danger)),
            ),
        popup,
    );
}
