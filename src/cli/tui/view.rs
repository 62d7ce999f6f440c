//! Outline rendering

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::app::{App, InputMode};

const PLACEHOLDER: &str = "(empty - press e to edit)";

/// Draw the outline layout
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Outline
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    draw_outline(frame, app, chunks[0]);
    draw_status_bar(frame, app, chunks[1]);
}

fn draw_outline(frame: &mut Frame, app: &App, area: Rect) {
    let linking = app.list().linking().is_some();

    let items: Vec<ListItem> = app
        .rows()
        .iter()
        .map(|row| {
            let Some(task) = app.list().get(row.id) else {
                return ListItem::new("");
            };

            let editing = matches!(app.input_mode(), InputMode::Edit(id) if *id == task.id);

            let indent = "  ".repeat(row.level);
            let branch = if row.level > 0 { "> " } else { "" };
            let marker = if task.is_completed { "[x]" } else { "[ ]" };

            let text = if editing {
                format!("{}{}{} {}_", indent, branch, marker, task.content)
            } else if task.content.trim().is_empty() {
                format!("{}{}{} {}", indent, branch, marker, PLACEHOLDER)
            } else {
                let first_line = task.content.lines().next().unwrap_or("");
                format!("{}{}{} {}", indent, branch, marker, first_line)
            };

            let style = if editing {
                Style::default().fg(Color::Green)
            } else if linking {
                // While picking a parent, highlight eligible targets and
                // dim everything that would close a cycle.
                if app.list().link_eligible(task.id) {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                }
            } else if task.is_completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let title = if linking { "Tasks - pick a parent" } else { "Tasks" };

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.rows().is_empty() {
        state.select(Some(app.selected()));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (content, style) = match app.input_mode() {
        InputMode::Normal => {
            let msg = app.status_message().unwrap_or(
                "[a]dd [e]dit [Space]done [d]elete [l]ink [u]nlink [J/K]move [q]uit [?]help",
            );
            (msg.to_string(), Style::default())
        }
        InputMode::Edit(_) => (
            "Editing: Enter/Esc to finish (an empty task is discarded)".to_string(),
            Style::default().fg(Color::Green),
        ),
        InputMode::ConfirmDelete(_) => (
            "Delete task and its direct dependents? [y/n]".to_string(),
            Style::default().fg(Color::Yellow),
        ),
    };

    let paragraph = Paragraph::new(format!("twig  {}", content))
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
