use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::storage::KeyValueStore;
use crate::task::Task;
use crate::view::{Filter, Sort};

use super::app::{AppState, Focus, StatusKind};
use super::model;

const HELP_KEY_WIDTH: usize = 12;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);
const COLOR_BORDER_INPUT: Color = Color::Rgb(180, 156, 92);

pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &AppState<S>) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_selectors(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_list(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn render_selectors<S: KeyValueStore>(frame: &mut Frame, app: &AppState<S>, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "To-Do List",
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("filter ", Style::default().fg(COLOR_MUTED_DARK)),
    ];
    for (idx, filter) in Filter::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("|", Style::default().fg(COLOR_MUTED_DARK)));
        }
        spans.push(selector_span(filter.as_str(), *filter == app.filter, COLOR_WARNING));
    }
    spans.push(Span::raw("   "));
    spans.push(Span::styled("sort ", Style::default().fg(COLOR_MUTED_DARK)));
    for (idx, sort) in Sort::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("|", Style::default().fg(COLOR_MUTED_DARK)));
        }
        spans.push(selector_span(sort.as_str(), *sort == app.sort, COLOR_ACCENT));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn selector_span(label: &'static str, active: bool, color: Color) -> Span<'static> {
    if active {
        Span::styled(
            label,
            Style::default()
                .fg(color)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
    } else {
        Span::styled(label, Style::default().fg(COLOR_MUTED))
    }
}

fn render_input<S: KeyValueStore>(frame: &mut Frame, app: &AppState<S>, area: Rect) {
    let focused = app.focus == Focus::Input;
    let content = if app.input.is_empty() && !focused {
        Span::styled("Enter a task", Style::default().fg(COLOR_MUTED_DARK))
    } else {
        Span::styled(app.input.value().to_string(), Style::default().fg(COLOR_TEXT))
    };
    let border = if focused {
        COLOR_BORDER_INPUT
    } else {
        COLOR_MUTED_DARK
    };
    let widget = Paragraph::new(Line::from(content)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("New task")
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(widget, area);

    if focused {
        let inner_width = area.width.saturating_sub(2);
        let typed = app.input.value().chars().count() as u16;
        let x = area.x + 1 + typed.min(inner_width.saturating_sub(1));
        frame.set_cursor(x, area.y + 1);
    }
}

fn render_list<S: KeyValueStore>(frame: &mut Frame, app: &AppState<S>, area: Rect) {
    let mut lines = Vec::new();
    let content_width = area.width.saturating_sub(2) as usize;
    let help_lines = if app.show_help {
        build_help_lines()
    } else {
        Vec::new()
    };
    let help_reserved = if help_lines.is_empty() {
        0
    } else {
        help_lines.len() + 1
    };

    let tasks = app.visible_tasks();
    if tasks.is_empty() {
        let message = if app.store.is_empty() {
            "No tasks"
        } else {
            "No matches"
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(COLOR_MUTED),
        )));
    } else {
        let list_height = area
            .height
            .saturating_sub(2)
            .saturating_sub(help_reserved as u16) as usize;
        let (start, end) = model::list_window(tasks.len(), app.selected, list_height);
        let list_focused = app.focus == Focus::List;
        for (pos, task) in tasks.iter().enumerate().take(end).skip(start) {
            let selected = list_focused && app.selected == Some(pos);
            lines.push(render_task_row(task, selected, content_width));
        }
    }

    if !help_lines.is_empty() {
        lines.push(Line::from(""));
        lines.extend(help_lines);
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Tasks")
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_task_row(task: &Task, selected: bool, width: usize) -> Line<'static> {
    let (mark, mark_style, text_style) = if task.completed {
        (
            "[x] ",
            Style::default().fg(COLOR_SUCCESS),
            Style::default()
                .fg(COLOR_MUTED)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        (
            "[ ] ",
            Style::default().fg(COLOR_MUTED),
            Style::default().fg(COLOR_TEXT),
        )
    };
    let text = truncate_text(&task.text, width.saturating_sub(mark.len()));

    let mut spans = vec![
        Span::styled(mark, mark_style),
        Span::styled(text, text_style),
    ];
    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }
    Line::from(spans)
}

fn build_help_lines() -> Vec<Line<'static>> {
    let entries = [
        ("enter", "add task (input) / toggle (list)"),
        ("tab", "switch input and list"),
        ("j/k", "move selection"),
        ("space x", "toggle completed"),
        ("d del", "delete task"),
        ("f", "cycle filter"),
        ("s", "cycle sort"),
        ("q esc", "quit (list)"),
    ];
    entries
        .iter()
        .map(|(key, description)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:<width$}", width = HELP_KEY_WIDTH),
                    Style::default().fg(COLOR_INFO),
                ),
                Span::styled(*description, Style::default().fg(COLOR_MUTED)),
            ])
        })
        .collect()
}

fn render_footer<S: KeyValueStore>(frame: &mut Frame, app: &AppState<S>, area: Rect) {
    let hint_span = Span::styled(app.footer_hint(), Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        app.task_count_summary(),
        Style::default().fg(COLOR_ACCENT),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        );
    frame.render_widget(widget, area);
}

fn truncate_text(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = value.chars().take(max - 1).collect();
    out.push('…');
    out
}
