//! Dashboard rendering.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use taskboard_proto::task::{Task, TaskStatus};

use super::theme;
use crate::app::App;
use crate::dashboard::{DashboardStats, recent};

/// Render the dashboard: counts, recent tasks, and the collaborator URL.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.snapshot();
    let stats = DashboardStats::from_tasks(&snapshot);

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    render_stats(frame, chunks[0], &stats);
    render_recent(frame, chunks[1], app, recent(&snapshot, app.recent_limit()));

    let mut backend = vec![
        Span::styled(" Backend: ", theme::dimmed()),
        Span::styled(app.api_label(), theme::normal()),
    ];
    if stats.hidden > 0 {
        backend.push(Span::styled(
            format!("  {} not on the board (unknown status)", stats.hidden),
            theme::normal().fg(theme::ALERT),
        ));
    }
    let backend = Line::from(backend);
    frame.render_widget(Paragraph::new(backend), chunks[2]);
}

fn render_stats(frame: &mut Frame, area: Rect, stats: &DashboardStats) {
    let cards = [
        ("Total", stats.total, theme::TEXT),
        ("To Do", stats.todo, theme::status_color(TaskStatus::Pending)),
        (
            "In Progress",
            stats.in_progress,
            theme::status_color(TaskStatus::InProgress),
        ),
        ("Completed", stats.completed, theme::OK),
    ];
    let areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

    for ((label, count, color), rect) in cards.into_iter().zip(areas.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::dimmed())
            .title(Span::styled(format!(" {label} "), theme::panel_title(color)));
        let value = Paragraph::new(count.to_string())
            .style(theme::bold())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(value, *rect);
    }
}

fn render_recent(frame: &mut Frame, area: Rect, app: &App, tasks: &[Task]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::normal())
        .title(Span::styled(" Recent Tasks ", theme::panel_title(theme::ACCENT)));

    if tasks.is_empty() {
        let text = if app.store().is_loaded() {
            "No tasks yet"
        } else {
            "Loading\u{2026}"
        };
        let empty = Paragraph::new(text)
            .style(theme::dimmed())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let status_style = task
                .status()
                .map_or_else(theme::dimmed, |s| theme::normal().fg(theme::status_color(s)));
            let status_label = task
                .status()
                .map_or_else(|| task.status.to_string(), |s| s.label().to_string());
            ListItem::new(Line::from(vec![
                Span::styled(format!("#{} ", task.id), theme::dimmed()),
                Span::styled(task.title.as_str(), theme::normal()),
                Span::styled(
                    task.description
                        .as_deref()
                        .map_or_else(String::new, |d| format!(" \u{b7} {d}")),
                    theme::dimmed(),
                ),
                Span::raw("  "),
                Span::styled(status_label, status_style),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", task.priority),
                    theme::normal().fg(theme::priority_color(task.priority)),
                ),
                Span::raw("  "),
                Span::styled(
                    format_timestamp(task.created_at, app.timestamp_format()),
                    theme::dimmed(),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Formats `ts` with a user-supplied chrono format, falling back to ISO-like
/// output when the format string is invalid.
fn format_timestamp(ts: NaiveDateTime, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", ts.format(format)).is_err() {
        return ts.format("%Y-%m-%d %H:%M").to_string();
    }
    out
}
