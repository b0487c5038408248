//! Status bar rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, InputMode, NoticeLevel, View};
use crate::tasks::{DraftField, TaskDraft};

/// Render the two-line footer: notice (or the create form) above key hints.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

    let top = match app.mode {
        InputMode::Compose => compose_line(&app.draft),
        InputMode::Normal => app.notice().map_or_else(Line::default, |notice| {
            let color = match notice.level {
                NoticeLevel::Info => theme::OK,
                NoticeLevel::Error => theme::ALERT,
            };
            Line::from(vec![
                Span::styled(" \u{25cf} ", theme::normal().fg(color)),
                Span::styled(notice.text.as_str(), theme::normal()),
            ])
        }),
    };
    frame.render_widget(Paragraph::new(top), rows[0]);

    let help_text = match (app.mode, app.view, app.drag().is_dragging()) {
        (InputMode::Compose, _, _) => {
            "Enter: create | Tab: next field | Space/\u{2190}\u{2192}: priority | Esc: cancel"
        }
        (_, View::Dashboard, _) => "Tab/2: board | n: new task | r: refresh | q: quit",
        (_, View::Board, true) => "\u{2190}\u{2192}: choose column | Space: drop | Esc: cancel",
        (_, View::Board, false) => {
            "\u{2190}\u{2192}: column | \u{2191}\u{2193}: card | Space: pick up | n: new | r: refresh | Tab/1: dashboard | q: quit"
        }
    };
    let mut spans = vec![
        Span::styled(concat!(" Taskboard v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
    ];
    let hidden = app.hidden_count();
    if hidden > 0 {
        spans.push(Span::styled(
            format!("{hidden} hidden (unknown status)"),
            theme::normal().fg(theme::ALERT),
        ));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(help_text, theme::dimmed()));
    let status_line = Line::from(spans);
    frame.render_widget(
        Paragraph::new(status_line).style(theme::status_bar_bg()),
        rows[1],
    );
}

/// The create form on one line, with a cursor after the focused field.
fn compose_line(draft: &TaskDraft) -> Line<'_> {
    let label = |text: &'static str, field: DraftField| {
        if draft.field == field {
            Span::styled(text, theme::highlighted())
        } else {
            Span::styled(text, theme::dimmed())
        }
    };
    let cursor = |field: DraftField| {
        Span::styled(
            if draft.field == field { "\u{258f}" } else { "" },
            theme::highlighted(),
        )
    };

    Line::from(vec![
        Span::styled(" New task ", theme::bold()),
        label("title: ", DraftField::Title),
        Span::styled(draft.title.as_str(), theme::normal()),
        cursor(DraftField::Title),
        label("  description: ", DraftField::Description),
        Span::styled(draft.description.as_deref().unwrap_or_default(), theme::normal()),
        cursor(DraftField::Description),
        label("  priority: ", DraftField::Priority),
        Span::styled(
            format!("[{}]", draft.priority),
            theme::normal().fg(theme::priority_color(draft.priority)),
        ),
    ])
}
