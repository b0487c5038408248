//! Terminal UI rendering.
//!
//! Rendering is stateless: every frame is drawn from [`App`] alone. Layout
//! helpers are public so that mouse hit-testing in [`App`] resolves against
//! the same rectangles that were drawn.

pub mod board;
pub mod dashboard;
pub mod status_bar;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, View};

/// Screen areas shared by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// One-line header with the view tabs.
    pub header: Rect,
    /// View content.
    pub content: Rect,
    /// Two-line footer: notice or form, then key hints.
    pub footer: Rect,
}

/// Splits the terminal into header, content and footer.
#[must_use]
pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .split(area);
    ScreenLayout {
        header: chunks[0],
        content: chunks[1],
        footer: chunks[2],
    }
}

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = screen_layout(frame.area());

    render_header(frame, layout.header, app);
    match app.view {
        View::Dashboard => dashboard::render(frame, layout.content, app),
        View::Board => board::render(frame, layout.content, app),
    }
    status_bar::render(frame, layout.footer, app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let tab = |label: &'static str, view: View| {
        if app.view == view {
            Span::styled(label, theme::selected())
        } else {
            Span::styled(label, theme::dimmed())
        }
    };
    let line = Line::from(vec![
        Span::styled(" Taskboard ", theme::bold()),
        Span::raw("| "),
        tab(" 1 Dashboard ", View::Dashboard),
        Span::raw(" "),
        tab(" 2 Board ", View::Board),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme::status_bar_bg()), area);
}
