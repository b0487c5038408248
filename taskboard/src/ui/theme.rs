//! Colors and styles shared by every view.

use ratatui::style::{Color, Modifier, Style};
use taskboard_proto::task::{Priority, TaskStatus};

/// Body text.
pub const TEXT: Color = Color::White;
/// Metadata, hints and empty-state text.
pub const MUTED: Color = Color::Gray;
/// Focus and selection.
pub const ACCENT: Color = Color::Cyan;
/// Confirmed outcomes.
pub const OK: Color = Color::Green;
/// Outcomes still in flight.
pub const WAITING: Color = Color::Yellow;
/// Failures.
pub const ALERT: Color = Color::Red;
/// The column a dragged card would land in.
pub const DROP: Color = Color::LightMagenta;

const BAR_BG: Color = Color::Rgb(30, 30, 50);

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

#[must_use]
pub fn normal() -> Style {
    fg(TEXT)
}

#[must_use]
pub fn dimmed() -> Style {
    fg(MUTED)
}

#[must_use]
pub fn bold() -> Style {
    normal().add_modifier(Modifier::BOLD)
}

/// Border of the focused column.
#[must_use]
pub fn highlighted() -> Style {
    fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Inverted style for the selected card and the active tab.
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

#[must_use]
pub fn drop_target() -> Style {
    fg(DROP).add_modifier(Modifier::BOLD)
}

/// A card shown in its new column before the server confirmed the move.
#[must_use]
pub fn pending_move() -> Style {
    fg(WAITING).add_modifier(Modifier::ITALIC)
}

#[must_use]
pub fn status_bar_bg() -> Style {
    fg(TEXT).bg(BAR_BG)
}

#[must_use]
pub fn panel_title(color: Color) -> Style {
    fg(color).add_modifier(Modifier::BOLD)
}

/// Column title color for each board status.
#[must_use]
pub const fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Blue,
        TaskStatus::InProgress => WAITING,
        TaskStatus::Done => OK,
    }
}

#[must_use]
pub const fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => MUTED,
        Priority::Medium => ACCENT,
        Priority::High => Color::LightRed,
    }
}
