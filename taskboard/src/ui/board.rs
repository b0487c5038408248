//! Board rendering and geometry.
//!
//! Columns are laid out side by side in board order; each column is a
//! bordered block holding fixed-height cards. The same geometry feeds the
//! drop targets handed to the drag controller and the card hit-test.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use taskboard_proto::task::{Task, TaskStatus};

use super::theme;
use crate::app::App;
use crate::board::{Column, DragSession, DropTarget, Point, Region};

/// Rows taken by one card, borders included.
pub const CARD_HEIGHT: u16 = 3;

/// Scroll position of one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnCursor {
    /// Tasks in the column.
    pub len: usize,
    /// Index of the selected card.
    pub selected: usize,
}

/// The on-screen rectangle of each column, in board order.
#[must_use]
pub fn column_areas(content: Rect) -> [Rect; 3] {
    let chunks = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(content);
    [chunks[0], chunks[1], chunks[2]]
}

/// Column drop targets for the drag controller.
#[must_use]
pub fn drop_targets(content: Rect) -> Vec<DropTarget> {
    TaskStatus::ALL
        .iter()
        .zip(column_areas(content))
        .map(|(status, area)| DropTarget {
            status: *status,
            region: region(area),
        })
        .collect()
}

/// Converts a layout rectangle into collision geometry.
#[must_use]
pub const fn region(rect: Rect) -> Region {
    Region::new(rect.x, rect.y, rect.width, rect.height)
}

/// Area inside a column's border where cards are drawn.
fn card_list_area(column: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(column)
}

/// Number of whole cards that fit in `list`.
fn visible_cards(list: Rect) -> usize {
    usize::from(list.height / CARD_HEIGHT)
}

/// First card drawn so that `selected` stays on screen.
#[must_use]
pub const fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        selected
    } else {
        selected.saturating_sub(visible - 1)
    }
}

/// Which card, if any, is drawn under `point`.
#[must_use]
pub fn card_at(
    content: Rect,
    point: Point,
    cursors: &[ColumnCursor; 3],
) -> Option<(TaskStatus, usize)> {
    for (status, column) in TaskStatus::ALL.iter().zip(column_areas(content)) {
        let list = card_list_area(column);
        if !region(list).contains(point) {
            continue;
        }
        let cursor = cursors[status.column_index()];
        let visible = visible_cards(list);
        let slot = usize::from((point.y - list.y) / CARD_HEIGHT);
        if slot >= visible {
            return None;
        }
        let index = scroll_offset(cursor.selected, visible) + slot;
        return (index < cursor.len).then_some((*status, index));
    }
    None
}

/// Render the three board columns.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.snapshot();
    let classification = app.columns(&snapshot);
    let cursors = app.column_cursors(&classification);
    let session = app.drag().session().copied();

    for (column, rect) in classification.columns.iter().zip(column_areas(area)) {
        let cursor = cursors[column.status.column_index()];
        render_column(frame, rect, app, column, cursor, session);
    }
}

fn render_column(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    column: &Column<'_>,
    cursor: ColumnCursor,
    session: Option<DragSession>,
) {
    let is_candidate = session.and_then(|s| s.candidate) == Some(column.status);
    let border = if is_candidate {
        theme::drop_target()
    } else if app.focus == column.status {
        theme::highlighted()
    } else {
        theme::normal()
    };
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", column.status.label()),
            theme::panel_title(theme::status_color(column.status)),
        ),
        Span::styled(format!("({}) ", column.len()), theme::dimmed()),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);
    let list = block.inner(area);
    frame.render_widget(block, area);

    if column.is_empty() {
        let text = if app.store().is_loaded() {
            "No tasks"
        } else {
            "Loading\u{2026}"
        };
        let empty = Paragraph::new(text)
            .style(theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, list);
        return;
    }

    let visible = visible_cards(list);
    let offset = scroll_offset(cursor.selected, visible);
    let mut y = list.y;
    for (index, task) in column.tasks.iter().enumerate().skip(offset).take(visible) {
        let card = Rect::new(list.x, y, list.width, CARD_HEIGHT);
        let state = CardState {
            selected: app.focus == column.status && index == cursor.selected,
            dragging: session.is_some_and(|s| s.task_id == task.id),
            pending: app.pending().contains(task.id),
        };
        render_card(frame, card, task, state);
        y = y.saturating_add(CARD_HEIGHT);
    }
}

#[derive(Debug, Clone, Copy)]
struct CardState {
    selected: bool,
    dragging: bool,
    pending: bool,
}

fn render_card(frame: &mut Frame, area: Rect, task: &Task, state: CardState) {
    let border = if state.dragging {
        theme::drop_target()
    } else if state.selected {
        theme::highlighted()
    } else {
        theme::dimmed()
    };
    let title_style = if state.pending {
        theme::pending_move()
    } else {
        theme::normal()
    };

    let mut spans = Vec::with_capacity(4);
    if state.pending {
        spans.push(Span::styled("\u{22ef} ", theme::pending_move()));
    }
    spans.push(Span::styled(task.title.as_str(), title_style));
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        format!("[{}]", task.priority),
        theme::normal().fg(theme::priority_color(task.priority)),
    ));

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(format!("#{}", task.id), theme::dimmed()));
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        block = block.title_bottom(Span::styled(description, theme::dimmed()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
