//! Application state and event handling.
//!
//! [`App`] turns terminal input into drag gestures and [`BoardCommand`]s, and
//! folds [`BoardEvent`]s from the background worker back into its state. It
//! never writes to the task store; the worker does that.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use taskboard_proto::task::{Task, TaskId, TaskStatus};

use crate::board::{
    Classification, CollisionStrategy, DragController, IntendedTransition, PendingMoves, Point,
    TransitionOutcome, classify_by,
};
use crate::net::{BoardCommand, BoardEvent};
use crate::store::{Snapshot, TaskStore};
use crate::tasks::{DraftField, TaskDraft};
use crate::ui;
use crate::ui::board::ColumnCursor;

/// Which top-level view is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Summary counts and recent tasks.
    #[default]
    Dashboard,
    /// The three-column status board.
    Board,
}

/// Whether keys edit the create form or drive the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Keys navigate and drag.
    #[default]
    Normal,
    /// Keys edit the new-task form.
    Compose,
}

/// Severity of a footer notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Something completed.
    Info,
    /// Something failed; the board did not change.
    Error,
}

/// A one-line message shown in the footer until replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub text: String,
}

/// Everything the views draw from, plus the in-flight drag and form.
#[derive(Debug)]
pub struct App {
    /// Current view.
    pub view: View,
    /// Current input mode.
    pub mode: InputMode,
    /// Column with keyboard focus on the board.
    pub focus: TaskStatus,
    /// Create-form contents.
    pub draft: TaskDraft,
    /// Whether the app should quit.
    pub should_quit: bool,
    store: TaskStore,
    drag: DragController,
    pending: PendingMoves,
    selected: [usize; 3],
    viewport: Rect,
    notice: Option<Notice>,
    api_label: String,
    recent_limit: usize,
    timestamp_format: String,
    /// Store invalidation count that last triggered an automatic refresh.
    auto_refreshed: u64,
}

impl App {
    /// Creates an app reading from `store` and detecting drops with `strategy`.
    #[must_use]
    pub fn new(store: TaskStore, strategy: Box<dyn CollisionStrategy>) -> Self {
        Self {
            view: View::default(),
            mode: InputMode::default(),
            focus: TaskStatus::Pending,
            draft: TaskDraft::new(),
            should_quit: false,
            store,
            drag: DragController::new(strategy),
            pending: PendingMoves::new(),
            selected: [0; 3],
            viewport: Rect::default(),
            notice: None,
            api_label: String::new(),
            recent_limit: 5,
            timestamp_format: "%Y-%m-%d %H:%M".to_string(),
            auto_refreshed: 0,
        }
    }

    /// Sets the initial view.
    #[must_use]
    pub const fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    /// Sets the collaborator URL shown on the dashboard.
    #[must_use]
    pub fn with_api_label(mut self, label: impl Into<String>) -> Self {
        self.api_label = label.into();
        self
    }

    /// Sets how many tasks the dashboard lists.
    #[must_use]
    pub const fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Sets the chrono format used for task timestamps.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    // -----------------------------------------------------------------------
    // Read access for rendering
    // -----------------------------------------------------------------------

    /// The task store this app renders.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// The drag controller.
    #[must_use]
    pub const fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Moves awaiting confirmation.
    #[must_use]
    pub const fn pending(&self) -> &PendingMoves {
        &self.pending
    }

    /// Current footer notice.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Collaborator URL label.
    #[must_use]
    pub fn api_label(&self) -> &str {
        &self.api_label
    }

    /// Number of dashboard tasks.
    #[must_use]
    pub const fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Timestamp format string.
    #[must_use]
    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Selected card index in `status`'s column.
    #[must_use]
    pub const fn selected(&self, status: TaskStatus) -> usize {
        self.selected[status.column_index()]
    }

    /// Records the terminal area of the last drawn frame.
    pub const fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    /// The current confirmed snapshot, or an empty one before the first load.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.read().unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Classifies `tasks` using each task's optimistic status.
    #[must_use]
    pub fn columns<'a>(&self, tasks: &'a [Task]) -> Classification<'a> {
        classify_by(tasks, |t| self.pending.effective_status(t))
    }

    /// Tasks in the snapshot with a status the board has no column for.
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|task| task.status().is_none())
            .count()
    }

    /// Scroll cursors for each column of `classification`.
    #[must_use]
    pub fn column_cursors(&self, classification: &Classification<'_>) -> [ColumnCursor; 3] {
        TaskStatus::ALL.map(|status| ColumnCursor {
            len: classification.column(status).len(),
            selected: self.selected(status),
        })
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Handle a key event.
    ///
    /// Returns a command when the key requires network dispatch.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        match self.mode {
            InputMode::Compose => self.handle_compose_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('r') => Some(BoardCommand::Refresh),
            KeyCode::Char('n') => {
                self.drag.cancel();
                self.mode = InputMode::Compose;
                None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let next = match self.view {
                    View::Dashboard => View::Board,
                    View::Board => View::Dashboard,
                };
                self.set_view(next);
                None
            }
            KeyCode::Char('1') => {
                self.set_view(View::Dashboard);
                None
            }
            KeyCode::Char('2') => {
                self.set_view(View::Board);
                None
            }
            _ if self.view == View::Board => self.handle_board_key(key),
            _ => None,
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.step_column(false);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.step_column(true);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(false);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(true);
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_pick(),
            KeyCode::Esc => {
                self.drag.cancel();
                None
            }
            _ => None,
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.draft = TaskDraft::new();
                None
            }
            KeyCode::Enter => match self.draft.to_new_task() {
                Ok(body) => {
                    self.mode = InputMode::Normal;
                    self.draft = TaskDraft::new();
                    Some(BoardCommand::CreateTask(body))
                }
                Err(e) => {
                    self.set_notice(NoticeLevel::Error, e.to_string());
                    None
                }
            },
            KeyCode::Tab => {
                self.draft.focus_next();
                None
            }
            KeyCode::BackTab => {
                self.draft.focus_prev();
                None
            }
            KeyCode::Left | KeyCode::Right if self.draft.field == DraftField::Priority => {
                self.draft.cycle_priority();
                None
            }
            KeyCode::Backspace => {
                self.draft.pop();
                None
            }
            KeyCode::Char(c) => {
                self.draft.push(c);
                None
            }
            _ => None,
        }
    }

    /// Handle a mouse event on the board.
    ///
    /// Left-button down over a card starts a drag, dragging updates the
    /// candidate column, and release drops the card.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<BoardCommand> {
        if self.view != View::Board || self.mode != InputMode::Normal {
            return None;
        }
        let point = Point::new(mouse.column, mouse.row);
        let content = ui::screen_layout(self.viewport).content;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let snapshot = self.snapshot();
                let classification = self.columns(&snapshot);
                let cursors = self.column_cursors(&classification);
                let hit = ui::board::card_at(content, point, &cursors).and_then(|(status, index)| {
                    classification
                        .column(status)
                        .tasks
                        .get(index)
                        .map(|task| (status, index, task.id))
                });
                if let Some((status, index, id)) = hit {
                    self.focus = status;
                    self.selected[status.column_index()] = index;
                    self.begin_drag(id, status);
                }
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.track_pointer(point, content);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if !ui::board::region(content).contains(point) {
                    self.drag.leave();
                }
                let transition = self.drag.release()?;
                Some(self.dispatch_drop(transition))
            }
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Worker events
    // -----------------------------------------------------------------------

    /// Folds a worker event into the app state.
    ///
    /// Returns [`BoardCommand::Refresh`] when the event leaves the store stale,
    /// at most once per invalidation.
    pub fn apply_event(&mut self, event: BoardEvent) -> Option<BoardCommand> {
        match event {
            BoardEvent::Refreshed { count, generation } => {
                tracing::debug!(count, generation, "board refreshed");
            }
            BoardEvent::RefreshFailed(msg) => {
                self.set_notice(NoticeLevel::Error, format!("Could not load tasks: {msg}"));
            }
            BoardEvent::TransitionSettled {
                transition,
                ticket,
                result,
            } => {
                if let Some(ticket) = ticket {
                    self.pending.settle(transition.task_id, ticket);
                }
                match result {
                    Ok(TransitionOutcome::Applied(task)) => self.set_notice(
                        NoticeLevel::Info,
                        format!("Moved #{} to {}", task.id, transition.to.label()),
                    ),
                    Ok(TransitionOutcome::Unchanged) => {}
                    Err(e) => self.set_notice(
                        NoticeLevel::Error,
                        format!("Could not move task #{}: {e}", transition.task_id),
                    ),
                }
            }
            BoardEvent::TaskCreated(task) => {
                self.set_notice(
                    NoticeLevel::Info,
                    format!("Created task #{}: {}", task.id, task.title),
                );
            }
            BoardEvent::CreateFailed(msg) => {
                self.set_notice(NoticeLevel::Error, format!("Could not create task: {msg}"));
            }
        }
        self.clamp_selection();
        self.refresh_if_stale()
    }

    /// Undoes the local effect of a command that never reached the worker.
    pub fn abandon_command(&mut self, command: BoardCommand, reason: &str) {
        if let BoardCommand::ApplyTransition {
            transition,
            ticket: Some(ticket),
        } = command
        {
            self.pending.settle(transition.task_id, ticket);
        }
        self.set_notice(NoticeLevel::Error, format!("Command not sent: {reason}"));
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn refresh_if_stale(&mut self) -> Option<BoardCommand> {
        let invalidations = self.store.invalidations();
        if !self.store.is_stale() || invalidations == self.auto_refreshed {
            return None;
        }
        self.auto_refreshed = invalidations;
        tracing::debug!(invalidations, "task store left stale; requesting refresh");
        Some(BoardCommand::Refresh)
    }

    /// Updates the drag candidate; outside the board area there is none.
    fn track_pointer(&mut self, point: Point, content: Rect) {
        if !self.drag.is_dragging() {
            return;
        }
        if !ui::board::region(content).contains(point) {
            self.drag.leave();
            return;
        }
        let targets = ui::board::drop_targets(content);
        if let Some(status) = self.drag.hover(point, &targets) {
            self.focus = status;
        }
    }

    fn set_view(&mut self, view: View) {
        if view != View::Board {
            self.drag.cancel();
        }
        self.view = view;
    }

    fn set_notice(&mut self, level: NoticeLevel, text: String) {
        self.notice = Some(Notice { level, text });
    }

    fn begin_drag(&mut self, id: TaskId, origin: TaskStatus) -> bool {
        match self.drag.start(id, origin) {
            Ok(()) => true,
            Err(e) => {
                self.set_notice(NoticeLevel::Error, e.to_string());
                false
            }
        }
    }

    /// Space/Enter: pick up the selected card, or drop the one being dragged.
    fn toggle_pick(&mut self) -> Option<BoardCommand> {
        if self.drag.is_dragging() {
            let transition = self.drag.release()?;
            return Some(self.dispatch_drop(transition));
        }
        let snapshot = self.snapshot();
        let id = self
            .columns(&snapshot)
            .column(self.focus)
            .tasks
            .get(self.selected(self.focus))
            .map(|task| task.id)?;
        if self.begin_drag(id, self.focus) {
            self.drag.hover_column(self.focus);
        }
        None
    }

    /// Moves focus one column, carrying the dragged card along if any.
    fn step_column(&mut self, forward: bool) {
        let current = self
            .drag
            .session()
            .map_or(self.focus, |s| s.candidate.unwrap_or(s.origin));
        let next = if forward {
            current.next()
        } else {
            current.prev()
        };
        let Some(next) = next else {
            return;
        };
        if self.drag.is_dragging() {
            self.drag.hover_column(next);
        }
        self.focus = next;
    }

    fn move_selection(&mut self, down: bool) {
        if self.drag.is_dragging() {
            return;
        }
        let len = self.column_len(self.focus);
        let slot = &mut self.selected[self.focus.column_index()];
        if down {
            if *slot + 1 < len {
                *slot += 1;
            }
        } else {
            *slot = slot.saturating_sub(1);
        }
    }

    fn column_len(&self, status: TaskStatus) -> usize {
        let snapshot = self.snapshot();
        self.columns(&snapshot).column(status).len()
    }

    /// Shows the move optimistically and hands it to the worker.
    fn dispatch_drop(&mut self, transition: IntendedTransition) -> BoardCommand {
        let ticket = if transition.is_noop() {
            None
        } else {
            Some(self.pending.insert(transition.task_id, transition.to))
        };
        self.focus = transition.to;
        self.clamp_selection();
        BoardCommand::ApplyTransition { transition, ticket }
    }

    fn clamp_selection(&mut self) {
        let snapshot = self.snapshot();
        let classification = self.columns(&snapshot);
        let lens = TaskStatus::ALL.map(|status| classification.column(status).len());
        for (slot, len) in self.selected.iter_mut().zip(lens) {
            *slot = (*slot).min(len.saturating_sub(1));
        }
    }
}
