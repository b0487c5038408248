//! Integration tests wiring the TUI state to the board worker.
//!
//! Drives `App` with key and mouse events, forwards the commands it returns
//! to `spawn_net`, and folds the resulting events back into the app, all
//! against an in-process collaborator over HTTP.
//!
//! These tests validate:
//! - The initial refresh fills the board
//! - A keyboard pick-up/drop shows the move at once and keeps it once confirmed
//! - A rejected move snaps back and surfaces "failed"
//! - A confirmed move whose refetch failed is reconciled by a follow-up refresh
//! - A mouse drag across columns persists the drop target chosen by collision
//! - Releasing a card outside the board sends nothing
//! - Creating a task from the form lands it in the pending column, with its
//!   description
//! - Shutdown stops the worker

#![allow(clippy::unwrap_used, clippy::expect_used)]

#[path = "../support/fake_api.rs"]
mod fake_api;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use taskboard::api::http::HttpTaskApi;
use taskboard::app::{App, InputMode, NoticeLevel, View};
use taskboard::board::{CollisionKind, TransitionOutcome};
use taskboard::net::{self, BoardCommand, BoardEvent, NetConfig};
use taskboard::store::TaskStore;
use taskboard::ui;
use taskboard_proto::task::{Priority, ReportedStatus, TaskId, TaskStatus};
use tokio::sync::mpsc;

use fake_api::{FakeApi, start_fake_api, task};

const VIEWPORT: Rect = Rect::new(0, 0, 90, 30);

struct Harness {
    app: App,
    fake: Arc<FakeApi>,
    cmd_tx: mpsc::Sender<BoardCommand>,
    evt_rx: mpsc::Receiver<BoardEvent>,
}

impl Harness {
    /// Start a collaborator, a worker and an app on the board view, and
    /// complete the initial load.
    async fn start() -> Self {
        let fake = FakeApi::new(vec![
            task(1, "Write report", "todo"),
            task(7, "Review PR", "todo"),
            task(3, "Ship release", "completed"),
        ]);
        let (url, _handle) = start_fake_api(Arc::clone(&fake)).await;
        let api = Arc::new(HttpTaskApi::new(&url).unwrap());
        let store = TaskStore::new();

        let mut app = App::new(store.clone(), CollisionKind::ClosestCorners.strategy())
            .with_view(View::Board)
            .with_api_label(url);
        app.set_viewport(VIEWPORT);

        let (cmd_tx, evt_rx) = net::spawn_net(api, store, NetConfig::default());
        let mut harness = Self {
            app,
            fake,
            cmd_tx,
            evt_rx,
        };
        harness.send(BoardCommand::Refresh).await;
        let event = harness.recv().await;
        assert!(
            matches!(event, BoardEvent::Refreshed { count: 3, .. }),
            "expected Refreshed, got: {event:?}"
        );
        harness.app.apply_event(event);
        harness
    }

    async fn send(&self, command: BoardCommand) {
        self.cmd_tx.send(command).await.expect("worker running");
    }

    async fn recv(&mut self) -> BoardEvent {
        tokio::time::timeout(Duration::from_secs(5), self.evt_rx.recv())
            .await
            .expect("timeout waiting for board event")
            .expect("event channel closed")
    }

    fn key(&mut self, code: KeyCode) -> Option<BoardCommand> {
        self.app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) -> Option<BoardCommand> {
        self.app.handle_mouse_event(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    /// Column the app currently shows task `id` in, overlay included.
    fn shown_in(&self, id: i64) -> Option<TaskStatus> {
        let snapshot = self.app.snapshot();
        self.app.columns(&snapshot).column_of(TaskId::new(id))
    }

    fn notice_text(&self) -> Option<&str> {
        self.app.notice().map(|n| n.text.as_str())
    }
}

/// Pick up the second pending card (task 7) and carry it one column right.
fn keyboard_move_seven_right(h: &mut Harness) -> BoardCommand {
    assert!(h.key(KeyCode::Down).is_none());
    assert!(h.key(KeyCode::Char(' ')).is_none());
    assert!(h.app.drag().is_dragging());
    assert!(h.key(KeyCode::Right).is_none());
    h.key(KeyCode::Char(' ')).expect("drop yields a command")
}

// =============================================================================
// Initial load
// =============================================================================

#[tokio::test]
async fn initial_refresh_fills_columns() {
    let h = Harness::start().await;

    assert!(h.app.store().is_loaded());
    assert_eq!(h.shown_in(1), Some(TaskStatus::Pending));
    assert_eq!(h.shown_in(7), Some(TaskStatus::Pending));
    assert_eq!(h.shown_in(3), Some(TaskStatus::Done));
    assert_eq!(h.fake.list_calls(), 1);
}

// =============================================================================
// Keyboard drag
// =============================================================================

#[tokio::test]
async fn keyboard_move_is_optimistic_then_confirmed() {
    let mut h = Harness::start().await;

    let command = keyboard_move_seven_right(&mut h);
    let BoardCommand::ApplyTransition { transition, ticket } = &command else {
        panic!("expected ApplyTransition, got: {command:?}");
    };
    assert_eq!(transition.task_id, TaskId::new(7));
    assert_eq!(transition.from, TaskStatus::Pending);
    assert_eq!(transition.to, TaskStatus::InProgress);
    assert!(ticket.is_some());

    // Shown in the target column before the server answers.
    assert!(h.app.pending().contains(TaskId::new(7)));
    assert_eq!(h.shown_in(7), Some(TaskStatus::InProgress));
    assert_eq!(h.app.focus, TaskStatus::InProgress);

    h.send(command).await;
    let event = h.recv().await;
    match &event {
        BoardEvent::TransitionSettled { result, .. } => {
            assert!(matches!(result, Ok(TransitionOutcome::Applied(_))));
        }
        other => panic!("expected TransitionSettled, got: {other:?}"),
    }
    h.app.apply_event(event);

    assert!(h.app.pending().is_empty());
    assert_eq!(h.shown_in(7), Some(TaskStatus::InProgress));
    assert_eq!(
        h.app.store().find(TaskId::new(7)).unwrap().status(),
        Some(TaskStatus::InProgress)
    );
    assert_eq!(
        h.fake.status_of(7),
        Some(ReportedStatus::Known(TaskStatus::InProgress))
    );
    assert_eq!(h.notice_text(), Some("Moved #7 to In Progress"));
}

#[tokio::test]
async fn rejected_keyboard_move_snaps_back() {
    let mut h = Harness::start().await;
    h.fake
        .fail_status_updates(Some(StatusCode::INTERNAL_SERVER_ERROR));
    let generation = h.app.store().generation();

    let command = keyboard_move_seven_right(&mut h);
    assert_eq!(h.shown_in(7), Some(TaskStatus::InProgress));

    h.send(command).await;
    let event = h.recv().await;
    assert!(
        matches!(&event, BoardEvent::TransitionSettled { result: Err(_), .. }),
        "expected failed settle, got: {event:?}"
    );
    h.app.apply_event(event);

    assert!(h.app.pending().is_empty());
    assert_eq!(h.shown_in(7), Some(TaskStatus::Pending));
    assert_eq!(h.app.store().generation(), generation);
    let notice = h.app.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, "Could not move task #7: failed");
}

#[tokio::test]
async fn confirmed_move_with_failed_refetch_is_reconciled() {
    let mut h = Harness::start().await;
    h.fake.fail_lists(Some(StatusCode::BAD_GATEWAY));

    let command = keyboard_move_seven_right(&mut h);
    h.send(command).await;
    let event = h.recv().await;
    assert!(
        matches!(
            &event,
            BoardEvent::TransitionSettled {
                result: Ok(TransitionOutcome::Applied(_)),
                ..
            }
        ),
        "expected applied settle, got: {event:?}"
    );
    assert!(h.app.store().is_stale());
    h.fake.fail_lists(None);

    let follow_up = h.app.apply_event(event).expect("stale store asks for a refresh");
    assert!(matches!(follow_up, BoardCommand::Refresh));

    h.send(follow_up).await;
    let event = h.recv().await;
    assert!(
        matches!(event, BoardEvent::Refreshed { count: 3, .. }),
        "expected Refreshed, got: {event:?}"
    );
    assert!(h.app.apply_event(event).is_none());

    assert!(!h.app.store().is_stale());
    assert_eq!(h.shown_in(7), Some(TaskStatus::InProgress));
    assert_eq!(
        h.fake.status_of(7),
        Some(ReportedStatus::Known(TaskStatus::InProgress))
    );
    // Initial load, failed refetch, follow-up.
    assert_eq!(h.fake.list_calls(), 3);
}

#[tokio::test]
async fn keyboard_drop_on_origin_sends_nothing_to_server() {
    let mut h = Harness::start().await;

    assert!(h.key(KeyCode::Char(' ')).is_none());
    let command = h.key(KeyCode::Enter).expect("drop yields a command");
    assert!(matches!(
        command,
        BoardCommand::ApplyTransition { ticket: None, .. }
    ));
    assert!(h.app.pending().is_empty());

    h.send(command).await;
    let event = h.recv().await;
    assert!(matches!(
        &event,
        BoardEvent::TransitionSettled {
            result: Ok(TransitionOutcome::Unchanged),
            ..
        }
    ));
    h.app.apply_event(event);
    assert_eq!(h.fake.status_calls(), 0);
    assert_eq!(h.shown_in(1), Some(TaskStatus::Pending));
}

// =============================================================================
// Mouse drag
// =============================================================================

#[tokio::test]
async fn mouse_drag_to_done_column_persists() {
    let mut h = Harness::start().await;
    let content = ui::screen_layout(VIEWPORT).content;
    let [pending, _, done] = ui::board::column_areas(content);

    // First card of the pending column sits just inside the border.
    let grab = (pending.x + 2, pending.y + 2);
    assert!(
        h.mouse(MouseEventKind::Down(MouseButton::Left), grab.0, grab.1)
            .is_none()
    );
    let session = *h.app.drag().session().expect("drag started");
    assert_eq!(session.task_id, TaskId::new(1));

    let over_done = (done.x + done.width / 2, done.y + done.height / 2);
    assert!(
        h.mouse(MouseEventKind::Drag(MouseButton::Left), over_done.0, over_done.1)
            .is_none()
    );
    assert_eq!(
        h.app.drag().session().and_then(|s| s.candidate),
        Some(TaskStatus::Done)
    );

    let command = h
        .mouse(MouseEventKind::Up(MouseButton::Left), over_done.0, over_done.1)
        .expect("release yields a command");
    assert_eq!(h.shown_in(1), Some(TaskStatus::Done));

    h.send(command).await;
    let event = h.recv().await;
    h.app.apply_event(event);

    assert!(!h.app.drag().is_dragging());
    assert_eq!(
        h.fake.status_of(1),
        Some(ReportedStatus::Known(TaskStatus::Done))
    );
    assert_eq!(h.shown_in(1), Some(TaskStatus::Done));
}

#[tokio::test]
async fn mouse_release_on_footer_sends_nothing() {
    let mut h = Harness::start().await;
    let layout = ui::screen_layout(VIEWPORT);
    let [pending, _, _] = ui::board::column_areas(layout.content);

    // Second pending card is task 7.
    let grab = (pending.x + 2, pending.y + 1 + ui::board::CARD_HEIGHT + 1);
    h.mouse(MouseEventKind::Down(MouseButton::Left), grab.0, grab.1);
    assert_eq!(
        h.app.drag().session().map(|s| s.task_id),
        Some(TaskId::new(7))
    );

    let footer = (80, layout.footer.y + layout.footer.height - 1);
    h.mouse(MouseEventKind::Drag(MouseButton::Left), footer.0, footer.1);
    let command = h.mouse(MouseEventKind::Up(MouseButton::Left), footer.0, footer.1);

    assert!(command.is_none(), "expected no command, got: {command:?}");
    assert!(!h.app.drag().is_dragging());
    assert!(h.app.pending().is_empty());
    assert_eq!(h.shown_in(7), Some(TaskStatus::Pending));
    assert_eq!(h.fake.status_calls(), 0);
}

#[tokio::test]
async fn mouse_down_on_empty_space_starts_nothing() {
    let mut h = Harness::start().await;
    let content = ui::screen_layout(VIEWPORT).content;
    let [_, in_progress, _] = ui::board::column_areas(content);

    let cmd = h.mouse(
        MouseEventKind::Down(MouseButton::Left),
        in_progress.x + 2,
        in_progress.y + 2,
    );
    assert!(cmd.is_none());
    assert!(!h.app.drag().is_dragging());
    assert!(
        h.mouse(
            MouseEventKind::Up(MouseButton::Left),
            in_progress.x + 2,
            in_progress.y + 2
        )
        .is_none()
    );
}

// =============================================================================
// Create form
// =============================================================================

#[tokio::test]
async fn create_form_adds_pending_task() {
    let mut h = Harness::start().await;

    assert!(h.key(KeyCode::Char('n')).is_none());
    assert_eq!(h.app.mode, InputMode::Compose);
    for c in "Plan sprint".chars() {
        assert!(h.key(KeyCode::Char(c)).is_none());
    }
    let command = h.key(KeyCode::Enter).expect("submit yields a command");
    assert_eq!(h.app.mode, InputMode::Normal);

    h.send(command).await;
    let created = h.recv().await;
    let new_id = match &created {
        BoardEvent::TaskCreated(task) => {
            assert_eq!(task.title, "Plan sprint");
            task.id
        }
        other => panic!("expected TaskCreated, got: {other:?}"),
    };
    h.app.apply_event(created);
    let refreshed = h.recv().await;
    assert!(matches!(refreshed, BoardEvent::Refreshed { count: 4, .. }));
    h.app.apply_event(refreshed);

    assert_eq!(h.shown_in(new_id.get()), Some(TaskStatus::Pending));
    assert_eq!(h.fake.create_calls(), 1);
    assert_eq!(
        h.notice_text(),
        Some(format!("Created task #{new_id}: Plan sprint").as_str())
    );
}

#[tokio::test]
async fn create_form_sends_description_and_priority() {
    let mut h = Harness::start().await;

    h.key(KeyCode::Char('n'));
    for c in "Plan sprint".chars() {
        h.key(KeyCode::Char(c));
    }
    h.key(KeyCode::Tab);
    for c in "Q3 items".chars() {
        h.key(KeyCode::Char(c));
    }
    h.key(KeyCode::Tab);
    h.key(KeyCode::Char(' '));
    let command = h.key(KeyCode::Enter).expect("submit yields a command");

    h.send(command).await;
    let created = h.recv().await;
    let BoardEvent::TaskCreated(task) = &created else {
        panic!("expected TaskCreated, got: {created:?}");
    };
    assert_eq!(task.description.as_deref(), Some("Q3 items"));
    assert_eq!(task.priority, Priority::High);
    h.app.apply_event(created);
    let refreshed = h.recv().await;
    h.app.apply_event(refreshed);

    let stored = h
        .fake
        .tasks()
        .into_iter()
        .find(|t| t.title == "Plan sprint")
        .unwrap();
    assert_eq!(stored.description.as_deref(), Some("Q3 items"));
}

#[tokio::test]
async fn empty_title_is_refused_locally() {
    let mut h = Harness::start().await;

    h.key(KeyCode::Char('n'));
    h.key(KeyCode::Char(' '));
    assert!(h.key(KeyCode::Enter).is_none());
    assert_eq!(h.app.mode, InputMode::Compose);
    assert_eq!(h.app.notice().unwrap().level, NoticeLevel::Error);
    assert_eq!(h.fake.create_calls(), 0);
}

// =============================================================================
// Refresh failure and shutdown
// =============================================================================

#[tokio::test]
async fn failed_refresh_keeps_board_and_reports() {
    let mut h = Harness::start().await;
    h.fake.fail_lists(Some(StatusCode::BAD_GATEWAY));

    let command = h.key(KeyCode::Char('r')).expect("refresh command");
    h.send(command).await;
    let event = h.recv().await;
    assert!(matches!(event, BoardEvent::RefreshFailed(_)));
    h.app.apply_event(event);

    assert_eq!(h.shown_in(7), Some(TaskStatus::Pending));
    assert_eq!(h.notice_text(), Some("Could not load tasks: failed"));
}

#[tokio::test]
async fn shutdown_closes_event_channel() {
    let mut h = Harness::start().await;

    h.send(BoardCommand::Shutdown).await;
    let closed = tokio::time::timeout(Duration::from_secs(5), h.evt_rx.recv())
        .await
        .expect("timeout waiting for channel close");
    assert!(closed.is_none());
}
