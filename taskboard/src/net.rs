//! Networking coordinator for wiring the TUI to the task collaborator.
//!
//! Bridges the synchronous TUI event loop (crossterm poll-based) with the
//! async [`TaskApi`] stack. The main thread sends [`BoardCommand`]s and drains
//! [`BoardEvent`]s on each tick of the poll-based event loop.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── BoardEvent ───  tokio background tasks
//!                     ─── BoardCommand →
//! ```
//!
//! Every command runs on its own spawned task, so requests are never
//! serialized against each other. A completion whose receiver has gone away
//! is dropped.

use std::sync::Arc;

use taskboard_proto::api::NewTask;
use taskboard_proto::task::Task;
use tokio::sync::mpsc;

use crate::api::TaskApi;
use crate::board::{IntendedTransition, MoveTicket, TransitionApplier, TransitionResult};
use crate::store::TaskStore;

/// Requests from the event loop to the board worker.
#[derive(Debug)]
pub enum BoardCommand {
    /// Refetch the task list into the store.
    Refresh,
    /// Persist a dropped task's new status.
    ApplyTransition {
        /// The transition produced by the drag controller.
        transition: IntendedTransition,
        /// Ticket of the optimistic move shown while this is in flight, if any.
        ticket: Option<MoveTicket>,
    },
    /// Create a new task, then refetch.
    CreateTask(NewTask),
    /// Stop accepting commands.
    Shutdown,
}

/// Events sent from the networking background tasks to the TUI main loop.
#[derive(Debug)]
pub enum BoardEvent {
    /// The store holds a new snapshot.
    Refreshed {
        /// Number of tasks in the snapshot.
        count: usize,
        /// Store generation after the refresh.
        generation: u64,
    },
    /// A refresh failed; the store kept its previous snapshot.
    RefreshFailed(String),
    /// A transition request settled, successfully or not.
    TransitionSettled {
        /// The transition that was applied.
        transition: IntendedTransition,
        /// Ticket of the optimistic move to clear, if any.
        ticket: Option<MoveTicket>,
        /// What happened.
        result: TransitionResult,
    },
    /// A task was created and the store refreshed.
    TaskCreated(Task),
    /// Creating a task failed.
    CreateFailed(String),
}

/// Board worker settings.
#[derive(Debug, Clone, Copy)]
pub struct NetConfig {
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,
}

/// Default channel capacity for commands and events.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Spawn the command handler and return channel handles.
///
/// Must be called from within a tokio runtime.
pub fn spawn_net<A>(
    api: Arc<A>,
    store: TaskStore,
    config: NetConfig,
) -> (mpsc::Sender<BoardCommand>, mpsc::Receiver<BoardEvent>)
where
    A: TaskApi + 'static,
{
    let capacity = config.channel_capacity.max(1);
    let (cmd_tx, cmd_rx) = mpsc::channel::<BoardCommand>(capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<BoardEvent>(capacity);

    let applier = TransitionApplier::new(api, store);
    tokio::spawn(async move {
        command_handler(applier, cmd_rx, evt_tx).await;
    });

    (cmd_tx, evt_rx)
}

/// Background task: dispatch each command onto its own task.
async fn command_handler<A>(
    applier: TransitionApplier<A>,
    mut cmd_rx: mpsc::Receiver<BoardCommand>,
    evt_tx: mpsc::Sender<BoardEvent>,
) where
    A: TaskApi + 'static,
{
    while let Some(cmd) = cmd_rx.recv().await {
        let applier = applier.clone();
        let evt_tx = evt_tx.clone();
        match cmd {
            BoardCommand::Refresh => {
                tokio::spawn(async move {
                    let event = refresh_event(&applier).await;
                    let _ = evt_tx.send(event).await;
                });
            }
            BoardCommand::ApplyTransition { transition, ticket } => {
                tokio::spawn(async move {
                    let result = applier.apply(transition).await;
                    let _ = evt_tx
                        .send(BoardEvent::TransitionSettled {
                            transition,
                            ticket,
                            result,
                        })
                        .await;
                });
            }
            BoardCommand::CreateTask(body) => {
                tokio::spawn(async move {
                    create_task(&applier, &body, &evt_tx).await;
                });
            }
            BoardCommand::Shutdown => {
                tracing::info!("board command handler shutting down");
                break;
            }
        }
    }
}

async fn refresh_event<A: TaskApi>(applier: &TransitionApplier<A>) -> BoardEvent {
    let store = applier.store();
    match store.refresh(applier.api()).await {
        Ok(snapshot) => BoardEvent::Refreshed {
            count: snapshot.len(),
            generation: store.generation(),
        },
        Err(e) => BoardEvent::RefreshFailed(e.to_string()),
    }
}

async fn create_task<A: TaskApi>(
    applier: &TransitionApplier<A>,
    body: &NewTask,
    evt_tx: &mpsc::Sender<BoardEvent>,
) {
    match applier.api().create_task(body).await {
        Ok(task) => {
            tracing::info!(task_id = %task.id, title = %task.title, "task created");
            applier.store().invalidate();
            let refreshed = refresh_event(applier).await;
            let _ = evt_tx.send(BoardEvent::TaskCreated(task)).await;
            let _ = evt_tx.send(refreshed).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "task creation failed");
            let _ = evt_tx.send(BoardEvent::CreateFailed(e.to_string())).await;
        }
    }
}
