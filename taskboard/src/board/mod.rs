//! The status board: classification, drag gestures, and transitions.
//!
//! Data flows one way: the [`TaskStore`](crate::store::TaskStore) snapshot is
//! classified into columns, a drag over those columns yields an
//! [`IntendedTransition`], and the [`TransitionApplier`] persists it and
//! refreshes the store.

pub mod classify;
pub mod collision;
pub mod drag;
pub mod pending;
pub mod transition;

pub use classify::{Classification, Column, classify, classify_by};
pub use collision::{CollisionKind, CollisionStrategy, DropTarget, Point, Region};
pub use drag::{DragController, DragError, DragSession, DragState, IntendedTransition};
pub use pending::{MoveTicket, PendingMoves};
pub use transition::{TransitionApplier, TransitionError, TransitionOutcome, TransitionResult};
