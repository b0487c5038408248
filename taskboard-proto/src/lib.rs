//! Shared wire definitions for the taskboard HTTP collaborator.

pub mod api;
pub mod codec;
pub mod task;
