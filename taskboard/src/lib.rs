//! `Taskboard`: a terminal task board backed by a remote HTTP task API.

pub mod api;
pub mod app;
pub mod board;
pub mod config;
pub mod dashboard;
pub mod net;
pub mod store;
pub mod tasks;
pub mod ui;
