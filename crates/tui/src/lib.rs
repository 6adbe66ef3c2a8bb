//! Taskdeck TUI: terminal user interface for the task list.
//!
//! This crate provides the ratatui-based interactive session. It depends on
//! `taskdeck-runtime` for list state and never talks to a store on the
//! render thread.

mod app;
pub mod home;
mod input_handler;
pub mod theme;
pub mod todo_panel;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::{Screen, TuiApp, run_tui};
pub use theme::TuiTheme;
