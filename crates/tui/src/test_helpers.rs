//! Shared test helpers for TUI sub-module tests.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::text::Line;
use taskdeck_runtime::TaskListController;
use taskdeck_storage::{LocalTaskStore, SharedTaskStore, create_memory_kv};

pub fn memory_store() -> SharedTaskStore {
    Arc::new(LocalTaskStore::new(create_memory_kv(), "tui-test"))
}

/// Controller over a fresh in-memory local store, already holding the
/// sample set.
pub async fn loaded_controller() -> TaskListController {
    let mut controller = TaskListController::new(memory_store());
    controller.load().await;
    controller
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn line_plain(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|s| s.content.as_ref())
        .collect::<String>()
}

pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
