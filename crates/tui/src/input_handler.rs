//! Key handling for both screens.
//!
//! Keys mutate controller state directly; when a key calls for a store
//! operation the resulting `PendingOp` is returned for the event loop to run.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskdeck_runtime::{EditStage, PendingOp};

use crate::app::{Screen, TuiApp};

fn is_yes(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter)
}

fn is_no(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc)
}

impl TuiApp {
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PendingOp> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Tasks => self.handle_task_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Option<PendingOp> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('g') => {
                self.screen = Screen::Tasks;
                if self.loaded_once {
                    None
                } else {
                    self.loaded_once = true;
                    Some(self.controller.begin_load())
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            _ => None,
        }
    }

    fn handle_task_key(&mut self, key: KeyEvent) -> Option<PendingOp> {
        // Alert is modal
        if self.controller.alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.controller.dismiss_alert();
            }
            return None;
        }

        if self.controller.pending_delete().is_some() {
            if is_yes(key.code) {
                return self.controller.begin_delete();
            }
            if is_no(key.code) {
                self.controller.cancel_delete();
            }
            return None;
        }

        match self.controller.edit_session().map(|e| e.stage) {
            Some(EditStage::PendingConfirm) => {
                if is_yes(key.code) {
                    return self.controller.begin_rename();
                }
                if is_no(key.code) {
                    self.controller.cancel_edit();
                }
                return None;
            }
            Some(EditStage::Editing) => {
                self.handle_draft_key(key);
                return None;
            }
            None => {}
        }

        if self.input_focused {
            return self.handle_input_key(key);
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                let id = self.selected_id()?;
                self.controller.begin_toggle(id)
            }
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.input_focused = true;
                None
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    self.controller.start_edit(id);
                }
                None
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.controller.request_delete(id);
                }
                None
            }
            KeyCode::Char('r') => Some(self.controller.begin_load()),
            KeyCode::Char('h') | KeyCode::Backspace => {
                self.screen = Screen::Home;
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            _ => None,
        }
    }

    fn handle_draft_key(&mut self, key: KeyEvent) {
        let Some(mut draft) = self.controller.edit_session().map(|e| e.draft.clone()) else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => {
                draft.push(c);
                self.controller.set_draft(draft);
            }
            KeyCode::Backspace => {
                draft.pop();
                self.controller.set_draft(draft);
            }
            KeyCode::Enter => {
                self.controller.submit_edit();
            }
            KeyCode::Esc => self.controller.cancel_edit(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<PendingOp> {
        // Add box is disabled while a create is in flight
        if self.controller.is_adding() {
            if key.code == KeyCode::Esc {
                self.input_focused = false;
            }
            return None;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Enter => {
                let op = self.controller.begin_create(&self.input)?;
                self.input.clear();
                self.selected = 0;
                Some(op)
            }
            KeyCode::Esc => {
                self.input_focused = false;
                None
            }
            _ => None,
        }
    }
}
