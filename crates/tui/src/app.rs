//! TUI application loop: the ratatui event loop for the interactive session.
//!
//! Store calls never run on the render loop. Each `PendingOp` produced by a
//! key is spawned onto the tokio runtime and its `Completion` comes back over
//! an unbounded channel, drained once per frame.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use taskdeck_core::TaskId;
use taskdeck_runtime::{Completion, PendingOp, TaskListController};
use tokio::sync::mpsc;

use crate::home::render_home;
use crate::theme::TuiTheme;
use crate::todo_panel::render_task_screen;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Tasks,
}

/// All state owned by the interactive session.
pub struct TuiApp {
    pub screen: Screen,
    pub controller: TaskListController,
    pub input: String,
    pub input_focused: bool,
    pub selected: usize,
    pub loaded_once: bool,
    pub should_quit: bool,
    pub backend_label: String,
    theme: TuiTheme,
}

impl TuiApp {
    pub fn new(controller: TaskListController, backend_label: impl Into<String>) -> Self {
        Self {
            screen: Screen::Home,
            controller,
            input: String::new(),
            input_focused: false,
            selected: 0,
            loaded_once: false,
            should_quit: false,
            backend_label: backend_label.into(),
            theme: TuiTheme::default_dark(),
        }
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.controller.tasks().get(self.selected).map(|t| t.id)
    }

    pub(crate) fn select_next(&mut self) {
        if self.selected + 1 < self.controller.tasks().len() {
            self.selected += 1;
        }
    }

    pub(crate) fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the cursor on a real row after the list shrinks.
    pub fn clamp_selection(&mut self) {
        let len = self.controller.tasks().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn apply(&mut self, completion: Completion) {
        self.controller.apply(completion);
        self.clamp_selection();
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        match self.screen {
            Screen::Home => render_home(frame, area, &self.backend_label, &self.theme),
            Screen::Tasks => render_task_screen(
                frame,
                area,
                &self.controller,
                &self.input,
                self.input_focused,
                self.selected,
                &self.theme,
            ),
        }
    }
}

fn spawn_op(op: PendingOp, app: &TuiApp, tx: &mpsc::UnboundedSender<Completion>) {
    let store = app.controller.store();
    let tx = tx.clone();
    tracing::debug!(?op, "dispatching store operation");
    tokio::spawn(async move {
        let completion = op.execute(store.as_ref()).await;
        // Receiver is gone only after the loop exits
        let _ = tx.send(completion);
    });
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut TuiApp,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    while !app.should_quit {
        while let Ok(completion) = rx.try_recv() {
            app.apply(completion);
        }

        terminal.draw(|f| app.draw(f))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(op) = app.handle_key(key) {
                    spawn_op(op, app, &tx);
                }
            }
        } else {
            tokio::task::yield_now().await;
        }
    }
    Ok(())
}

/// Run the interactive session until the user quits.
///
/// The terminal is restored even when the loop fails.
pub async fn run_tui(
    controller: TaskListController,
    backend_label: impl Into<String>,
) -> anyhow::Result<()> {
    let mut app = TuiApp::new(controller, backend_label);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}
