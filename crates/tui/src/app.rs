//! TUI application state and event loop.
//!
//! This module defines the main `App` struct that mirrors the active run
//! and drives the event loop using `tokio::select!`.

use anyhow::Result;
use crossterm::event::KeyEvent;
use mm_protocol::ipc::{Event, Op};
use mm_protocol::run_models::RunSnapshot;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use tokio::select;
use tokio::sync::mpsc::{Receiver, UnboundedSender};
use tokio_stream::StreamExt;

use crate::event_handler::{self, RunChange};
use crate::tui::{Tui, TuiEvent};
use crate::widgets::{render_workflow, ActivityView, PromptComposer};

/// Main TUI application state.
pub struct App {
    /// Local mirror of the active run, built from core events.
    pub run: Option<RunSnapshot>,
    pub composer: PromptComposer,
    pub activity: ActivityView,
    /// Current spinner frame.
    pub spinner_frame: usize,
    /// Channel to send operations to the core.
    pub op_tx: UnboundedSender<Op>,
    /// Channel to receive events from the core.
    pub event_rx: Receiver<Event>,
    pub should_exit: bool,
}

impl App {
    pub fn new(op_tx: UnboundedSender<Op>, event_rx: Receiver<Event>) -> Self {
        Self {
            run: None,
            composer: PromptComposer::new(),
            activity: ActivityView::new(),
            spinner_frame: 0,
            op_tx,
            event_rx,
            should_exit: false,
        }
    }

    /// Main event loop. Returns when the user quits.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();
        let frames = tui.frame_requester();

        let _ = self.op_tx.send(Op::GetSnapshot);
        frames.schedule_frame();

        while !self.should_exit {
            select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_core_event(event);
                    frames.schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    match tui_event {
                        TuiEvent::Key(key_event) => {
                            self.handle_key_event(key_event);
                            frames.schedule_frame();
                        }
                        TuiEvent::Paste(text) => {
                            if !self.is_working() {
                                self.composer.insert_str(&text);
                                frames.schedule_frame();
                            }
                        }
                        TuiEvent::Tick => {
                            if self.is_working() {
                                self.on_tick();
                                frames.schedule_frame();
                            }
                        }
                        TuiEvent::Draw => {
                            tui.draw(|frame| self.render(frame))?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn is_working(&self) -> bool {
        self.run.as_ref().is_some_and(|r| r.status.is_working())
    }

    fn on_tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// Fold a core event into the mirrored run.
    fn handle_core_event(&mut self, event: Event) {
        match event_handler::handle_core_event(&mut self.run, event) {
            RunChange::Replaced => self.activity.reset(),
            RunChange::Appended => self.activity.on_append(),
            RunChange::Updated => {}
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        self.should_exit = event_handler::handle_keyboard_event(
            key_event,
            &mut self.composer,
            &mut self.activity,
            self.run.as_ref(),
            &self.op_tx,
        );
    }

    /// Left half: activity log above the prompt. Right half: workflow.
    fn render(&mut self, frame: &mut Frame) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(frame.area());

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(columns[0]);

        self.activity.render(frame, left[0], self.run.as_ref());

        let enabled = !self.is_working();
        self.composer.render(left[1], frame.buffer_mut(), enabled);
        if enabled {
            frame.set_cursor_position(self.composer.cursor_position(left[1]));
        }

        render_workflow(frame, columns[1], self.run.as_ref(), self.spinner_frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use mm_protocol::log_models::{LogEntry, LogKind};
    use mm_protocol::run_models::RunStatus;
    use mm_protocol::step_models::{Step, StepStatus};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio::sync::mpsc::{channel, unbounded_channel};
    use uuid::Uuid;

    fn app() -> App {
        let (op_tx, _op_rx) = unbounded_channel();
        let (_event_tx, event_rx) = channel(16);
        App::new(op_tx, event_rx)
    }

    fn snapshot() -> RunSnapshot {
        RunSnapshot {
            id: Uuid::new_v4(),
            prompt: "Add a health check endpoint".to_string(),
            steps: vec![
                Step {
                    id: 1,
                    title: "Planning".to_string(),
                    description: "Decomposing the task.".to_string(),
                    kind: LogKind::Search,
                    status: StepStatus::InProgress,
                },
                Step {
                    id: 2,
                    title: "Testing".to_string(),
                    description: "Running tests.".to_string(),
                    kind: LogKind::Test,
                    status: StepStatus::Pending,
                },
            ],
            log: Vec::new(),
            status: RunStatus::Working,
            result_ref: None,
            error: None,
            started_at: chrono::Utc::now(),
            finished_at: None,
        }
    }

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_app_renders_idle_screen() {
        let mut app = app();
        let content = render(&mut app);

        assert!(content.contains("Agent Activity"));
        assert!(content.contains("The agent is idle."));
        assert!(content.contains("Workflow Status"));
        assert!(content.contains("Enter to submit"));
    }

    #[tokio::test]
    async fn test_app_mirrors_run() {
        let mut app = app();
        let run = snapshot();
        let run_id = run.id;

        app.handle_core_event(Event::RunStarted { run });
        app.handle_core_event(Event::LogAppended {
            run_id,
            entry: LogEntry::now(LogKind::Search, "Planning: Decomposing the task."),
        });

        let content = render(&mut app);
        assert!(content.contains("Add a health check endpoint"));
        assert!(content.contains("Planning: Decomposing the task."));
        assert!(content.contains("Running tests."));
        assert!(content.contains("Agent is working"));
    }

    #[tokio::test]
    async fn test_app_quit_on_esc() {
        let mut app = app();
        assert!(!app.should_exit);

        app.handle_key_event(KeyEvent::from(KeyCode::Esc));

        assert!(app.should_exit);
    }

    #[tokio::test]
    async fn test_app_submits_prompt() {
        let (op_tx, mut op_rx) = unbounded_channel();
        let (_event_tx, event_rx) = channel(16);
        let mut app = App::new(op_tx, event_rx);

        for c in "Add a health check endpoint".chars() {
            app.handle_key_event(KeyEvent::from(KeyCode::Char(c)));
        }
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));

        assert!(matches!(
            op_rx.try_recv(),
            Ok(Op::SubmitPrompt { prompt }) if prompt == "Add a health check endpoint"
        ));
    }

    #[tokio::test]
    async fn test_spinner_advances_on_tick() {
        let mut app = app();
        app.on_tick();
        app.on_tick();
        assert_eq!(app.spinner_frame, 2);
    }
}
