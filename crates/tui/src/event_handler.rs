//! Event handling for the TUI.
//!
//! - Core events are folded into the locally mirrored `RunSnapshot`
//! - Keyboard events are routed to the activity view, then the composer

use crate::event::EventStatus;
use crate::widgets::activity_view::transcript_len;
use crate::widgets::{ActivityView, PromptComposer};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mm_protocol::ipc::{Event, Op};
use mm_protocol::run_models::{RunSnapshot, RunStatus};
use tokio::sync::mpsc::UnboundedSender;

/// What a core event changed in the mirrored run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunChange {
    /// A different run is now shown.
    Replaced,
    /// An entry was appended to the log.
    Appended,
    /// Anything else, including events for runs not being shown.
    Updated,
}

/// Fold an event from the core into the mirrored run.
pub fn handle_core_event(run: &mut Option<RunSnapshot>, event: Event) -> RunChange {
    match event {
        Event::RunStarted { run: snapshot } => {
            *run = Some(snapshot);
            return RunChange::Replaced;
        }
        Event::Snapshot { run: snapshot } => {
            if snapshot.is_some() {
                *run = snapshot;
                return RunChange::Replaced;
            }
            return RunChange::Updated;
        }
        _ => {}
    }

    let Some(current) = run.as_mut().filter(|r| event.run_id() == Some(r.id)) else {
        return RunChange::Updated;
    };

    match event {
        Event::StepUpdated {
            step_id, status, ..
        } => {
            if let Some(step) = current.steps.iter_mut().find(|s| s.id == step_id) {
                step.status = status;
            }
        }
        Event::LogAppended { entry, .. } => {
            current.log.push(entry);
            return RunChange::Appended;
        }
        Event::StepsReset { .. } => current.steps.clear(),
        Event::RunSucceeded { result_ref, .. } => {
            current.status = RunStatus::Success;
            current.result_ref = result_ref;
            current.finished_at = Some(chrono::Utc::now());
        }
        Event::RunFailed { error, .. } => {
            current.status = RunStatus::Error;
            current.result_ref = None;
            current.error = Some(error);
            current.finished_at = Some(chrono::Utc::now());
        }
        Event::RunStarted { .. } | Event::Snapshot { .. } => {}
    }

    RunChange::Updated
}

/// Handle a keyboard event from the user.
///
/// Returns `true` if the application should exit, `false` otherwise.
pub fn handle_keyboard_event(
    key_event: KeyEvent,
    composer: &mut PromptComposer,
    activity: &mut ActivityView,
    run: Option<&RunSnapshot>,
    op_tx: &UnboundedSender<Op>,
) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    match key_event.code {
        KeyCode::Esc => return true,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => return true,
        _ => {}
    }

    let total = transcript_len(run);
    if activity.handle_key_event(key_event, total) == EventStatus::Consumed {
        return false;
    }

    let working = run.is_some_and(|r| r.status.is_working());
    if working {
        return false;
    }

    if key_event.code == KeyCode::Enter {
        if let Some(prompt) = composer.take_prompt() {
            let _ = op_tx.send(Op::SubmitPrompt { prompt });
        }
        return false;
    }

    composer.handle_key_event(key_event);
    false
}
