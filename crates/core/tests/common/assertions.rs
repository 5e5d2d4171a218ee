//! Custom assertion helpers over event streams.

use mm_protocol::ipc::Event;
use mm_protocol::step_models::StepStatus;

/// Status updates for one step, in emission order.
#[allow(dead_code)]
pub fn step_history(events: &[Event], step: u32) -> Vec<StepStatus> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::StepUpdated {
                step_id, status, ..
            } if *step_id == step => Some(*status),
            _ => None,
        })
        .collect()
}

/// Messages of every `LogAppended` event, in emission order.
#[allow(dead_code)]
pub fn logged_messages(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::LogAppended { entry, .. } => Some(entry.message.clone()),
            _ => None,
        })
        .collect()
}

/// Assert that the stream starts with `RunStarted`, ends with a terminal
/// event, and contains exactly one terminal event.
#[allow(dead_code)]
pub fn assert_run_bracketed(events: &[Event]) {
    assert!(
        matches!(events.first(), Some(Event::RunStarted { .. })),
        "First event should be RunStarted, got: {:?}",
        events.first()
    );
    assert!(
        events.last().is_some_and(Event::is_terminal),
        "Last event should be terminal, got: {:?}",
        events.last()
    );
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}
