//! Integration tests for the RunManager submit guard and op handling.

mod common;

use common::*;
use mm_core::config::loader::load_config;
use mm_core::engine::RunController;
use mm_core::state::manager::SubmitRejected;
use mm_protocol::config_models::DriveStrategy;
use mm_protocol::ipc::{Event, Op};
use mm_protocol::run_models::RunStatus;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::test(start_paused = true)]
async fn test_empty_prompt_creates_no_run() {
    let (manager, mut rx) = test_manager(default_controller());

    for prompt in ["", "   ", "\n\t"] {
        assert_eq!(manager.submit(prompt).await, Err(SubmitRejected::EmptyPrompt));
    }

    assert!(manager.snapshot().is_none());
    assert_eq!(manager.status(), RunStatus::Idle);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_submit_while_working_leaves_run_unchanged() {
    let (manager, mut rx) = test_manager(default_controller());
    manager.submit(HEALTH_CHECK_PROMPT).await.unwrap();

    // Let the run get a few entries in.
    tokio::time::sleep(TEST_BEAT + TEST_BEAT / 2).await;
    let before = manager.snapshot().unwrap();
    let buffered = drain(&mut rx).len();
    assert!(buffered > 0);

    assert_eq!(
        manager.submit("Something else").await,
        Err(SubmitRejected::RunInProgress)
    );

    let after = manager.snapshot().unwrap();
    assert_eq!(after, before);
    assert!(drain(&mut rx).is_empty(), "a rejected submit emits nothing");
}

#[tokio::test(start_paused = true)]
async fn test_full_run_through_manager() {
    let (manager, mut rx) = test_manager(default_controller());

    let run_id = manager.submit(HEALTH_CHECK_PROMPT).await.unwrap();
    manager.wait().await;

    let events = drain(&mut rx);
    assert_run_bracketed(&events);
    assert!(events.iter().all(|e| e.run_id() == Some(run_id)));

    let snapshot = manager.snapshot().unwrap();
    assert_eq!(snapshot.status, RunStatus::Success);
    assert!(snapshot.finished_at.is_some());
    assert!(snapshot
        .result_ref
        .is_some_and(|url| url.starts_with("https://github.com/acme/shop/pull/")));
}

#[tokio::test(start_paused = true)]
async fn test_undrained_event_channel_does_not_stall_run() {
    let (tx, _rx) = mpsc::channel(8);
    let manager = mm_core::state::manager::RunManager::new(default_controller(), tx);
    let mut snapshots = manager.subscribe();

    manager.submit(HEALTH_CHECK_PROMPT).await.unwrap();

    let terminal = tokio::time::timeout(
        std::time::Duration::from_secs(3600),
        snapshots.wait_for(|snap| snap.as_ref().is_some_and(|s| s.status.is_terminal())),
    )
    .await
    .expect("run reaches a terminal state")
    .unwrap()
    .clone()
    .unwrap();

    assert_eq!(terminal.status, RunStatus::Success);
    assert_eq!(terminal.steps.len(), 5);
    manager.wait().await;
}

#[tokio::test(start_paused = true)]
async fn test_subscribe_sees_terminal_snapshot() {
    let (manager, _rx) = test_manager(default_controller());
    let mut snapshots = manager.subscribe();

    manager.submit(HEALTH_CHECK_PROMPT).await.unwrap();

    let terminal = snapshots
        .wait_for(|snap| snap.as_ref().is_some_and(|s| s.status.is_terminal()))
        .await
        .unwrap()
        .clone();
    assert_eq!(terminal.map(|s| s.status), Some(RunStatus::Success));
}

#[tokio::test(start_paused = true)]
async fn test_serve_processes_ops_until_shutdown() {
    let (events_tx, mut events_rx) = mpsc::channel(1024);
    let manager = Arc::new(mm_core::state::manager::RunManager::new(
        default_controller(),
        events_tx,
    ));
    let (op_tx, op_rx) = mpsc::unbounded_channel();

    let server = tokio::spawn(Arc::clone(&manager).serve(op_rx));

    op_tx.send(Op::GetSnapshot).unwrap();
    op_tx
        .send(Op::SubmitPrompt {
            prompt: HEALTH_CHECK_PROMPT.to_string(),
        })
        .unwrap();
    op_tx.send(Op::Shutdown).unwrap();
    server.await.unwrap();

    let first = events_rx.recv().await.unwrap();
    assert!(matches!(first, Event::Snapshot { run: None }));
    let second = events_rx.recv().await.unwrap();
    assert!(matches!(second, Event::RunStarted { .. }));
}

/// Configuration on disk selects the template and strategy.
#[tokio::test]
async fn test_controller_from_loaded_config() {
    let project = create_test_project("pipeline = \"short\"\nbeat-interval-ms = 1\n").unwrap();
    let config = load_config(project.path()).await.unwrap();

    let controller = RunController::from_config(&config).unwrap();
    assert_eq!(controller.strategy(), DriveStrategy::Local);
    assert_eq!(controller.template().name, "short");

    let (manager, _rx) = test_manager(controller);
    manager.submit(HEALTH_CHECK_PROMPT).await.unwrap();
    manager.wait().await;

    let snapshot = manager.snapshot().unwrap();
    assert_eq!(snapshot.status, RunStatus::Success);
    assert_eq!(snapshot.steps.len(), 2);
}
