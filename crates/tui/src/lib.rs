//! # mm-tui
//!
//! Terminal User Interface for Momentum.
//!
//! The left half shows the agent activity log above the prompt input; the
//! right half shows the workflow status. The TUI talks to `mm-core` only
//! through the `Op` and `Event` protocol from `mm-protocol`.

pub mod app;
pub mod event;
pub mod event_handler;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use tui::Tui;

use anyhow::Result;
use mm_core::config::models::AppConfig;
use mm_core::engine::RunController;
use mm_core::state::manager::RunManager;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capacity of the core-to-view event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Run the interactive TUI against a run manager built from `config`.
pub async fn run_app(config: AppConfig) -> Result<()> {
    let controller = RunController::from_config(&config)?;

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (op_tx, op_rx) = mpsc::unbounded_channel();

    let manager = Arc::new(RunManager::new(controller, event_tx));
    let core = tokio::spawn(Arc::clone(&manager).serve(op_rx));

    tracing::info!(strategy = ?config.global.strategy, "starting TUI");

    let mut tui = Tui::init()?;
    let mut app = App::new(op_tx.clone(), event_rx);
    let result = app.run(&mut tui).await;
    // Dropping the Tui restores the terminal.
    drop(tui);

    let _ = op_tx.send(mm_protocol::ipc::Op::Shutdown);
    drop(app);
    let _ = core.await;

    result
}
