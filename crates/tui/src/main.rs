//! Main entry point for the mm-tui binary.
//!
//! Loads `.momentum/` from the current directory and opens the TUI.

use anyhow::Result;
use mm_core::config::loader::load_config;
use mm_tui::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(&std::env::current_dir()?).await?;
    run_app(config).await
}
