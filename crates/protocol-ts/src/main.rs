//! Writes TypeScript bindings for every `mm-protocol` type.
//!
//! ```text
//! mm-protocol-ts web/src/bindings
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use mm_protocol::{
    DriveStrategy, Event, GlobalConfig, LogEntry, LogKind, Op, PipelineTemplate, RunSnapshot,
    RunStatus, Step, StepDefinition, StepStatus,
};
use std::path::{Path, PathBuf};
use ts_rs::TS;

#[derive(Parser, Debug)]
#[command(name = "mm-protocol-ts", about = "Generate TypeScript bindings for mm-protocol")]
struct Args {
    /// Directory the `.ts` files are written to.
    #[arg(default_value = "bindings")]
    out_dir: PathBuf,
}

/// Export each protocol type (and its dependencies) into `out_dir`.
fn export_all(out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    StepStatus::export_all_to(out_dir)?;
    Step::export_all_to(out_dir)?;
    StepDefinition::export_all_to(out_dir)?;
    LogKind::export_all_to(out_dir)?;
    LogEntry::export_all_to(out_dir)?;
    RunStatus::export_all_to(out_dir)?;
    RunSnapshot::export_all_to(out_dir)?;
    DriveStrategy::export_all_to(out_dir)?;
    GlobalConfig::export_all_to(out_dir)?;
    PipelineTemplate::export_all_to(out_dir)?;
    Op::export_all_to(out_dir)?;
    Event::export_all_to(out_dir)?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    export_all(&args.out_dir)?;
    println!("Wrote TypeScript bindings to {}", args.out_dir.display());
    Ok(())
}
