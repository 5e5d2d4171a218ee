//! Run state.
//!
//! This module provides:
//! - `ProgressTracker`: the ordered step list and its transitions
//! - `ActivityLog`: the append-only, timestamped activity log
//! - `Run` and its mutators, which publish every change
//! - `RunManager`: the single active run slot and the submit guard

pub mod activity;
pub mod manager;
pub mod run;
pub mod tracker;
