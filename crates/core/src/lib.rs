//! # mm-core
//!
//! Core run engine for Momentum.
//!
//! This crate provides:
//! - Configuration loading from the `.momentum/` directory
//! - The progress tracker and activity log that make up a run
//! - The run controller that drives a run locally or through an agent backend
//! - The run manager that guards submission and owns the active run
//!
//! ## Modules
//!
//! - [`backend`]: Agent backend trait and its HTTP and mock implementations
//! - [`config`]: Configuration loading and management
//! - [`engine`]: Run controller and scripted narration
//! - [`init`]: `.momentum/` scaffolding from embedded templates
//! - [`state`]: Run state and the run manager

pub mod backend;
pub mod config;
pub mod engine;
pub mod init;
pub mod state;
