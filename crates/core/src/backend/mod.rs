//! Agent backends.
//!
//! The delegated strategy launches a run on an external agent service
//! through the `AgentBackend` trait before narrating progress locally.

pub mod base;
pub mod http;
pub mod mock;

pub use base::{AgentBackend, BackendError, LaunchReceipt};
pub use http::HttpBackend;
pub use mock::MockBackend;
