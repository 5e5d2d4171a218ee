//! Common test utilities shared by the integration suites.
//!
//! - Fixtures: controllers, managers, `.momentum/` projects
//! - Assertions over event streams and snapshots

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
