//! Initialization module for creating `.momentum/` directory structures.
//!
//! Generates a `.momentum/` directory with:
//! - Global configuration (`config.toml`)
//! - Pipeline templates (`pipelines/*.yaml`)
//!
//! # Example
//!
//! ```no_run
//! use mm_core::init::{InitOptions, generate_momentum_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! let dir = generate_momentum_structure(options).await?;
//! println!("Initialized {}", dir.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_momentum_structure, InitOptions};
pub use templates::{get_template, list_templates};
