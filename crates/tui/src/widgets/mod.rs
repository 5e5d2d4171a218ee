//! TUI widgets module.
//!
//! - `activity_view`: the scrolling agent activity log
//! - `prompt_composer`: the prompt input
//! - `workflow`: the step status panel

pub mod activity_view;
pub mod prompt_composer;
pub mod workflow;

pub use activity_view::ActivityView;
pub use prompt_composer::PromptComposer;
pub use workflow::render_workflow;
