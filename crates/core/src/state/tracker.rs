//! Pipeline progress tracking.
//!
//! `ProgressTracker` owns the ordered step list of one run and enforces the
//! single-active-step invariant: at most one step is `InProgress`, every
//! step before it is `Completed`, every step after it is `Pending`. After a
//! failure the failed step stays `Failed` and nothing moves again until the
//! tracker is reset.

use mm_protocol::step_models::{Step, StepDefinition, StepStatus};

/// Result of a call to [`ProgressTracker::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// `completed` finished and `started` is now in progress.
    Moved { completed: u32, started: u32 },

    /// The last step finished; the whole pipeline is complete.
    Finished { completed: u32 },

    /// Nothing was in progress (not started, already finished, or failed).
    Idle,
}

/// Ordered list of pipeline steps with guarded transitions.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    steps: Vec<Step>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the steps from a template: step 1 in progress, the rest pending.
    ///
    /// Returns `false` and leaves the steps untouched if a step is already in
    /// progress.
    pub fn initialize(&mut self, template: &[StepDefinition]) -> bool {
        if self.current().is_some() {
            return false;
        }

        self.steps = template
            .iter()
            .enumerate()
            .map(|(index, definition)| Step {
                id: index as u32 + 1,
                title: definition.title.clone(),
                description: definition.description.clone(),
                kind: definition.kind,
                status: if index == 0 {
                    StepStatus::InProgress
                } else {
                    StepStatus::Pending
                },
            })
            .collect();

        true
    }

    /// Complete the in-progress step and start the next one.
    pub fn advance(&mut self) -> Advance {
        if self.is_failed() {
            return Advance::Idle;
        }

        let Some(index) = self.current_index() else {
            return Advance::Idle;
        };

        self.steps[index].status = StepStatus::Completed;
        let completed = self.steps[index].id;

        match self.steps.get_mut(index + 1) {
            Some(next) => {
                next.status = StepStatus::InProgress;
                Advance::Moved {
                    completed,
                    started: next.id,
                }
            }
            None => Advance::Finished { completed },
        }
    }

    /// Mark the in-progress step `step_id` as failed.
    ///
    /// Later steps stay pending for good. Returns `false` when `step_id` is
    /// not the step currently in progress.
    pub fn fail(&mut self, step_id: u32) -> bool {
        match self.current_index() {
            Some(index) if self.steps[index].id == step_id => {
                self.steps[index].status = StepStatus::Failed;
                true
            }
            _ => false,
        }
    }

    /// Fail whichever step is in progress, returning its id.
    pub fn fail_current(&mut self) -> Option<u32> {
        let id = self.current()?.id;
        self.fail(id).then_some(id)
    }

    /// Drop every step.
    pub fn reset(&mut self) {
        self.steps.clear();
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current(&self) -> Option<&Step> {
        self.current_index().map(|index| &self.steps[index])
    }

    pub fn step(&self, step_id: u32) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True once every step has completed.
    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty()
            && self
                .steps
                .iter()
                .all(|step| step.status == StepStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        self.steps
            .iter()
            .any(|step| step.status == StepStatus::Failed)
    }

    fn current_index(&self) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| step.status == StepStatus::InProgress)
    }
}
