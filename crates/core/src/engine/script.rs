//! Scripted narration.
//!
//! A [`Script`] is the ordered list of [`Beat`]s the controller plays to
//! move a run through its steps. Each beat applies a transition, appends its
//! log lines in order (each optionally after a short pause), then sleeps for
//! its delay.

use mm_protocol::log_models::LogKind;
use mm_protocol::step_models::StepDefinition;
use std::time::Duration;

/// What a beat does to the step list before logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Leave the steps as they are.
    Hold,

    /// Complete the current step and start the next.
    Advance,

    /// Fail the current step. Ends the run.
    Fail { reason: String },
}

/// A log line played by a beat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LogKind,
    pub message: String,
    /// Pause before the line is appended.
    pub pause: Duration,
}

impl Line {
    pub fn new(kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            pause: Duration::ZERO,
        }
    }
}

/// One unit of scripted progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beat {
    pub transition: Transition,
    pub lines: Vec<Line>,
    pub delay: Duration,
}

impl Beat {
    pub fn hold() -> Self {
        Self::with_transition(Transition::Hold)
    }

    pub fn advance() -> Self {
        Self::with_transition(Transition::Advance)
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self::with_transition(Transition::Fail {
            reason: reason.into(),
        })
    }

    fn with_transition(transition: Transition) -> Self {
        Self {
            transition,
            lines: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    /// Add a log line to this beat.
    pub fn log(mut self, kind: LogKind, message: impl Into<String>) -> Self {
        self.lines.push(Line::new(kind, message));
        self
    }

    /// Add a log line that is appended only after `pause`.
    pub fn log_after(mut self, kind: LogKind, message: impl Into<String>, pause: Duration) -> Self {
        self.lines.push(Line {
            pause,
            ..Line::new(kind, message)
        });
        self
    }

    /// Pause for `delay` after this beat.
    pub fn then_wait(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// An ordered sequence of beats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    beats: Vec<Beat>,
}

impl Script {
    pub fn new(beats: Vec<Beat>) -> Self {
        Self { beats }
    }

    /// Build the default narration for `steps`, pausing `interval` between
    /// step boundaries.
    ///
    /// The first beat introduces step 1, each following beat closes one step
    /// and opens the next, and the last beat completes the pipeline.
    pub fn narrate(steps: &[StepDefinition], interval: Duration) -> Self {
        let Some(first) = steps.first() else {
            return Self::default();
        };

        let mut beats = Vec::with_capacity(steps.len() + 1);
        beats.push(
            Beat::hold()
                .log(LogKind::Agent, "Analyzing the request and preparing a plan.")
                .log(first.kind, opening_line(first))
                .then_wait(interval),
        );

        for pair in steps.windows(2) {
            let (done, next) = (&pair[0], &pair[1]);
            beats.push(
                Beat::advance()
                    .log(done.kind, closing_line(done))
                    .log(next.kind, opening_line(next))
                    .then_wait(interval),
            );
        }

        if let Some(last) = steps.last() {
            beats.push(
                Beat::advance()
                    .log(last.kind, closing_line(last))
                    .log(LogKind::Agent, "All steps completed."),
            );
        }

        Self { beats }
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Total time spent sleeping when the script plays to the end.
    pub fn duration(&self) -> Duration {
        self.beats
            .iter()
            .map(|beat| beat.delay + beat.lines.iter().map(|line| line.pause).sum::<Duration>())
            .sum()
    }
}

fn opening_line(step: &StepDefinition) -> String {
    format!("{}: {}", step.title, step.description)
}

fn closing_line(step: &StepDefinition) -> String {
    format!("{} completed.", step.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> Vec<StepDefinition> {
        vec![
            StepDefinition::new("Planning", "Decomposing the task.", LogKind::Search),
            StepDefinition::new("Generating Code", "Writing files.", LogKind::Code),
            StepDefinition::new("Testing", "Running tests.", LogKind::Test),
        ]
    }

    #[test]
    fn test_narrate_has_one_advance_per_step() {
        let script = Script::narrate(&steps(), Duration::from_millis(100));

        assert_eq!(script.len(), 4);
        assert_eq!(script.beats()[0].transition, Transition::Hold);
        let advances = script
            .beats()
            .iter()
            .filter(|beat| beat.transition == Transition::Advance)
            .count();
        assert_eq!(advances, 3);
    }

    #[test]
    fn test_narrate_lines_follow_step_kinds() {
        let script = Script::narrate(&steps(), Duration::from_millis(100));

        let second = &script.beats()[1];
        assert_eq!(
            second.lines,
            vec![
                Line::new(LogKind::Search, "Planning completed."),
                Line::new(LogKind::Code, "Generating Code: Writing files."),
            ]
        );

        let last = script.beats().last().unwrap();
        assert_eq!(last.lines[0], Line::new(LogKind::Test, "Testing completed."));
        assert_eq!(last.delay, Duration::ZERO);
    }

    #[test]
    fn test_narrate_duration() {
        let script = Script::narrate(&steps(), Duration::from_secs(2));
        assert_eq!(script.duration(), Duration::from_secs(6));
    }

    #[test]
    fn test_narrate_empty_template() {
        assert!(Script::narrate(&[], Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_beat_builder() {
        let beat = Beat::fail("tests failed")
            .log(LogKind::Test, "Running 40 tests")
            .log_after(LogKind::Test, "3 of 40 tests failed", Duration::from_millis(20))
            .then_wait(Duration::from_millis(5));

        assert_eq!(
            beat.transition,
            Transition::Fail {
                reason: "tests failed".to_string()
            }
        );
        assert_eq!(beat.lines.len(), 2);
        assert_eq!(beat.lines[0].pause, Duration::ZERO);
        assert_eq!(beat.lines[1].pause, Duration::from_millis(20));
        assert_eq!(beat.delay, Duration::from_millis(5));

        let script = Script::new(vec![beat]);
        assert_eq!(script.duration(), Duration::from_millis(25));
    }
}
