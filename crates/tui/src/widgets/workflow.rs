//! Workflow status panel.
//!
//! Renders the run's steps as a table: a status glyph, the step title and
//! its description. The in-progress step gets an animated spinner.

use mm_protocol::run_models::{RunSnapshot, RunStatus};
use mm_protocol::step_models::{Step, StepStatus};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

/// Spinner frames for the in-progress step.
pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Glyph shown next to a step.
pub fn step_glyph(status: StepStatus, spinner_frame: usize) -> &'static str {
    match status {
        StepStatus::Pending => "○",
        StepStatus::InProgress => SPINNER[spinner_frame % SPINNER.len()],
        StepStatus::Completed => "✔",
        StepStatus::Failed => "✖",
    }
}

fn step_style(status: StepStatus) -> Style {
    match status {
        StepStatus::Pending => Style::default().fg(Color::DarkGray),
        StepStatus::InProgress => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        StepStatus::Completed => Style::default().fg(Color::Green),
        StepStatus::Failed => Style::default().fg(Color::Red),
    }
}

fn status_label(status: RunStatus) -> (&'static str, Color) {
    match status {
        RunStatus::Idle => ("idle", Color::DarkGray),
        RunStatus::Working => ("working", Color::Yellow),
        RunStatus::Success => ("success", Color::Green),
        RunStatus::Error => ("error", Color::Red),
    }
}

/// Render the workflow panel for `run`.
pub fn render_workflow(frame: &mut Frame, area: Rect, run: Option<&RunSnapshot>, spinner_frame: usize) {
    let status = run.map(|r| r.status).unwrap_or_default();
    let (label, color) = status_label(status);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(vec![
            Span::raw("Workflow Status "),
            Span::styled(format!("[{label}]"), Style::default().fg(color)),
        ]));

    if let Some(result_ref) = run.and_then(|r| r.result_ref.as_deref()) {
        block = block.title_bottom(Line::from(vec![
            Span::raw(" PR: "),
            Span::styled(
                result_ref.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Span::raw(" "),
        ]));
    }

    let steps: &[Step] = run.map(|r| r.steps.as_slice()).unwrap_or_default();
    if steps.is_empty() {
        let text = match status {
            RunStatus::Error => "No steps to show.",
            _ => "Steps appear here once a task starts.",
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<Row> = steps
        .iter()
        .map(|step| {
            let style = step_style(step.status);
            Row::new(vec![
                Cell::from(step_glyph(step.status, spinner_frame)).style(style),
                Cell::from(step.title.clone()).style(style),
                Cell::from(step.description.clone()).style(Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Length(22),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths).block(block).column_spacing(1);
    frame.render_widget(table, area);
}
