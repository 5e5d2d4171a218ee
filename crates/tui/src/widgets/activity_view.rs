//! Activity log widget with auto-scroll.
//!
//! Shows the submitted prompt, then one line per log entry (time, kind
//! glyph, message). The view
//! follows the newest entry until the user scrolls up; `End` resumes
//! following. An error banner is shown above the log when the run failed.

use crate::event::EventStatus;
use crossterm::event::{KeyCode, KeyEvent};
use mm_protocol::log_models::{LogEntry, LogKind};
use mm_protocol::run_models::{RunSnapshot, RunStatus};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};
use ratatui::Frame;

/// Shown when no run has been submitted yet.
pub const IDLE_MESSAGE: &str = "The agent is idle. Submit a prompt to begin a new task.";

/// Glyph and color for a log kind.
pub fn kind_glyph(kind: LogKind) -> (&'static str, Color) {
    match kind {
        LogKind::Agent => ("●", Color::Magenta),
        LogKind::Search => ("⌕", Color::Blue),
        LogKind::Code => ("λ", Color::Cyan),
        LogKind::Test => ("✓", Color::Green),
        LogKind::Review => ("◎", Color::LightYellow),
        LogKind::Git => ("⎇", Color::LightBlue),
        LogKind::Error => ("✖", Color::Red),
    }
}

/// Number of transcript lines for `run`: the prompt plus every entry.
pub fn transcript_len(run: Option<&RunSnapshot>) -> usize {
    run.map_or(0, |r| r.log.len() + 1)
}

#[derive(Debug, Clone)]
pub struct ActivityView {
    scroll_offset: usize,
    follow: bool,
    /// Lines visible in the last render, used for paging.
    page_size: usize,
}

impl Default for ActivityView {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityView {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            follow: true,
            page_size: 10,
        }
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Jump to the newest entry and keep following.
    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
    }

    /// Called when an entry is appended.
    pub fn on_append(&mut self) {
        self.scroll_to_bottom();
    }

    /// Called when a new run replaces the log.
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
        self.follow = true;
    }

    pub fn scroll_up(&mut self, lines: usize, total: usize) {
        self.pin(total);
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize, total: usize) {
        self.pin(total);
        let max = self.max_offset(total);
        self.scroll_offset = (self.scroll_offset + lines).min(max);
        if self.scroll_offset == max {
            self.follow = true;
        }
    }

    /// Stop following, keeping the current view in place.
    fn pin(&mut self, total: usize) {
        if self.follow {
            self.scroll_offset = self.max_offset(total);
            self.follow = false;
        }
    }

    fn max_offset(&self, total: usize) -> usize {
        total.saturating_sub(self.page_size)
    }

    /// Handle scrolling keys. Other keys are left for the composer.
    pub fn handle_key_event(&mut self, key: KeyEvent, total: usize) -> EventStatus {
        match key.code {
            KeyCode::Up => self.scroll_up(1, total),
            KeyCode::Down => self.scroll_down(1, total),
            KeyCode::PageUp => self.scroll_up(self.page_size, total),
            KeyCode::PageDown => self.scroll_down(self.page_size, total),
            KeyCode::End => self.scroll_to_bottom(),
            _ => return EventStatus::NotConsumed,
        }
        EventStatus::Consumed
    }

    /// Render the prompt and log of `run`, or the idle message.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, run: Option<&RunSnapshot>) {
        let banner = run
            .filter(|r| r.status == RunStatus::Error)
            .and_then(|r| r.error.as_deref());

        let log_area = match banner {
            Some(error) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(3), Constraint::Min(3)])
                    .split(area);
                render_banner(frame, chunks[0], error);
                chunks[1]
            }
            None => area,
        };

        let block = Block::default().borders(Borders::ALL).title("Agent Activity");
        self.page_size = log_area.height.saturating_sub(2).max(1) as usize;

        let Some(run) = run else {
            let paragraph = Paragraph::new(IDLE_MESSAGE)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, log_area);
            return;
        };

        let mut lines = vec![prompt_line(&run.prompt)];
        if run.log.is_empty() {
            lines.push(Line::styled(
                "Waiting for the agent...",
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.extend(run.log.iter().map(entry_line));
        let total = lines.len();

        let max = self.max_offset(total);
        let offset = if self.follow { max } else { self.scroll_offset.min(max) };
        self.scroll_offset = offset;

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((offset as u16, 0));
        frame.render_widget(paragraph, log_area);

        if total > self.page_size {
            let mut state = ScrollbarState::default()
                .content_length(max + 1)
                .position(offset);
            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));
            frame.render_stateful_widget(scrollbar, log_area, &mut state);
        }
    }
}

fn prompt_line(prompt: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            "you ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("› ", Style::default().fg(Color::DarkGray)),
        Span::raw(prompt.to_string()),
    ])
}

fn entry_line(entry: &LogEntry) -> Line<'static> {
    let (glyph, color) = kind_glyph(entry.kind);
    let message_style = if entry.kind == LogKind::Error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(
            entry.timestamp.format("%H:%M:%S ").to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{glyph} "), Style::default().fg(color)),
        Span::styled(entry.message.clone(), message_style),
    ])
}

fn render_banner(frame: &mut Frame, area: Rect, error: &str) {
    let banner = Paragraph::new(error.to_string())
        .style(Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Error"));
    frame.render_widget(banner, area);
}
