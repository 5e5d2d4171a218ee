//! Prompt composer widget.
//!
//! A single-line text input for the feature request. Input is disabled
//! while a run is working.

use crate::event::EventStatus;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Prompt composer state.
#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    input: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl PromptComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map_or(self.input.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.input.insert(at, c);
        self.cursor += 1;
    }

    /// Insert pasted text, flattening newlines into spaces.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(if c == '\n' || c == '\r' { ' ' } else { c });
        }
    }

    /// Delete the character before the cursor.
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.input.remove(at);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Take the trimmed prompt, leaving the composer empty.
    ///
    /// Returns `None` (and keeps the input) when it is blank.
    pub fn take_prompt(&mut self) -> Option<String> {
        let prompt = self.input.trim();
        if prompt.is_empty() {
            return None;
        }
        let prompt = prompt.to_string();
        self.clear();
        Some(prompt)
    }

    /// Handle editing keys. Enter is left to the caller.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> EventStatus {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c)
            }
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor = 0,
            _ => return EventStatus::NotConsumed,
        }
        EventStatus::Consumed
    }

    /// Render the input field. `enabled` is false while a run is working.
    pub fn render(&self, area: Rect, buf: &mut Buffer, enabled: bool) {
        let (title, style) = if enabled {
            (
                "Describe a feature (Enter to submit, Esc to quit)",
                Style::default().fg(Color::Yellow),
            )
        } else {
            (
                "Agent is working...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            )
        };

        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let line = if enabled && self.input.is_empty() {
            Line::from(vec![
                Span::styled("> ", style),
                Span::styled(
                    "e.g. Add a health check endpoint",
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        } else {
            Line::from(Span::styled(format!("> {}", self.input), style))
        };
        Paragraph::new(line).render(inner, buf);
    }

    /// Screen position of the cursor within `area`, when enabled.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let x = area.x + 1 + 2 + self.cursor as u16;
        (x.min(area.right().saturating_sub(2)), area.y + 1)
    }
}
