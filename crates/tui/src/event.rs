//! Event handling types for the TUI.

/// Status of a key event after a widget has seen it.
///
/// Widgets return this from `handle_key_event` so the caller can pass
/// unconsumed keys to the next handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// Handled; do not propagate.
    Consumed,
    /// Not handled; pass to the next handler.
    NotConsumed,
}
