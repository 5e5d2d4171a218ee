//! Terminal setup and the merged input stream.
//!
//! `Tui` owns the ratatui terminal in raw mode on the alternate screen and
//! restores it only on drop (and on panic). Its event stream merges crossterm
//! input, redraw requests and a steady animation tick into one `TuiEvent`
//! stream for the app loop.

use anyhow::Result;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::Event;
use crossterm::event::KeyEvent;
use crossterm::execute;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::stdout;
use std::io::Stdout;
use std::pin::Pin;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_stream::Stream;
use tokio_stream::StreamExt;

/// Type alias for the terminal backend we're using.
pub type TerminalBackend = CrosstermBackend<Stdout>;

/// Interval of the spinner animation.
pub const TICK_RATE: Duration = Duration::from_millis(120);

/// Input to the app loop.
#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    /// Bracketed paste.
    Paste(String),
    /// Time to redraw.
    Draw,
    /// Animation tick.
    Tick,
}

pub struct Tui {
    terminal: Terminal<TerminalBackend>,
    redraw_tx: mpsc::UnboundedSender<()>,
    redraw_rx: Option<mpsc::UnboundedReceiver<()>>,
}

impl Tui {
    /// Enter raw mode and the alternate screen.
    pub fn init() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnableBracketedPaste, EnterAlternateScreen)?;
        set_panic_hook();

        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        let (redraw_tx, redraw_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            redraw_tx,
            redraw_rx: Some(redraw_rx),
        })
    }

    pub fn frame_requester(&self) -> FrameRequester {
        FrameRequester {
            redraw_tx: self.redraw_tx.clone(),
        }
    }

    /// Take the event stream. Only the first call gets redraw requests.
    pub fn event_stream(&mut self) -> Pin<Box<dyn Stream<Item = TuiEvent> + Send + 'static>> {
        let mut crossterm_events = crossterm::event::EventStream::new();
        let mut redraw_rx = self.redraw_rx.take();
        let mut ticker = tokio::time::interval(TICK_RATE);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let stream = async_stream::stream! {
            loop {
                select! {
                    Some(Ok(event)) = crossterm_events.next() => {
                        match event {
                            Event::Key(key_event) => {
                                yield TuiEvent::Key(key_event);
                            }
                            Event::Paste(pasted) => {
                                yield TuiEvent::Paste(pasted);
                            }
                            Event::Resize(_, _) => {
                                yield TuiEvent::Draw;
                            }
                            _ => {}
                        }
                    }
                    Some(()) = recv_redraw(&mut redraw_rx) => {
                        yield TuiEvent::Draw;
                    }
                    _ = ticker.tick() => {
                        yield TuiEvent::Tick;
                    }
                }
            }
        };

        Box::pin(stream)
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

async fn recv_redraw(rx: &mut Option<mpsc::UnboundedReceiver<()>>) -> Option<()> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Handle for requesting a redraw from anywhere in the app.
#[derive(Clone, Debug)]
pub struct FrameRequester {
    redraw_tx: mpsc::UnboundedSender<()>,
}

impl FrameRequester {
    pub fn schedule_frame(&self) {
        let _ = self.redraw_tx.send(());
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
    Ok(())
}

/// Restore the terminal before the default panic output.
fn set_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
