//! Event handling for the TUI.
//!
//! Reads keyboard and terminal events using crossterm on a dedicated thread
//! and forwards them to the async event loop.

use crate::error::{Result, SmartCompleteError};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick (for redraws).
    Tick,
}

/// Handles terminal events.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    /// Timeout for polling events.
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new event handler with default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Creates a new event handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Polls for the next event.
    ///
    /// Returns a tick if no event is available within the tick rate.
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)
            .map_err(|e| SmartCompleteError::internal(format!("Failed to poll events: {e}")))?
        {
            let event = event::read()
                .map_err(|e| SmartCompleteError::internal(format!("Failed to read event: {e}")))?;
            Ok(Self::convert(event))
        } else {
            Ok(Event::Tick)
        }
    }

    /// Reads events on a background thread until the receiver is dropped.
    pub fn spawn(self) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || loop {
            match self.next() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{}", e);
                    break;
                }
            }
        });
        rx
    }

    fn convert(event: CrosstermEvent) -> Event {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            _ => Event::Tick,
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
