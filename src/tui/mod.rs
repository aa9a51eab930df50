//! Terminal User Interface for smart-complete.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod events;
pub mod headless;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::error::{Result, SmartCompleteError};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::info;

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;

        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| SmartCompleteError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| {
            SmartCompleteError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| SmartCompleteError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode().map_err(|e| {
            SmartCompleteError::internal(format!("Failed to disable raw mode: {e}"))
        })?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| {
            SmartCompleteError::internal(format!("Failed to leave alternate screen: {e}"))
        })?;

        self.terminal
            .show_cursor()
            .map_err(|e| SmartCompleteError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main event loop until the app stops.
    pub async fn run(&mut self, app: &mut App) -> Result<()> {
        // Restore the terminal if anything panics
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let result = self.run_event_loop(app).await;

        app.runner.cancel_all();
        let _ = panic::take_hook();

        result
    }

    async fn run_event_loop(&mut self, app: &mut App) -> Result<()> {
        let mut events = self.event_handler.spawn();

        loop {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| SmartCompleteError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => app.handle_event(event),
                    None => {
                        return Err(SmartCompleteError::internal("Terminal event reader stopped"));
                    }
                },

                Some(outcome) = app.runner.recv() => {
                    app.apply_outcome(outcome);
                }
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive TUI for the given app.
pub async fn run(mut app: App) -> Result<()> {
    info!("Starting interactive mode for field '{}'", app.field.name());
    let mut tui = Tui::new()?;
    tui.run(&mut app).await
}
