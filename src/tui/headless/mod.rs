//! Headless mode for scripted testing and automation.
//!
//! Runs the TUI without a terminal, executing scripted events against the
//! field and capturing the rendered screen for verification.

mod events;
mod output;

pub use events::{Assertion, Event, EventParser, STATE_FIELDS};
pub use output::{HeadlessOutput, ScreenRenderer};

use crate::cli::{Cli, OutputFormat};
use crate::error::{Result, SmartCompleteError};
use crate::tui::app::App;
use crate::tui::ui;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    /// Output format.
    pub output_format: OutputFormat,
    /// Whether to stop on first assertion failure.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<PathBuf>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }
}

impl HeadlessConfig {
    /// Creates a HeadlessConfig from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (width, height) = cli
            .parse_screen_size()
            .map_err(SmartCompleteError::config)?;
        let output_format = cli
            .parse_output_format()
            .map_err(SmartCompleteError::config)?;

        Ok(Self {
            width,
            height,
            output_format,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
        })
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen content as text.
    pub screen: String,
    /// Screen lines for JSON output.
    pub screen_lines: Vec<String>,
    /// Number of events executed.
    pub events_executed: usize,
    /// Total execution duration.
    pub duration: Duration,
    /// Number of assertions passed.
    pub assertions_passed: usize,
    /// Number of assertions failed.
    pub assertions_failed: usize,
    /// Descriptions of the failed assertions.
    pub failures: Vec<String>,
    /// Field state snapshot.
    pub state: HeadlessState,
    /// Frame captures (for frames output mode).
    pub frames: Vec<Frame>,
}

/// Snapshot of the field state for assertions and JSON output.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct HeadlessState {
    /// Current field value.
    pub value: String,
    /// Cursor position in characters.
    pub cursor: usize,
    /// Pending type-ahead suffix.
    pub suggestion: Option<String>,
    /// Whether the results container is shown.
    pub results_visible: bool,
    /// Number of rendered results.
    pub result_count: usize,
    /// Rendered result texts.
    pub results: Vec<String>,
    /// Highlighted result index.
    pub highlighted: Option<usize>,
    /// Notice shown in place of results.
    pub notice: Option<String>,
    /// Values selected so far, oldest first.
    pub selections: Vec<String>,
    /// Whether the app is still running.
    pub running: bool,
}

impl HeadlessState {
    /// Takes a snapshot of the app.
    pub fn from_app(app: &App) -> Self {
        let field = &app.field;
        let container = field.container();
        Self {
            value: field.value().to_string(),
            cursor: field.input().cursor(),
            suggestion: field.input().suggestion().map(String::from),
            results_visible: container.is_visible(),
            result_count: container.items().len(),
            results: container.items().iter().map(|i| i.text.clone()).collect(),
            highlighted: container.highlighted(),
            notice: container.notice().map(String::from),
            selections: app.selections(),
            running: app.running,
        }
    }

    /// Returns a state field as text for assertions. Absent values read as "".
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "value" => self.value.clone(),
            "cursor" => self.cursor.to_string(),
            "suggestion" => self.suggestion.clone().unwrap_or_default(),
            "visible" => self.results_visible.to_string(),
            "count" => self.result_count.to_string(),
            "highlighted" => self
                .highlighted
                .map(|i| i.to_string())
                .unwrap_or_default(),
            "notice" => self.notice.clone().unwrap_or_default(),
            "selections" => self.selections.len().to_string(),
            "last_selection" => self.selections.last().cloned().unwrap_or_default(),
            "running" => self.running.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    /// Screen content.
    pub screen: String,
}

/// Runs the TUI in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    events: Vec<Event>,
    frames: Vec<Frame>,
    failures: Vec<String>,
    assertions_passed: usize,
}

impl HeadlessRunner {
    /// Creates a headless runner around the app.
    pub fn new(config: HeadlessConfig, app: App) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend).map_err(|e| {
            SmartCompleteError::internal(format!("Failed to create test terminal: {e}"))
        })?;

        Ok(Self {
            config,
            terminal,
            app,
            events: Vec::new(),
            frames: Vec::new(),
            failures: Vec::new(),
            assertions_passed: 0,
        })
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin when the path is "-".
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| SmartCompleteError::internal(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path).map_err(|e| {
                SmartCompleteError::config(format!("Failed to read script file {path}: {e}"))
            })?
        };

        self.load_events(&content)
    }

    /// Runs the loaded events and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        let start_time = Instant::now();
        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            let event_str = event.to_string();
            debug!(event = %event_str, "Executing headless event");

            let keep_going = self.execute(&event).await?;
            events_executed += 1;

            self.draw()?;
            if self.config.output_format == OutputFormat::Frames {
                self.capture_frame(Some(event_str))?;
            }

            if !keep_going || !self.app.running {
                break;
            }
        }

        self.app.runner.cancel_all();
        self.draw()?;

        let screen = self.render_screen();
        let screen_lines = screen.lines().map(String::from).collect();

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: start_time.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.failures.len(),
            failures: self.failures,
            state: HeadlessState::from_app(&self.app),
            frames: self.frames,
        })
    }

    /// Executes one event. Returns false when a failed assertion should stop the run.
    async fn execute(&mut self, event: &Event) -> Result<bool> {
        match event {
            Event::Key(key) => self.app.handle_key(*key),
            Event::Type(text) => self.app.type_text(text),
            Event::Wait(duration) => {
                tokio::time::sleep(*duration).await;
                let applied = self.app.drain_outcomes();
                debug!(applied, "Applied finished filter passes");
            }
            Event::Resize(width, height) => {
                let area = Rect::new(0, 0, *width, *height);
                self.terminal
                    .resize(area)
                    .map_err(|e| SmartCompleteError::internal(format!("Resize failed: {e}")))?;
                self.app.resize(area);
            }
            Event::Select(index) => {
                if !self.app.select(*index) {
                    warn!("No result at index {}", index);
                }
            }
            // Snapshots are captured as frames
            Event::Snapshot(_) => {}
            Event::Assert(assertion) => {
                self.draw()?;
                let screen = self.render_screen();
                let state = HeadlessState::from_app(&self.app);
                if assertion.check(&screen, &state) {
                    self.assertions_passed += 1;
                } else {
                    warn!("Assertion failed: {}", event);
                    self.failures.push(event.to_string());
                    if self.config.fail_fast {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }

    fn draw(&mut self) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, &mut self.app))
            .map_err(|e| SmartCompleteError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    /// Renders the current screen to a string.
    fn render_screen(&self) -> String {
        ScreenRenderer::render(self.terminal.backend().buffer())
    }

    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;
        let screen = self.render_screen();
        let number = self.frames.len();
        self.frames.push(Frame {
            number,
            event,
            screen,
        });
        Ok(())
    }
}

/// Runs headless mode from CLI arguments. Returns the process exit code.
pub async fn run_headless(cli: &Cli, app: App) -> Result<i32> {
    cli.validate_headless().map_err(SmartCompleteError::config)?;

    let config = HeadlessConfig::from_cli(cli)?;
    let mut runner = HeadlessRunner::new(config.clone(), app)?;

    if let Some(ref events) = cli.events {
        runner.load_events(events)?;
    } else if let Some(ref script_path) = cli.script {
        runner.load_script(script_path)?;
    }

    let result = runner.run().await?;
    let output = HeadlessOutput::new(config.output_format).format(&result);

    if let Some(ref path) = config.output_file {
        std::fs::write(path, &output).map_err(|e| {
            SmartCompleteError::internal(format!("Failed to write output file: {e}"))
        })?;
    } else {
        use std::io::Write;
        let mut stdout = std::io::stdout();
        write!(stdout, "{output}")
            .and_then(|()| stdout.flush())
            .map_err(|e| SmartCompleteError::internal(format!("Failed to write output: {e}")))?;
    }

    Ok(if result.assertions_failed > 0 { 1 } else { 0 })
}
