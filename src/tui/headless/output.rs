//! Output formatting for headless mode: text, JSON, and frames.

use super::{HeadlessResult, HeadlessState};
use crate::cli::OutputFormat;
use ratatui::buffer::Buffer;
use serde::Serialize;

/// Renders a ratatui buffer to a string.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// Renders a buffer to plain text, dropping trailing spaces and blank rows.
    pub fn render(buffer: &Buffer) -> String {
        let area = buffer.area;

        let mut lines: Vec<String> = (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer.cell((x, y)).map_or(" ", |cell| cell.symbol()))
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        format!("{}\n", lines.join("\n"))
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    screen: &'a str,
    screen_lines: &'a [String],
    events_executed: usize,
    duration_ms: u64,
    assertions: AssertionSummary<'a>,
    state: &'a HeadlessState,
}

#[derive(Debug, Serialize)]
struct AssertionSummary<'a> {
    passed: usize,
    failed: usize,
    failures: &'a [String],
}

/// Formats headless execution results.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    /// Creates a new output formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result according to the configured format.
    pub fn format(&self, result: &HeadlessResult) -> String {
        match self.format {
            OutputFormat::Text => self.format_text(result),
            OutputFormat::Json => self.format_json(result),
            OutputFormat::Frames => self.format_frames(result),
        }
    }

    fn format_text(&self, result: &HeadlessResult) -> String {
        let assertions = if result.assertions_passed > 0 || result.assertions_failed > 0 {
            format!(
                " | Assertions: {} passed, {} failed",
                result.assertions_passed, result.assertions_failed
            )
        } else {
            String::new()
        };

        let mut out = format!(
            "{}\nEvents: {} executed in {}ms{}\n",
            result.screen,
            result.events_executed,
            result.duration.as_millis(),
            assertions
        );
        for failure in &result.failures {
            out.push_str(&format!("FAILED: {failure}\n"));
        }
        out
    }

    fn format_json(&self, result: &HeadlessResult) -> String {
        let json_output = JsonOutput {
            screen: &result.screen,
            screen_lines: &result.screen_lines,
            events_executed: result.events_executed,
            duration_ms: result.duration.as_millis() as u64,
            assertions: AssertionSummary {
                passed: result.assertions_passed,
                failed: result.assertions_failed,
                failures: &result.failures,
            },
            state: &result.state,
        };

        serde_json::to_string_pretty(&json_output)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }

    fn format_frames(&self, result: &HeadlessResult) -> String {
        let mut out: String = result
            .frames
            .iter()
            .map(|frame| {
                format!(
                    "=== FRAME {} ({}) ===\n{}\n\n",
                    frame.number,
                    frame.event.as_deref().unwrap_or("initial"),
                    frame.screen
                )
            })
            .collect();

        out.push_str(&format!(
            "Total: {} frames, {} events executed in {}ms\n",
            result.frames.len(),
            result.events_executed,
            result.duration.as_millis(),
        ));
        if result.assertions_passed > 0 || result.assertions_failed > 0 {
            out.push_str(&format!(
                "Assertions: {} passed, {} failed\n",
                result.assertions_passed, result.assertions_failed
            ));
        }
        out
    }
}
