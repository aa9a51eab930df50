//! Command-line argument parsing for smart-complete.

use crate::autocomplete::{MaxResults, OptionOverrides, SettingsOverrides, Source};
use crate::config::Config;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Output format for headless mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output of the final screen.
    #[default]
    Text,
    /// JSON output with screen, state, and assertion results.
    Json,
    /// Frame-by-frame output showing the screen after each event.
    Frames,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "frames" => Ok(Self::Frames),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: text, json, or frames"
            )),
        }
    }
}

/// Autocomplete for a single-line terminal input.
#[derive(Parser, Debug)]
#[command(name = "smart-complete")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Inline candidates (e.g., `smart-complete Apple Banana Mango`)
    #[arg(value_name = "CANDIDATE", conflicts_with_all = ["source_file", "url"])]
    pub candidates: Vec<String>,

    /// Use a named field profile from the config file
    #[arg(short = 'f', long, value_name = "NAME")]
    pub field: Option<String>,

    /// Read candidates from a file, one per line
    #[arg(short = 's', long, value_name = "PATH", conflicts_with = "url")]
    pub source_file: Option<PathBuf>,

    /// Query a remote endpoint with `?term=<query>`
    #[arg(short = 'u', long, value_name = "URL")]
    pub url: Option<String>,

    /// Maximum number of results (-1 for unlimited)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub max_results: Option<i64>,

    /// Minimum query length before filtering
    #[arg(long, value_name = "N")]
    pub min_chars: Option<usize>,

    /// Debounce for remote lookups, in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Offer the best match as an inline completion
    #[arg(long)]
    pub type_ahead: bool,

    /// Only accept values from the result list
    #[arg(long)]
    pub force_select: bool,

    /// Config file path
    #[arg(long, value_name = "PATH", env = "SMART_COMPLETE_CONFIG")]
    pub config: Option<PathBuf>,

    // === Headless mode options ===
    /// Run in headless mode (no terminal UI, for testing/automation)
    #[arg(long)]
    pub headless: bool,

    /// Comma-separated events to execute in headless mode (e.g., "type:ap,key:down,key:enter")
    #[arg(long, value_name = "EVENTS")]
    pub events: Option<String>,

    /// Path to script file with events (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Screen size for headless mode (WIDTHxHEIGHT, e.g., "80x24")
    #[arg(long, value_name = "SIZE", default_value = "80x24")]
    pub size: String,

    /// Output format for headless mode
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write output to file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop on first assertion failure
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the settings given on the command line.
    ///
    /// Switches that are off are left unset so they don't mask the config file.
    pub fn settings_overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            min_char_limit: self.min_chars,
            max_results: self.max_results.map(MaxResults::from),
            delay_ms: self.delay_ms,
            type_ahead: self.type_ahead.then_some(true),
            force_select: self.force_select.then_some(true),
            disabled: None,
        }
    }

    /// Builds the source given on the command line, if any.
    pub fn source(&self) -> Result<Option<Source>> {
        if !self.candidates.is_empty() {
            return Ok(Some(Source::list(self.candidates.iter().cloned())));
        }
        if let Some(path) = &self.source_file {
            return Source::from_file(path).map(Some);
        }
        if let Some(url) = &self.url {
            return Source::remote(url).map(Some);
        }
        Ok(None)
    }

    /// Resolves the field's options: config defaults, then the named
    /// profile, then whatever was given on the command line.
    pub fn resolve_overrides(&self, config: &Config) -> Result<OptionOverrides> {
        let mut overrides = config.resolve_field(self.field.as_deref())?;
        overrides.settings.merge(&self.settings_overrides());
        if let Some(source) = self.source()? {
            overrides.source = Some(source);
        }
        Ok(overrides)
    }

    /// Returns true if headless mode is enabled.
    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// Parses the screen size from the --size argument.
    /// Returns (width, height) or an error.
    pub fn parse_screen_size(&self) -> std::result::Result<(u16, u16), String> {
        let (width, height) = self.size.split_once('x').ok_or_else(|| {
            format!(
                "Invalid size format: '{}'. Expected WIDTHxHEIGHT (e.g., 80x24)",
                self.size
            )
        })?;
        let width = width
            .parse::<u16>()
            .map_err(|_| format!("Invalid width: '{width}'"))?;
        let height = height
            .parse::<u16>()
            .map_err(|_| format!("Invalid height: '{height}'"))?;
        Ok((width, height))
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Validates headless mode arguments.
    pub fn validate_headless(&self) -> std::result::Result<(), String> {
        if !self.headless {
            return Ok(());
        }

        if self.events.is_none() && self.script.is_none() {
            return Err("--headless requires --events or --script".to_string());
        }

        self.parse_screen_size()?;
        self.parse_output_format()?;

        Ok(())
    }
}
