//! Event DSL parser for headless mode.
//!
//! Parses event strings like "type:ap", "key:down", "select:0", "wait:100ms"
//! into executable events.

use super::HeadlessState;
use crate::error::{Result, SmartCompleteError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::time::Duration;

/// Names accepted by state assertions.
pub const STATE_FIELDS: [&str; 10] = [
    "value",
    "cursor",
    "suggestion",
    "visible",
    "count",
    "highlighted",
    "notice",
    "selections",
    "last_selection",
    "running",
];

/// An assertion to check against the screen or state.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    /// Screen contains text (case-insensitive).
    Contains(String),
    /// Screen contains text (case-sensitive).
    ContainsExact(String),
    /// Screen does not contain text.
    NotContains(String),
    /// Screen matches regex pattern.
    Matches(String),
    /// State field equals value.
    StateEquals { field: String, value: String },
    /// State field comparison (>=, <=, >, <).
    StateCompare {
        field: String,
        op: String,
        value: String,
    },
}

impl Assertion {
    /// Checks the assertion against the screen and state snapshot.
    pub fn check(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(screen))
                .unwrap_or(false),
            Self::StateEquals { field, value } => {
                state.field(field).as_deref() == Some(value.as_str())
            }
            Self::StateCompare { field, op, value } => {
                compare_values(state.field(field).as_deref(), op, value)
            }
        }
    }
}

/// Compares values using the given operator.
fn compare_values(actual: Option<&str>, op: &str, expected: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };

    if let (Ok(a), Ok(e)) = (actual.parse::<i64>(), expected.parse::<i64>()) {
        return match op {
            ">=" => a >= e,
            "<=" => a <= e,
            ">" => a > e,
            "<" => a < e,
            "=" | "==" => a == e,
            _ => false,
        };
    }

    match op {
        "=" | "==" => actual == expected,
        _ => false,
    }
}

/// A parsed event that can be executed.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// Type text (expands to one key press per character).
    Type(String),
    /// Wait for a duration, then apply finished filter passes.
    Wait(Duration),
    /// Resize the terminal.
    Resize(u16, u16),
    /// Select the result at an index.
    Select(usize),
    /// Take a named snapshot.
    Snapshot(String),
    /// Assert something about the screen or state.
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                let mut parts = Vec::new();
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    parts.push("ctrl".to_string());
                }
                if key.modifiers.contains(KeyModifiers::ALT) {
                    parts.push("alt".to_string());
                }
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    parts.push("shift".to_string());
                }
                parts.push(key_code_to_string(&key.code));
                write!(f, "key:{}", parts.join("+"))
            }
            Self::Type(text) => write!(f, "type:{text}"),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Resize(w, h) => write!(f, "resize:{w}x{h}"),
            Self::Select(index) => write!(f, "select:{index}"),
            Self::Snapshot(name) => write!(f, "snapshot:{name}"),
            Self::Assert(a) => match a {
                Assertion::Contains(t) => write!(f, "assert:contains:{t}"),
                Assertion::ContainsExact(t) => write!(f, "assert:contains-exact:{t}"),
                Assertion::NotContains(t) => write!(f, "assert:not-contains:{t}"),
                Assertion::Matches(p) => write!(f, "assert:matches:{p}"),
                Assertion::StateEquals { field, value } => write!(f, "assert:{field}={value}"),
                Assertion::StateCompare { field, op, value } => {
                    write!(f, "assert:{field}{op}{value}")
                }
            },
        }
    }
}

fn key_code_to_string(code: &KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        _ => "unknown".to_string(),
    }
}

/// Parser for the event DSL.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    /// Creates a new event parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses all events from an input string.
    /// Supports comma-separated and newline-separated events.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        for line in input.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for part in line.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }

                events.push(self.parse_one(part)?);
            }
        }

        Ok(events)
    }

    /// Parses a single event string.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim();

        let (event_type, value) = input.split_once(':').ok_or_else(|| {
            SmartCompleteError::config(format!(
                "Invalid event syntax: '{input}'. Expected format: type:value"
            ))
        })?;
        let event_type = event_type.trim().to_lowercase();

        match event_type.as_str() {
            "key" => self.parse_key(value.trim()),
            // Leading spaces are part of the typed text
            "type" => Ok(Event::Type(value.to_string())),
            "wait" => self.parse_wait(value),
            "resize" => self.parse_resize(value.trim()),
            "select" => self.parse_select(value.trim()),
            "snapshot" => Ok(Event::Snapshot(value.trim().to_string())),
            "assert" => self.parse_assert(value.trim()),
            _ => Err(SmartCompleteError::config(format!(
                "Unknown event type: '{event_type}'. Valid types: key, type, wait, resize, select, snapshot, assert"
            ))),
        }
    }

    /// Parses a key event like "enter", "ctrl+c", "down".
    fn parse_key(&self, value: &str) -> Result<Event> {
        let mut modifiers = KeyModifiers::empty();
        let (mods, key_str) = match value.rsplit_once('+') {
            // "key:+" is the plus character itself
            Some((mods, "")) if !mods.is_empty() => (Some(mods.trim_end_matches('+')), "+"),
            Some((mods, key)) if !mods.is_empty() => (Some(mods), key),
            _ => (None, value),
        };

        for part in mods.into_iter().flat_map(|m| m.split('+')) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => {
                    return Err(SmartCompleteError::config(format!(
                        "Unknown modifier: '{part}'. Valid modifiers: ctrl, alt, shift"
                    )));
                }
            }
        }

        let code = self.parse_key_code(key_str)?;

        Ok(Event::Key(KeyEvent::new(code, modifiers)))
    }

    /// Parses a key code string into a KeyCode.
    fn parse_key_code(&self, s: &str) -> Result<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "space" => KeyCode::Char(' '),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        return Err(SmartCompleteError::config(format!(
                            "Unknown key: '{s}'. Use single characters or named keys like enter, esc, tab, etc."
                        )));
                    }
                }
            }
        };

        Ok(code)
    }

    /// Parses a wait duration like "100ms", "2s", or just "100" (defaults to ms).
    fn parse_wait(&self, value: &str) -> Result<Event> {
        let value = value.trim().to_lowercase();
        let invalid = || SmartCompleteError::config(format!("Invalid duration: '{value}'"));

        let duration = if let Some(ms) = value.strip_suffix("ms") {
            Duration::from_millis(ms.parse().map_err(|_| invalid())?)
        } else if let Some(secs) = value.strip_suffix('s') {
            Duration::from_secs(secs.parse().map_err(|_| invalid())?)
        } else {
            Duration::from_millis(value.parse().map_err(|_| invalid())?)
        };

        Ok(Event::Wait(duration))
    }

    /// Parses a resize event like "120x40".
    fn parse_resize(&self, value: &str) -> Result<Event> {
        let (width, height) = value.split_once('x').ok_or_else(|| {
            SmartCompleteError::config(format!(
                "Invalid resize format: '{value}'. Expected WIDTHxHEIGHT"
            ))
        })?;

        let width: u16 = width
            .parse()
            .map_err(|_| SmartCompleteError::config(format!("Invalid width: '{width}'")))?;
        let height: u16 = height
            .parse()
            .map_err(|_| SmartCompleteError::config(format!("Invalid height: '{height}'")))?;

        Ok(Event::Resize(width, height))
    }

    fn parse_select(&self, value: &str) -> Result<Event> {
        value
            .parse()
            .map(Event::Select)
            .map_err(|_| SmartCompleteError::config(format!("Invalid result index: '{value}'")))
    }

    /// Parses an assertion like "contains:Apple", "value=Apple" or "count>=2".
    fn parse_assert(&self, value: &str) -> Result<Event> {
        // State shorthand: an operator before any colon
        let colon = value.find(':');
        let op = value.find(['=', '<', '>']);
        if let Some(op) = op {
            if colon.map_or(true, |colon| op < colon) {
                return Ok(Event::Assert(self.parse_state_assertion(value)?));
            }
        }

        let (assert_type, rest) = value.split_once(':').ok_or_else(|| {
            SmartCompleteError::config(format!(
                "Invalid assertion syntax: '{value}'. Expected assert:type:value or assert:field=value"
            ))
        })?;

        let rest = rest.trim();
        let assertion = match assert_type.trim().to_lowercase().as_str() {
            "contains" => Assertion::Contains(rest.to_string()),
            "contains-exact" => Assertion::ContainsExact(rest.to_string()),
            "not-contains" => Assertion::NotContains(rest.to_string()),
            "matches" => Assertion::Matches(rest.to_string()),
            "state" => self.parse_state_assertion(rest)?,
            other => {
                return Err(SmartCompleteError::config(format!(
                    "Unknown assertion type: '{other}'. Valid types: contains, contains-exact, not-contains, matches, state"
                )));
            }
        };

        Ok(Event::Assert(assertion))
    }

    /// Parses a state assertion like "value=Apple" or "count>=2".
    fn parse_state_assertion(&self, value: &str) -> Result<Assertion> {
        for op in [">=", "<=", ">", "<", "="] {
            if let Some(pos) = value.find(op) {
                let field = value[..pos].trim().to_string();
                let val = value[pos + op.len()..].trim().to_string();

                if !STATE_FIELDS.contains(&field.as_str()) {
                    return Err(SmartCompleteError::config(format!(
                        "Unknown state field: '{field}'. Valid fields: {}",
                        STATE_FIELDS.join(", ")
                    )));
                }

                return Ok(if op == "=" {
                    Assertion::StateEquals { field, value: val }
                } else {
                    Assertion::StateCompare {
                        field,
                        op: op.to_string(),
                        value: val,
                    }
                });
            }
        }

        Err(SmartCompleteError::config(format!(
            "Invalid state assertion: '{value}'. Expected field=value or field>=value"
        )))
    }
}
