//! Task line codec.
//!
//! A task is one line of text. Everything here is pure: functions take a line and return
//! either a view into it or a rewritten copy. Malformed markers are never errors, they are
//! simply not recognized.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([A-Z])\)").expect("regex"));
static DONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^x\s").expect("regex"));
static PROJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\W)(\+\w+)").expect("regex"));
static CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\W)(@\w+)").expect("regex"));
static LINE_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(\S.*)$").expect("regex"));
static DATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(char);

#[derive(Debug, Error)]
#[error("PRIORITY must be A to Z, not \"{0}\"")]
pub struct InvalidPriority(pub String);

impl Priority {
    pub fn new(letter: char) -> Option<Self> {
        letter.is_ascii_uppercase().then_some(Self(letter))
    }

    pub fn letter(self) -> char {
        self.0
    }

    /// The `(X)` marker written at the start of a line.
    pub fn marker(self) -> String {
        format!("({})", self.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                Priority::new(letter).ok_or_else(|| InvalidPriority(value.to_string()))
            }
            _ => Err(InvalidPriority(value.to_string())),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Project,
    Context,
}

impl TagKind {
    fn pattern(self) -> &'static Regex {
        match self {
            TagKind::Project => &PROJECT_RE,
            TagKind::Context => &CONTEXT_RE,
        }
    }
}

pub fn parse_priority(line: &str) -> Option<(Priority, &str)> {
    let caps = PRIORITY_RE.captures(line)?;
    let letter = caps.get(1)?.as_str().chars().next()?;
    let whole = caps.get(0)?;
    Some((Priority(letter), &line[whole.end()..]))
}

pub fn strip_priority(line: &str) -> &str {
    parse_priority(line).map(|(_, rest)| rest).unwrap_or(line)
}

/// Replaces an existing priority marker, or inserts one followed by a space.
pub fn set_priority(line: &str, priority: Priority) -> String {
    match parse_priority(line) {
        Some((_, rest)) => format!("{}{}", priority.marker(), rest),
        None => format!("{} {}", priority.marker(), line),
    }
}

pub fn is_completed(line: &str) -> bool {
    DONE_RE.is_match(line)
}

pub fn mark_completed(line: &str, date: NaiveDate) -> String {
    format!("x {} {}", date.format(DATE_FORMAT), line)
}

/// Byte spans of every `+project` or `@context` tag in `line`.
///
/// The sigil must sit at the start of the line or after a non-word character, so
/// `me@example.com` holds no context tag.
pub fn tag_positions(line: &str, kind: TagKind) -> Vec<Range<usize>> {
    kind.pattern()
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|tag| tag.range())
        .collect()
}

pub fn tags(line: &str, kind: TagKind) -> Vec<&str> {
    tag_positions(line, kind)
        .into_iter()
        .map(|span| &line[span])
        .collect()
}

/// Splits a display number off the front of `line`.
///
/// Returns the line untouched when it does not start with digits, whitespace and text.
pub fn strip_line_number(line: &str) -> (Option<usize>, &str) {
    let Some(caps) = LINE_NO_RE.captures(line) else {
        return (None, line);
    };
    match (caps[1].parse::<usize>(), caps.get(2)) {
        (Ok(number), Some(rest)) => (Some(number), rest.as_str()),
        _ => (None, line),
    }
}

pub fn number_line(number: usize, line: &str) -> String {
    format!("{:<3} {}", number, line)
}

pub fn add_line_numbers<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| number_line(idx + 1, line.as_ref()))
        .collect()
}

/// Structural view of a task line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub completed: bool,
    pub completion_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub creation_date: Option<String>,
    pub body: String,
}

impl Task {
    pub fn parse(line: &str) -> Self {
        let mut rest = line;
        let mut completed = false;
        let mut completion_date = None;

        if is_completed(rest) {
            completed = true;
            rest = rest[1..].trim_start();
            if let Some((token, tail)) = split_token(rest) {
                if let Ok(date) = NaiveDate::parse_from_str(token, DATE_FORMAT) {
                    completion_date = Some(date);
                    rest = tail;
                }
            }
        }

        let priority = match parse_priority(rest) {
            Some((priority, tail)) => {
                rest = tail.trim_start();
                Some(priority)
            }
            None => None,
        };

        let creation_date = match split_token(rest) {
            Some((token, tail)) if DATE_TOKEN_RE.is_match(token) => {
                rest = tail;
                Some(token.to_string())
            }
            _ => None,
        };

        Task {
            completed,
            completion_date,
            priority,
            creation_date,
            body: rest.to_string(),
        }
    }

    pub fn projects(&self) -> Vec<&str> {
        tags(&self.body, TagKind::Project)
    }

    pub fn contexts(&self) -> Vec<&str> {
        tags(&self.body, TagKind::Context)
    }

    pub fn to_line(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.completed {
            parts.push("x".to_string());
        }
        if let Some(date) = self.completion_date {
            parts.push(date.format(DATE_FORMAT).to_string());
        }
        if let Some(priority) = self.priority {
            parts.push(priority.marker());
        }
        if let Some(created) = &self.creation_date {
            parts.push(created.clone());
        }
        if !self.body.is_empty() {
            parts.push(self.body.clone());
        }
        parts.join(" ")
    }
}

fn split_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.find(char::is_whitespace) {
        Some(idx) => Some((&text[..idx], text[idx..].trim_start())),
        None => Some((text, "")),
    }
}
