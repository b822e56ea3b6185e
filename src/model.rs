/// Core data types for the pipe leak monitoring service.
///
/// This module defines the shared domain model imported by all other modules:
/// the `Reading` value object, the per-node `HistoryWindow`, the window
/// constants used by the analysis passes, and the crate's error types.
/// It contains no I/O and no analysis logic.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Window constants
// ---------------------------------------------------------------------------

/// Maximum number of readings retained per node, as delivered by the feed.
pub const HISTORY_LIMIT: usize = 100;

/// Number of most recent readings scanned by the streak classifier.
pub const STREAK_WINDOW: usize = 10;

/// Number of most recent readings plotted on the severity chart.
pub const PLOT_WINDOW: usize = 30;

/// Size of the trailing sub-window behind each severity point.
pub const SCORE_SUBWINDOW: usize = 10;

/// Score contribution of a single leak reading inside a sub-window.
pub const LEAK_WEIGHT: i32 = 10;

/// Score contribution of a single non-leak reading inside a sub-window.
pub const SAFE_WEIGHT: i32 = -5;

/// Reference line drawn at the chart baseline.
pub const SCORE_BASELINE: i32 = 0;

/// Reference line marking the warning level on the severity chart.
pub const SCORE_WARNING_THRESHOLD: i32 = 50;

/// Leak events farther than this (cm) are reported as suspected leaks.
pub const SUSPECTED_LEAK_DISTANCE_CM: f64 = 10.0;

/// Rows shown in a node's event log table.
pub const RECENT_EVENT_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Classification attached to a reading by the sensor node.
///
/// The feed only ever promises `"Leak"` or `"Safe"`. Anything else is kept
/// verbatim as `Unrecognized` so it can be counted as a data-quality issue;
/// it never contributes to the leak side of any statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    Leak,
    Safe,
    Unrecognized(String),
}

impl Label {
    pub fn is_leak(&self) -> bool {
        matches!(self, Label::Leak)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Label::Unrecognized(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Label::Leak => "Leak",
            Label::Safe => "Safe",
            Label::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for Label {
    fn from(raw: &str) -> Self {
        match raw {
            "Leak" => Label::Leak,
            "Safe" => Label::Safe,
            other => Label::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for Label {
    fn from(raw: String) -> Self {
        Label::from(raw.as_str())
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        match label {
            Label::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// A single sample from an acoustic leak-detection node.
///
/// Readings are immutable once received. `id` is an opaque key used for
/// display only and never for ordering; order comes from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub timestamp: String, // "YYYY-MM-DD HH:MM:SS"
    pub label: Label,
    #[serde(default)]
    pub distance: f64, // cm; 0 = no distance estimate
}

impl Reading {
    pub fn new(id: &str, timestamp: &str, label: Label, distance: f64) -> Self {
        Reading {
            id: id.to_string(),
            timestamp: timestamp.to_string(),
            label,
            distance,
        }
    }

    /// Date portion of the timestamp (before the first space).
    pub fn date(&self) -> &str {
        split_timestamp(&self.timestamp).0
    }

    /// Time portion of the timestamp (after the first space), or `""`.
    pub fn time(&self) -> &str {
        split_timestamp(&self.timestamp).1
    }

    /// Distance if it is a usable leak-origin measurement.
    pub fn usable_distance(&self) -> Option<f64> {
        (self.distance.is_finite() && self.distance > 0.0).then_some(self.distance)
    }
}

/// Splits `"<date> <time>"` on the first space.
///
/// A timestamp with no space is treated as all date with an empty time.
pub fn split_timestamp(timestamp: &str) -> (&str, &str) {
    timestamp.split_once(' ').unwrap_or((timestamp, ""))
}

// ---------------------------------------------------------------------------
// History window
// ---------------------------------------------------------------------------

/// The retained readings for one node, newest first.
///
/// A window is replaced wholesale on every feed update. Construction
/// truncates to the newest `limit` readings; after that the window is never
/// mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HistoryWindow {
    readings: Vec<Reading>,
}

impl HistoryWindow {
    pub fn empty() -> Self {
        HistoryWindow::default()
    }

    /// Builds a window from readings already ordered newest first.
    pub fn from_newest_first(mut readings: Vec<Reading>) -> Self {
        readings.truncate(HISTORY_LIMIT);
        HistoryWindow { readings }
    }

    /// Builds a window from readings in arrival (oldest first) order.
    pub fn from_chronological(readings: Vec<Reading>) -> Self {
        Self::from_chronological_with_limit(readings, HISTORY_LIMIT)
    }

    /// Like `from_chronological`, keeping at most `limit` of the newest readings.
    pub fn from_chronological_with_limit(mut readings: Vec<Reading>, limit: usize) -> Self {
        let excess = readings.len().saturating_sub(limit);
        readings.drain(..excess);
        readings.reverse();
        HistoryWindow { readings }
    }

    /// Keeps only the newest `limit` readings.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.readings.truncate(limit);
        self
    }

    pub fn newest_first(&self) -> &[Reading] {
        &self.readings
    }

    /// Readings from oldest to newest.
    pub fn chronological(&self) -> impl DoubleEndedIterator<Item = &Reading> + ExactSizeIterator {
        self.readings.iter().rev()
    }

    /// The `n` most recent readings, still in newest-first order.
    pub fn latest(&self, n: usize) -> &[Reading] {
        &self.readings[..n.min(self.readings.len())]
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when decoding a feed snapshot document.
///
/// Problems inside individual entries never surface here; they are tallied
/// as data-quality counts instead.
#[derive(Debug, PartialEq)]
pub enum FeedError {
    /// The document is not valid JSON.
    ParseError(String),
    /// The top-level value has the wrong JSON type; holds the type found.
    UnexpectedShape(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            FeedError::UnexpectedShape(kind) => {
                write!(f, "Unexpected document shape: got {}", kind)
            }
        }
    }
}

impl std::error::Error for FeedError {}

/// Errors raised while loading the service configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io { path: String, source: std::io::Error },
    /// The config file is not valid TOML for `MonitorConfig`.
    Parse(String),
    /// The config parsed but violates a constraint.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config {}: {}", path, source)
            }
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
