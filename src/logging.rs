/// Structured logging for the leak monitoring service
///
/// Provides context-rich logging with node identifiers, timestamps,
/// and severity levels. Supports both console output and file-based
/// logging for long-running monitor processes.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::ingest::feed::DataQuality;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl LogLevel {
    /// Parses the level names accepted in the config file.
    pub fn parse(name: &str) -> Option<LogLevel> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Feed,
    Classifier,
    Scorer,
    Aggregator,
    Monitor,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Feed => write!(f, "FEED"),
            Component::Classifier => write!(f, "CLASSIFY"),
            Component::Scorer => write!(f, "SCORE"),
            Component::Aggregator => write!(f, "AUDIT"),
            Component::Monitor => write!(f, "MON"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Quality Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityIssue {
    /// Label was neither "Leak" nor "Safe"; treated as non-leak
    UnrecognizedLabel,
    /// Timestamp had no date/time separator
    MalformedTimestamp,
    /// Distance was negative or not a number; excluded from origin estimate
    InvalidDistance,
    /// Entry was not an object and could not be read at all
    SkippedEntry,
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::UnrecognizedLabel => write!(f, "UNRECOGNIZED_LABEL"),
            QualityIssue::MalformedTimestamp => write!(f, "MALFORMED_TIMESTAMP"),
            QualityIssue::InvalidDistance => write!(f, "INVALID_DISTANCE"),
            QualityIssue::SkippedEntry => write!(f, "SKIPPED_ENTRY"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, component: &Component, node_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        let node_part = node_id.map(|n| format!(" [{}]", n)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, component, node_part, message
        );

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, node_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, node_part, message),
                LogLevel::Info => println!("   {}{}: {}", component, node_part, message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, component: Component, node_id: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &component, node_id, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, node_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, component, node_id, message);
}

/// Log a warning message
pub fn warn(component: Component, node_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, component, node_id, message);
}

/// Log an error message
pub fn error(component: Component, node_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, component, node_id, message);
}

/// Log a debug message
pub fn debug(component: Component, node_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, component, node_id, message);
}

// ---------------------------------------------------------------------------
// Data Quality Logging
// ---------------------------------------------------------------------------

/// Lists each issue class present in a snapshot tally with its count.
pub fn classify_quality(quality: &DataQuality) -> Vec<(QualityIssue, usize)> {
    [
        (QualityIssue::UnrecognizedLabel, quality.unrecognized_labels),
        (QualityIssue::MalformedTimestamp, quality.malformed_timestamps),
        (QualityIssue::InvalidDistance, quality.invalid_distances),
        (QualityIssue::SkippedEntry, quality.skipped_entries),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .collect()
}

/// Log a summary of data-quality findings for one decoded snapshot.
///
/// Clean snapshots log at debug level; any finding logs a warning per issue
/// class so unexpected labels never pass silently.
pub fn log_quality_report(node_id: &str, total: usize, quality: &DataQuality) {
    let issues = classify_quality(quality);
    if issues.is_empty() {
        debug(
            Component::Feed,
            Some(node_id),
            &format!("Snapshot decoded: {} readings, no quality issues", total),
        );
        return;
    }

    for (issue, count) in issues {
        warn(
            Component::Feed,
            Some(node_id),
            &format!("{}/{} readings flagged [{}]", count, total, issue),
        );
    }
}

/// Log unrecognized labels found in a typed snapshot.
pub fn log_unrecognized_labels(node_id: &str, total: usize, count: usize) {
    if count == 0 {
        return;
    }
    warn(
        Component::Feed,
        Some(node_id),
        &format!(
            "{}/{} readings flagged [{}]",
            count,
            total,
            QualityIssue::UnrecognizedLabel
        ),
    );
}
