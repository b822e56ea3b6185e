/// Realtime feed snapshot decoding
///
/// The reading feed delivers, per node, the most recent readings as a single
/// JSON document keyed by push id:
///
/// ```json
/// {
///   "-Nx0a": { "timestamp": "2024-05-01 12:00:00", "label": "Safe", "distance": 0 },
///   "-Nx0b": { "timestamp": "2024-05-01 12:00:01", "label": "Leak", "distance": 14.2 }
/// }
/// ```
///
/// Push ids sort in creation order, so ordering entries by key gives the
/// chronological sequence. Each document fully replaces the previous one for
/// that node; there are no deltas.
///
/// Decoding never fails on a bad entry. Problems are normalized (unknown
/// label kept as `Unrecognized`, bad distance stored as 0) and tallied in a
/// `DataQuality` record for logging.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{FeedError, HistoryWindow, Label, Reading};

// ============================================================================
// Data quality tally
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub unrecognized_labels: usize,
    pub malformed_timestamps: usize,
    pub invalid_distances: usize,
    pub skipped_entries: usize,
}

impl DataQuality {
    pub fn is_clean(&self) -> bool {
        *self == DataQuality::default()
    }
}

/// A decoded snapshot: the node's new window plus what had to be cleaned up.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSnapshot {
    pub window: HistoryWindow,
    pub quality: DataQuality,
}

/// Number of readings in a window whose label was neither Leak nor Safe.
pub fn count_unrecognized(window: &HistoryWindow) -> usize {
    window
        .newest_first()
        .iter()
        .filter(|r| !r.label.is_recognized())
        .count()
}

// ============================================================================
// Entry normalization
// ============================================================================

fn parse_label(value: Option<&Value>, quality: &mut DataQuality) -> Label {
    let label = match value {
        Some(Value::String(raw)) => Label::from(raw.as_str()),
        Some(Value::Null) | None => Label::Unrecognized(String::new()),
        Some(other) => Label::Unrecognized(other.to_string()),
    };
    if !label.is_recognized() {
        quality.unrecognized_labels += 1;
    }
    label
}

fn parse_timestamp(value: Option<&Value>, quality: &mut DataQuality) -> String {
    let timestamp = match value {
        Some(Value::String(raw)) => raw.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    if !timestamp.contains(' ') {
        quality.malformed_timestamps += 1;
    }
    timestamp
}

/// Absent or null distance means "no estimate" and is not a quality issue.
/// Negative, non-finite, or non-numeric values are stored as 0 and flagged.
fn parse_distance(value: Option<&Value>, quality: &mut DataQuality) -> f64 {
    let parsed = match value {
        None | Some(Value::Null) => return 0.0,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(d) if d.is_finite() && d >= 0.0 => d,
        _ => {
            quality.invalid_distances += 1;
            0.0
        }
    }
}

/// Normalizes one feed entry into a `Reading`, tallying any cleanup.
///
/// Returns `None` (counted as skipped) when the entry is not an object.
pub fn decode_entry(id: &str, entry: &Value, quality: &mut DataQuality) -> Option<Reading> {
    let Value::Object(fields) = entry else {
        quality.skipped_entries += 1;
        return None;
    };

    Some(Reading {
        id: id.to_string(),
        timestamp: parse_timestamp(fields.get("timestamp"), quality),
        label: parse_label(fields.get("label"), quality),
        distance: parse_distance(fields.get("distance"), quality),
    })
}

// ============================================================================
// Snapshot decoding
// ============================================================================

/// JSON type name used in shape errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decodes an already-parsed snapshot object.
pub fn decode_snapshot_value(value: &Value, limit: usize) -> Result<DecodedSnapshot, FeedError> {
    let entries: &Map<String, Value> = match value {
        Value::Null => {
            return Ok(DecodedSnapshot {
                window: HistoryWindow::empty(),
                quality: DataQuality::default(),
            });
        }
        Value::Object(map) => map,
        other => return Err(FeedError::UnexpectedShape(value_kind(other).to_string())),
    };

    let mut keyed: Vec<(&String, &Value)> = entries.iter().collect();
    keyed.sort_by(|a, b| a.0.cmp(b.0));
    let start = keyed.len().saturating_sub(limit);

    let mut quality = DataQuality::default();
    let readings: Vec<Reading> = keyed[start..]
        .iter()
        .filter_map(|(id, entry)| decode_entry(id, entry, &mut quality))
        .collect();

    Ok(DecodedSnapshot {
        window: HistoryWindow::from_chronological_with_limit(readings, limit),
        quality,
    })
}

/// Decodes a snapshot document, keeping the newest `limit` entries.
///
/// An empty document, `null`, or `{}` yields an empty (idle) window.
pub fn decode_snapshot(json: &str, limit: usize) -> Result<DecodedSnapshot, FeedError> {
    if json.trim().is_empty() {
        return decode_snapshot_value(&Value::Null, limit);
    }
    let value: Value =
        serde_json::from_str(json).map_err(|e| FeedError::ParseError(e.to_string()))?;
    decode_snapshot_value(&value, limit)
}

// ============================================================================
// Tests
// ============================================================================
