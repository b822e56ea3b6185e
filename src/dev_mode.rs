/// Development mode utilities for working with recorded readings
///
/// When no live feed is available, use this module to replay a recorded
/// reading log as the sequence of snapshots the feed would have pushed.

use chrono::{Duration, NaiveDateTime};
use serde_json::Value;

use crate::ingest::feed::{DataQuality, decode_entry, value_kind};
use crate::model::{FeedError, HistoryWindow, Reading};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Replays a chronological reading log one arrival at a time.
pub struct Replay {
    /// Recorded readings, oldest first
    log: Vec<Reading>,
    /// Readings per snapshot, as the feed's query limit
    pub limit: usize,
    /// Cleanup applied while reading a recorded log
    pub quality: DataQuality,
}

impl Replay {
    /// Create a replay over a recorded log
    ///
    /// # Arguments
    /// * `log` - Readings in arrival order
    /// * `limit` - Snapshot size, normally `model::HISTORY_LIMIT`
    pub fn new(log: Vec<Reading>, limit: usize) -> Self {
        Self {
            log,
            limit,
            quality: DataQuality::default(),
        }
    }

    /// Parse a recorded log from a JSON array of raw feed entries
    ///
    /// Entries are normalized the same way live snapshots are. An entry's
    /// `id` field names it; entries without one are named by position.
    pub fn from_json(json: &str, limit: usize) -> Result<Self, FeedError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| FeedError::ParseError(e.to_string()))?;
        let Value::Array(entries) = value else {
            return Err(FeedError::UnexpectedShape(value_kind(&value).to_string()));
        };

        let mut quality = DataQuality::default();
        let log = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let id = match entry.get("id") {
                    Some(Value::String(id)) => id.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => index.to_string(),
                };
                decode_entry(&id, entry, &mut quality)
            })
            .collect();

        Ok(Self {
            log,
            limit,
            quality,
        })
    }

    /// Shift every timestamp by `days` so an old recording reads as recent.
    ///
    /// Timestamps that do not parse, or would land outside the supported
    /// calendar range, are left untouched.
    pub fn with_day_offset(mut self, days: i64) -> Self {
        let Some(offset) = Duration::try_days(days) else {
            return self;
        };
        for reading in &mut self.log {
            let shifted = NaiveDateTime::parse_from_str(&reading.timestamp, TIMESTAMP_FORMAT)
                .ok()
                .and_then(|at| at.checked_add_signed(offset));
            if let Some(at) = shifted {
                reading.timestamp = at.format(TIMESTAMP_FORMAT).to_string();
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Snapshot as delivered right after the `arrivals`-th reading.
    pub fn snapshot_after(&self, arrivals: usize) -> HistoryWindow {
        let end = arrivals.min(self.log.len());
        HistoryWindow::from_chronological_with_limit(self.log[..end].to_vec(), self.limit)
    }

    /// Every snapshot in order, one per arrival.
    pub fn snapshots(&self) -> impl Iterator<Item = HistoryWindow> + '_ {
        (1..=self.log.len()).map(move |n| self.snapshot_after(n))
    }
}
