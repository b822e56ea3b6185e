/// Daily audit aggregation.
///
/// Groups readings by the date portion of their timestamp and keeps only the
/// leak events for each date. Every date that had any reading gets a report,
/// so an incident-free day shows up with an empty event list.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::alert::thresholds::{EventSeverity, event_severity};
use crate::model::Reading;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub date: String,
    /// Leak readings in the order they were encountered.
    pub leak_events: Vec<Reading>,
}

impl DailyReport {
    /// Leak events paired with their display severity.
    pub fn events_with_severity(&self) -> impl Iterator<Item = (&Reading, EventSeverity)> {
        self.leak_events.iter().map(|r| (r, event_severity(r)))
    }

    pub fn is_incident_free(&self) -> bool {
        self.leak_events.is_empty()
    }
}

/// Bucket key for one calendar day.
///
/// Dates that parse are keyed by value, so `2024-5-1` and `2024-05-01` share
/// a bucket. Anything else is keyed by its raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DateKey {
    Parsed(NaiveDate),
    Raw(String),
}

impl DateKey {
    fn of(date: &str) -> Self {
        match NaiveDate::parse_from_str(date, DATE_FORMAT) {
            Ok(day) => DateKey::Parsed(day),
            Err(_) => DateKey::Raw(date.to_string()),
        }
    }

    /// Display form: canonical `YYYY-MM-DD` for parsed dates.
    fn label(&self) -> String {
        match self {
            DateKey::Parsed(day) => day.format(DATE_FORMAT).to_string(),
            DateKey::Raw(raw) => raw.clone(),
        }
    }

    /// Descending calendar order. Unparsed dates sort after every parsed
    /// date, descending by string among themselves.
    fn cmp_desc(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DateKey::Parsed(a), DateKey::Parsed(b)) => b.cmp(a),
            (DateKey::Parsed(_), DateKey::Raw(_)) => Ordering::Less,
            (DateKey::Raw(_), DateKey::Parsed(_)) => Ordering::Greater,
            (DateKey::Raw(a), DateKey::Raw(b)) => b.cmp(a),
        }
    }
}

/// Builds the audit log from readings in traversal order.
pub fn aggregate_daily<'a>(readings: impl IntoIterator<Item = &'a Reading>) -> Vec<DailyReport> {
    let mut index: HashMap<DateKey, usize> = HashMap::new();
    let mut buckets: Vec<(DateKey, Vec<Reading>)> = Vec::new();

    for reading in readings {
        let key = DateKey::of(reading.date());
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, Vec::new()));
                buckets.len() - 1
            }
        };

        if reading.label.is_leak() {
            buckets[slot].1.push(reading.clone());
        }
    }

    buckets.sort_by(|a, b| a.0.cmp_desc(&b.0));
    buckets
        .into_iter()
        .map(|(key, leak_events)| DailyReport {
            date: key.label(),
            leak_events,
        })
        .collect()
}

/// Report for the selected date, if that date has any readings.
///
/// The selection may be written without zero padding.
pub fn find_report<'a>(reports: &'a [DailyReport], date: &str) -> Option<&'a DailyReport> {
    let wanted = DateKey::of(date).label();
    reports.iter().find(|r| r.date == wanted)
}

/// Leak events for the selected date; empty for an unknown date.
pub fn events_for_date<'a>(reports: &'a [DailyReport], date: &str) -> &'a [Reading] {
    find_report(reports, date)
        .map(|r| r.leak_events.as_slice())
        .unwrap_or(&[])
}
