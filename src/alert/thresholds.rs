//! Node status thresholds.
//!
//! Maps a confidence streak onto the discrete operating status shown for each
//! node, and labels individual leak events for the audit log. Both mappings
//! are total: every input has exactly one output.

use serde::Serialize;

use crate::model::{Reading, SUSPECTED_LEAK_DISTANCE_CM};

/// Streak at or above which a node is in critical failure.
pub const CRITICAL_STREAK: usize = 5;

/// Streak at or above which a node reports an anomaly.
pub const ANOMALY_STREAK: usize = 2;

/// Discrete operating status of a node, in ascending order of severity.
///
/// `Idle` is the state before any data has arrived and is distinct from
/// `Nominal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NodeStatus {
    #[serde(rename = "SYSTEM IDLE")]
    Idle,
    #[serde(rename = "SYSTEM NOMINAL")]
    Nominal,
    #[serde(rename = "ANALYZING")]
    Analyzing,
    #[serde(rename = "ANOMALY DETECTED")]
    AnomalyDetected,
    #[serde(rename = "CRITICAL FAILURE")]
    CriticalFailure,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Idle => "SYSTEM IDLE",
            NodeStatus::Nominal => "SYSTEM NOMINAL",
            NodeStatus::Analyzing => "ANALYZING",
            NodeStatus::AnomalyDetected => "ANOMALY DETECTED",
            NodeStatus::CriticalFailure => "CRITICAL FAILURE",
        }
    }

    /// Colour class the presentation layer themes this status with.
    pub fn severity_class(&self) -> SeverityClass {
        match self {
            NodeStatus::Idle => SeverityClass::Gray,
            NodeStatus::Nominal => SeverityClass::Emerald,
            NodeStatus::Analyzing => SeverityClass::Blue,
            NodeStatus::AnomalyDetected => SeverityClass::Amber,
            NodeStatus::CriticalFailure => SeverityClass::Rose,
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityClass {
    /// Critical
    Rose,
    /// Warning
    Amber,
    /// Informational
    Blue,
    /// Nominal
    Emerald,
    /// Idle, no data yet
    Gray,
}

/// Maps a streak from a non-empty window to a status. First match wins.
pub fn status_for_streak(streak: usize) -> NodeStatus {
    if streak >= CRITICAL_STREAK {
        NodeStatus::CriticalFailure
    } else if streak >= ANOMALY_STREAK {
        NodeStatus::AnomalyDetected
    } else if streak >= 1 {
        NodeStatus::Analyzing
    } else {
        NodeStatus::Nominal
    }
}

// ---------------------------------------------------------------------------
// Per-event severity (audit log display only)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventSeverity {
    #[serde(rename = "Suspected Leak")]
    SuspectedLeak,
    #[serde(rename = "Irregularity")]
    Irregularity,
}

/// Labels a leak event by how far from the sensor it was detected.
pub fn event_severity(reading: &Reading) -> EventSeverity {
    if reading.distance > SUSPECTED_LEAK_DISTANCE_CM {
        EventSeverity::SuspectedLeak
    } else {
        EventSeverity::Irregularity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;

    #[test]
    fn test_streak_boundaries_map_exactly() {
        assert_eq!(status_for_streak(0), NodeStatus::Nominal);
        assert_eq!(status_for_streak(1), NodeStatus::Analyzing);
        assert_eq!(status_for_streak(2), NodeStatus::AnomalyDetected);
        assert_eq!(status_for_streak(4), NodeStatus::AnomalyDetected);
        assert_eq!(status_for_streak(5), NodeStatus::CriticalFailure);
        assert_eq!(status_for_streak(10), NodeStatus::CriticalFailure);
    }

    #[test]
    fn test_each_status_has_its_own_class() {
        assert_eq!(NodeStatus::Idle.severity_class(), SeverityClass::Gray);
        assert_eq!(NodeStatus::Nominal.severity_class(), SeverityClass::Emerald);
        assert_eq!(NodeStatus::Analyzing.severity_class(), SeverityClass::Blue);
        assert_eq!(NodeStatus::AnomalyDetected.severity_class(), SeverityClass::Amber);
        assert_eq!(NodeStatus::CriticalFailure.severity_class(), SeverityClass::Rose);
    }

    #[test]
    fn test_status_serializes_as_display_string() {
        assert_eq!(
            serde_json::to_string(&NodeStatus::CriticalFailure).unwrap(),
            "\"CRITICAL FAILURE\""
        );
        assert_eq!(serde_json::to_string(&SeverityClass::Amber).unwrap(), "\"amber\"");
    }

    #[test]
    fn test_event_severity_threshold_is_strict() {
        let at = Reading::new("a", "2024-05-01 10:00:00", Label::Leak, 10.0);
        let above = Reading::new("b", "2024-05-01 10:00:01", Label::Leak, 10.1);
        assert_eq!(event_severity(&at), EventSeverity::Irregularity);
        assert_eq!(event_severity(&above), EventSeverity::SuspectedLeak);
    }
}
