//! Per-node and audit read models.
//!
//! `NodeView` is the single per-node contract handed to the presentation
//! layer. It composes the streak classification, severity series and leak
//! origin estimate for one history window. `AuditView` runs the daily
//! aggregation over every node's history at once.

use serde::Serialize;

use crate::alert::thresholds::{NodeStatus, SeverityClass};
use crate::analysis::daily::{DailyReport, aggregate_daily};
use crate::analysis::origin::{DistancePoint, distance_trace, estimate_leak_origin};
use crate::analysis::severity::{SeverityPoint, net_severity_index, severity_points};
use crate::analysis::streak::classify;
use crate::ingest::feed::count_unrecognized;
use crate::model::{
    HistoryWindow, RECENT_EVENT_LIMIT, Reading, SCORE_BASELINE, SCORE_WARNING_THRESHOLD,
};

/// Percentage points the confidence meter fills per streak step.
const CONFIDENCE_PCT_PER_STREAK: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub node_id: String,
    pub label: String,
    pub status: NodeStatus,
    pub severity_class: SeverityClass,
    pub streak: usize,
    pub severity_points: Vec<SeverityPoint>,
    /// Score of the latest severity point.
    pub net_severity_index: i32,
    /// Chart reference lines for the severity series.
    pub score_baseline: i32,
    pub score_warning_threshold: i32,
    pub leak_origin_estimate: f64,
    pub leak_origin_sample_count: usize,
    /// The origin card is only shown while the node is not nominal.
    pub leak_origin_visible: bool,
    /// Confidence meter fill, 0..=100.
    pub confidence_pct: usize,
    pub distance_trace: Vec<DistancePoint>,
    /// Newest readings for the event log table.
    pub recent_events: Vec<Reading>,
    /// Readings whose label was neither Leak nor Safe.
    pub unrecognized_labels: usize,
    pub history: HistoryWindow,
}

impl NodeView {
    /// Whether the latest score has reached the warning line.
    pub fn above_warning(&self) -> bool {
        self.net_severity_index >= self.score_warning_threshold
    }
}

pub fn confidence_pct(streak: usize) -> usize {
    (streak * CONFIDENCE_PCT_PER_STREAK).min(100)
}

/// Composes every per-node derivation for one snapshot.
pub fn build_node_view(node_id: &str, label: &str, window: &HistoryWindow) -> NodeView {
    let classification = classify(window);
    let points = severity_points(window);
    let origin = estimate_leak_origin(window);

    NodeView {
        node_id: node_id.to_string(),
        label: label.to_string(),
        status: classification.status,
        severity_class: classification.severity_class,
        streak: classification.streak,
        net_severity_index: net_severity_index(&points),
        severity_points: points,
        score_baseline: SCORE_BASELINE,
        score_warning_threshold: SCORE_WARNING_THRESHOLD,
        leak_origin_estimate: origin.estimate_cm,
        leak_origin_sample_count: origin.sample_count,
        leak_origin_visible: classification.severity_class != SeverityClass::Emerald,
        confidence_pct: confidence_pct(classification.streak),
        distance_trace: distance_trace(window),
        recent_events: window.latest(RECENT_EVENT_LIMIT).to_vec(),
        unrecognized_labels: count_unrecognized(window),
        history: window.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditView {
    pub daily_reports: Vec<DailyReport>,
}

/// Audit log over the union of several nodes' histories.
///
/// Windows are walked in the order given, each newest first; that walk
/// order is the order leak events appear within a day.
pub fn build_audit_view<'a>(windows: impl IntoIterator<Item = &'a HistoryWindow>) -> AuditView {
    let readings = windows
        .into_iter()
        .flat_map(|window| window.newest_first().iter());
    AuditView {
        daily_reports: aggregate_daily(readings),
    }
}
