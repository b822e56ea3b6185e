/// Live per-node snapshot holder.
///
/// The feed pushes a whole snapshot for a node whenever that node changes.
/// `Monitor` keeps only the latest window per node: applying a snapshot
/// replaces the previous one outright and returns the freshly derived view.
/// Results from an older snapshot are simply superseded.

use std::collections::HashMap;

use crate::alert::thresholds::NodeStatus;
use crate::config::MonitorConfig;
use crate::ingest::feed::{DataQuality, count_unrecognized, decode_snapshot};
use crate::logging::{self, Component};
use crate::model::{FeedError, HistoryWindow};
use crate::nodes::NodeRegistry;
use crate::view::{AuditView, NodeView, build_audit_view, build_node_view};

pub struct Monitor {
    registry: NodeRegistry,
    history_limit: usize,
    windows: HashMap<String, HistoryWindow>,
    last_status: HashMap<String, NodeStatus>,
    above_warning: HashMap<String, bool>,
    /// Ids seen in snapshots but absent from the registry, in arrival order.
    unregistered: Vec<String>,
}

impl Monitor {
    pub fn new(config: &MonitorConfig) -> Self {
        Monitor {
            registry: config.registry.clone(),
            history_limit: config.history_limit,
            windows: HashMap::new(),
            last_status: HashMap::new(),
            above_warning: HashMap::new(),
            unregistered: Vec::new(),
        }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Replaces a node's window and returns its new view.
    ///
    /// The window is cut to the configured history limit and any
    /// unrecognized labels are logged.
    pub fn apply_snapshot(&mut self, node_id: &str, window: HistoryWindow) -> NodeView {
        let window = window.truncated(self.history_limit);
        logging::log_unrecognized_labels(node_id, window.len(), count_unrecognized(&window));
        self.install(node_id, window)
    }

    /// Decodes a feed document and applies it.
    ///
    /// A document that cannot be decoded leaves the node's previous window
    /// in place.
    pub fn apply_json_snapshot(
        &mut self,
        node_id: &str,
        json: &str,
    ) -> Result<(NodeView, DataQuality), FeedError> {
        let decoded = decode_snapshot(json, self.history_limit).inspect_err(|e| {
            logging::error(
                Component::Feed,
                Some(node_id),
                &format!("Snapshot rejected: {}", e),
            );
        })?;

        logging::log_quality_report(node_id, decoded.window.len(), &decoded.quality);
        let view = self.install(node_id, decoded.window);
        Ok((view, decoded.quality))
    }

    fn install(&mut self, node_id: &str, window: HistoryWindow) -> NodeView {
        if !self.registry.contains(node_id) && !self.unregistered.iter().any(|id| id == node_id) {
            logging::warn(
                Component::Monitor,
                Some(node_id),
                "Snapshot received for a node that is not in the registry",
            );
            self.unregistered.push(node_id.to_string());
        }

        let view = build_node_view(node_id, self.registry.label_for(node_id), &window);
        self.windows.insert(node_id.to_string(), window);
        self.record_status(node_id, view.status);
        self.record_warning(node_id, &view);
        view
    }

    fn record_warning(&mut self, node_id: &str, view: &NodeView) {
        let above = view.above_warning();
        let was_above = self.above_warning.insert(node_id.to_string(), above).unwrap_or(false);
        if above && !was_above {
            logging::warn(
                Component::Scorer,
                Some(node_id),
                &format!(
                    "Net severity index {} reached warning line {}",
                    view.net_severity_index, view.score_warning_threshold
                ),
            );
        } else if !above && was_above {
            logging::info(
                Component::Scorer,
                Some(node_id),
                &format!("Net severity index back to {}", view.net_severity_index),
            );
        }
    }

    fn record_status(&mut self, node_id: &str, status: NodeStatus) {
        let previous = self.last_status.insert(node_id.to_string(), status);
        if previous == Some(status) {
            return;
        }

        let from = previous.map(|s| s.as_str()).unwrap_or("NO DATA");
        let message = format!("Status {} -> {}", from, status);
        match status {
            NodeStatus::CriticalFailure => logging::warn(Component::Classifier, Some(node_id), &message),
            _ => logging::info(Component::Classifier, Some(node_id), &message),
        }
    }

    /// Current window for a node; empty if nothing has arrived yet.
    pub fn window(&self, node_id: &str) -> HistoryWindow {
        self.windows.get(node_id).cloned().unwrap_or_default()
    }

    /// Current view for a node. A node with no data yet is idle.
    pub fn node_view(&self, node_id: &str) -> NodeView {
        let empty = HistoryWindow::empty();
        let window = self.windows.get(node_id).unwrap_or(&empty);
        build_node_view(node_id, self.registry.label_for(node_id), window)
    }

    /// Views for every registered node, in registry order.
    pub fn dashboard(&self) -> Vec<NodeView> {
        self.registry
            .nodes()
            .iter()
            .map(|node| self.node_view(&node.id))
            .collect()
    }

    /// Audit log across registered nodes (registry order), then any
    /// unregistered nodes in the order they first reported.
    pub fn audit_view(&self) -> AuditView {
        let ordered = self
            .registry
            .nodes()
            .iter()
            .map(|n| n.id.as_str())
            .chain(self.unregistered.iter().map(String::as_str))
            .filter_map(|id| self.windows.get(id));
        let audit = build_audit_view(ordered);

        let events: usize = audit.daily_reports.iter().map(|r| r.leak_events.len()).sum();
        logging::debug(
            Component::Aggregator,
            None,
            &format!("Audit built: {} days, {} leak events", audit.daily_reports.len(), events),
        );
        audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Label, Reading};

    fn leaks(n: usize, date: &str) -> HistoryWindow {
        HistoryWindow::from_chronological(
            (0..n)
                .map(|i| Reading::new(&format!("{}", i), &format!("{} 08:00:{:02}", date, i), Label::Leak, 11.0))
                .collect(),
        )
    }

    #[test]
    fn test_unseen_node_is_idle() {
        let monitor = Monitor::new(&MonitorConfig::default());
        let view = monitor.node_view("pipe_1");
        assert_eq!(view.status, NodeStatus::Idle);
        assert_eq!(view.label, "Sensor #1");
    }

    #[test]
    fn test_snapshot_replaces_previous_window() {
        let mut monitor = Monitor::new(&MonitorConfig::default());
        let first = monitor.apply_snapshot("pipe_1", leaks(6, "2024-05-01"));
        assert_eq!(first.status, NodeStatus::CriticalFailure);

        let second = monitor.apply_snapshot("pipe_1", leaks(1, "2024-05-01"));
        assert_eq!(second.status, NodeStatus::Analyzing);
        assert_eq!(monitor.window("pipe_1").len(), 1, "no readings carried over from the old snapshot");
    }

    #[test]
    fn test_json_snapshot_respects_configured_limit() {
        let config = MonitorConfig {
            history_limit: 2,
            ..MonitorConfig::default()
        };
        let mut monitor = Monitor::new(&config);
        let json = r#"{
            "a": {"timestamp": "2024-05-01 08:00:00", "label": "Leak", "distance": 5},
            "b": {"timestamp": "2024-05-01 08:00:01", "label": "Safe", "distance": 0},
            "c": {"timestamp": "2024-05-01 08:00:02", "label": "Noise", "distance": 0}
        }"#;
        let (view, quality) = monitor.apply_json_snapshot("pipe_3", json).expect("snapshot should decode");
        assert_eq!(view.history.len(), 2);
        assert_eq!(view.status, NodeStatus::Nominal);
        assert_eq!(quality.unrecognized_labels, 1);
    }

    #[test]
    fn test_typed_snapshot_respects_configured_limit() {
        let config = MonitorConfig {
            history_limit: 2,
            ..MonitorConfig::default()
        };
        let mut monitor = Monitor::new(&config);
        let view = monitor.apply_snapshot("pipe_1", leaks(50, "2024-05-01"));
        assert_eq!(view.history.len(), 2);
        assert_eq!(monitor.window("pipe_1").len(), 2);
        assert_eq!(view.streak, 2);
        assert_eq!(view.recent_events[0].id, "49", "the newest readings are the ones kept");
    }

    #[test]
    fn test_typed_snapshot_surfaces_unrecognized_labels() {
        let mut monitor = Monitor::new(&MonitorConfig::default());
        let noisy = HistoryWindow::from_chronological(
            (0..5)
                .map(|i| {
                    Reading::new(
                        &format!("{}", i),
                        &format!("2024-05-01 08:00:{:02}", i),
                        Label::Unrecognized("Noise".into()),
                        0.0,
                    )
                })
                .collect(),
        );
        let view = monitor.apply_snapshot("pipe_1", noisy);
        assert_eq!(view.status, NodeStatus::Nominal);
        assert_eq!(view.unrecognized_labels, 5);
        assert_eq!(monitor.node_view("pipe_1").unrecognized_labels, 5);
    }

    #[test]
    fn test_warning_line_tracked_per_node() {
        let mut monitor = Monitor::new(&MonitorConfig::default());
        let view = monitor.apply_snapshot("pipe_1", leaks(8, "2024-05-01"));
        assert!(view.above_warning());
        assert_eq!(monitor.above_warning.get("pipe_1"), Some(&true));

        let view = monitor.apply_snapshot("pipe_1", leaks(1, "2024-05-01"));
        assert!(!view.above_warning());
        assert_eq!(monitor.above_warning.get("pipe_1"), Some(&false));
    }

    #[test]
    fn test_rejected_json_keeps_previous_window() {
        let mut monitor = Monitor::new(&MonitorConfig::default());
        monitor.apply_snapshot("pipe_1", leaks(3, "2024-05-01"));
        assert!(monitor.apply_json_snapshot("pipe_1", "[]").is_err());
        assert_eq!(monitor.window("pipe_1").len(), 3);
    }

    #[test]
    fn test_unknown_node_is_accepted_and_audited() {
        let mut monitor = Monitor::new(&MonitorConfig::default());
        let view = monitor.apply_snapshot("pipe_9", leaks(1, "2024-05-03"));
        assert_eq!(view.label, "Unknown Node");
        monitor.apply_snapshot("pipe_1", leaks(1, "2024-05-02"));

        let audit = monitor.audit_view();
        let dates: Vec<&str> = audit.daily_reports.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-05-03", "2024-05-02"]);
    }

    #[test]
    fn test_dashboard_lists_registry_nodes() {
        let mut monitor = Monitor::new(&MonitorConfig::default());
        monitor.apply_snapshot("pipe_2", leaks(2, "2024-05-01"));
        let statuses: Vec<NodeStatus> = monitor.dashboard().iter().map(|v| v.status).collect();
        assert_eq!(
            statuses,
            vec![NodeStatus::Idle, NodeStatus::AnomalyDetected, NodeStatus::Idle]
        );
    }
}
