/// Confidence streak classification.
///
/// A node's streak is the longest run of consecutive `Leak` readings among
/// its `STREAK_WINDOW` most recent readings. The streak alone decides the
/// node's status; see `alert::thresholds` for the mapping.

use serde::Serialize;

use crate::alert::thresholds::{NodeStatus, SeverityClass, status_for_streak};
use crate::model::{HistoryWindow, Reading, STREAK_WINDOW};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub status: NodeStatus,
    pub severity_class: SeverityClass,
    pub streak: usize,
}

impl ClassificationResult {
    /// State before any reading has arrived.
    pub fn idle() -> Self {
        ClassificationResult {
            status: NodeStatus::Idle,
            severity_class: NodeStatus::Idle.severity_class(),
            streak: 0,
        }
    }
}

/// Longest consecutive-leak run over readings given oldest first.
pub fn max_leak_run<'a>(readings: impl IntoIterator<Item = &'a Reading>) -> usize {
    let mut current = 0;
    let mut longest = 0;
    for reading in readings {
        if reading.label.is_leak() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Streak over the most recent `STREAK_WINDOW` readings.
pub fn streak(window: &HistoryWindow) -> usize {
    max_leak_run(window.latest(STREAK_WINDOW).iter().rev())
}

/// Derives status, severity class and streak for a window.
///
/// An empty window is idle, not nominal.
pub fn classify(window: &HistoryWindow) -> ClassificationResult {
    if window.is_empty() {
        return ClassificationResult::idle();
    }

    let streak = streak(window);
    let status = status_for_streak(streak);
    ClassificationResult {
        status,
        severity_class: status.severity_class(),
        streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;

    /// Builds a window from labels given newest first, one second apart.
    fn window_newest_first(labels: &[Label]) -> HistoryWindow {
        let n = labels.len();
        let readings = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let secs = n - i;
                Reading::new(
                    &format!("r{}", secs),
                    &format!("2024-05-01 12:{:02}:{:02}", secs / 60, secs % 60),
                    label.clone(),
                    0.0,
                )
            })
            .collect();
        HistoryWindow::from_newest_first(readings)
    }

    #[test]
    fn test_empty_window_is_idle() {
        let result = classify(&HistoryWindow::empty());
        assert_eq!(result.status, NodeStatus::Idle);
        assert_eq!(result.severity_class, SeverityClass::Gray);
        assert_eq!(result.streak, 0);
    }

    #[test]
    fn test_all_safe_is_nominal() {
        let result = classify(&window_newest_first(&[Label::Safe, Label::Safe, Label::Safe]));
        assert_eq!(result.status, NodeStatus::Nominal);
        assert_eq!(result.severity_class, SeverityClass::Emerald);
        assert_eq!(result.streak, 0);
    }

    #[test]
    fn test_run_resets_on_safe() {
        use Label::*;
        // newest first: L L S L L L S
        let window = window_newest_first(&[Leak, Leak, Safe, Leak, Leak, Leak, Safe]);
        assert_eq!(streak(&window), 3);
        assert_eq!(classify(&window).status, NodeStatus::AnomalyDetected);
    }

    #[test]
    fn test_only_last_ten_readings_count() {
        use Label::*;
        // Ten safe readings in front of a long leak run: the run is outside the window.
        let mut labels = vec![Safe; 10];
        labels.extend(vec![Leak; 20]);
        let result = classify(&window_newest_first(&labels));
        assert_eq!(result.streak, 0);
        assert_eq!(result.status, NodeStatus::Nominal);
    }

    #[test]
    fn test_unrecognized_label_breaks_a_run() {
        use Label::*;
        let window = window_newest_first(&[Leak, Leak, Unrecognized("LEAK".into()), Leak, Leak]);
        assert_eq!(streak(&window), 2, "an unrecognized label must not extend a leak run");
    }

    #[test]
    fn test_streak_never_exceeds_window() {
        let window = window_newest_first(&vec![Label::Leak; 40]);
        assert_eq!(streak(&window), STREAK_WINDOW);
    }

    #[test]
    fn test_max_leak_run_is_direction_independent() {
        use Label::*;
        let window = window_newest_first(&[Safe, Leak, Leak, Safe, Leak, Safe, Leak, Leak, Leak]);
        let forward = max_leak_run(window.newest_first().iter());
        let backward = max_leak_run(window.chronological());
        assert_eq!(forward, backward);
        assert_eq!(forward, 3);
    }
}
