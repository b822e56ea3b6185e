/// Net severity index.
///
/// For each of the `PLOT_WINDOW` most recent readings (chronological), the
/// score is computed over a trailing sub-window of up to `SCORE_SUBWINDOW`
/// readings ending at that reading:
///
///   score = leak_count * LEAK_WEIGHT + safe_count * SAFE_WEIGHT
///
/// so a full sub-window scores between -50 (all safe) and +100 (all leak).
/// The sub-window never reaches back before the start of the plot window,
/// which is why the first few points have narrower bounds.

use std::collections::VecDeque;

use serde::Serialize;

use crate::model::{
    HistoryWindow, LEAK_WEIGHT, PLOT_WINDOW, Reading, SAFE_WEIGHT, SCORE_SUBWINDOW,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityPoint {
    pub time: String,
    pub score: i32,
}

/// Score of a sub-window holding `size` readings, `leaks` of them leaks.
pub fn window_score(leaks: usize, size: usize) -> i32 {
    let safes = size - leaks;
    leaks as i32 * LEAK_WEIGHT + safes as i32 * SAFE_WEIGHT
}

/// Severity series over a chronological slice of readings.
///
/// Maintains running leak counts across the sliding sub-window instead of
/// recounting it for every point; the output is identical to recounting.
pub fn score_series(plot: &[&Reading]) -> Vec<SeverityPoint> {
    let mut sub_window: VecDeque<bool> = VecDeque::with_capacity(SCORE_SUBWINDOW);
    let mut leaks = 0usize;

    plot.iter()
        .map(|reading| {
            if sub_window.len() == SCORE_SUBWINDOW {
                if let Some(true) = sub_window.pop_front() {
                    leaks -= 1;
                }
            }
            let is_leak = reading.label.is_leak();
            if is_leak {
                leaks += 1;
            }
            sub_window.push_back(is_leak);

            SeverityPoint {
                time: reading.time().to_string(),
                score: window_score(leaks, sub_window.len()),
            }
        })
        .collect()
}

/// Severity series for the plot window of a node's history.
pub fn severity_points(window: &HistoryWindow) -> Vec<SeverityPoint> {
    let plot: Vec<&Reading> = window
        .latest(PLOT_WINDOW)
        .iter()
        .rev()
        .collect();
    score_series(&plot)
}

/// Latest score in the series, or 0 when there is nothing to plot.
pub fn net_severity_index(points: &[SeverityPoint]) -> i32 {
    points.last().map(|p| p.score).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;

    fn chronological(labels: &[Label]) -> HistoryWindow {
        let readings = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                Reading::new(
                    &format!("r{}", i),
                    &format!("2024-05-01 13:{:02}:{:02}", i / 60, i % 60),
                    label.clone(),
                    0.0,
                )
            })
            .collect();
        HistoryWindow::from_chronological(readings)
    }

    /// Direct recount of every sub-window, used to check the running counts.
    fn naive_scores(window: &HistoryWindow) -> Vec<i32> {
        let plot: Vec<&Reading> = window.latest(PLOT_WINDOW).iter().rev().collect();
        (0..plot.len())
            .map(|i| {
                let start = i.saturating_sub(SCORE_SUBWINDOW - 1);
                let sub = &plot[start..=i];
                let leaks = sub.iter().filter(|r| r.label.is_leak()).count();
                leaks as i32 * 10 + (sub.len() - leaks) as i32 * -5
            })
            .collect()
    }

    #[test]
    fn test_single_reading_bounds() {
        assert_eq!(severity_points(&chronological(&[Label::Leak]))[0].score, 10);
        assert_eq!(severity_points(&chronological(&[Label::Safe]))[0].score, -5);
    }

    #[test]
    fn test_full_window_bounds() {
        let all_leak = severity_points(&chronological(&vec![Label::Leak; 12]));
        assert_eq!(net_severity_index(&all_leak), 100);
        let all_safe = severity_points(&chronological(&vec![Label::Safe; 12]));
        assert_eq!(net_severity_index(&all_safe), -50);
    }

    #[test]
    fn test_plot_window_keeps_latest_thirty_in_order() {
        let window = chronological(&vec![Label::Safe; 45]);
        let points = severity_points(&window);
        assert_eq!(points.len(), PLOT_WINDOW);
        // Readings 15..45 are plotted; the first plotted is r15 at 13:00:15.
        assert_eq!(points[0].time, "13:00:15");
        assert_eq!(points[PLOT_WINDOW - 1].time, "13:00:44");
        // Sub-windows restart at the plot window edge.
        assert_eq!(points[0].score, -5);
    }

    #[test]
    fn test_running_counts_match_recount() {
        use Label::*;
        let labels: Vec<Label> = (0..37)
            .map(|i| match i % 7 {
                0 | 1 | 4 => Leak,
                5 => Unrecognized("Noise".into()),
                _ => Safe,
            })
            .collect();
        let window = chronological(&labels);
        let scores: Vec<i32> = severity_points(&window).iter().map(|p| p.score).collect();
        assert_eq!(scores, naive_scores(&window));
    }

    #[test]
    fn test_scores_stay_within_subwindow_bounds() {
        use Label::*;
        let labels: Vec<Label> = (0..30).map(|i| if i % 3 == 0 { Safe } else { Leak }).collect();
        for (i, point) in severity_points(&chronological(&labels)).iter().enumerate() {
            let w = (i + 1).min(SCORE_SUBWINDOW) as i32;
            assert!(
                (-5 * w..=10 * w).contains(&point.score),
                "point {} score {} outside [{}, {}]",
                i,
                point.score,
                -5 * w,
                10 * w
            );
        }
    }

    #[test]
    fn test_empty_window_has_no_points_and_zero_index() {
        let points = severity_points(&HistoryWindow::empty());
        assert!(points.is_empty());
        assert_eq!(net_severity_index(&points), 0);
    }

    #[test]
    fn test_malformed_timestamp_yields_empty_time() {
        let window = HistoryWindow::from_chronological(vec![Reading::new(
            "x",
            "2024-05-01T13:00:00",
            Label::Leak,
            0.0,
        )]);
        assert_eq!(severity_points(&window)[0].time, "");
    }
}
