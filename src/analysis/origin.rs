/// Leak origin estimation.
///
/// The estimate is the mean distance over every confirmed leak reading that
/// carries a positive distance, recomputed over the whole window on each
/// snapshot.

use serde::Serialize;

use crate::model::HistoryWindow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeakOrigin {
    /// Mean distance in cm, rounded to one decimal. 0 when no samples.
    pub estimate_cm: f64,
    pub sample_count: usize,
}

/// One point of the raw distance chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistancePoint {
    pub time: String,
    pub distance: f64,
    pub is_leak: bool,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn estimate_leak_origin(window: &HistoryWindow) -> LeakOrigin {
    let distances: Vec<f64> = window
        .newest_first()
        .iter()
        .filter(|r| r.label.is_leak())
        .filter_map(|r| r.usable_distance())
        .collect();

    if distances.is_empty() {
        return LeakOrigin {
            estimate_cm: 0.0,
            sample_count: 0,
        };
    }

    let total: f64 = distances.iter().sum();
    LeakOrigin {
        estimate_cm: round_one_decimal(total / distances.len() as f64),
        sample_count: distances.len(),
    }
}

/// Distance per reading, oldest first, with unusable distances plotted as 0.
pub fn distance_trace(window: &HistoryWindow) -> Vec<DistancePoint> {
    window
        .chronological()
        .map(|r| DistancePoint {
            time: r.time().to_string(),
            distance: r.usable_distance().unwrap_or(0.0),
            is_leak: r.label.is_leak(),
        })
        .collect()
}
