/// Status classification for monitored nodes.
///
/// Submodules:
/// - `thresholds`: streak-to-status mapping and per-event severity labels.

pub mod thresholds;
