/// Windowed analysis passes over a node's reading history.
///
/// Every function here is a pure function of a `HistoryWindow` snapshot:
/// no state survives between calls, so recomputing on each feed update is
/// always safe.
///
/// Submodules:
/// - `streak`: longest consecutive-leak run in the recent window.
/// - `severity`: rolling net severity score series for charting.
/// - `origin`: mean distance of confirmed leak readings.
/// - `daily`: date-grouped audit log of leak events.

pub mod daily;
pub mod origin;
pub mod severity;
pub mod streak;
