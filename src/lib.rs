//! Pipe leak monitoring service.
//!
//! Turns per-node snapshots of labelled acoustic readings into node status,
//! a confidence streak, a net severity series, a leak origin estimate, and a
//! day-grouped audit log. Transport and presentation live outside this crate;
//! callers hand in snapshots and read back `view::NodeView` / `view::AuditView`.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod dev_mode;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod nodes;
pub mod view;
