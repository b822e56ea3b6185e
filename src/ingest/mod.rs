/// Inbound boundary with the reading feed.
///
/// Submodules:
/// - `feed`: decodes per-node snapshot documents into history windows.

pub mod feed;
