//! Unicode-aware text analysis for the vectext layout pipeline.
//!
//! Three leaf components live here, consumed by the run segmenter:
//!
//! - [`segment::graphemes`] splits text into user-perceived clusters
//! - [`classify::ClusterClassifier`] tags a cluster as emoji, script-bearing,
//!   neutral, or unclassified
//! - [`bidi::resolve_runs`] partitions text into direction runs

pub mod bidi;
pub mod classify;
pub mod segment;

pub use bidi::resolve_runs;
pub use classify::{ClusterClass, ClusterClassifier};
pub use segment::graphemes;

#[cfg(test)]
mod proptests;
