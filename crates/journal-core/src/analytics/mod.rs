//! Metrics Calculator: trade history -> [`AnalyticsSnapshot`].

pub mod metrics;
pub mod snapshot;
mod stats;

pub use metrics::compute;
pub use snapshot::*;
