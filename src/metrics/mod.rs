//! Run-level metrics: check tallies, request latency and failure rate.

pub mod collector;
pub mod reporter;
pub mod types;

pub use collector::MetricsCollector;
pub use types::{CheckTally, EndpointTally, LatencyStats, RunSummary};
