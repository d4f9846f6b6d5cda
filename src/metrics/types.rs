//! Metric snapshot types

use std::time::Duration;

/// Latency distribution in milliseconds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatencyStats {
    pub min: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
    pub mean: f64,
    pub count: u64,
}

/// Pass/fail counts of one check label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckTally {
    pub label: String,
    pub passes: u64,
    pub fails: u64,
}

impl CheckTally {
    pub fn total(&self) -> u64 {
        self.passes + self.fails
    }
}

/// Request counts of one named endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointTally {
    pub name: String,
    pub requests: u64,
    pub failed: u64,
}

/// Point-in-time copy of everything the collector knows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub elapsed: Duration,
    pub requests: u64,
    pub failed_requests: u64,
    pub latency: LatencyStats,
    /// Sorted by label
    pub checks: Vec<CheckTally>,
    /// Sorted by name
    pub endpoints: Vec<EndpointTally>,
}

impl RunSummary {
    pub fn failed_rate(&self) -> f64 {
        ratio(self.failed_requests, self.requests)
    }

    pub fn checks_passed(&self) -> u64 {
        self.checks.iter().map(|c| c.passes).sum()
    }

    pub fn checks_total(&self) -> u64 {
        self.checks.iter().map(CheckTally::total).sum()
    }

    pub fn requests_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.requests as f64 / secs
        } else {
            0.0
        }
    }
}

pub(crate) fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
