//! Named boolean checks and the reporter they are recorded into.
//!
//! Scenario code never touches global state: every check and every request
//! sample goes through the [`CheckReporter`] handed to the session, so tests
//! can substitute their own reporter and the run-level collector can be
//! inspected after the engine finishes.

use std::time::Duration;

/// A single evaluated check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub label: String,
    pub passed: bool,
}

/// A completed (or failed) HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSample {
    /// Request name used for grouping, e.g. `GET /articles/{slug}`
    pub name: &'static str,
    /// HTTP status, `0` when the transport failed
    pub status: u16,
    pub duration: Duration,
}

impl RequestSample {
    /// Transport failures and 4xx/5xx responses count as failed requests.
    pub fn failed(&self) -> bool {
        self.status == 0 || self.status >= 400
    }
}

/// Sink for checks and request samples
///
/// Implementations are shared by every virtual user and must be internally
/// synchronized.
pub trait CheckReporter: Send + Sync {
    fn record_check(&self, check: CheckResult);

    fn record_request(&self, sample: RequestSample);
}
