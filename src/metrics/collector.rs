//! Metrics collector - thread-safe check tallies and latency tracking
//!
//! One collector is shared by every virtual user of a run. Counters are
//! atomics, per-label tallies live in a [`DashMap`], and the latency histogram
//! sits behind a short `parking_lot` mutex.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use dashmap::DashMap;
use hdrhistogram::Histogram;
use parking_lot::Mutex;

use super::types::{ratio, CheckTally, EndpointTally, LatencyStats, RunSummary};
use crate::checks::{CheckReporter, CheckResult, RequestSample};
use crate::thresholds::MetricSource;

#[derive(Debug, Default)]
struct Tally {
    ok: AtomicU64,
    failed: AtomicU64,
}

impl Tally {
    fn record(&self, ok: bool) {
        if ok {
            self.ok.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn load(&self) -> (u64, u64) {
        (
            self.ok.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

/// Run-level [`CheckReporter`] backing threshold evaluation and the final report
pub struct MetricsCollector {
    checks: DashMap<String, Tally>,
    endpoints: DashMap<&'static str, Tally>,
    requests: AtomicU64,
    failed_requests: AtomicU64,
    check_passes: AtomicU64,
    check_total: AtomicU64,
    /// Request latency in microseconds
    latencies: Mutex<Histogram<u64>>,
    start_time: Instant,
}

impl MetricsCollector {
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        // 3 significant digits, auto-resizing
        let histogram = Histogram::new(3).expect("3 significant figures is a valid precision");
        Self {
            checks: DashMap::new(),
            endpoints: DashMap::new(),
            requests: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            check_passes: AtomicU64::new(0),
            check_total: AtomicU64::new(0),
            latencies: Mutex::new(histogram),
            start_time: Instant::now(),
        }
    }

    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn failed_request_count(&self) -> u64 {
        self.failed_requests.load(Ordering::Relaxed)
    }

    pub fn check_count(&self) -> u64 {
        self.check_total.load(Ordering::Relaxed)
    }

    /// Tally of a single check label, if it was ever recorded
    pub fn check_tally(&self, label: &str) -> Option<CheckTally> {
        self.checks.get(label).map(|tally| {
            let (passes, fails) = tally.load();
            CheckTally {
                label: label.to_string(),
                passes,
                fails,
            }
        })
    }

    pub fn latency_stats(&self) -> LatencyStats {
        let hist = self.latencies.lock();
        if hist.is_empty() {
            return LatencyStats::default();
        }
        let ms = |us: u64| us as f64 / 1000.0;
        LatencyStats {
            min: ms(hist.min()),
            p50: ms(hist.value_at_quantile(0.50)),
            p90: ms(hist.value_at_quantile(0.90)),
            p95: ms(hist.value_at_quantile(0.95)),
            p99: ms(hist.value_at_quantile(0.99)),
            max: ms(hist.max()),
            mean: hist.mean() / 1000.0,
            count: hist.len(),
        }
    }

    pub fn summary(&self) -> RunSummary {
        let mut checks: Vec<CheckTally> = self
            .checks
            .iter()
            .map(|entry| {
                let (passes, fails) = entry.value().load();
                CheckTally {
                    label: entry.key().clone(),
                    passes,
                    fails,
                }
            })
            .collect();
        checks.sort_by(|a, b| a.label.cmp(&b.label));

        let mut endpoints: Vec<EndpointTally> = self
            .endpoints
            .iter()
            .map(|entry| {
                let (ok, failed) = entry.value().load();
                EndpointTally {
                    name: entry.key().to_string(),
                    requests: ok + failed,
                    failed,
                }
            })
            .collect();
        endpoints.sort_by(|a, b| a.name.cmp(&b.name));

        RunSummary {
            elapsed: self.start_time.elapsed(),
            requests: self.request_count(),
            failed_requests: self.failed_request_count(),
            latency: self.latency_stats(),
            checks,
            endpoints,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckReporter for MetricsCollector {
    fn record_check(&self, check: CheckResult) {
        self.check_total.fetch_add(1, Ordering::Relaxed);
        if check.passed {
            self.check_passes.fetch_add(1, Ordering::Relaxed);
        }
        // Avoid allocating the label on the hot path once it exists
        if let Some(tally) = self.checks.get(&check.label) {
            tally.record(check.passed);
            return;
        }
        self.checks.entry(check.label).or_default().record(check.passed);
    }

    fn record_request(&self, sample: RequestSample) {
        let failed = sample.failed();
        self.requests.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
        self.endpoints.entry(sample.name).or_default().record(!failed);

        let micros = u64::try_from(sample.duration.as_micros()).unwrap_or(u64::MAX);
        self.latencies.lock().saturating_record(micros);
    }
}

impl MetricSource for MetricsCollector {
    fn duration_percentile(&self, percentile: f64) -> f64 {
        let hist = self.latencies.lock();
        if hist.is_empty() {
            return 0.0;
        }
        hist.value_at_percentile(percentile) as f64 / 1000.0
    }

    fn duration_mean(&self) -> f64 {
        self.latency_stats().mean
    }

    fn duration_min(&self) -> f64 {
        self.latency_stats().min
    }

    fn duration_max(&self) -> f64 {
        self.latency_stats().max
    }

    fn failed_request_rate(&self) -> f64 {
        ratio(self.failed_request_count(), self.request_count())
    }

    fn check_pass_rate(&self) -> f64 {
        ratio(
            self.check_passes.load(Ordering::Relaxed),
            self.check_total.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn sample(status: u16, millis: u64) -> RequestSample {
        RequestSample {
            name: "GET /articles",
            status,
            duration: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_failure_rate_counts_transport_errors_and_4xx() {
        let collector = MetricsCollector::new();
        collector.record_request(sample(200, 10));
        collector.record_request(sample(0, 10));
        collector.record_request(sample(401, 10));
        collector.record_request(sample(201, 10));

        assert_eq!(collector.request_count(), 4);
        assert_eq!(collector.failed_request_count(), 2);
        assert!((collector.failed_request_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_check_tallies_by_label() {
        let collector = MetricsCollector::new();
        for passed in [true, true, false] {
            collector.record_check(CheckResult {
                label: "tags status is 200".to_string(),
                passed,
            });
        }
        let tally = collector.check_tally("tags status is 200").unwrap();
        assert_eq!((tally.passes, tally.fails), (2, 1));
        assert!(collector.check_tally("never recorded").is_none());
        assert!((collector.check_pass_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_latency_percentiles() {
        let collector = MetricsCollector::new();
        for millis in 1..=100 {
            collector.record_request(sample(200, millis));
        }
        let p95 = collector.duration_percentile(95.0);
        assert!((94.0..=96.0).contains(&p95), "p95 was {p95}");
        let stats = collector.latency_stats();
        assert_eq!(stats.count, 100);
        assert!((stats.max - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_empty_collector_observes_zero() {
        let collector = MetricsCollector::new();
        assert_eq!(collector.duration_percentile(99.0), 0.0);
        assert_eq!(collector.failed_request_rate(), 0.0);
        assert_eq!(collector.check_pass_rate(), 0.0);
        assert_eq!(collector.summary().latency, LatencyStats::default());
    }

    #[test]
    fn test_concurrent_recording() {
        let collector = Arc::new(MetricsCollector::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let collector = Arc::clone(&collector);
                thread::spawn(move || {
                    for i in 0..500 {
                        collector.record_request(sample(200, 1 + i % 7));
                        collector.record_check(CheckResult {
                            label: "status is 200".to_string(),
                            passed: true,
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(collector.request_count(), 4000);
        assert_eq!(collector.check_tally("status is 200").unwrap().passes, 4000);
        let summary = collector.summary();
        assert_eq!(summary.endpoints.len(), 1);
        assert_eq!(summary.endpoints[0].requests, 4000);
    }
}
