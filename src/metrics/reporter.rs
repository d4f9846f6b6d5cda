//! Console reporting: periodic progress lines and the final summary.

use std::fmt::{self, Write as _};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;

use super::collector::MetricsCollector;
use super::types::RunSummary;
use crate::thresholds::Verdict;

/// Log request and check counters every `every` until the handle is aborted.
pub fn spawn_progress_logger(collector: Arc<MetricsCollector>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        // First tick fires immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let latency = collector.latency_stats();
            tracing::info!(
                requests = collector.request_count(),
                failed = collector.failed_request_count(),
                checks = collector.check_count(),
                p95_ms = latency.p95,
                "load test progress"
            );
        }
    })
}

/// Render the final summary as printed at the end of a run
pub fn render_final_report(scenario: &str, summary: &RunSummary, verdict: &Verdict) -> String {
    let mut out = String::new();
    if let Err(err) = write_final_report(&mut out, scenario, summary, verdict) {
        tracing::warn!(error = %err, "final report truncated");
    }
    out
}

fn write_final_report(
    out: &mut String,
    scenario: &str,
    summary: &RunSummary,
    verdict: &Verdict,
) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "╔════════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                 CONDUIT LOAD TEST: {scenario:<28}║")?;
    writeln!(out, "╚════════════════════════════════════════════════════════════════╝")?;

    let elapsed = summary.elapsed.as_secs();
    writeln!(
        out,
        "\n⏱️  Elapsed: {:02}:{:02}:{:02}",
        elapsed / 3600,
        (elapsed % 3600) / 60,
        elapsed % 60
    )?;

    writeln!(out, "\n📊 REQUESTS")?;
    writeln!(out, "   Total:                {:>10}", summary.requests)?;
    writeln!(
        out,
        "   Failed:               {:>10} ({:.2}%)",
        summary.failed_requests,
        summary.failed_rate() * 100.0
    )?;
    writeln!(
        out,
        "   Throughput:           {:>10.2} req/s",
        summary.requests_per_second()
    )?;
    for endpoint in &summary.endpoints {
        writeln!(
            out,
            "   {:<36} {:>8} ({} failed)",
            endpoint.name, endpoint.requests, endpoint.failed
        )?;
    }

    if summary.latency.count > 0 {
        let l = &summary.latency;
        writeln!(out, "\n⏲️  LATENCY (ms)")?;
        writeln!(
            out,
            "   min {:.1}  med {:.1}  p90 {:.1}  p95 {:.1}  p99 {:.1}  max {:.1}  avg {:.1}",
            l.min, l.p50, l.p90, l.p95, l.p99, l.max, l.mean
        )?;
    }

    if !summary.checks.is_empty() {
        writeln!(
            out,
            "\n✔️  CHECKS ({}/{} passed)",
            summary.checks_passed(),
            summary.checks_total()
        )?;
        for check in &summary.checks {
            let mark = if check.fails == 0 { "✓" } else { "✗" };
            writeln!(
                out,
                "   {mark} {:<36} {:>8} ✓ {:>8} ✗",
                check.label, check.passes, check.fails
            )?;
        }
    }

    writeln!(out, "\n🎯 THRESHOLDS")?;
    if verdict.outcomes.is_empty() {
        writeln!(out, "   (none declared)")?;
    }
    for outcome in &verdict.outcomes {
        let mark = if outcome.passed { "✓" } else { "✗" };
        writeln!(
            out,
            "   {mark} {:<18} {:<14} observed {:.4}",
            outcome.metric.name(),
            outcome.expression,
            outcome.observed
        )?;
    }
    writeln!(
        out,
        "\n{}",
        if verdict.passed() {
            "✅ PASSED"
        } else {
            "❌ FAILED: one or more thresholds were crossed"
        }
    )?;
    Ok(())
}

pub fn print_final_report(scenario: &str, summary: &RunSummary, verdict: &Verdict) {
    print!("{}", render_final_report(scenario, summary, verdict));
}
