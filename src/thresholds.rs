//! # Thresholds
//!
//! Pass/fail rules evaluated against the aggregated metrics of a whole run.
//! Expressions use the familiar k6 syntax so existing test plans carry over:
//!
//! | Metric | Aggregates | Example |
//! |---|---|---|
//! | `http_req_duration` (ms) | `p(N)`, `avg`, `min`, `max`, `med` | `p(95)<500` |
//! | `http_req_failed` | `rate` | `rate<0.01` |
//! | `checks` (pass rate) | `rate` | `rate>0.99` |
//!
//! A run passes only when every rule passes. Metrics without samples observe
//! `0`, so an empty run passes `<` rules and fails `>` rules.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LoadTestError;

static RULE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(p\(\s*(\d+(?:\.\d+)?)\s*\)|avg|min|max|med|rate)\s*(<=|>=|<|>)\s*(\d+(?:\.\d+)?)\s*$")
        .expect("threshold regex is valid")
});

/// Metrics a threshold can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Request latency in milliseconds
    HttpReqDuration,
    /// Share of requests that failed (status 0 or >= 400)
    HttpReqFailed,
    /// Share of checks that passed
    Checks,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::HttpReqDuration => "http_req_duration",
            Metric::HttpReqFailed => "http_req_failed",
            Metric::Checks => "checks",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "http_req_duration" => Some(Metric::HttpReqDuration),
            "http_req_failed" => Some(Metric::HttpReqFailed),
            "checks" => Some(Metric::Checks),
            _ => None,
        }
    }

    fn is_rate(self) -> bool {
        !matches!(self, Metric::HttpReqDuration)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a metric is reduced to a single number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    /// Percentile in `0..=100`
    Percentile(f64),
    Avg,
    Min,
    Max,
    Med,
    Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    fn holds(self, observed: f64, limit: f64) -> bool {
        match self {
            Comparison::Lt => observed < limit,
            Comparison::Le => observed <= limit,
            Comparison::Gt => observed > limit,
            Comparison::Ge => observed >= limit,
        }
    }
}

/// One parsed threshold expression
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub metric: Metric,
    pub aggregate: Aggregate,
    pub comparison: Comparison,
    pub limit: f64,
    /// Original text, kept for reporting
    pub expression: String,
}

impl Rule {
    /// Parse `expression` as a rule for `metric`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadTestError::InvalidThreshold`] for unknown syntax, percentiles
    /// outside `0..=100`, or an aggregate that does not fit the metric (e.g.
    /// `rate` on `http_req_duration`).
    pub fn parse(metric: Metric, expression: &str) -> Result<Self, LoadTestError> {
        let invalid = || LoadTestError::InvalidThreshold {
            metric: metric.name().to_string(),
            expression: expression.to_string(),
        };
        let caps = RULE_RE.captures(expression).ok_or_else(invalid)?;

        let aggregate = match (&caps[1], caps.get(2)) {
            (_, Some(p)) => {
                let p: f64 = p.as_str().parse().map_err(|_| invalid())?;
                if !(0.0..=100.0).contains(&p) {
                    return Err(invalid());
                }
                Aggregate::Percentile(p)
            }
            ("avg", None) => Aggregate::Avg,
            ("min", None) => Aggregate::Min,
            ("max", None) => Aggregate::Max,
            ("med", None) => Aggregate::Med,
            _ => Aggregate::Rate,
        };
        if metric.is_rate() != matches!(aggregate, Aggregate::Rate) {
            return Err(invalid());
        }

        let comparison = match &caps[3] {
            "<" => Comparison::Lt,
            "<=" => Comparison::Le,
            ">" => Comparison::Gt,
            _ => Comparison::Ge,
        };
        let limit: f64 = caps[4].parse().map_err(|_| invalid())?;

        Ok(Self {
            metric,
            aggregate,
            comparison,
            limit,
            expression: expression.trim().to_string(),
        })
    }
}

/// Read access to the aggregated run metrics
pub trait MetricSource {
    /// Latency at the given percentile (`0..=100`), in milliseconds
    fn duration_percentile(&self, percentile: f64) -> f64;
    fn duration_mean(&self) -> f64;
    fn duration_min(&self) -> f64;
    fn duration_max(&self) -> f64;
    /// Failed requests / all requests, `0` without requests
    fn failed_request_rate(&self) -> f64;
    /// Passed checks / all checks, `0` without checks
    fn check_pass_rate(&self) -> f64;
}

/// The thresholds declared for a scenario
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thresholds {
    rules: Vec<Rule>,
}

impl Thresholds {
    /// No thresholds: the run is informational and always passes.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build thresholds from `(metric name, [expressions])` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`LoadTestError::InvalidThreshold`] for unknown metric names or
    /// malformed expressions.
    pub fn parse(spec: &[(&str, &[&str])]) -> Result<Self, LoadTestError> {
        let mut rules = Vec::new();
        for (name, expressions) in spec {
            let metric = Metric::parse(name).ok_or_else(|| LoadTestError::InvalidThreshold {
                metric: name.to_string(),
                expression: expressions.join(", "),
            })?;
            for expression in expressions.iter() {
                rules.push(Rule::parse(metric, expression)?);
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against the collected metrics.
    pub fn evaluate(&self, source: &dyn MetricSource) -> Verdict {
        let outcomes = self
            .rules
            .iter()
            .map(|rule| {
                let observed = match (rule.metric, rule.aggregate) {
                    (Metric::HttpReqFailed, _) => source.failed_request_rate(),
                    (Metric::Checks, _) => source.check_pass_rate(),
                    (Metric::HttpReqDuration, Aggregate::Percentile(p)) => {
                        source.duration_percentile(p)
                    }
                    (Metric::HttpReqDuration, Aggregate::Med) => source.duration_percentile(50.0),
                    (Metric::HttpReqDuration, Aggregate::Avg) => source.duration_mean(),
                    (Metric::HttpReqDuration, Aggregate::Min) => source.duration_min(),
                    (Metric::HttpReqDuration, Aggregate::Max) => source.duration_max(),
                    // Rejected by Rule::parse
                    (Metric::HttpReqDuration, Aggregate::Rate) => f64::NAN,
                };
                ThresholdOutcome {
                    metric: rule.metric,
                    expression: rule.expression.clone(),
                    observed,
                    passed: rule.comparison.holds(observed, rule.limit),
                }
            })
            .collect();
        Verdict { outcomes }
    }
}

/// Result of one rule
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdOutcome {
    pub metric: Metric,
    pub expression: String,
    pub observed: f64,
    pub passed: bool,
}

/// Result of all rules of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Verdict {
    pub outcomes: Vec<ThresholdOutcome>,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ThresholdOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}
