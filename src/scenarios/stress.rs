//! Stress scenario: step-wise growth well beyond expected capacity.

use crate::client::{Endpoint, Session, Transport};
use crate::profile::Stage;

pub const STAGES: &[Stage] = &[
    Stage::mins(2, 50),
    Stage::mins(1, 50),
    Stage::mins(2, 100),
    Stage::mins(1, 100),
    Stage::mins(2, 200),
    Stage::mins(1, 200),
    Stage::mins(2, 300),
    Stage::mins(1, 300),
    Stage::mins(3, 0),
];

/// Relaxed limits: two seconds at p95, up to 10% failures.
pub const THRESHOLDS: &[(&str, &[&str])] = &[
    ("http_req_duration", &["p(95)<2000"]),
    ("http_req_failed", &["rate<0.1"]),
];

pub async fn iteration<T: Transport>(session: &mut Session<'_, T>) {
    let request = session.request(Endpoint::ListArticles);
    let response = session.send(request).await;
    session.check("status is 200", response.status == 200);
    session.think(1).await;
}
