//! Soak scenario: sustained unauthenticated browsing with longer think-times.

use crate::client::{Endpoint, Session, Transport};
use crate::profile::Stage;

pub const STAGES: &[Stage] = &[Stage::mins(1, 50), Stage::mins(2, 50), Stage::mins(1, 0)];

pub const THRESHOLDS: &[(&str, &[&str])] = &[
    ("http_req_duration", &["p(95)<500", "p(99)<1000"]),
    ("http_req_failed", &["rate<0.01"]),
];

/// Browse articles then tags. No checks; only latency and failure rate matter.
pub async fn iteration<T: Transport>(session: &mut Session<'_, T>) {
    let request = session.request(Endpoint::ListArticles);
    session.send(request).await;
    session.think(3).await;

    let request = session.request(Endpoint::ListTags);
    session.send(request).await;
    session.think(2).await;
}
