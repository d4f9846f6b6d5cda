//! Spike scenario: a sudden tenfold surge followed by recovery.
//!
//! Informational only: no thresholds are declared, so a spike run never fails
//! the process on latency or error rate.

use crate::client::{Endpoint, Session, Transport};
use crate::profile::Stage;

pub const STAGES: &[Stage] = &[
    Stage::secs(10, 10),
    Stage::secs(30, 10),
    Stage::secs(10, 100),
    Stage::mins(1, 100),
    Stage::secs(10, 10),
    Stage::mins(1, 10),
    Stage::secs(10, 0),
];

/// List articles as fast as the user can loop.
pub async fn iteration<T: Transport>(session: &mut Session<'_, T>) {
    let request = session.request(Endpoint::ListArticles);
    let response = session.send(request).await;
    session.check("status is 200", response.status == 200);
}
