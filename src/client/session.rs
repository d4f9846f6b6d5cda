//! Per-iteration session: transport plus the injected reporter and pause.

use std::time::{Duration, Instant};

use super::{ApiRequest, ApiResponse, Endpoint, Transport};
use crate::checks::{CheckReporter, CheckResult, RequestSample};
use crate::config::LoadTestConfig;
use crate::pause::Pause;

/// Everything one scenario iteration needs to talk to the API
///
/// Requests are strictly sequential: [`send`](Self::send) borrows the session
/// mutably and resolves only once the full response body has arrived.
pub struct Session<'r, T> {
    transport: T,
    config: &'r LoadTestConfig,
    reporter: &'r dyn CheckReporter,
    pause: &'r dyn Pause,
}

impl<'r, T: Transport> Session<'r, T> {
    pub fn new(
        transport: T,
        config: &'r LoadTestConfig,
        reporter: &'r dyn CheckReporter,
        pause: &'r dyn Pause,
    ) -> Self {
        Self {
            transport,
            config,
            reporter,
            pause,
        }
    }

    pub fn config(&self) -> &'r LoadTestConfig {
        self.config
    }

    /// Start building a request for `endpoint`.
    pub fn request(&self, endpoint: Endpoint) -> ApiRequest {
        ApiRequest::new(&endpoint, self.config)
    }

    /// Send a request, record its sample, and return the response.
    ///
    /// Transport failures are logged and surface as a status `0` response so
    /// the iteration can continue.
    pub async fn send(&mut self, request: ApiRequest) -> ApiResponse {
        let name = request.name;
        let started = Instant::now();
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(request = name, error = %err, "request produced no response");
                ApiResponse::transport_failure()
            }
        };
        self.reporter.record_request(RequestSample {
            name,
            status: response.status,
            duration: started.elapsed(),
        });
        tracing::trace!(request = name, status = response.status, "request completed");
        response
    }

    /// Record a named check and return its outcome.
    pub fn check(&self, label: &str, passed: bool) -> bool {
        if !passed {
            tracing::debug!(check = label, "check failed");
        }
        self.reporter.record_check(CheckResult {
            label: label.to_string(),
            passed,
        });
        passed
    }

    /// Think-time between steps
    pub async fn think(&self, secs: u64) {
        self.pause.pause(Duration::from_secs(secs)).await;
    }
}
