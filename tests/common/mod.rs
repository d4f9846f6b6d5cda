#![allow(dead_code)]

pub mod mock_api {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use conduit_loadtest::checks::{CheckReporter, CheckResult, RequestSample};
    use conduit_loadtest::client::{ApiRequest, ApiResponse, Transport, TransportError};
    use conduit_loadtest::pause::Pause;

    #[derive(Default)]
    struct State {
        responses: HashMap<&'static str, ApiResponse>,
        /// Checked before `responses`: (name, body substring, response)
        body_matches: Vec<(&'static str, &'static str, ApiResponse)>,
        unreachable: Vec<&'static str>,
        log: Vec<ApiRequest>,
    }

    /// Scripted Conduit API shared by any number of transports
    ///
    /// Responses are keyed by request name (`"POST /articles"`); unscripted
    /// requests get `200 {}`.
    #[derive(Clone, Default)]
    pub struct MockApi {
        state: Arc<Mutex<State>>,
    }

    impl MockApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, name: &'static str, status: u16, body: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .responses
                .insert(name, ApiResponse::new(status, body));
            self
        }

        /// Answer requests named `name` whose body contains `needle`
        pub fn respond_to_body(
            self,
            name: &'static str,
            needle: &'static str,
            status: u16,
            body: &str,
        ) -> Self {
            self.state
                .lock()
                .unwrap()
                .body_matches
                .push((name, needle, ApiResponse::new(status, body)));
            self
        }

        /// Requests with this name fail without a response
        pub fn unreachable(self, name: &'static str) -> Self {
            self.state.lock().unwrap().unreachable.push(name);
            self
        }

        /// Responses for a healthy API where the setup login succeeds
        pub fn healthy() -> Self {
            Self::new()
                .respond("POST /users/login", 200, r#"{"user":{"token":"abc123"}}"#)
                .respond("GET /articles", 200, r#"{"articles":[],"articlesCount":0}"#)
                .respond("GET /tags", 200, r#"{"tags":["test"]}"#)
                .respond("GET /user", 200, r#"{"user":{"username":"perftest"}}"#)
                .respond(
                    "POST /articles",
                    201,
                    r#"{"article":{"slug":"test-article-123"}}"#,
                )
                .respond("GET /articles/{slug}", 200, r#"{"article":{}}"#)
                .respond("POST /articles/{slug}/favorite", 200, r#"{"article":{}}"#)
        }

        pub fn transport(&self) -> MockTransport {
            MockTransport { api: self.clone() }
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.state.lock().unwrap().log.clone()
        }

        /// `"METHOD /path"` of every request, in order
        pub fn calls(&self) -> Vec<String> {
            self.requests()
                .iter()
                .map(|r| format!("{} {}", r.method, r.path()))
                .collect()
        }

        pub fn count(&self, name: &str) -> usize {
            self.requests().iter().filter(|r| r.name == name).count()
        }
    }

    pub struct MockTransport {
        api: MockApi,
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&mut self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            let mut state = self.api.state.lock().unwrap();
            let name = request.name;
            let body = request.body.clone().unwrap_or_default();
            state.log.push(request);
            if state.unreachable.contains(&name) {
                return Err(TransportError::new("connection refused"));
            }
            let matched = state
                .body_matches
                .iter()
                .find(|(n, needle, _)| *n == name && body.contains(needle))
                .map(|(_, _, response)| response.clone());
            if let Some(response) = matched {
                return Ok(response);
            }
            Ok(state
                .responses
                .get(name)
                .cloned()
                .unwrap_or_else(|| ApiResponse::new(200, "{}")))
        }
    }

    /// Reporter that keeps every check and sample in order
    #[derive(Default)]
    pub struct RecordingReporter {
        checks: Mutex<Vec<CheckResult>>,
        samples: Mutex<Vec<RequestSample>>,
    }

    impl RecordingReporter {
        pub fn checks(&self) -> Vec<CheckResult> {
            self.checks.lock().unwrap().clone()
        }

        pub fn labels(&self) -> Vec<String> {
            self.checks().into_iter().map(|c| c.label).collect()
        }

        pub fn check(&self, label: &str) -> Option<bool> {
            self.checks()
                .into_iter()
                .find(|c| c.label == label)
                .map(|c| c.passed)
        }

        pub fn samples(&self) -> Vec<RequestSample> {
            self.samples.lock().unwrap().clone()
        }
    }

    impl CheckReporter for RecordingReporter {
        fn record_check(&self, check: CheckResult) {
            self.checks.lock().unwrap().push(check);
        }

        fn record_request(&self, sample: RequestSample) {
            self.samples.lock().unwrap().push(sample);
        }
    }

    /// Pause that returns immediately and remembers what it was asked for
    #[derive(Default)]
    pub struct RecordingPause {
        pauses: Mutex<Vec<Duration>>,
    }

    impl RecordingPause {
        pub fn secs(&self) -> Vec<u64> {
            self.pauses
                .lock()
                .unwrap()
                .iter()
                .map(Duration::as_secs)
                .collect()
        }
    }

    #[async_trait]
    impl Pause for RecordingPause {
        async fn pause(&self, duration: Duration) {
            self.pauses.lock().unwrap().push(duration);
        }
    }
}

pub mod engines {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use conduit_loadtest::engine::Engine;
    use conduit_loadtest::error::LoadTestError;
    use conduit_loadtest::profile::LoadProfile;
    use conduit_loadtest::runner::ScenarioRun;

    use super::mock_api::MockApi;

    /// Runs concurrent users for a fixed number of iterations each; the
    /// profile's peak unless a user count is given
    pub struct FixedUsers {
        pub api: MockApi,
        pub users: Option<usize>,
        pub iterations_per_user: usize,
        pub executions: Arc<AtomicUsize>,
    }

    impl FixedUsers {
        pub fn new(api: MockApi, iterations_per_user: usize) -> Self {
            Self {
                api,
                users: None,
                iterations_per_user,
                executions: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn with_users(mut self, users: usize) -> Self {
            self.users = Some(users);
            self
        }
    }

    #[async_trait(?Send)]
    impl Engine for FixedUsers {
        async fn execute(
            &self,
            run: Arc<ScenarioRun>,
            profile: &LoadProfile,
        ) -> Result<(), LoadTestError> {
            let mut users = Vec::new();
            let users_to_start = self.users.unwrap_or_else(|| profile.peak_users());
            for _ in 0..users_to_start {
                let run = Arc::clone(&run);
                let api = self.api.clone();
                let executions = Arc::clone(&self.executions);
                let iterations = self.iterations_per_user;
                users.push(tokio::spawn(async move {
                    for _ in 0..iterations {
                        run.iterate(api.transport()).await;
                        executions.fetch_add(1, Ordering::SeqCst);
                    }
                }));
            }
            for user in users {
                user.await
                    .map_err(|e| LoadTestError::Engine(e.to_string()))?;
            }
            Ok(())
        }
    }

    /// Engine that fails before running any iteration
    pub struct BrokenEngine;

    #[async_trait(?Send)]
    impl Engine for BrokenEngine {
        async fn execute(
            &self,
            _run: Arc<ScenarioRun>,
            _profile: &LoadProfile,
        ) -> Result<(), LoadTestError> {
            Err(LoadTestError::Engine("no host reachable".to_string()))
        }
    }
}

pub mod session {
    use conduit_loadtest::client::Session;
    use conduit_loadtest::config::LoadTestConfig;

    use super::mock_api::{MockApi, MockTransport, RecordingPause, RecordingReporter};

    /// Config, reporter and pause that a test session borrows
    #[derive(Default)]
    pub struct Fixture {
        pub config: LoadTestConfig,
        pub reporter: RecordingReporter,
        pub pause: RecordingPause,
    }

    impl Fixture {
        pub fn session(&self, api: &MockApi) -> Session<'_, MockTransport> {
            Session::new(api.transport(), &self.config, &self.reporter, &self.pause)
        }
    }
}

pub mod log_capture {
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    /// Counts events whose message equals `message` while the guard lives
    ///
    /// Installed as the thread default, so it sees everything a
    /// current-thread `#[tokio::test]` runtime emits.
    pub struct MessageCounter {
        count: Arc<AtomicUsize>,
        _guard: tracing::subscriber::DefaultGuard,
    }

    impl MessageCounter {
        pub fn install(message: &'static str) -> Self {
            let count = Arc::new(AtomicUsize::new(0));
            let layer = CountingLayer {
                message,
                count: Arc::clone(&count),
            };
            let guard = tracing::subscriber::set_default(Registry::default().with(layer));
            Self {
                count,
                _guard: guard,
            }
        }

        pub fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    struct CountingLayer {
        message: &'static str,
        count: Arc<AtomicUsize>,
    }

    impl<S: Subscriber> Layer<S> for CountingLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor(None);
            event.record(&mut visitor);
            if visitor.0.as_deref() == Some(self.message) {
                self.count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    struct MessageVisitor(Option<String>);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }
}
