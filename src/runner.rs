//! # Runner
//!
//! Orchestrates one run: setup once, hand the scenario to the engine, teardown
//! once, then evaluate thresholds against everything the collector saw.
//!
//! ```text
//! setup (1x, own transport) -> engine.execute (N users x M iterations) -> teardown (1x) -> verdict
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::checks::CheckReporter;
use crate::client::{Session, Transport};
use crate::config::LoadTestConfig;
use crate::engine::Engine;
use crate::error::LoadTestError;
use crate::metrics::reporter::spawn_progress_logger;
use crate::metrics::{MetricsCollector, RunSummary};
use crate::pause::{Pause, TokioPause};
use crate::scenarios::{ScenarioKind, SetupData};
use crate::thresholds::Verdict;

/// Everything an engine needs to run iterations of one scenario
///
/// Shared across all virtual users; nothing in it is mutated after setup.
pub struct ScenarioRun {
    kind: ScenarioKind,
    config: Arc<LoadTestConfig>,
    setup: SetupData,
    reporter: Arc<dyn CheckReporter>,
    pause: Arc<dyn Pause>,
}

impl ScenarioRun {
    pub fn new(
        kind: ScenarioKind,
        config: Arc<LoadTestConfig>,
        setup: SetupData,
        reporter: Arc<dyn CheckReporter>,
        pause: Arc<dyn Pause>,
    ) -> Self {
        Self {
            kind,
            config,
            setup,
            reporter,
            pause,
        }
    }

    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn setup(&self) -> &SetupData {
        &self.setup
    }

    /// Run one iteration of the scenario over `transport`.
    pub async fn iterate<T: Transport>(&self, transport: T) {
        let mut session = Session::new(
            transport,
            self.config.as_ref(),
            self.reporter.as_ref(),
            self.pause.as_ref(),
        );
        self.kind.iteration(&mut session, &self.setup).await;
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub scenario: ScenarioKind,
    pub summary: RunSummary,
    pub verdict: Verdict,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.verdict.passed()
    }
}

pub struct Runner<E> {
    engine: E,
    config: Arc<LoadTestConfig>,
    pause: Arc<dyn Pause>,
    progress_interval: Option<Duration>,
    scale: f64,
}

impl<E: Engine> Runner<E> {
    pub fn new(engine: E, config: LoadTestConfig) -> Self {
        Self {
            engine,
            config: Arc::new(config),
            pause: Arc::new(TokioPause),
            progress_interval: None,
            scale: 1.0,
        }
    }

    pub fn with_pause(mut self, pause: Arc<dyn Pause>) -> Self {
        self.pause = pause;
        self
    }

    /// Log running counters every `every` while the engine runs.
    pub fn with_progress_interval(mut self, every: Duration) -> Self {
        self.progress_interval = Some(every);
        self
    }

    /// Multiply every stage duration; see [`LoadProfile::scaled`](crate::profile::LoadProfile::scaled).
    pub fn with_scale(mut self, factor: f64) -> Self {
        self.scale = factor;
        self
    }

    /// Run `kind` end to end.
    ///
    /// Setup goes through `setup_transport` exactly once, before the engine
    /// starts; teardown runs once after the engine returns, even when it failed.
    ///
    /// # Errors
    ///
    /// Returns an error when the scenario's thresholds do not parse or the
    /// engine fails. Failed checks and requests never error; they land in the
    /// verdict.
    pub async fn run<S: Transport>(
        &self,
        kind: ScenarioKind,
        setup_transport: S,
    ) -> Result<RunReport, LoadTestError> {
        let thresholds = kind.thresholds()?;
        let profile = kind.profile().scaled(self.scale);
        let collector = Arc::new(MetricsCollector::new());

        tracing::info!(
            scenario = kind.name(),
            base_url = %self.config.base_url,
            peak_users = profile.peak_users(),
            duration_secs = profile.total_duration().as_secs(),
            "starting run"
        );

        let setup = {
            let mut session = Session::new(
                setup_transport,
                self.config.as_ref(),
                collector.as_ref(),
                self.pause.as_ref(),
            );
            kind.setup(&mut session).await
        };

        let reporter = Arc::clone(&collector) as Arc<dyn CheckReporter>;
        let run = Arc::new(ScenarioRun::new(
            kind,
            Arc::clone(&self.config),
            setup,
            reporter,
            Arc::clone(&self.pause),
        ));

        let progress = self
            .progress_interval
            .map(|every| spawn_progress_logger(Arc::clone(&collector), every));
        let outcome = self.engine.execute(Arc::clone(&run), &profile).await;
        if let Some(handle) = progress {
            handle.abort();
        }

        kind.teardown(run.setup());
        outcome?;

        let verdict = thresholds.evaluate(collector.as_ref());
        for failure in verdict.failures() {
            tracing::warn!(
                metric = failure.metric.name(),
                threshold = %failure.expression,
                observed = failure.observed,
                "threshold crossed"
            );
        }
        Ok(RunReport {
            scenario: kind,
            summary: collector.summary(),
            verdict,
        })
    }
}
