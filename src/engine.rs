//! # Load engines
//!
//! An [`Engine`] owns virtual-user scheduling: given a [`ScenarioRun`] and a
//! ramp profile it calls [`ScenarioRun::iterate`] repeatedly, once per
//! virtual-user loop, until the profile ends. [`GooseEngine`] hands the work to
//! goose; tests plug in a fixed-user engine instead.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use goose::config::GooseConfiguration;
use goose::goose::TransactionFunction;
use goose::prelude::*;

use crate::client::GooseTransport;
use crate::error::LoadTestError;
use crate::profile::LoadProfile;
use crate::runner::ScenarioRun;

/// Drives virtual users through a scenario for the length of a profile
///
/// The returned future need not be `Send`: engines are awaited on the task
/// that owns the run.
#[async_trait(?Send)]
pub trait Engine: Send + Sync {
    async fn execute(&self, run: Arc<ScenarioRun>, profile: &LoadProfile) -> Result<(), LoadTestError>;
}

/// Production engine backed by a goose attack
#[derive(Debug, Clone)]
pub struct GooseEngine {
    host: String,
    report_file: Option<PathBuf>,
}

impl GooseEngine {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            report_file: None,
        }
    }

    /// Have goose write its own HTML/JSON/Markdown report, picked by extension.
    pub fn with_report_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_file = Some(path.into());
        self
    }
}

fn engine_error(err: GooseError) -> LoadTestError {
    LoadTestError::Engine(err.to_string())
}

#[async_trait(?Send)]
impl Engine for GooseEngine {
    async fn execute(&self, run: Arc<ScenarioRun>, profile: &LoadProfile) -> Result<(), LoadTestError> {
        let plan = profile.test_plan();
        let scenario_name = run.kind().name();

        let iteration: TransactionFunction = Arc::new(move |user| {
            let run = Arc::clone(&run);
            Box::pin(async move {
                run.iterate(GooseTransport::new(user)).await;
                Ok(())
            })
        });
        let scenario = Scenario::new(scenario_name)
            .register_transaction(Transaction::new(iteration).set_name("iteration"));

        let mut attack = GooseAttack::initialize_with_config(GooseConfiguration::default())
            .map_err(engine_error)?
            .register_scenario(scenario)
            .set_default(GooseDefault::Host, self.host.as_str())
            .map_err(engine_error)?
            .set_default(GooseDefault::TestPlan, plan.as_str())
            .map_err(engine_error)?
            .set_default(GooseDefault::NoResetMetrics, true)
            .map_err(engine_error)?;
        if let Some(path) = &self.report_file {
            attack = attack
                .set_default(GooseDefault::ReportFile, path.to_string_lossy().as_ref())
                .map_err(engine_error)?;
        }

        tracing::info!(
            scenario = scenario_name,
            host = %self.host,
            test_plan = %plan,
            "starting goose attack"
        );
        let metrics = attack.execute().await.map_err(engine_error)?;
        tracing::info!(
            scenario = scenario_name,
            goose_duration_secs = metrics.duration,
            "goose attack finished"
        );
        Ok(())
    }
}
