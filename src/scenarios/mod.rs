//! # Scenarios
//!
//! Each scenario pairs a ramp profile and thresholds with an iteration: the
//! fixed sequence of HTTP calls one virtual user performs per loop.
//!
//! | Scenario | Peak VUs | Flow | Thresholds |
//! |---|---|---|---|
//! | `load` | 50 | full authenticated flow | p(95)<500, rate<0.01 |
//! | `soak` | 50 | browse articles and tags | p(95)<500, p(99)<1000, rate<0.01 |
//! | `spike` | 100 | list articles | none |
//! | `stress` | 300 | list articles | p(95)<2000, rate<0.1 |
//! | `smoke` | 1 | full authenticated flow | p(95)<500, rate<0.01 |
//!
//! Iterations are lifecycle-free functions of a [`Session`] and the read-only
//! [`SetupData`]; the runner owns setup and teardown.

use clap::ValueEnum;

use crate::client::{Session, Transport};
use crate::config::DEFAULT_THRESHOLDS;
use crate::error::LoadTestError;
use crate::profile::LoadProfile;
use crate::thresholds::Thresholds;

pub mod load;
pub mod smoke;
pub mod soak;
pub mod spike;
pub mod stress;

pub use load::ArticleCreation;

/// Result of the one-time setup hook, shared read-only by every iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupData {
    /// Token for authenticated calls; `None` if setup could not obtain one
    pub token: Option<String>,
}

/// The available scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ScenarioKind {
    /// Typical traffic with the full authenticated flow
    Load,
    /// Sustained moderate browsing to expose slow degradation
    Soak,
    /// Sudden tenfold surge and recovery
    Spike,
    /// Step-wise growth beyond expected capacity
    Stress,
    /// One user through the full flow to validate the environment
    Smoke,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 5] = [
        ScenarioKind::Load,
        ScenarioKind::Soak,
        ScenarioKind::Spike,
        ScenarioKind::Stress,
        ScenarioKind::Smoke,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::Load => "load",
            ScenarioKind::Soak => "soak",
            ScenarioKind::Spike => "spike",
            ScenarioKind::Stress => "stress",
            ScenarioKind::Smoke => "smoke",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ScenarioKind::Load => "10 then 50 users through the full authenticated flow",
            ScenarioKind::Soak => "50 users browsing articles and tags for a sustained period",
            ScenarioKind::Spike => "10 users, a sudden surge to 100, then recovery",
            ScenarioKind::Stress => "steps of 50/100/200/300 users listing articles",
            ScenarioKind::Smoke => "a single user through the full authenticated flow",
        }
    }

    pub fn profile(self) -> LoadProfile {
        let stages = match self {
            ScenarioKind::Load => load::STAGES,
            ScenarioKind::Soak => soak::STAGES,
            ScenarioKind::Spike => spike::STAGES,
            ScenarioKind::Stress => stress::STAGES,
            ScenarioKind::Smoke => smoke::STAGES,
        };
        LoadProfile::new(stages.to_vec())
    }

    /// Pass/fail rules for the run.
    ///
    /// # Errors
    ///
    /// Returns [`LoadTestError::InvalidThreshold`] if a declared expression is malformed.
    pub fn thresholds(self) -> Result<Thresholds, LoadTestError> {
        match self {
            ScenarioKind::Load | ScenarioKind::Smoke => Thresholds::parse(DEFAULT_THRESHOLDS),
            ScenarioKind::Soak => Thresholds::parse(soak::THRESHOLDS),
            ScenarioKind::Spike => Ok(Thresholds::none()),
            ScenarioKind::Stress => Thresholds::parse(stress::THRESHOLDS),
        }
    }

    pub fn has_setup(self) -> bool {
        matches!(self, ScenarioKind::Load | ScenarioKind::Smoke)
    }

    /// Run the one-time setup hook; scenarios without one return empty data
    /// without touching the network.
    pub async fn setup<T: Transport>(self, session: &mut Session<'_, T>) -> SetupData {
        if self.has_setup() {
            load::setup(session).await
        } else {
            SetupData::default()
        }
    }

    /// One virtual-user iteration.
    pub async fn iteration<T: Transport>(self, session: &mut Session<'_, T>, setup: &SetupData) {
        match self {
            ScenarioKind::Load => load::iteration(session, setup).await,
            ScenarioKind::Soak => soak::iteration(session).await,
            ScenarioKind::Spike => spike::iteration(session).await,
            ScenarioKind::Stress => stress::iteration(session).await,
            ScenarioKind::Smoke => smoke::iteration(session, setup).await,
        }
    }

    /// Run the one-time teardown hook. No scenario leaves state to clean up;
    /// created articles are accepted leftovers.
    pub fn teardown(self, setup: &SetupData) {
        tracing::info!(
            scenario = self.name(),
            had_token = setup.token.is_some(),
            "teardown complete"
        );
    }
}
