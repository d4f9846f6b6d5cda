//! # conduit-loadtest
//!
//! Load, soak, spike, stress and smoke scenarios for the Conduit (RealWorld)
//! REST API, driven by [goose](https://docs.rs/goose).
//!
//! ## Overview
//!
//! Goose owns virtual-user scheduling and ramping. This crate supplies what
//! goose does not know about: the API's endpoints and request bodies, the
//! per-scenario flows with their think-times, named checks, and k6-style
//! thresholds that turn a run into a pass/fail verdict.
//!
//! ## Architecture
//!
//! - **[`config`]** - base URL and credentials, from defaults plus environment
//! - **[`client`]** - the [`Transport`](client::Transport) seam with goose and reqwest backends
//! - **[`helpers`]** - register, login and authorization headers
//! - **[`scenarios`]** - one module per scenario: stages, thresholds, iteration
//! - **[`runner`]** / **[`engine`]** - setup once, run the engine, teardown once, verdict
//! - **[`metrics`]** / **[`thresholds`]** - check tallies, latency histogram, rule evaluation
//! - **[`cli`]** / **[`logging`]** - the binary's front end
//!
//! ```text
//! cli ─▶ Runner ─▶ setup (HttpTransport) ─▶ GooseEngine ─▶ iteration per VU (GooseTransport)
//!                                                  │
//!                        MetricsCollector ◀────────┘ checks + request samples
//!                               │
//!                               ▼
//!                      Thresholds ─▶ Verdict ─▶ exit code
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use conduit_loadtest::client::HttpTransport;
//! use conduit_loadtest::config::LoadTestConfig;
//! use conduit_loadtest::engine::GooseEngine;
//! use conduit_loadtest::runner::Runner;
//! use conduit_loadtest::scenarios::ScenarioKind;
//!
//! let config = LoadTestConfig::from_env()?;
//! let setup = HttpTransport::new(config.request_timeout)?;
//! let runner = Runner::new(GooseEngine::new(config.base_url.clone()), config);
//! let report = runner.run(ScenarioKind::Smoke, setup).await?;
//! assert!(report.passed());
//! ```

pub mod checks;
pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod metrics;
pub mod pause;
pub mod profile;
pub mod runner;
pub mod scenarios;
pub mod thresholds;

pub use error::LoadTestError;
