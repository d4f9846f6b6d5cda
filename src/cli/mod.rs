//! # CLI Module
//!
//! Command-line front end of the `conduit-loadtest` binary.
//!
//! ## Commands
//!
//! ### `run`
//!
//! Run a scenario against a live API:
//!
//! ```bash
//! conduit-loadtest run load --base-url http://localhost:8080/api
//! conduit-loadtest run stress --scale 0.1 --report-file report.html
//! ```
//!
//! Exits `0` when every threshold passes, `99` when a threshold is crossed and
//! `1` on configuration or engine errors.
//!
//! ### `plan`
//!
//! Print a scenario's stages, goose test plan and thresholds without sending
//! traffic:
//!
//! ```bash
//! conduit-loadtest plan spike
//! ```
//!
//! ### `list`
//!
//! List the available scenarios.

mod commands;


pub use commands::{run_cli, Cli, Commands, THRESHOLDS_FAILED_EXIT_CODE};
