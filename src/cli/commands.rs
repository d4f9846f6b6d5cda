use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::client::HttpTransport;
use crate::config::LoadTestConfig;
use crate::engine::GooseEngine;
use crate::metrics::reporter::print_final_report;
use crate::runner::Runner;
use crate::scenarios::ScenarioKind;

/// Exit code for a run whose thresholds failed; matches k6
pub const THRESHOLDS_FAILED_EXIT_CODE: u8 = 99;

/// Load-test scenarios for the Conduit API
#[derive(Parser, Debug)]
#[command(name = "conduit-loadtest", version)]
#[command(about = "Load, soak, spike, stress and smoke tests for the Conduit API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scenario against the API
    Run {
        #[arg(value_enum)]
        scenario: ScenarioKind,

        /// API root including the /api prefix (overrides CONDUIT_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Write goose's report to this file (.html, .json or .md)
        #[arg(long, env = "CONDUIT_REPORT_FILE")]
        report_file: Option<PathBuf>,

        /// Multiply every stage duration, e.g. 0.1 for a quick CI run
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Seconds between progress log lines (0 disables them)
        #[arg(long, default_value_t = 30)]
        progress_secs: u64,
    },
    /// Show a scenario's ramp stages and thresholds without sending traffic
    Plan {
        #[arg(value_enum)]
        scenario: ScenarioKind,

        /// Multiply every stage duration
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
    /// List the available scenarios
    List,
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Configuration, client and engine failures. A crossed threshold is not an
/// error; it is reported through the exit code.
pub async fn run_cli(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Run {
            scenario,
            base_url,
            report_file,
            scale,
            progress_secs,
        } => {
            let mut config = LoadTestConfig::from_env().context("Failed to load configuration")?;
            if let Some(base_url) = base_url {
                config = config
                    .with_base_url(&base_url)
                    .context("Invalid --base-url")?;
            }

            let mut engine = GooseEngine::new(config.base_url.clone());
            if let Some(path) = report_file {
                engine = engine.with_report_file(path);
            }
            let setup_transport = HttpTransport::new(config.request_timeout)
                .context("Failed to build setup HTTP client")?;

            let mut runner = Runner::new(engine, config).with_scale(scale);
            if progress_secs > 0 {
                runner = runner.with_progress_interval(Duration::from_secs(progress_secs));
            }

            let report = runner
                .run(scenario, setup_transport)
                .await
                .with_context(|| format!("Scenario '{}' failed", scenario.name()))?;
            print_final_report(scenario.name(), &report.summary, &report.verdict);

            if report.passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(THRESHOLDS_FAILED_EXIT_CODE))
            }
        }
        Commands::Plan { scenario, scale } => {
            print!("{}", render_plan(scenario, scale)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::List => {
            for kind in ScenarioKind::ALL {
                println!("{:<8} {}", kind.name(), kind.description());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

pub(crate) fn render_plan(scenario: ScenarioKind, scale: f64) -> Result<String> {
    let profile = scenario.profile().scaled(scale);
    let thresholds = scenario.thresholds()?;

    let mut out = format!("Scenario: {}\n{}\n\n", scenario.name(), scenario.description());
    out.push_str("Stages:\n");
    out.push_str(&profile.to_string());
    out.push_str(&format!(
        "\nPeak users:  {}\nDuration:    {}s\nTest plan:   {}\nSetup:       {}\n",
        profile.peak_users(),
        profile.total_duration().as_secs(),
        profile.test_plan(),
        if scenario.has_setup() { "login once" } else { "none" },
    ));
    out.push_str("Thresholds:\n");
    if thresholds.is_empty() {
        out.push_str("  (none)\n");
    }
    for rule in thresholds.rules() {
        out.push_str(&format!("  {}: {}\n", rule.metric.name(), rule.expression));
    }
    Ok(out)
}
