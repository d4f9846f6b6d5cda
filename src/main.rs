use std::process::ExitCode;

use clap::Parser;
use conduit_loadtest::cli::{run_cli, Cli};
use conduit_loadtest::logging::{init_logging_with_config, LogConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match init_logging_with_config(&LogConfig::from_env()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: {err:#}");
            None
        }
    };

    match run_cli(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "run aborted");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
