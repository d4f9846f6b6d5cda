use std::fmt;

/// Errors raised outside of scenario iterations
///
/// Inside an iteration nothing is fatal: failed requests and failed checks are
/// recorded and the iteration carries on. These variants cover the parts of a
/// run that can stop it from starting or from producing a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTestError {
    /// A configuration value could not be used
    InvalidConfig {
        /// Name of the setting (environment variable or flag)
        setting: String,
        /// Why the value was rejected
        reason: String,
    },
    /// A threshold expression did not parse
    InvalidThreshold {
        /// The metric the expression belongs to
        metric: String,
        /// The rejected expression
        expression: String,
    },
    /// The load-generation engine failed to start or finish the attack
    Engine(String),
    /// The HTTP client used for setup/teardown could not be built
    Client(String),
}

impl fmt::Display for LoadTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadTestError::InvalidConfig { setting, reason } => {
                write!(f, "invalid configuration for {setting}: {reason}")
            }
            LoadTestError::InvalidThreshold { metric, expression } => {
                write!(
                    f,
                    "invalid threshold '{expression}' for metric {metric}. \
                    Expected forms like p(95)<500, avg<200 or rate<0.01"
                )
            }
            LoadTestError::Engine(msg) => write!(f, "load engine error: {msg}"),
            LoadTestError::Client(msg) => write!(f, "http client error: {msg}"),
        }
    }
}

impl std::error::Error for LoadTestError {}
