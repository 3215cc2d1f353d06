//! Logging initialization.

use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LoggingConfig {
    /// Log level filter; `RUST_LOG` takes precedence when set.
    #[clap(long = "log-level", env = "RELAY_LOG_LEVEL", default_value = "info")]
    pub level: String,

    /// Log line format.
    #[clap(
        long = "log-format",
        env = "RELAY_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Installs the global tracing subscriber. Call once, from `main`.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format {
            LogFormat::Json => {
                fmt().json().with_env_filter(filter).init();
            }
            LogFormat::Pretty => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}
