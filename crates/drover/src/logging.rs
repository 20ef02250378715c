//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for the log filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `DROVER_LOG` environment variable (full `EnvFilter` syntax)
//! 3. default to `info`
//!
//! Logs go to stderr so stdout stays free for job outcomes.

use drover_cli::LogLevel;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "DROVER_LOG";

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(cli_level: Option<LogLevel>) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(directive(level)),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive() {
        assert_eq!(directive(LogLevel::Warn), "warn");
        assert_eq!(directive(LogLevel::Trace), "trace");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(Some(LogLevel::Debug));
        init_logging(None);
    }
}
