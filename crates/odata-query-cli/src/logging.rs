//! Structured logging for the inspector.
//!
//! Diagnostics go to stderr so that stdout carries only the rendered option.
//! Records emitted by the engine through the `log` facade are forwarded to
//! the same subscriber.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on configuration.
///
/// Log level precedence (highest to lowest):
///
/// 1. CLI `--log-level`
/// 2. `ODATA_QUERY_LOG_LEVEL`
/// 3. `warn`
///
/// If a global subscriber or `log` logger is already installed the call is
/// a no-op.
pub fn init_logging(config: &CliConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    // The first subscriber wins.
    let _ = subscriber.try_init();
}
