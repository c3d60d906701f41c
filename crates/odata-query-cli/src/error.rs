//! Error types and exit codes for the inspector.

use odata_query::{ErrorClass, QueryError};
use thiserror::Error;

/// Exit code for invalid configuration.
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for a rejected query option or an output failure.
pub const EXIT_BAD_REQUEST: i32 = 1;
/// Exit code for a grammar that failed to build.
pub const EXIT_INTERNAL: i32 = 3;

/// Errors raised before any query option is parsed.
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Map a failed run to the process exit code.
///
/// Query errors are classified by [`QueryError::class`]; anything else is
/// treated as a bad request.
#[must_use]
pub fn exit_code(report: &eyre::Report) -> i32 {
    match report.downcast_ref::<QueryError>().map(QueryError::class) {
        Some(ErrorClass::Internal) => EXIT_INTERNAL,
        Some(ErrorClass::BadRequest) | None => EXIT_BAD_REQUEST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odata_query::parse_top_string;

    #[test]
    fn invalid_config_error_displays_message() {
        let error = CliError::InvalidConfig("unknown log level".to_owned());
        assert_eq!(
            error.to_string(),
            "invalid configuration: unknown log level"
        );
    }

    #[test]
    fn rejected_option_exits_as_bad_request() {
        let report = parse_top_string("ten").map_or_else(eyre::Report::new, |_| {
            eyre::eyre!("unexpected success")
        });
        assert_eq!(exit_code(&report), EXIT_BAD_REQUEST);
        assert!(report.downcast_ref::<QueryError>().is_some());
    }

    #[test]
    fn unrelated_failure_exits_as_bad_request() {
        assert_eq!(exit_code(&eyre::eyre!("output closed")), EXIT_BAD_REQUEST);
    }
}
