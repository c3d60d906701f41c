//! Inspector configuration parsed from environment variables.
//!
//! Settings can be supplied through variables prefixed with `ODATA_QUERY_`
//! and overridden by command-line flags.

use std::env;
use std::str::FromStr;

use crate::error::CliError;

/// Environment variable selecting the log level.
pub const LOG_LEVEL_VAR: &str = "ODATA_QUERY_LOG_LEVEL";
/// Environment variable selecting the output format.
pub const OUTPUT_VAR: &str = "ODATA_QUERY_OUTPUT";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn` so that inspection output is not interleaved with
/// engine diagnostics unless asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every rule and token decision made by the engine.
    Trace,
    /// Grammar construction and operator registration.
    Debug,
    /// Standard informational messages.
    Info,
    /// Warning messages for potentially problematic situations.
    #[default]
    Warn,
    /// Error messages for failures.
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub const fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// How a parsed option is written to standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented tree, one node per line.
    #[default]
    Tree,
    /// Postfix token values on a single line.
    Postfix,
    /// One token per line with its kind and byte offset.
    Tokens,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(Self::Tree),
            "postfix" | "rpn" => Ok(Self::Postfix),
            "tokens" => Ok(Self::Tokens),
            "json" => Ok(Self::Json),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown output format '{s}', expected one of: tree, postfix, tokens, json"
            ))),
        }
    }
}

/// Configuration for a single inspector run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level for engine diagnostics written to standard error.
    pub log_level: LogLevel,
    /// Rendering used for the parsed option.
    pub output: OutputFormat,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads [`LOG_LEVEL_VAR`] and [`OUTPUT_VAR`], falling back to defaults for
    /// missing values.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a looked-up value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(val) => val.parse()?,
            None => LogLevel::default(),
        };
        let output = match lookup(OUTPUT_VAR) {
            Some(val) => val.parse()?,
            None => OutputFormat::default(),
        };
        Ok(Self { log_level, output })
    }

    /// Apply command-line overrides on top of environment-based values.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        output: Option<OutputFormat>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(format) = output {
            self.output = format;
        }
        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub const fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}
