//! Command line configuration parsed from environment variables.
//!
//! Settings are read from variables prefixed with `SONGPAT_` and may then be
//! overridden by command line flags.

use std::env;
use std::str::FromStr;

use crate::error::CliError;

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "SONGPAT_LOG_LEVEL";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn` so library diagnostics stay quiet unless asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging, includes all trace spans.
    Trace,
    /// Debug-level information such as cache misses and dropped tags.
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
        match s.trim().to_lowercase().as_str() {
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
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Configuration for one `songpat` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
    /// Capacity of the global formatter cache, when set on the command line.
    ///
    /// `None` leaves `SONGPAT_CACHE_CAPACITY` or the library default in
    /// charge.
    pub cache_capacity: Option<usize>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `SONGPAT_LOG_LEVEL` and falls back to defaults for missing
    /// values.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = match lookup(LOG_LEVEL_ENV) {
            Some(val) => val.parse()?,
            None => LogLevel::default(),
        };

        Ok(Self {
            log_level,
            cache_capacity: None,
        })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// Command line flags take precedence over environment-based values.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        cache_capacity: Option<usize>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }

        if let Some(capacity) = cache_capacity {
            self.cache_capacity = Some(capacity);
        }

        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Push library settings into `songpat_patterns::config`.
    ///
    /// Must run before the first pattern is compiled; the global cache reads
    /// its capacity once.
    pub fn apply_to_libraries(&self) {
        if let Some(capacity) = self.cache_capacity {
            songpat_patterns::config::set_cache_capacity(capacity);
        }
    }
}
