//! Environment configuration for the bridge.
//!
//! Configuration can be set via environment variables:
//! - `TASKQUEUE_BIN` - Optional. Explicit path to the taskqueue executable,
//!   skipping locator probing.
//! - `WORKSPACE_PATH` - Optional. Working directory for CLI invocations.
//!   Defaults to the current directory.
//! - `TASKQUEUE_DEBUG` - Optional. Enables verbose invocation logging.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Bridge configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit executable path; bypasses the locator when set.
    pub cli_override: Option<String>,

    /// Working directory that CLI invocations are bound to.
    pub working_dir: PathBuf,

    /// Verbose invocation logging.
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let cli_override = match std::env::var("TASKQUEUE_BIN") {
            Ok(value) if value.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(
                    "TASKQUEUE_BIN".to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Ok(value) => Some(value),
            Err(_) => None,
        };

        let working_dir = std::env::var("WORKSPACE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            });

        let debug = std::env::var("TASKQUEUE_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            cli_override,
            working_dir,
            debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var access races across test threads, so the TASKQUEUE_BIN cases
    // share one test.
    #[test]
    fn bin_override_parsing() {
        std::env::set_var("TASKQUEUE_BIN", "  ");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "TASKQUEUE_BIN"));

        std::env::set_var("TASKQUEUE_BIN", "/opt/bin/taskqueue");
        let config = Config::from_env().unwrap();
        assert_eq!(config.cli_override.as_deref(), Some("/opt/bin/taskqueue"));

        std::env::remove_var("TASKQUEUE_BIN");
        let config = Config::from_env().unwrap();
        assert!(config.cli_override.is_none());
    }
}
