//! Limiter configuration.
//!
//! Both values are read once at startup and stay fixed for the life of the
//! process. They can come from the `[limiter]` table of a TOML file, from
//! environment variables, or fall back to the defaults (600 seconds, 3
//! attempts).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GuardError, GuardResult};

/// Environment variable overriding [`LimiterConfig::window_seconds`].
pub const WINDOW_SECONDS_ENV: &str = "LOGINGUARD_WINDOW_SECONDS";
/// Environment variable overriding [`LimiterConfig::max_attempts`].
pub const MAX_ATTEMPTS_ENV: &str = "LOGINGUARD_MAX_ATTEMPTS";

pub const DEFAULT_WINDOW_SECONDS: u64 = 600;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Window size and threshold shared by every tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Length of the trailing window, in seconds.
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    /// Failures inside the window at which attempts start being denied.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_window_seconds() -> u64 {
    DEFAULT_WINDOW_SECONDS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl LimiterConfig {
    pub fn new(window_seconds: u64, max_attempts: u32) -> GuardResult<Self> {
        let config = Self {
            window_seconds,
            max_attempts,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    /// Rejects a zero window or a zero threshold.
    pub fn validate(&self) -> GuardResult<()> {
        if self.window_seconds == 0 {
            return Err(GuardError::InvalidConfig(
                "window_seconds must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(GuardError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads the `[limiter]` table from a TOML file at `path`.
    ///
    /// A file without that table yields the defaults.
    ///
    /// # Errors
    ///
    /// - [`GuardError::NotFound`] if the file does not exist.
    /// - [`GuardError::PermissionDenied`] if the file is not readable.
    /// - [`GuardError::ConfigParse`] if the TOML is malformed.
    /// - [`GuardError::InvalidConfig`] if a value is out of range.
    pub fn load(path: &Path) -> GuardResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GuardError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                GuardError::PermissionDenied(path.to_path_buf())
            }
            _ => GuardError::Io(e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> GuardResult<Self> {
        #[derive(Deserialize)]
        struct File {
            #[serde(default)]
            limiter: LimiterConfig,
        }

        let file: File =
            toml::from_str(content).map_err(|e| GuardError::ConfigParse(e.to_string()))?;
        file.limiter.validate()?;
        Ok(file.limiter)
    }

    /// Defaults overlaid with the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Applies `LOGINGUARD_WINDOW_SECONDS` and `LOGINGUARD_MAX_ATTEMPTS`.
    ///
    /// Values that do not parse, or are zero, are ignored with a warning.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(WINDOW_SECONDS_ENV).ok().as_deref(),
            std::env::var(MAX_ATTEMPTS_ENV).ok().as_deref(),
        );
    }

    fn apply_overrides(&mut self, window: Option<&str>, attempts: Option<&str>) {
        if let Some(raw) = window {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.window_seconds = secs,
                _ => tracing::warn!(
                    "Ignoring {WINDOW_SECONDS_ENV}={raw:?}, keeping {}",
                    self.window_seconds
                ),
            }
        }
        if let Some(raw) = attempts {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => self.max_attempts = n,
                _ => tracing::warn!(
                    "Ignoring {MAX_ATTEMPTS_ENV}={raw:?}, keeping {}",
                    self.max_attempts
                ),
            }
        }
    }
}
