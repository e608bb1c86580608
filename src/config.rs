//! Centralized configuration management for boardpass

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Log file written by both the TUI and the CLI
    pub log_file: PathBuf,
    /// Submission configuration
    pub submission: SubmissionConfig,
    /// Terminal UI configuration
    pub ui: UiConfig,
}

/// Submission timing and demo data configuration
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    /// Simulated backend latency (milliseconds)
    pub delay_ms: u64,
    /// Deadline for a single backend call (milliseconds)
    pub timeout_ms: u64,
    /// Fixed seed for generated boarding pass data
    pub seed: Option<u64>,
}

/// Terminal UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Event poll interval, also the spinner frame rate (milliseconds)
    pub tick_rate_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            timeout_ms: 30_000,
            seed: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 100 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("boardpass.log"),
            submission: SubmissionConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let log_file = std::env::var("BOARDPASS_LOG_FILE")
            .unwrap_or_else(|_| "boardpass.log".to_string())
            .into();

        let submission = SubmissionConfig {
            delay_ms: parse_env_var("BOARDPASS_SUBMIT_DELAY_MS")?.unwrap_or(2000),
            timeout_ms: parse_env_var("BOARDPASS_SUBMIT_TIMEOUT_MS")?.unwrap_or(30_000),
            seed: parse_env_var("BOARDPASS_SEED")?,
        };

        let ui = UiConfig {
            tick_rate_ms: parse_env_var("BOARDPASS_TICK_RATE_MS")?.unwrap_or(100),
        };

        Ok(Config {
            log_file,
            submission,
            ui,
        })
    }

    /// Get simulated submission delay as Duration
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submission.delay_ms)
    }

    /// Get submission deadline as Duration
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submission.timeout_ms)
    }

    /// Get UI tick rate as Duration
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.ui.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("Tick rate must be greater than zero"));
        }

        if self.submission.timeout_ms == 0 {
            return Err(anyhow::anyhow!("Submission timeout must be greater than zero"));
        }

        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Log file parent directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
