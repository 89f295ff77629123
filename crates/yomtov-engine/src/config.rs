//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//! Environment overrides are applied on top of whatever was loaded.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::classifier::LabelStyle;
use crate::error::{Result, YomTovError};
use crate::scanner::{ScanMode, ScanOptions};

/// Default forward-search window, in days after the input date.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 14;

/// Default hebcal converter endpoint.
pub const DEFAULT_ORACLE_URL: &str = "https://www.hebcal.com/converter";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of days after the input date searched by the forward scans.
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,

    /// How the composite day label is built.
    #[serde(default)]
    pub label_style: LabelStyle,

    /// Sequential scan or parallel prefetch.
    #[serde(default)]
    pub scan_mode: ScanMode,

    /// Time budget for the forward scan, in milliseconds. Zero disables it.
    ///
    /// Classifying the input date itself is bounded only by the resolver's
    /// own timeout and retries.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// Oracle client settings.
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Settings for [`HebcalResolver`](crate::resolver::HebcalResolver).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Total attempts per date, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts, in milliseconds. Doubles after each failure.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_lookahead_days() -> u32 {
    DEFAULT_LOOKAHEAD_DAYS
}
fn default_deadline_ms() -> u64 {
    30_000
}
fn default_base_url() -> String {
    DEFAULT_ORACLE_URL.to_string()
}
fn default_timeout_ms() -> u64 {
    5_000
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    200
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookahead_days: default_lookahead_days(),
            label_style: LabelStyle::default(),
            scan_mode: ScanMode::default(),
            deadline_ms: default_deadline_ms(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| YomTovError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            YomTovError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `YOMTOV_*` environment overrides.
    ///
    /// Unparseable numeric values leave the current setting untouched.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(days) = var("YOMTOV_LOOKAHEAD_DAYS").and_then(|v| v.parse().ok()) {
            self.lookahead_days = days;
        }
        if let Some(url) = var("YOMTOV_ORACLE_URL").filter(|v| !v.is_empty()) {
            self.resolver.base_url = url;
        }
        if let Some(ms) = var("YOMTOV_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.resolver.timeout_ms = ms;
        }
        if let Some(n) = var("YOMTOV_MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
            self.resolver.max_attempts = n;
        }
    }

    /// Scan options derived from this config.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_lookahead_days: self.lookahead_days,
            mode: self.scan_mode,
            deadline: (self.deadline_ms > 0).then(|| Duration::from_millis(self.deadline_ms)),
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// `max_attempts`, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
