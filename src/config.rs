use crate::error::ScanError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 90;

/// Fixed offsets of the reveal sequence, in milliseconds.
///
/// `gauge_start_ms`, `verdict_ms` and `stats_ms` are measured from the moment
/// the sequence enters the revealing phase (result container and gauge shown).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTimings {
    pub loading_floor_ms: u64,
    pub gauge_start_ms: u64,
    pub verdict_ms: u64,
    pub stats_ms: u64,
    pub pill_stagger_ms: u64,
    pub gauge_duration_ms: u64,
    pub frame_interval_ms: u64,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            loading_floor_ms: 1000,
            gauge_start_ms: 300,
            verdict_ms: 600,
            stats_ms: 900,
            pill_stagger_ms: 100,
            gauge_duration_ms: 1500,
            frame_interval_ms: 16,
        }
    }
}

impl RevealTimings {
    /// Collapses every delay; the gauge jumps straight to its target.
    pub fn immediate() -> Self {
        Self {
            loading_floor_ms: 0,
            gauge_start_ms: 0,
            verdict_ms: 0,
            stats_ms: 0,
            pill_stagger_ms: 0,
            gauge_duration_ms: 0,
            frame_interval_ms: 1,
        }
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.frame_interval_ms == 0 {
            return Err(ScanError::ConfigError(
                "Frame interval must be greater than 0".to_string(),
            ));
        }

        if !(self.gauge_start_ms <= self.verdict_ms && self.verdict_ms <= self.stats_ms) {
            return Err(ScanError::ConfigError(
                "Reveal offsets must be ordered: gauge <= verdict <= stats".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub use_colors: bool,
    pub timings: RevealTimings,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT.to_string())
    }
}

impl ScanConfig {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            use_colors: true,
            timings: RevealTimings::default(),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_timings(mut self, timings: RevealTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ScanError::ConfigError(format!(
                "Endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ScanError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        self.timings.validate()
    }

    pub fn scan_url(&self) -> String {
        format!("{}/scan", self.endpoint)
    }

    pub fn scan_file_url(&self) -> String {
        format!("{}/scan_file", self.endpoint)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.endpoint)
    }
}
