//! Extrapolator configuration

use reckon_time::SmoothingConfig;

/// Time deltas below this are treated as zero when dividing by them.
pub const DEGENERATE_DT: f64 = 1e-4;

/// Extrapolator configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrapolatorConfig {
    /// Threshold under which a time delta is too small to divide by
    pub degenerate_dt: f64,
    /// Gains for the latency and update-interval estimates
    pub smoothing: SmoothingConfig,
}

impl Default for ExtrapolatorConfig {
    fn default() -> Self {
        ExtrapolatorConfig {
            degenerate_dt: DEGENERATE_DT,
            smoothing: SmoothingConfig::default(),
        }
    }
}

impl ExtrapolatorConfig {
    /// Configuration for links with heavy, short-lived jitter
    pub fn steady() -> Self {
        ExtrapolatorConfig {
            smoothing: SmoothingConfig::steady(),
            ..Self::default()
        }
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingConfig) -> Self {
        self.smoothing = smoothing;
        self
    }
}
