//! Asymmetric exponential smoothing
//!
//! Increases are followed quickly so a latency spike or a stalled connection
//! widens the extrapolation window before entities start snapping. Decreases
//! are followed slowly so one lucky packet does not shrink the window right
//! before the next bad one arrives.

/// Smoothing gains for an adaptive estimate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingConfig {
    /// Weight of an observation above the current estimate
    pub rise_gain: f64,
    /// Weight of an observation at or below the current estimate
    pub decay_gain: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        // e' = (e + v) / 2 on rise, e' = (7e + v) / 8 on decay
        SmoothingConfig {
            rise_gain: 0.5,
            decay_gain: 0.125,
        }
    }
}

impl SmoothingConfig {
    /// Slower reaction in both directions, for links with heavy but
    /// short-lived jitter
    pub fn steady() -> Self {
        SmoothingConfig {
            rise_gain: 0.25,
            decay_gain: 0.0625,
        }
    }

    /// Gain applied to an observation given the current estimate
    #[inline]
    pub fn gain_for(&self, estimate: f64, observation: f64) -> f64 {
        if observation > estimate {
            self.rise_gain
        } else {
            self.decay_gain
        }
    }
}

/// A single smoothed, non-negative quantity in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdaptiveEstimate {
    value: f64,
}

impl AdaptiveEstimate {
    /// Create an estimate seeded with a first guess
    pub fn new(initial: f64) -> Self {
        AdaptiveEstimate {
            value: initial.max(0.0),
        }
    }

    /// Current estimate
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Discard history and start again from `initial`
    pub fn seed(&mut self, initial: f64) {
        self.value = initial.max(0.0);
    }

    /// Fold an observation into the estimate and return the new value
    pub fn observe(&mut self, observation: f64, config: &SmoothingConfig) -> f64 {
        let observation = observation.max(0.0);
        let gain = config.gain_for(self.value, observation);
        self.value = self.value * (1.0 - gain) + observation * gain;
        self.value
    }
}
