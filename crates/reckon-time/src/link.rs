//! Link timing model for a single remote entity
//!
//! Tracks two smoothed quantities from packet timestamps alone:
//! - latency: how long a sample took to reach us (local - packet time)
//! - update interval: how far apart consecutive samples were sent

use tracing::trace;

use crate::{AdaptiveEstimate, SmoothingConfig};

/// Raw quantities measured from one accepted packet
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkObservation {
    /// Observed one-way delay, never negative
    pub latency: f64,
    /// Time since the previous packet was sent
    pub interval: f64,
}

impl LinkObservation {
    /// Measure a packet against the previously accepted one
    #[inline]
    pub fn measure(packet_time: f64, local_time: f64, last_packet_time: f64) -> Self {
        LinkObservation {
            latency: (local_time - packet_time).max(0.0),
            interval: packet_time - last_packet_time,
        }
    }
}

/// Smoothed latency and update-interval estimates
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkEstimator {
    latency: AdaptiveEstimate,
    update_interval: AdaptiveEstimate,
    smoothing: SmoothingConfig,
}

impl LinkEstimator {
    pub fn new(smoothing: SmoothingConfig) -> Self {
        LinkEstimator {
            latency: AdaptiveEstimate::default(),
            update_interval: AdaptiveEstimate::default(),
            smoothing,
        }
    }

    /// Restart both estimates from a single observation with no history.
    /// The one measured delay stands in for both quantities.
    pub fn seed(&mut self, interval: f64) {
        self.update_interval.seed(interval);
        self.latency.seed(interval);
    }

    /// Fold one accepted packet into both estimates
    pub fn observe(
        &mut self,
        packet_time: f64,
        local_time: f64,
        last_packet_time: f64,
    ) -> LinkObservation {
        let observation = LinkObservation::measure(packet_time, local_time, last_packet_time);

        self.latency.observe(observation.latency, &self.smoothing);
        self.update_interval
            .observe(observation.interval, &self.smoothing);

        trace!(
            observed_latency = observation.latency,
            observed_interval = observation.interval,
            latency = self.latency.value(),
            update_interval = self.update_interval.value(),
            "link estimates updated"
        );

        observation
    }

    /// Smoothed one-way latency (seconds)
    #[inline]
    pub fn latency(&self) -> f64 {
        self.latency.value()
    }

    /// Smoothed interval between packets (seconds)
    #[inline]
    pub fn update_interval(&self) -> f64 {
        self.update_interval.value()
    }

    pub fn smoothing(&self) -> &SmoothingConfig {
        &self.smoothing
    }
}
