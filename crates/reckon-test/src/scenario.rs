//! Tracking scenarios
//!
//! Drives an extrapolator the way a game client would: samples come off a
//! simulated link whenever they arrive, and the position is read once per
//! rendered frame and compared with where the entity really is.

use reckon_core::{ReckonError, ReckonResult};
use reckon_extrapolate::{Extrapolator, ExtrapolatorConfig};
use tracing::debug;

use crate::{distance, Delivery, SimulatedLink, Trajectory};

/// Scenario configuration
#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    /// Simulated duration (seconds)
    pub duration: f64,
    /// Time between rendered frames (seconds)
    pub frame_interval: f64,
    /// Frames before this time are not scored
    pub warmup: f64,
    /// Whether samples carry the sender's velocity or it must be inferred
    pub send_velocity: bool,
    /// Extrapolator under test
    pub extrapolator: ExtrapolatorConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            duration: 10.0,
            frame_interval: 1.0 / 60.0,
            warmup: 1.0,
            send_velocity: true,
            extrapolator: ExtrapolatorConfig::default(),
        }
    }
}

/// Outcome of a scenario run
#[derive(Clone, Debug, Default)]
pub struct TrackingReport {
    /// Frames rendered after the first sample arrived
    pub reads: u32,
    /// Reads that had to be clamped to the extrapolation window
    pub out_of_range: u32,
    /// Samples accepted by the extrapolator (the seeding sample included)
    pub accepted: u32,
    /// Samples rejected as stale
    pub rejected: u32,
    /// Worst distance from the truth after warmup
    pub max_error: f64,
    /// Mean distance from the truth after warmup
    pub mean_error: f64,
    /// Largest movement of the rendered position between two frames
    pub max_frame_step: f64,
    /// Estimates at the end of the run
    pub latency_estimate: f64,
    pub update_time_estimate: f64,
}

/// A trajectory observed through a link
pub struct TrackingScenario {
    config: ScenarioConfig,
    trajectory: Trajectory,
}

impl TrackingScenario {
    pub fn new(config: ScenarioConfig, trajectory: Trajectory) -> Self {
        TrackingScenario { config, trajectory }
    }

    /// Run the scenario over `link`
    pub fn run(&self, link: &mut SimulatedLink) -> ReckonResult<TrackingReport> {
        let cfg = &self.config;
        let send_interval = link.profile().send_interval;
        check_interval("send_interval", send_interval)?;
        check_interval("frame_interval", cfg.frame_interval)?;

        let mut ex = Extrapolator::<f64>::try_with_config(2, cfg.extrapolator)?;
        let mut report = TrackingReport::default();
        let mut inbox: Vec<Delivery> = Vec::new();

        let mut sent = 0u32;
        let mut next_send = 0.0;

        let mut shown = [0.0; 2];
        let mut previous: Option<[f64; 2]> = None;
        let mut error_sum = 0.0;
        let mut scored = 0u32;

        let frames = (cfg.duration / cfg.frame_interval).ceil() as u32;
        for frame in 0..=frames {
            let now = frame as f64 * cfg.frame_interval;

            while next_send <= now {
                link.send(
                    next_send,
                    self.trajectory.position(next_send),
                    self.trajectory.velocity(next_send),
                );
                sent += 1;
                next_send = sent as f64 * send_interval;
            }

            inbox.clear();
            link.deliver_until(now, &mut inbox);
            for delivery in &inbox {
                self.ingest(&mut ex, delivery, now, &mut report)?;
            }

            if !ex.is_tracking() {
                continue;
            }

            report.reads += 1;
            if !ex.try_read_position(now, &mut shown)? {
                report.out_of_range += 1;
            }

            if let Some(previous) = previous {
                report.max_frame_step = report.max_frame_step.max(distance(&previous, &shown));
            }
            previous = Some(shown);

            if now >= cfg.warmup {
                let error = distance(&shown, &self.trajectory.position(now));
                report.max_error = report.max_error.max(error);
                error_sum += error;
                scored += 1;
            }
        }

        if scored > 0 {
            report.mean_error = error_sum / scored as f64;
        }
        report.latency_estimate = ex.estimate_latency();
        report.update_time_estimate = ex.estimate_update_time();

        debug!(
            reads = report.reads,
            accepted = report.accepted,
            rejected = report.rejected,
            out_of_range = report.out_of_range,
            max_error = report.max_error,
            mean_error = report.mean_error,
            "tracking scenario finished"
        );

        Ok(report)
    }

    fn ingest(
        &self,
        ex: &mut Extrapolator<f64>,
        delivery: &Delivery,
        now: f64,
        report: &mut TrackingReport,
    ) -> ReckonResult<()> {
        if !ex.is_tracking() {
            if self.config.send_velocity {
                ex.try_reset_with_velocity(
                    delivery.packet_time,
                    now,
                    &delivery.position,
                    &delivery.velocity,
                )?;
            } else {
                ex.try_reset(delivery.packet_time, now, &delivery.position)?;
            }
            report.accepted += 1;
            return Ok(());
        }

        let accepted = if self.config.send_velocity {
            ex.try_add_sample_with_velocity(
                delivery.packet_time,
                now,
                &delivery.position,
                &delivery.velocity,
            )?
        } else {
            ex.try_add_sample(delivery.packet_time, now, &delivery.position)?
        };

        if accepted {
            report.accepted += 1;
        } else {
            report.rejected += 1;
        }
        Ok(())
    }
}

/// Both clocks of a scenario must advance
fn check_interval(name: &str, interval: f64) -> ReckonResult<()> {
    if interval.is_finite() && interval > 0.0 {
        Ok(())
    } else {
        Err(ReckonError::InvalidConfig(format!(
            "{name} must be positive, got {interval}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinkProfile;
    use proptest::prelude::*;

    fn linear() -> Trajectory {
        Trajectory::Linear {
            origin: [0.0, 0.0],
            velocity: [1.0, 0.5],
        }
    }

    #[test]
    fn test_lossless_linear_tracks_exactly() {
        let scenario = TrackingScenario::new(ScenarioConfig::default(), linear());
        let mut link = SimulatedLink::new(LinkProfile::lossless(0.05, 0.05), 1);

        let report = scenario.run(&mut link).unwrap();
        assert_eq!(report.rejected, 0);
        assert_eq!(report.out_of_range, 0);
        assert!(report.max_error < 0.01, "max error {}", report.max_error);
    }

    #[test]
    fn test_inferred_velocity_tracks_linear() {
        let config = ScenarioConfig {
            send_velocity: false,
            warmup: 2.0,
            ..ScenarioConfig::default()
        };
        let scenario = TrackingScenario::new(config, linear());
        let mut link = SimulatedLink::new(LinkProfile::lossless(0.05, 0.05), 1);

        let report = scenario.run(&mut link).unwrap();
        assert!(report.max_error < 0.01, "max error {}", report.max_error);
    }

    #[test]
    fn test_estimates_match_steady_link() {
        let config = ScenarioConfig {
            frame_interval: 0.001,
            ..ScenarioConfig::default()
        };
        let scenario = TrackingScenario::new(config, linear());
        let mut link = SimulatedLink::new(LinkProfile::lossless(0.05, 0.08), 1);

        let report = scenario.run(&mut link).unwrap();
        assert!((report.update_time_estimate - 0.05).abs() < 1e-3);
        assert!(report.latency_estimate > 0.075 && report.latency_estimate < 0.085);
    }

    #[test]
    fn test_circle_error_bounded() {
        let trajectory = Trajectory::Circle {
            center: [0.0, 0.0],
            radius: 1.0,
            angular_speed: 1.0,
        };
        let scenario = TrackingScenario::new(ScenarioConfig::default(), trajectory);
        let mut link = SimulatedLink::new(LinkProfile::good(), 9);

        let report = scenario.run(&mut link).unwrap();
        assert!(report.mean_error < 0.1, "mean error {}", report.mean_error);
    }

    #[test]
    fn test_poor_link_rejects_but_stays_smooth() {
        let scenario = TrackingScenario::new(ScenarioConfig::default(), linear());
        let mut link = SimulatedLink::new(LinkProfile::poor(), 5);

        let report = scenario.run(&mut link).unwrap();
        assert!(report.rejected > 0);
        assert!(report.max_error.is_finite());
        assert_eq!(
            report.accepted + report.rejected,
            link.stats().delivered
        );

        // Entity moves ~1.1 units/s, a frame is 1/60s; generous bound on
        // how far the rendered position may move between two frames
        assert!(report.max_frame_step < 0.5, "step {}", report.max_frame_step);
    }

    #[test]
    fn test_stop_and_go_settles() {
        let trajectory = Trajectory::StopAndGo {
            speed: 2.0,
            period: 2.0,
        };
        let scenario = TrackingScenario::new(ScenarioConfig::default(), trajectory);
        let mut link = SimulatedLink::new(LinkProfile::good(), 11);

        let report = scenario.run(&mut link).unwrap();
        assert!(report.mean_error < 0.15, "mean error {}", report.mean_error);
    }

    #[test]
    fn test_non_advancing_clocks_rejected() {
        let scenario = TrackingScenario::new(ScenarioConfig::default(), linear());
        let mut link = SimulatedLink::new(LinkProfile::lossless(0.0, 0.05), 1);
        assert_eq!(
            scenario.run(&mut link).unwrap_err(),
            ReckonError::InvalidConfig("send_interval must be positive, got 0".into())
        );
        assert_eq!(link.stats().sent, 0);

        let config = ScenarioConfig {
            frame_interval: 0.0,
            ..ScenarioConfig::default()
        };
        let scenario = TrackingScenario::new(config, linear());
        let mut link = SimulatedLink::new(LinkProfile::lossless(0.05, 0.05), 1);
        assert!(matches!(
            scenario.run(&mut link),
            Err(ReckonError::InvalidConfig(msg)) if msg.starts_with("frame_interval")
        ));

        let mut link = SimulatedLink::new(LinkProfile::lossless(-0.05, 0.05), 1);
        let scenario = TrackingScenario::new(ScenarioConfig::default(), linear());
        assert!(scenario.run(&mut link).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_any_seed_runs_clean(seed in any::<u64>()) {
            let config = ScenarioConfig {
                duration: 3.0,
                ..ScenarioConfig::default()
            };
            let scenario = TrackingScenario::new(config, linear());
            let mut link = SimulatedLink::new(LinkProfile::poor(), seed);

            let report = scenario.run(&mut link).unwrap();
            prop_assert!(report.max_error.is_finite());
            prop_assert!(report.latency_estimate >= 0.0);
            prop_assert!(report.update_time_estimate >= 0.0);
        }
    }
}
