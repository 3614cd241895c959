//! Simulated unreliable link
//!
//! Models the conditions extrapolation has to hide:
//! - Latency and jitter
//! - Packet loss
//! - Reordering
//!
//! All randomness comes from a seeded `StdRng` so runs are reproducible.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Jitter distribution type
#[derive(Clone, Debug)]
pub enum JitterDistribution {
    /// No jitter at all
    None,
    /// Uniform distribution
    Uniform { min_ms: u32, max_ms: u32 },
    /// Normal distribution (mean, stddev)
    Normal { mean_ms: f64, stddev_ms: f64 },
    /// Pareto distribution (heavy tail)
    Pareto { scale_ms: f64, shape: f64 },
}

impl JitterDistribution {
    /// Sample a jitter value in seconds
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        let ms = match self {
            JitterDistribution::None => 0.0,
            JitterDistribution::Uniform { min_ms, max_ms } => {
                let dist = Uniform::new_inclusive(*min_ms, *max_ms);
                dist.sample(rng) as f64
            }
            JitterDistribution::Normal { mean_ms, stddev_ms } => {
                // Box-Muller transform
                let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
                let u2: f64 = rng.gen();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                (mean_ms + stddev_ms * z).max(0.0)
            }
            JitterDistribution::Pareto { scale_ms, shape } => {
                let u: f64 = rng.gen();
                (scale_ms / u.powf(1.0 / shape)).min(1000.0) // Cap at 1 second
            }
        };
        ms / 1000.0
    }
}

/// Link conditions
#[derive(Clone, Debug)]
pub struct LinkProfile {
    /// Interval between samples sent by the remote side (seconds)
    pub send_interval: f64,
    /// Base one-way latency (seconds)
    pub base_latency: f64,
    /// Jitter added on top of the base latency
    pub jitter: JitterDistribution,
    /// Packet loss rate (0.0 - 1.0)
    pub loss_rate: f64,
    /// Probability a packet is held back past its successors
    pub reorder_prob: f64,
    /// Extra delay applied to held-back packets (seconds)
    pub reorder_delay: f64,
}

impl Default for LinkProfile {
    fn default() -> Self {
        LinkProfile {
            send_interval: 0.05,
            base_latency: 0.05,
            jitter: JitterDistribution::Uniform {
                min_ms: 0,
                max_ms: 30,
            },
            loss_rate: 0.01,
            reorder_prob: 0.02,
            reorder_delay: 0.1,
        }
    }
}

impl LinkProfile {
    /// Perfectly regular link: constant latency, nothing lost
    pub fn lossless(send_interval: f64, latency: f64) -> Self {
        LinkProfile {
            send_interval,
            base_latency: latency,
            jitter: JitterDistribution::None,
            loss_rate: 0.0,
            reorder_prob: 0.0,
            reorder_delay: 0.0,
        }
    }

    /// Good network conditions
    pub fn good() -> Self {
        LinkProfile {
            send_interval: 0.05,
            base_latency: 0.02,
            jitter: JitterDistribution::Uniform {
                min_ms: 0,
                max_ms: 10,
            },
            loss_rate: 0.001,
            reorder_prob: 0.0,
            reorder_delay: 0.0,
        }
    }

    /// Poor network conditions
    pub fn poor() -> Self {
        LinkProfile {
            send_interval: 0.05,
            base_latency: 0.1,
            jitter: JitterDistribution::Pareto {
                scale_ms: 50.0,
                shape: 1.5,
            },
            loss_rate: 0.05,
            reorder_prob: 0.1,
            reorder_delay: 0.15,
        }
    }
}

/// A sample as it comes off the link
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub packet_time: f64,
    pub arrival_time: f64,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
}

/// Link statistics
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkStats {
    pub sent: u32,
    pub lost: u32,
    pub held_back: u32,
    pub delivered: u32,
}

/// Seeded link carrying position samples from a remote entity
pub struct SimulatedLink {
    profile: LinkProfile,
    rng: StdRng,
    in_flight: Vec<Delivery>,
    stats: LinkStats,
}

impl SimulatedLink {
    pub fn new(profile: LinkProfile, seed: u64) -> Self {
        SimulatedLink {
            profile,
            rng: StdRng::seed_from_u64(seed),
            in_flight: Vec::new(),
            stats: LinkStats::default(),
        }
    }

    /// Put a sample on the wire. Returns `false` if it was lost.
    pub fn send(&mut self, packet_time: f64, position: [f64; 2], velocity: [f64; 2]) -> bool {
        self.stats.sent += 1;

        if self.profile.loss_rate > 0.0 && self.rng.gen_bool(self.profile.loss_rate) {
            self.stats.lost += 1;
            return false;
        }

        let mut delay = self.profile.base_latency + self.profile.jitter.sample(&mut self.rng);
        if self.profile.reorder_prob > 0.0 && self.rng.gen_bool(self.profile.reorder_prob) {
            delay += self.profile.reorder_delay;
            self.stats.held_back += 1;
        }

        self.in_flight.push(Delivery {
            packet_time,
            arrival_time: packet_time + delay,
            position,
            velocity,
        });
        true
    }

    /// Move everything that has arrived by `local_time` into `out`, in
    /// arrival order
    pub fn deliver_until(&mut self, local_time: f64, out: &mut Vec<Delivery>) {
        let start = out.len();

        let mut i = 0;
        while i < self.in_flight.len() {
            if self.in_flight[i].arrival_time <= local_time {
                out.push(self.in_flight.swap_remove(i));
            } else {
                i += 1;
            }
        }

        out[start..].sort_by(|a, b| a.arrival_time.total_cmp(&b.arrival_time));
        self.stats.delivered += (out.len() - start) as u32;
    }

    pub fn profile(&self) -> &LinkProfile {
        &self.profile
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
