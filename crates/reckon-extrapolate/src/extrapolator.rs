//! Dead-reckoning extrapolator
//!
//! The extrapolator keeps one linear segment, the *snapshot*, that queries are
//! answered from. Every accepted sample replaces it with a new segment that:
//! - starts where the old segment was at the moment the sample arrived, so the
//!   rendered position never jumps
//! - ends at the *aim point*, the sample projected one update interval into
//!   the future along its own velocity
//!
//! Following the slope between aim points instead of the raw per-packet
//! velocity is what keeps the path smooth under jitter while still arriving
//! exactly where the remote entity is expected to be.
//!
//! Stale samples and queries outside the extrapolation window are ordinary
//! outcomes and come back as `bool`. Using an instance before [`reset`] or
//! passing slices of the wrong length is a bug: the plain methods panic, the
//! `try_*` methods return a [`ReckonError`].
//!
//! [`reset`]: Extrapolator::reset

use reckon_core::{Element, ReckonError, ReckonResult};
use reckon_time::LinkEstimator;
use tracing::{debug, trace};

use crate::ExtrapolatorConfig;

/// Lifecycle of an extrapolator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, no sample seen yet
    Uninitialized,
    /// Seeded by `reset`; never left again
    Tracking,
}

/// Extrapolator for a vector of `dimension` elements
#[derive(Clone, Debug)]
pub struct Extrapolator<T: Element> {
    config: ExtrapolatorConfig,
    phase: Phase,

    /// Most recently accepted raw sample
    last_packet_position: Vec<T>,
    last_packet_time: f64,

    /// Segment queries are answered from
    snapshot_position: Vec<T>,
    snapshot_velocity: Vec<T>,
    snapshot_time: f64,

    /// Where the current segment is heading
    aim_position: Vec<T>,
    aim_time: f64,

    link: LinkEstimator,

    // Scratch, sized once in the constructor
    sample_velocity: Vec<T>,
    next_snapshot: Vec<T>,
}

impl<T: Element> Extrapolator<T> {
    /// Create an extrapolator with the default configuration.
    ///
    /// Panics if `dimension` is zero.
    #[track_caller]
    pub fn new(dimension: usize) -> Self {
        Self::with_config(dimension, ExtrapolatorConfig::default())
    }

    /// Create an extrapolator with a custom configuration.
    ///
    /// Panics if `dimension` is zero.
    #[track_caller]
    pub fn with_config(dimension: usize, config: ExtrapolatorConfig) -> Self {
        fail_fast(Self::try_with_config(dimension, config))
    }

    pub fn try_with_config(dimension: usize, config: ExtrapolatorConfig) -> ReckonResult<Self> {
        if dimension == 0 {
            return Err(ReckonError::ZeroDimension);
        }

        let buffer = || vec![T::zero(); dimension];

        Ok(Extrapolator {
            config,
            phase: Phase::Uninitialized,
            last_packet_position: buffer(),
            last_packet_time: 0.0,
            snapshot_position: buffer(),
            snapshot_velocity: buffer(),
            snapshot_time: 0.0,
            aim_position: buffer(),
            aim_time: 0.0,
            link: LinkEstimator::new(config.smoothing),
            sample_velocity: buffer(),
            next_snapshot: buffer(),
        })
    }


    /// Forget all history and start from one known sample at rest.
    ///
    /// Panics if a time is not finite, `packet_time > local_time`, or
    /// `position` has the wrong length.
    #[track_caller]
    pub fn reset(&mut self, packet_time: f64, local_time: f64, position: &[T]) {
        fail_fast(self.try_reset(packet_time, local_time, position))
    }

    /// Forget all history and start from one known sample and velocity.
    ///
    /// Panics if a time is not finite, `packet_time > local_time`, or a
    /// slice has the wrong length.
    #[track_caller]
    pub fn reset_with_velocity(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: &[T],
        velocity: &[T],
    ) {
        fail_fast(self.try_reset_with_velocity(packet_time, local_time, position, velocity))
    }

    pub fn try_reset(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: &[T],
    ) -> ReckonResult<()> {
        self.seed(packet_time, local_time, position, None)
    }

    pub fn try_reset_with_velocity(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: &[T],
        velocity: &[T],
    ) -> ReckonResult<()> {
        self.seed(packet_time, local_time, position, Some(velocity))
    }

    fn seed(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: &[T],
        velocity: Option<&[T]>,
    ) -> ReckonResult<()> {
        self.check_sample(position, velocity)?;
        ReckonError::check_times(packet_time, local_time)?;
        if packet_time > local_time {
            return Err(ReckonError::PacketAfterLocalTime {
                packet_time,
                local_time,
            });
        }

        // With a single observation the delay is the only timing information,
        // so it stands in for both the interval and the latency.
        let interval = local_time - packet_time;

        self.last_packet_time = packet_time;
        assign_all(&mut self.last_packet_position, position);
        self.snapshot_time = local_time;
        assign_all(&mut self.snapshot_position, position);
        self.link.seed(interval);
        self.aim_time = local_time + interval;
        match velocity {
            Some(velocity) => assign_all(&mut self.snapshot_velocity, velocity),
            None => zero_all(&mut self.snapshot_velocity),
        }
        project(
            &mut self.aim_position,
            &self.snapshot_position,
            &self.snapshot_velocity,
            interval,
        );
        self.phase = Phase::Tracking;

        debug!(
            dimension = self.dimension(),
            packet_time,
            local_time,
            interval,
            "extrapolator reset"
        );
        Ok(())
    }


    /// Feed a sample whose velocity is inferred from the previous sample.
    ///
    /// Returns `false` (and changes nothing) if the sample is not newer than
    /// the last accepted one. Panics if a time is not finite.
    #[track_caller]
    pub fn add_sample(&mut self, packet_time: f64, local_time: f64, position: &[T]) -> bool {
        fail_fast(self.try_add_sample(packet_time, local_time, position))
    }

    /// Feed a sample with an explicit velocity.
    ///
    /// Returns `false` (and changes nothing) if the sample is not newer than
    /// the last accepted one. Panics if a time is not finite.
    #[track_caller]
    pub fn add_sample_with_velocity(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: &[T],
        velocity: &[T],
    ) -> bool {
        fail_fast(self.try_add_sample_with_velocity(packet_time, local_time, position, velocity))
    }

    pub fn try_add_sample(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: &[T],
    ) -> ReckonResult<bool> {
        self.ingest(packet_time, local_time, position, None)
    }

    pub fn try_add_sample_with_velocity(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: &[T],
        velocity: &[T],
    ) -> ReckonResult<bool> {
        self.ingest(packet_time, local_time, position, Some(velocity))
    }

    fn ingest(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: &[T],
        velocity: Option<&[T]>,
    ) -> ReckonResult<bool> {
        self.ensure_tracking()?;
        self.check_sample(position, velocity)?;
        ReckonError::check_times(packet_time, local_time)?;

        if packet_time <= self.last_packet_time {
            trace!(
                packet_time,
                last_packet_time = self.last_packet_time,
                "stale sample rejected"
            );
            return Ok(false);
        }

        match velocity {
            Some(velocity) => assign_all(&mut self.sample_velocity, velocity),
            None => self.infer_velocity(packet_time, position),
        }

        self.link
            .observe(packet_time, local_time, self.last_packet_time);

        // The outgoing segment ends at the old aim point plus the freshly
        // estimated interval. After a stall this restarts from that edge.
        let (shown_at, _) = self.clamp_to_window(local_time);

        project(
            &mut self.next_snapshot,
            &self.snapshot_position,
            &self.snapshot_velocity,
            shown_at - self.snapshot_time,
        );
        std::mem::swap(&mut self.snapshot_position, &mut self.next_snapshot);
        self.snapshot_time = local_time;

        assign_all(&mut self.last_packet_position, position);
        self.last_packet_time = packet_time;

        self.aim_time = local_time + self.link.update_interval();
        project(
            &mut self.aim_position,
            position,
            &self.sample_velocity,
            self.aim_time - packet_time,
        );

        let span = self.aim_time - self.snapshot_time;
        if span.abs() < self.config.degenerate_dt {
            assign_all(&mut self.snapshot_velocity, &self.sample_velocity);
        } else {
            slope(
                &mut self.snapshot_velocity,
                &self.aim_position,
                &self.snapshot_position,
                1.0 / span,
            );
        }

        Ok(true)
    }

    /// Finite difference against the last accepted sample
    fn infer_velocity(&mut self, packet_time: f64, position: &[T]) {
        let dt = packet_time - self.last_packet_time;
        if dt.abs() > self.config.degenerate_dt {
            slope(
                &mut self.sample_velocity,
                position,
                &self.last_packet_position,
                1.0 / dt,
            );
        } else {
            zero_all(&mut self.sample_velocity);
        }
    }


    /// Predicted position at `for_time`, written to `out_position`.
    ///
    /// Returns `false` if `for_time` fell outside
    /// `[snapshot_time, horizon]`; the position is then taken at the nearest
    /// edge of that window.
    #[track_caller]
    pub fn read_position(&self, for_time: f64, out_position: &mut [T]) -> bool {
        fail_fast(self.try_read_position(for_time, out_position))
    }

    /// Like [`read_position`](Self::read_position), also writing the current
    /// velocity, or zero when out of range.
    #[track_caller]
    pub fn read_position_and_velocity(
        &self,
        for_time: f64,
        out_position: &mut [T],
        out_velocity: &mut [T],
    ) -> bool {
        fail_fast(self.try_read_position_and_velocity(for_time, out_position, out_velocity))
    }

    pub fn try_read_position(
        &self,
        for_time: f64,
        out_position: &mut [T],
    ) -> ReckonResult<bool> {
        self.query(for_time, out_position, None)
    }

    pub fn try_read_position_and_velocity(
        &self,
        for_time: f64,
        out_position: &mut [T],
        out_velocity: &mut [T],
    ) -> ReckonResult<bool> {
        self.query(for_time, out_position, Some(out_velocity))
    }

    fn query(
        &self,
        for_time: f64,
        out_position: &mut [T],
        out_velocity: Option<&mut [T]>,
    ) -> ReckonResult<bool> {
        self.ensure_tracking()?;
        ReckonError::check_dimension(self.dimension(), out_position.len())?;
        if let Some(out_velocity) = out_velocity.as_deref() {
            ReckonError::check_dimension(self.dimension(), out_velocity.len())?;
        }

        let (at, in_range) = self.clamp_to_window(for_time);
        if !in_range {
            trace!(
                for_time,
                snapshot_time = self.snapshot_time,
                horizon = self.horizon(),
                "query clamped to extrapolation window"
            );
        }

        project(
            out_position,
            &self.snapshot_position,
            &self.snapshot_velocity,
            at - self.snapshot_time,
        );

        if let Some(out_velocity) = out_velocity {
            if in_range {
                assign_all(out_velocity, &self.snapshot_velocity);
            } else {
                zero_all(out_velocity);
            }
        }

        Ok(in_range)
    }

    /// Clamp a time into the window queries may be answered for
    fn clamp_to_window(&self, for_time: f64) -> (f64, bool) {
        let mut at = for_time;
        let mut in_range = true;

        // asking for something before the current segment starts?
        if at < self.snapshot_time {
            at = self.snapshot_time;
            in_range = false;
        }

        // asking for something too far in the future?
        let horizon = self.horizon();
        if at > horizon {
            at = horizon;
            in_range = false;
        }

        (at, in_range)
    }


    /// Smoothed one-way latency (seconds)
    pub fn estimate_latency(&self) -> f64 {
        self.link.latency()
    }

    /// Smoothed interval between samples (seconds)
    pub fn estimate_update_time(&self) -> f64 {
        self.link.update_interval()
    }

    pub fn dimension(&self) -> usize {
        self.snapshot_position.len()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_tracking(&self) -> bool {
        self.phase == Phase::Tracking
    }

    pub fn snapshot_time(&self) -> f64 {
        self.snapshot_time
    }

    pub fn aim_time(&self) -> f64 {
        self.aim_time
    }

    pub fn last_packet_time(&self) -> f64 {
        self.last_packet_time
    }

    /// Latest time a query is answered for without clamping
    pub fn horizon(&self) -> f64 {
        self.aim_time + self.link.update_interval()
    }

    pub fn config(&self) -> &ExtrapolatorConfig {
        &self.config
    }

    fn ensure_tracking(&self) -> ReckonResult<()> {
        match self.phase {
            Phase::Tracking => Ok(()),
            Phase::Uninitialized => Err(ReckonError::NotInitialized),
        }
    }

    fn check_sample(&self, position: &[T], velocity: Option<&[T]>) -> ReckonResult<()> {
        ReckonError::check_dimension(self.dimension(), position.len())?;
        if let Some(velocity) = velocity {
            ReckonError::check_dimension(self.dimension(), velocity.len())?;
        }
        Ok(())
    }
}

// Scratch buffers carry no state, so they are left out of equality.
impl<T: Element + PartialEq> PartialEq for Extrapolator<T> {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.phase == other.phase
            && self.last_packet_position == other.last_packet_position
            && self.last_packet_time == other.last_packet_time
            && self.snapshot_position == other.snapshot_position
            && self.snapshot_velocity == other.snapshot_velocity
            && self.snapshot_time == other.snapshot_time
            && self.aim_position == other.aim_position
            && self.aim_time == other.aim_time
            && self.link == other.link
    }
}

#[track_caller]
fn fail_fast<R>(result: ReckonResult<R>) -> R {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

fn assign_all<T: Element>(dst: &mut [T], src: &[T]) {
    for (d, s) in dst.iter_mut().zip(src) {
        T::assign(d, s);
    }
}

fn zero_all<T: Element>(dst: &mut [T]) {
    for d in dst.iter_mut() {
        T::set_zero(d);
    }
}

/// `out = base + velocity * dt`
fn project<T: Element>(out: &mut [T], base: &[T], velocity: &[T], dt: f64) {
    for ((o, b), v) in out.iter_mut().zip(base).zip(velocity) {
        T::add_scaled(o, b, v, dt);
    }
}

/// `out = (to - from) * inv_dt`
fn slope<T: Element>(out: &mut [T], to: &[T], from: &[T], inv_dt: f64) {
    for ((o, t), f) in out.iter_mut().zip(to).zip(from) {
        T::scaled_difference(o, t, f, inv_dt);
    }
}
