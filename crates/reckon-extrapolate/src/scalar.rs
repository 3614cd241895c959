//! Single-element extrapolator
//!
//! Most tracked quantities are one value: a scalar, or a point struct that
//! implements [`Element`] itself. [`ScalarExtrapolator`] fixes the dimension
//! at one so the value can be passed and returned directly.

use reckon_core::Element;

use crate::{Extrapolator, ExtrapolatorConfig};

/// Result of querying a [`ScalarExtrapolator`]
#[derive(Clone, Debug, PartialEq)]
pub struct Reading<T> {
    /// Predicted value, clamped to the extrapolation window
    pub position: T,
    /// Rate of change, zero when out of range
    pub velocity: T,
    /// Whether the requested time was inside the window
    pub in_range: bool,
}

impl<T> Reading<T> {
    /// The position if it was in range
    pub fn into_position(self) -> Option<T> {
        if self.in_range {
            Some(self.position)
        } else {
            None
        }
    }
}

/// Extrapolator for exactly one element
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarExtrapolator<T: Element> {
    inner: Extrapolator<T>,
}

impl<T: Element> ScalarExtrapolator<T> {
    pub fn new() -> Self {
        Self::with_config(ExtrapolatorConfig::default())
    }

    pub fn with_config(config: ExtrapolatorConfig) -> Self {
        ScalarExtrapolator {
            inner: Extrapolator::with_config(1, config),
        }
    }

    /// See [`Extrapolator::reset`]
    #[track_caller]
    pub fn reset(&mut self, packet_time: f64, local_time: f64, position: T) {
        self.inner
            .reset(packet_time, local_time, std::slice::from_ref(&position));
    }

    /// See [`Extrapolator::reset_with_velocity`]
    #[track_caller]
    pub fn reset_with_velocity(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: T,
        velocity: T,
    ) {
        self.inner.reset_with_velocity(
            packet_time,
            local_time,
            std::slice::from_ref(&position),
            std::slice::from_ref(&velocity),
        );
    }

    /// See [`Extrapolator::add_sample`]
    #[track_caller]
    pub fn add_sample(&mut self, packet_time: f64, local_time: f64, position: T) -> bool {
        self.inner
            .add_sample(packet_time, local_time, std::slice::from_ref(&position))
    }

    /// See [`Extrapolator::add_sample_with_velocity`]
    #[track_caller]
    pub fn add_sample_with_velocity(
        &mut self,
        packet_time: f64,
        local_time: f64,
        position: T,
        velocity: T,
    ) -> bool {
        self.inner.add_sample_with_velocity(
            packet_time,
            local_time,
            std::slice::from_ref(&position),
            std::slice::from_ref(&velocity),
        )
    }

    /// Position and velocity at `for_time`
    #[track_caller]
    pub fn read(&self, for_time: f64) -> Reading<T> {
        let mut position = [T::zero()];
        let mut velocity = [T::zero()];
        let in_range = self
            .inner
            .read_position_and_velocity(for_time, &mut position, &mut velocity);

        let [position] = position;
        let [velocity] = velocity;
        Reading {
            position,
            velocity,
            in_range,
        }
    }

    /// Position at `for_time`, or `None` if it had to be clamped
    #[track_caller]
    pub fn read_position(&self, for_time: f64) -> Option<T> {
        self.read(for_time).into_position()
    }

    pub fn estimate_latency(&self) -> f64 {
        self.inner.estimate_latency()
    }

    pub fn estimate_update_time(&self) -> f64 {
        self.inner.estimate_update_time()
    }

    pub fn inner(&self) -> &Extrapolator<T> {
        &self.inner
    }

    pub fn into_inner(self) -> Extrapolator<T> {
        self.inner
    }
}

impl<T: Element> Default for ScalarExtrapolator<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A user-defined point, mutated in place
    #[derive(Clone, Debug, PartialEq)]
    struct Point1 {
        x: f32,
    }

    impl Element for Point1 {
        fn zero() -> Self {
            Point1 { x: 0.0 }
        }

        fn add(out: &mut Self, a: &Self, b: &Self) {
            out.x = a.x + b.x;
        }

        fn subtract(out: &mut Self, a: &Self, b: &Self) {
            out.x = a.x - b.x;
        }

        fn scale(out: &mut Self, a: &Self, k: f64) {
            out.x = a.x * k as f32;
        }

        fn assign(dst: &mut Self, src: &Self) {
            dst.x = src.x;
        }
    }

    #[test]
    fn test_one_float_extrapolator() {
        let mut ex = ScalarExtrapolator::<f32>::new();

        ex.reset(0.1, 0.1, 0.0);
        let p = ex.read_position(0.1);
        assert_eq!(p, Some(0.0));
        assert!(!ex.add_sample(0.0, 1.0, 0.0));

        assert!(ex.add_sample(1.0, 1.5, 1.0));
        assert!(ex.estimate_latency() < 0.5);
        assert!(ex.estimate_latency() > 0.1);
        assert!(ex.estimate_update_time() > 0.4);
        assert!(ex.estimate_update_time() < 1.0);

        assert!(ex.add_sample(1.5, 2.0, 2.0));
        let p = ex.read_position(2.0).unwrap();
        assert!((2.5 - p).abs() < 0.25);
        assert!(ex.estimate_latency() < 0.5);
        assert!(ex.estimate_latency() > 0.3);
        assert!(ex.estimate_update_time() > 0.4);
        assert!(ex.estimate_update_time() < 0.6);

        assert!(ex.add_sample(2.0, 2.5, 3.0));
        let p = ex.read_position(2.5).unwrap();
        assert!((4.0 - p).abs() < 0.125);

        assert!(ex.add_sample(2.5, 3.0, 4.0));
        let p = ex.read_position(3.0).unwrap();
        assert!((5.0 - p).abs() < 0.07);
        let p = ex.read_position(3.25).unwrap();
        assert!((5.5 - p).abs() < 0.07);

        // don't allow extrapolation too far forward
        assert_eq!(ex.read_position(4.0), None);
    }

    #[test]
    fn test_custom_element_matches_float() {
        let mut float = ScalarExtrapolator::<f32>::new();
        let mut point = ScalarExtrapolator::<Point1>::new();

        float.reset(0.1, 0.1, 0.0);
        point.reset(0.1, 0.1, Point1 { x: 0.0 });

        let samples = [
            (1.0, 1.5, 1.0),
            (1.5, 2.0, 2.0),
            (2.0, 2.5, 3.0),
            (2.5, 3.0, 4.0),
            (2.9, 3.35, 4.5),
            (3.6, 3.9, 6.0),
        ];

        for (pt, lt, x) in samples {
            assert_eq!(
                float.add_sample(pt, lt, x),
                point.add_sample(pt, lt, Point1 { x })
            );

            for dt in [0.0, 0.1, 0.2, 0.4, 2.0] {
                let a = float.read(lt + dt);
                let b = point.read(lt + dt);
                assert_eq!(a.in_range, b.in_range);
                assert!((a.position - b.position.x).abs() < 1e-4);
                assert!((a.velocity - b.velocity.x).abs() < 1e-3);
            }
        }

        assert_eq!(float.estimate_latency(), point.estimate_latency());
        assert_eq!(float.estimate_update_time(), point.estimate_update_time());
    }

    #[test]
    fn test_scalar_matches_vector() {
        let mut scalar = ScalarExtrapolator::<f64>::new();
        let mut vector = Extrapolator::<f64>::new(1);

        scalar.reset_with_velocity(0.0, 0.05, 1.0, 0.5);
        vector.reset_with_velocity(0.0, 0.05, &[1.0], &[0.5]);

        for i in 1..30 {
            let pt = i as f64 * 0.1;
            let lt = pt + 0.05 + (i % 3) as f64 * 0.02;
            let x = (pt * 2.0).sin();
            let v = 2.0 * (pt * 2.0).cos();

            assert!(scalar.add_sample_with_velocity(pt, lt, x, v));
            assert!(vector.add_sample_with_velocity(pt, lt, &[x], &[v]));

            let mut pos = [0.0];
            let ok = vector.read_position(lt + 0.03, &mut pos);
            let reading = scalar.read(lt + 0.03);
            assert_eq!(reading.in_range, ok);
            assert_eq!(reading.position, pos[0]);
        }

        assert_eq!(scalar.inner(), &vector);
        assert_eq!(scalar.into_inner(), vector);
    }

    #[test]
    fn test_reading_out_of_range_zeroes_velocity() {
        let mut ex = ScalarExtrapolator::<f64>::default();
        ex.reset_with_velocity(0.0, 1.0, 0.0, 3.0);

        let reading = ex.read(1.5);
        assert!(reading.in_range);
        assert_eq!(reading.velocity, 3.0);

        let reading = ex.read(100.0);
        assert!(!reading.in_range);
        assert_eq!(reading.velocity, 0.0);
        assert_eq!(reading.position, 6.0);
        assert_eq!(reading.into_position(), None);
    }

    #[test]
    #[should_panic(expected = "used before reset")]
    fn test_add_before_reset_panics() {
        let mut ex = ScalarExtrapolator::<f64>::new();
        ex.add_sample(1.0, 1.0, 1.0);
    }
}
