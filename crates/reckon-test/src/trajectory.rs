//! Ground-truth motion for simulated remote entities

/// A 2D path with known position and velocity at every instant
#[derive(Clone, Debug)]
pub enum Trajectory {
    /// Constant velocity
    Linear { origin: [f64; 2], velocity: [f64; 2] },
    /// Uniform circular motion
    Circle {
        center: [f64; 2],
        radius: f64,
        angular_speed: f64,
    },
    /// Moves along x for half of each period, then stands still
    StopAndGo { speed: f64, period: f64 },
}

impl Trajectory {
    pub fn position(&self, t: f64) -> [f64; 2] {
        match self {
            Trajectory::Linear { origin, velocity } => {
                [origin[0] + velocity[0] * t, origin[1] + velocity[1] * t]
            }
            Trajectory::Circle {
                center,
                radius,
                angular_speed,
            } => {
                let angle = angular_speed * t;
                [
                    center[0] + radius * angle.cos(),
                    center[1] + radius * angle.sin(),
                ]
            }
            Trajectory::StopAndGo { speed, period } => {
                let half = period / 2.0;
                let cycles = (t / period).floor();
                let phase = t - cycles * period;
                [speed * (cycles * half + phase.min(half)), 0.0]
            }
        }
    }

    pub fn velocity(&self, t: f64) -> [f64; 2] {
        match self {
            Trajectory::Linear { velocity, .. } => *velocity,
            Trajectory::Circle {
                radius,
                angular_speed,
                ..
            } => {
                let angle = angular_speed * t;
                [
                    -radius * angular_speed * angle.sin(),
                    radius * angular_speed * angle.cos(),
                ]
            }
            Trajectory::StopAndGo { speed, period } => {
                let phase = t - (t / period).floor() * period;
                if phase < period / 2.0 {
                    [*speed, 0.0]
                } else {
                    [0.0, 0.0]
                }
            }
        }
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
