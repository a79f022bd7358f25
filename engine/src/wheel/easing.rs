//! Cubic-bezier easing curves for committed landings.

use rand::Rng;

/// A CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve with fixed
/// endpoints `(0, 0)` and `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_MIN_SLOPE: f64 = 1e-6;
const BISECTION_ITERATIONS: usize = 40;
const SOLVE_EPSILON: f64 = 1e-7;

impl CubicBezier {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased progress for linear progress `t`. Exact at both ends.
    #[must_use]
    pub fn ease(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let s = self.solve_param(t);
        bezier(s, self.y1, self.y2)
    }

    /// Curve parameter whose x coordinate is `x`.
    fn solve_param(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = bezier(s, self.x1, self.x2) - x;
            if err.abs() < SOLVE_EPSILON {
                return s;
            }
            let slope = bezier_slope(s, self.x1, self.x2);
            if slope.abs() < NEWTON_MIN_SLOPE {
                break;
            }
            s -= err / slope;
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = bezier(s, self.x1, self.x2);
            if (value - x).abs() < SOLVE_EPSILON {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}

fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// The landing curves a spin picks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Swift,
    Glide,
    OutQuad,
    OutQuart,
}

impl Easing {
    pub const ALL: [Self; 4] = [Self::Swift, Self::Glide, Self::OutQuad, Self::OutQuart];

    #[must_use]
    pub const fn curve(self) -> CubicBezier {
        match self {
            Self::Swift => CubicBezier::new(0.2, 0.8, 0.2, 1.0),
            Self::Glide => CubicBezier::new(0.1, 0.7, 0.3, 1.0),
            Self::OutQuad => CubicBezier::new(0.25, 0.46, 0.45, 0.94),
            Self::OutQuart => CubicBezier::new(0.165, 0.84, 0.44, 1.0),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    #[must_use]
    pub fn ease(self, t: f64) -> f64 {
        self.curve().ease(t)
    }
}
