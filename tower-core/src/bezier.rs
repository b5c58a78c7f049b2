//! Two-handle cubic Bézier timing curve.
//!
//! The curve runs from (0,0) to (1,1) through two free handles, the same
//! shape as a CSS `cubic-bezier(x1, y1, x2, y2)` timing function. Evaluating
//! it as an easing means inverting x(t) for the requested input and sampling
//! y(t) at the solved parameter.

use serde::{Deserialize, Serialize};

/// Newton-Raphson iteration cap before falling back to bisection.
const NEWTON_ITERATIONS: usize = 8;
/// Bisection iteration cap. Reached only by curves whose x(t) never hits
/// the target within tolerance (non-monotonic handle layouts).
const BISECTION_ITERATIONS: usize = 64;
const SOLVE_EPSILON: f32 = 1e-5;
const MIN_SLOPE: f32 = 1e-6;

/// One of the two free handles. Both coordinates are kept in [0,1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct ControlPoint {
    pub x: f32,
    pub y: f32,
}

impl ControlPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }
}

impl From<[f32; 2]> for ControlPoint {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<ControlPoint> for [f32; 2] {
    fn from(point: ControlPoint) -> Self {
        [point.x, point.y]
    }
}

/// Polynomial coefficients of one axis, `((a*t + b)*t + c)*t`.
#[derive(Debug, Clone, Copy)]
struct Axis {
    a: f32,
    b: f32,
    c: f32,
}

impl Axis {
    /// Expand the Bernstein form with P0 = 0 and P3 = 1 on this axis.
    fn new(p1: f32, p2: f32) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        Self { a, b, c }
    }

    #[inline]
    fn sample(&self, t: f32) -> f32 {
        ((self.a * t + self.b) * t + self.c) * t
    }

    #[inline]
    fn slope(&self, t: f32) -> f32 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }
}

/// Custom easing curve built from two control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[ControlPoint; 2]", into = "[ControlPoint; 2]")]
pub struct CubicBezier {
    p1: ControlPoint,
    p2: ControlPoint,
}

impl CubicBezier {
    pub fn new(p1: ControlPoint, p2: ControlPoint) -> Self {
        Self { p1, p2 }
    }

    pub fn control_points(&self) -> [ControlPoint; 2] {
        [self.p1, self.p2]
    }

    /// Map `x` in [0,1] to the curve's y at that x.
    ///
    /// Identical handles collapse the curve onto the diagonal and return
    /// `x` untouched. Otherwise inputs are pinned to the endpoints outside
    /// [0,1].
    pub fn ease(&self, x: f32) -> f32 {
        if self.p1 == self.p2 {
            return x;
        }
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        let t = self.solve_t(x);
        Axis::new(self.p1.y, self.p2.y).sample(t)
    }

    /// Find t in [0,1] with x(t) = x.
    fn solve_t(&self, x: f32) -> f32 {
        let axis = Axis::new(self.p1.x, self.p2.x);

        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = axis.sample(t) - x;
            if error.abs() < SOLVE_EPSILON {
                return t;
            }
            let slope = axis.slope(t);
            if slope.abs() < MIN_SLOPE {
                break;
            }
            t -= error / slope;
            if !(0.0..=1.0).contains(&t) {
                break;
            }
        }

        log::trace!("bezier: newton did not converge for x={x}, bisecting");

        let mut lo = 0.0_f32;
        let mut hi = 1.0_f32;
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let sampled = axis.sample(t);
            if (sampled - x).abs() < SOLVE_EPSILON {
                break;
            }
            if sampled < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }
}

impl From<[ControlPoint; 2]> for CubicBezier {
    fn from([p1, p2]: [ControlPoint; 2]) -> Self {
        Self::new(p1, p2)
    }
}

impl From<CubicBezier> for [ControlPoint; 2] {
    fn from(curve: CubicBezier) -> Self {
        curve.control_points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(x1: f32, y1: f32, x2: f32, y2: f32) -> CubicBezier {
        CubicBezier::new(ControlPoint::new(x1, y1), ControlPoint::new(x2, y2))
    }

    #[test]
    fn test_diagonal_handles_are_identity() {
        let bezier = curve(0.0, 0.0, 1.0, 1.0);
        for x in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!((bezier.ease(x) - x).abs() < 1e-4, "x={}", x);
        }
    }

    #[test]
    fn test_identical_handles_skip_solving() {
        let bezier = curve(0.4, 0.9, 0.4, 0.9);
        for x in [-0.5, 0.0, 0.33, 0.8, 1.0, 1.7] {
            assert_eq!(bezier.ease(x), x);
        }
    }

    #[test]
    fn test_endpoints_pinned() {
        let bezier = curve(0.3, 0.1, 0.7, 0.9);
        assert_eq!(bezier.ease(0.0), 0.0);
        assert_eq!(bezier.ease(1.0), 1.0);
    }

    #[test]
    fn test_symmetric_curve_midpoint() {
        let bezier = curve(0.3, 0.1, 0.7, 0.9);
        assert!((bezier.ease(0.5) - 0.5).abs() < 1e-4);
        // Slow start, fast middle
        assert!(bezier.ease(0.2) < 0.2);
        assert!(bezier.ease(0.8) > 0.8);
    }

    #[test]
    fn test_solution_lies_on_curve() {
        let bezier = curve(0.25, 0.1, 0.25, 1.0);
        let x_axis = Axis::new(0.25, 0.25);
        let y_axis = Axis::new(0.1, 1.0);
        for i in 1..10 {
            let x = i as f32 / 10.0;
            let t = bezier.solve_t(x);
            assert!((x_axis.sample(t) - x).abs() < 1e-4);
            assert!((bezier.ease(x) - y_axis.sample(t)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_flat_slope_falls_back_to_bisection() {
        // x'(t) vanishes at t = 0.5 for these handles.
        let bezier = curve(1.0, 0.0, 0.0, 1.0);
        let y = bezier.ease(0.49);
        assert!(y.is_finite());
        assert!((0.0..=1.0).contains(&y));
    }

    #[test]
    fn test_crossed_handles_terminate() {
        let bezier = curve(0.9, 0.2, 0.1, 0.8);
        for i in 0..=20 {
            let y = bezier.ease(i as f32 / 20.0);
            assert!(y.is_finite());
        }
    }

    #[test]
    fn test_control_points_clamped() {
        let point = ControlPoint::new(-0.5, 1.5);
        assert_eq!(point, ControlPoint { x: 0.0, y: 1.0 });
        let parsed: ControlPoint = serde_json::from_str("[2.0, 0.5]").unwrap();
        assert_eq!(parsed, ControlPoint { x: 1.0, y: 0.5 });
    }
}
