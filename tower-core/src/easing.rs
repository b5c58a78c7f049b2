//! Easing curves used to distribute twist and scale across the floors.

use serde::{Deserialize, Serialize};

use crate::bezier::CubicBezier;

/// Identity curve
pub fn linear(t: f32) -> f32 {
    t
}

/// Quadratic ease-in: t²
pub fn ease_in(t: f32) -> f32 {
    t * t
}

/// Quadratic ease-out: 1 - (1 - t)²
pub fn ease_out(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv
}

/// Symmetric quadratic ease-in-out. Both halves meet at 0.5.
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        let k = -2.0 * t + 2.0;
        1.0 - k * k / 2.0
    }
}

/// An interpolation curve over the normalized floor height.
///
/// The four named variants are the fixed quadratic family; `Bezier` is a
/// user-shaped timing curve with its endpoints pinned at (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Bezier(CubicBezier),
}

impl Easing {
    /// The named curves, in the order hosts cycle through them.
    pub const PRESETS: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// Evaluate the curve. Inputs outside [0,1] extrapolate for the named
    /// curves; the Bezier curve clamps to its pinned endpoints.
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => linear(t),
            Easing::EaseIn => ease_in(t),
            Easing::EaseOut => ease_out(t),
            Easing::EaseInOut => ease_in_out(t),
            Easing::Bezier(curve) => curve.ease(t),
        }
    }

    /// Next named curve after this one. A Bezier curve cycles back to linear.
    pub fn next_preset(&self) -> Easing {
        match self {
            Easing::Linear => Easing::EaseIn,
            Easing::EaseIn => Easing::EaseOut,
            Easing::EaseOut => Easing::EaseInOut,
            Easing::EaseInOut | Easing::Bezier(_) => Easing::Linear,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease_in",
            Easing::EaseOut => "ease_out",
            Easing::EaseInOut => "ease_in_out",
            Easing::Bezier(_) => "bezier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bezier::ControlPoint;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in Easing::PRESETS {
            assert_eq!(easing.apply(0.0), 0.0, "{:?} at t=0", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_ease_in_out_midpoint() {
        assert_eq!(ease_in_out(0.5), 0.5);
        assert!((ease_in_out(0.4999) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_ease_out_mirrors_ease_in() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((ease_out(t) - (1.0 - ease_in(1.0 - t))).abs() < 1e-6);
        }
    }

    #[test]
    fn test_named_curves_extrapolate() {
        assert_eq!(linear(1.5), 1.5);
        assert!((ease_in(-1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_preset_cycle() {
        let mut easing = Easing::Linear;
        for _ in 0..4 {
            easing = easing.next_preset();
        }
        assert_eq!(easing, Easing::Linear);

        let custom = Easing::Bezier(CubicBezier::new(
            ControlPoint::new(0.3, 0.1),
            ControlPoint::new(0.7, 0.9),
        ));
        assert_eq!(custom.next_preset(), Easing::Linear);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Easing::EaseInOut).unwrap();
        assert_eq!(json, "\"ease_in_out\"");
        let parsed: Easing = serde_json::from_str("\"ease_out\"").unwrap();
        assert_eq!(parsed, Easing::EaseOut);
        let parsed: Easing =
            serde_json::from_str(r#"{ "bezier": [[0.3, 0.1], [0.7, 0.9]] }"#).unwrap();
        assert!(matches!(parsed, Easing::Bezier(_)));
    }
}
