/// Floor colours: RGB triples and the bottom-to-top gradient
use serde::{Deserialize, Serialize};

use crate::transform::lerp;

/// Fraction every floor colour is pushed toward white.
pub const HIGHLIGHT_BLEND: f32 = 0.15;

/// A linear RGB colour with channels in [0,1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Per-channel linear interpolation, unclamped
    pub fn lerp(&self, other: &Rgb, alpha: f32) -> Rgb {
        Rgb::new(
            lerp(self.r, other.r, alpha),
            lerp(self.g, other.g, alpha),
            lerp(self.b, other.b, alpha),
        )
    }

    /// Scale every channel, e.g. for diffuse shading
    pub fn scaled(&self, factor: f32) -> Rgb {
        Rgb::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Quantise to 8-bit channels, clamping out-of-range values
    pub fn to_u8(&self) -> [u8; 3] {
        let quantise = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantise(self.r), quantise(self.g), quantise(self.b)]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 3]> for Rgb {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(color: Rgb) -> Self {
        [color.r, color.g, color.b]
    }
}

/// Colour of the floor at normalized height `t`.
///
/// The bottom/top gradient is evaluated first, then lifted toward white by
/// [`HIGHLIGHT_BLEND`]. Every vertex of the floor receives this colour.
pub fn gradient_color(t: f32, bottom: &Rgb, top: &Rgb) -> Rgb {
    bottom.lerp(top, t).lerp(&Rgb::WHITE, HIGHLIGHT_BLEND)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Rgb, b: Rgb) {
        assert!((a.r - b.r).abs() < 1e-6, "{:?} != {:?}", a, b);
        assert!((a.g - b.g).abs() < 1e-6, "{:?} != {:?}", a, b);
        assert!((a.b - b.b).abs() < 1e-6, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_gradient_endpoints() {
        let bottom = Rgb::new(0.2, 0.0, 1.0);
        let top = Rgb::new(1.0, 0.5, 0.0);

        assert_close(
            gradient_color(0.0, &bottom, &top),
            Rgb::new(0.32, 0.15, 1.0),
        );
        assert_close(
            gradient_color(1.0, &bottom, &top),
            Rgb::new(1.0, 0.575, 0.15),
        );
    }

    #[test]
    fn test_gradient_midpoint() {
        let black = Rgb::new(0.0, 0.0, 0.0);
        let color = gradient_color(0.5, &black, &Rgb::WHITE);
        assert_close(color, Rgb::new(0.575, 0.575, 0.575));
    }

    #[test]
    fn test_from_hex() {
        let color = Rgb::from_hex(0xff8000);
        assert_eq!(color.r, 1.0);
        assert!((color.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.b, 0.0);
        assert_eq!(color.to_u8(), [255, 128, 0]);
    }

    #[test]
    fn test_serde_as_array() {
        let json = serde_json::to_string(&Rgb::new(0.5, 0.25, 1.0)).unwrap();
        assert_eq!(json, "[0.5,0.25,1.0]");
    }
}
