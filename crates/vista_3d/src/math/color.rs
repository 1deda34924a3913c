//! Linear RGBA color

use serde::{Deserialize, Serialize};

/// RGBA color with components in `0..=1`.
///
/// Constructors taking hex values interpret them as sRGB, the way colors
/// are written in scene descriptions; [`Color::to_linear`] converts for
/// lighting math.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `0xRRGGBB`
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Back to `0xRRGGBB` (alpha dropped)
    pub fn to_hex(&self) -> u32 {
        let c = |v: f32| ((v.clamp(0.0, 1.0) * 255.0).round() as u32) & 0xFF;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// sRGB-encoded components to linear
    pub fn to_linear(&self) -> Color {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Color::rgba(channel(self.r), channel(self.g), channel(self.b), self.a)
    }

    /// RGB multiplied by `k`, alpha untouched
    pub fn scaled(&self, k: f32) -> Color {
        Color::rgba(self.r * k, self.g * k, self.b * k, self.a)
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Color::from_hex(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = Color::from_hex(0x404040);
        assert!((c.r - 64.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.to_hex(), 0x404040);
        assert_eq!(Color::from_hex(0x00ff00), Color::GREEN);
    }

    #[test]
    fn test_to_linear() {
        assert_eq!(Color::WHITE.to_linear(), Color::WHITE);
        assert_eq!(Color::BLACK.to_linear(), Color::BLACK);
        let mid = Color::from_hex(0x808080).to_linear();
        assert!((mid.r - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn test_lerp_clamps() {
        let c = Color::lerp(&Color::BLACK, &Color::WHITE, 2.0);
        assert_eq!(c, Color::WHITE);
    }
}
