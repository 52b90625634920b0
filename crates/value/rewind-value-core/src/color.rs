use serde::{Deserialize, Serialize};

use crate::scalar::lerp_f32;

/// RGBA color record (linear by convention).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const CLEAR: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channel-wise linear interpolation, alpha included.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color::new(
            lerp_f32(self.r, other.r, t),
            lerp_f32(self.g, other.g, t),
            lerp_f32(self.b, other.b, t),
            lerp_f32(self.a, other.a, t),
        )
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Color::new(c[0], c[1], c[2], c[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_blends_alpha() {
        let c = Color::CLEAR.lerp(Color::WHITE, 0.25);
        assert_eq!(c, Color::new(0.25, 0.25, 0.25, 0.25));
    }
}
