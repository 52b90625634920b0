use serde::{Deserialize, Serialize};

use crate::scalar::{finite_or, lerp_f32};

/// Three-component vector record (positions, velocities, scales).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise linear interpolation.
    #[inline]
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        Vec3::new(
            lerp_f32(self.x, other.x, t),
            lerp_f32(self.y, other.y, t),
            lerp_f32(self.z, other.z, t),
        )
    }

    #[inline]
    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    #[inline]
    pub fn scale(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z).length()
    }

    /// Replace non-finite components with 0.
    pub fn sanitized(self) -> Vec3 {
        Vec3::new(
            finite_or(self.x, 0.0),
            finite_or(self.y, 0.0),
            finite_or(self.z, 0.0),
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}
