//! Quaternion record with shortest-arc slerp.

use serde::{Deserialize, Serialize};

use crate::scalar::lerp_f32;

/// Rotation quaternion (x, y, z, w).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Quat::IDENTITY
    }
}

// Above this |dot| the inputs are close enough that nlerp is accurate.
const DOT_THRESHOLD: f32 = 0.9995;

impl Quat {
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle_rad` around `axis` (normalized internally).
    pub fn from_axis_angle(axis: [f32; 3], angle_rad: f32) -> Quat {
        let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if !(len > 0.0) || !angle_rad.is_finite() {
            return Quat::IDENTITY;
        }
        let (s, c) = (angle_rad * 0.5).sin_cos();
        let k = s / len;
        Quat::new(axis[0] * k, axis[1] * k, axis[2] * k, c)
    }

    #[inline]
    pub fn dot(self, other: Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    fn neg(self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, -self.w)
    }

    /// Unit-length copy; zero-length or non-finite input yields identity.
    pub fn normalized(self) -> Quat {
        let mag = self.dot(self).sqrt();
        if !(mag > 0.0) || !mag.is_finite() {
            Quat::IDENTITY
        } else {
            Quat::new(self.x / mag, self.y / mag, self.z / mag, self.w / mag)
        }
    }

    /// Spherical interpolation along the shortest arc.
    pub fn slerp(self, other: Quat, t: f32) -> Quat {
        let qa = self.normalized();
        let mut qb = other.normalized();

        let mut dot = qa.dot(qb);
        if dot < 0.0 {
            qb = qb.neg();
            dot = -dot;
        }

        if dot > DOT_THRESHOLD {
            return Quat::new(
                lerp_f32(qa.x, qb.x, t),
                lerp_f32(qa.y, qb.y, t),
                lerp_f32(qa.z, qb.z, t),
                lerp_f32(qa.w, qb.w, t),
            )
            .normalized();
        }

        let theta_0 = dot.clamp(-1.0, 1.0).acos();
        let theta = theta_0 * t;
        let sin_theta_0 = theta_0.sin();
        let s0 = (theta_0 - theta).sin() / sin_theta_0;
        let s1 = theta.sin() / sin_theta_0;

        Quat::new(
            s0 * qa.x + s1 * qb.x,
            s0 * qa.y + s1 * qb.y,
            s0 * qa.z + s1 * qb.z,
            s0 * qa.w + s1 * qb.w,
        )
    }

    /// Angle in degrees between two orientations (double cover aware).
    pub fn angle_deg(self, other: Quat) -> f32 {
        // atan2 on the relative rotation stays accurate near zero, acos(dot) does not
        let a = self.normalized();
        let b = other.normalized();
        let rw = a.w * b.w + a.x * b.x + a.y * b.y + a.z * b.z;
        let rx = a.w * b.x - a.x * b.w - a.y * b.z + a.z * b.y;
        let ry = a.w * b.y + a.x * b.z - a.y * b.w - a.z * b.x;
        let rz = a.w * b.z - a.x * b.y + a.y * b.x - a.z * b.w;
        let v = (rx * rx + ry * ry + rz * rz).sqrt();
        (2.0 * v.atan2(rw.abs())).to_degrees()
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<[f32; 4]> for Quat {
    fn from(q: [f32; 4]) -> Self {
        Quat::new(q[0], q[1], q[2], q[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn slerp_half_way_about_y() {
        let a = Quat::IDENTITY;
        let b = Quat::from_axis_angle([0.0, 1.0, 0.0], FRAC_PI_2);
        let mid = a.slerp(b, 0.5);
        assert!((mid.angle_deg(a) - 45.0).abs() < 1e-3);
        assert!((mid.angle_deg(b) - 45.0).abs() < 1e-3);
    }

    #[test]
    fn slerp_takes_shortest_arc() {
        let a = Quat::from_axis_angle([0.0, 0.0, 1.0], 0.2);
        let b = Quat::from_axis_angle([0.0, 0.0, 1.0], 0.4);
        let b_neg = Quat::new(-b.x, -b.y, -b.z, -b.w);
        let r1 = a.slerp(b, 0.5);
        let r2 = a.slerp(b_neg, 0.5);
        assert!(r1.angle_deg(r2) < 1e-3);
    }

    #[test]
    fn degenerate_normalizes_to_identity() {
        assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).normalized(), Quat::IDENTITY);
        assert_eq!(Quat::new(f32::NAN, 0.0, 0.0, 1.0).normalized(), Quat::IDENTITY);
    }
}
