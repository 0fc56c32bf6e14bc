//! Unit quaternions stored as `[x, y, z, w]`.

use serde::{Deserialize, Serialize};

use super::Vec3;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle_rad` around `axis` (need not be normalized).
    pub fn from_axis_angle(axis: Vec3, angle_rad: f64) -> Self {
        let axis = axis.normalize();
        let half = angle_rad * 0.5;
        let s = half.sin();
        Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    /// Rotation whose matrix has `x_axis`, `y_axis`, `z_axis` as columns.
    ///
    /// The three axes must form a right-handed orthonormal basis.
    pub fn from_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        let (m11, m12, m13) = (x_axis.x, y_axis.x, z_axis.x);
        let (m21, m22, m23) = (x_axis.y, y_axis.y, z_axis.y);
        let (m31, m32, m33) = (x_axis.z, y_axis.z, z_axis.z);
        let trace = m11 + m22 + m33;

        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self::new((m32 - m23) * s, (m13 - m31) * s, (m21 - m12) * s, 0.25 / s)
        } else if m11 > m22 && m11 > m33 {
            let s = 2.0 * (1.0 + m11 - m22 - m33).sqrt();
            Self::new(0.25 * s, (m12 + m21) / s, (m13 + m31) / s, (m32 - m23) / s)
        } else if m22 > m33 {
            let s = 2.0 * (1.0 + m22 - m11 - m33).sqrt();
            Self::new((m12 + m21) / s, 0.25 * s, (m23 + m32) / s, (m13 - m31) / s)
        } else {
            let s = 2.0 * (1.0 + m33 - m11 - m22).sqrt();
            Self::new((m13 + m31) / s, (m23 + m32) / s, 0.25 * s, (m21 - m12) / s)
        }
    }

    /// Hamilton product `self * other` (apply `other` first).
    pub fn mul(self, other: Self) -> Self {
        let (a, b) = (self, other);
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }

    pub fn normalize(self) -> Self {
        let n = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if n > 1e-10 {
            Self::new(self.x / n, self.y / n, self.z / n, self.w / n)
        } else {
            Self::IDENTITY
        }
    }

    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let t = qv.cross(v) * 2.0;
        v + t * self.w + qv.cross(t)
    }

    pub fn as_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::Quat;
    use crate::math::Vec3;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        let diff = a.distance(b);
        assert!(diff <= eps, "expected {a:?} ~= {b:?} (diff {diff})");
    }

    #[test]
    fn identity_leaves_vectors_alone() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_vec_close(Quat::IDENTITY.rotate(v), v, 1e-12);
    }

    #[test]
    fn axis_angle_quarter_turn_about_y() {
        let q = Quat::from_axis_angle(Vec3::Y, std::f64::consts::FRAC_PI_2);
        // +Z rotates onto +X for a positive turn about +Y.
        let rotated = q.rotate(Vec3::new(0.0, 0.0, 1.0));
        assert_vec_close(rotated, Vec3::new(1.0, 0.0, 0.0), 1e-12);
    }

    #[test]
    fn from_basis_maps_unit_axes_onto_columns() {
        let right = Vec3::new(0.0, 0.0, -1.0);
        let up = Vec3::new(0.0, 1.0, 0.0);
        let forward = right.cross(up);
        let q = Quat::from_basis(right, up, forward);
        assert_vec_close(q.rotate(Vec3::new(1.0, 0.0, 0.0)), right, 1e-12);
        assert_vec_close(q.rotate(Vec3::new(0.0, 1.0, 0.0)), up, 1e-12);
        assert_vec_close(q.rotate(Vec3::new(0.0, 0.0, 1.0)), forward, 1e-12);
    }

    #[test]
    fn from_basis_handles_negative_trace() {
        // 180 degree turn about +X: trace is -1.
        let q = Quat::from_basis(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        );
        assert_vec_close(q.rotate(Vec3::Y), Vec3::new(0.0, -1.0, 0.0), 1e-12);
    }

    #[test]
    fn mul_composes_right_to_left() {
        let yaw = Quat::from_axis_angle(Vec3::Y, std::f64::consts::FRAC_PI_2);
        let pitch = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), std::f64::consts::FRAC_PI_2);
        let v = Vec3::new(0.0, 0.0, 1.0);
        let composed = yaw.mul(pitch).rotate(v);
        assert_vec_close(composed, yaw.rotate(pitch.rotate(v)), 1e-12);

        let norm_sq: f64 = yaw.mul(pitch).as_array().iter().map(|c| c * c).sum();
        assert!((norm_sq - 1.0).abs() < 1e-12);
    }
}
