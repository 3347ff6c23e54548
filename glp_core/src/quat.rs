//! Quaternions.
//!
//! `w` is the scalar part and `(x, y, z)` the vector part. Only unit
//! quaternions represent rotations; anything that accumulates products should
//! call [`Quat::normalized`] afterwards.

use std::ops::{Add, Mul, Neg};

use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::math::{Mat4, Vec3};
use crate::transform::sin_cos_deg;

/// Quaternion `w + xi + yj + zk`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `degrees` about `unit_axis`. The axis is used as given.
    pub fn from_axis_angle(degrees: f32, unit_axis: Vec3) -> Self {
        let (s, c) = sin_cos_deg(degrees / 2.0);
        Self::new(unit_axis.x * s, unit_axis.y * s, unit_axis.z * s, c)
    }

    pub fn vector(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Unit quaternion in the same direction. Fails only for an exactly zero
    /// or non-finite input; tiny inputs are rescaled before measuring.
    pub fn normalized(self) -> Result<Self, MathError> {
        let m = self.x.abs().max(self.y.abs()).max(self.z.abs()).max(self.w.abs());
        let finite = [self.x, self.y, self.z, self.w].iter().all(|v| v.is_finite());
        if m == 0.0 || !finite {
            return Err(MathError::ZeroLength);
        }
        let q = Quat::new(self.x / m, self.y / m, self.z / m, self.w / m);
        Ok(q * (1.0 / q.length()))
    }

    /// Rotation matrix of a unit quaternion. The result is meaningless for
    /// non-unit input.
    pub fn to_rotation_matrix(self) -> Mat4 {
        let Self { x: b, y: c, z: d, w: a } = self;
        Mat4::from_rows([
            [
                1.0 - 2.0 * (c * c + d * d),
                2.0 * (b * c - a * d),
                2.0 * (b * d + a * c),
                0.0,
            ],
            [
                2.0 * (b * c + a * d),
                1.0 - 2.0 * (b * b + d * d),
                2.0 * (c * d - a * b),
                0.0,
            ],
            [
                2.0 * (b * d - a * c),
                2.0 * (c * d + a * b),
                1.0 - 2.0 * (b * b + c * c),
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotates a vector by a unit quaternion (`q v q*`).
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = Quat::new(v.x, v.y, v.z, 0.0);
        (self * p * self.conjugate()).vector()
    }

    pub fn approx_eq(self, other: Self, eps: f32) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.z - other.z).abs() <= eps
            && (self.w - other.w).abs() <= eps
    }

    /// Same rotation test: `q` and `-q` are equal as orientations.
    pub fn same_rotation(self, other: Self, eps: f32) -> bool {
        self.approx_eq(other, eps) || self.approx_eq(-other, eps)
    }
}

/// Hamilton product. `a * b` rotates by `b` first, then by `a`.
impl Mul for Quat {
    type Output = Quat;

    fn mul(self, o: Quat) -> Quat {
        Quat::new(
            self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            self.w * o.y + self.y * o.w + self.z * o.x - self.x * o.z,
            self.w * o.z + self.z * o.w + self.x * o.y - self.y * o.x,
            self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
        )
    }
}

impl Mul<f32> for Quat {
    type Output = Quat;

    fn mul(self, s: f32) -> Quat {
        Quat::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Add for Quat {
    type Output = Quat;

    fn add(self, o: Quat) -> Quat {
        Quat::new(self.x + o.x, self.y + o.y, self.z + o.z, self.w + o.w)
    }
}

impl Neg for Quat {
    type Output = Quat;

    fn neg(self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, -self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{rotate_around_axis, rotate_x, rotate_y, rotate_z};

    const EPS: f32 = 1e-5;

    #[test]
    fn zero_angle_is_identity_for_any_axis() {
        for axis in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(0.6, 0.0, 0.8)] {
            let q = Quat::from_axis_angle(0.0, axis);
            assert_eq!(q.to_rotation_matrix(), Mat4::IDENTITY);
        }
    }

    #[test]
    fn matrix_matches_principal_rotations() {
        let q = Quat::from_axis_angle(30.0, Vec3::X);
        assert!(q.to_rotation_matrix().approx_eq(&rotate_x(30.0), EPS));
        let q = Quat::from_axis_angle(-75.0, Vec3::Y);
        assert!(q.to_rotation_matrix().approx_eq(&rotate_y(-75.0), EPS));
        let q = Quat::from_axis_angle(120.0, Vec3::Z);
        assert!(q.to_rotation_matrix().approx_eq(&rotate_z(120.0), EPS));
    }

    #[test]
    fn matrix_matches_arbitrary_axis_rotation() {
        let axis = Vec3::new(1.0, 1.0, 1.0).normalized().unwrap();
        let q = Quat::from_axis_angle(40.0, axis);
        let r = rotate_around_axis(40.0, Vec3::ZERO, axis).unwrap();
        assert!(q.to_rotation_matrix().approx_eq(&r, 1e-4));
    }

    #[test]
    fn product_composes_right_operand_first() {
        let a = Quat::from_axis_angle(90.0, Vec3::Z);
        let b = Quat::from_axis_angle(90.0, Vec3::X);
        let composed = (a * b).to_rotation_matrix();
        let expected = rotate_z(90.0) * rotate_x(90.0);
        assert!(composed.approx_eq(&expected, EPS));
        assert!(!(b * a).to_rotation_matrix().approx_eq(&expected, EPS));
    }

    #[test]
    fn rotate_vector_agrees_with_matrix() {
        let q = Quat::from_axis_angle(50.0, Vec3::new(0.0, 0.6, 0.8));
        let v = Vec3::new(1.0, -2.0, 0.5);
        let by_matrix = q.to_rotation_matrix().transform_vector(v);
        assert!(q.rotate(v).approx_eq(by_matrix, 1e-4));
    }

    #[test]
    fn normalize_rejects_zero() {
        assert_eq!(
            Quat::new(0.0, 0.0, 0.0, 0.0).normalized(),
            Err(MathError::ZeroLength)
        );
        let q = Quat::new(0.0, 0.0, 3.0, 4.0).normalized().unwrap();
        assert!((q.length() - 1.0).abs() < EPS);
        let tiny = Quat::new(0.0, 0.0, 3e-25, 4e-25).normalized().unwrap();
        assert!(tiny.approx_eq(Quat::new(0.0, 0.0, 0.6, 0.8), EPS));
    }

    #[test]
    fn negated_quaternion_is_same_rotation() {
        let q = Quat::from_axis_angle(30.0, Vec3::Y);
        assert!(q.same_rotation(-q, EPS));
        assert!((-q).to_rotation_matrix().approx_eq(&q.to_rotation_matrix(), EPS));
    }
}
