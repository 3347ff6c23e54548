//! Math types.
//!
//! This module intentionally stays small and deterministic.
//! It avoids SIMD/unsafe and focuses on stable semantics.
//!
//! Convention: matrices are stored row-major (`m[row][col]`) and act on column
//! vectors, so `a * b` applied to `v` means "apply `b`, then `a`". Use
//! [`crate::transform::Transform`] or [`crate::transform::compose`] to write
//! chains in apply-first order instead of reversing them by hand.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::MathError;

/// A matrix is treated as singular when `|det|` falls below this fraction of
/// the product of its column lengths (the Hadamard bound). The ratio does
/// not change when the matrix is uniformly scaled.
pub const SINGULAR_EPSILON: f32 = 1e-6;

/// 3D vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn len_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.len_sq().sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn max_abs(self) -> f32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Returns the unit vector in the same direction. Only an exactly zero
    /// (or non-finite) vector fails; tiny vectors are rescaled first so
    /// their squared length cannot underflow.
    pub fn normalized(self) -> Result<Self, MathError> {
        let m = self.max_abs();
        if m == 0.0 || !self.is_finite() {
            return Err(MathError::ZeroLength);
        }
        let v = Self::new(self.x / m, self.y / m, self.z / m);
        Ok(v * (1.0 / v.length()))
    }

    pub fn lerp(self, to: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.x + (to.x - self.x) * t,
            self.y + (to.y - self.y) * t,
            self.z + (to.z - self.z) * t,
        )
    }

    /// Homogeneous point (`w = 1`).
    pub fn extend_point(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, 1.0)
    }

    /// Homogeneous direction (`w = 0`).
    pub fn extend_direction(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, 0.0)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn approx_eq(self, other: Self, eps: f32) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.z - other.z).abs() <= eps
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Homogeneous 4-vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Perspective divide. Returns `None` when `w` is zero (point at infinity).
    pub fn project(self) -> Option<Vec3> {
        if self.w == 0.0 {
            return None;
        }
        Some(Vec3::new(self.x / self.w, self.y / self.w, self.z / self.w))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// 4x4 homogeneous matrix, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    /// Builds a matrix from 16 values in row-major order, the layout the
    /// course reference matrices are written in.
    pub fn from_row_major(v: [f32; 16]) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row.copy_from_slice(&v[i * 4..i * 4 + 4]);
        }
        Self { m }
    }

    pub fn to_row_major(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.m.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        out
    }

    /// Flattened column by column, for graphics APIs that expect column-major
    /// uniform data.
    pub fn to_column_major(&self) -> [f32; 16] {
        self.transpose().to_row_major()
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row][col]
    }

    pub fn transpose(&self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in self.m.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                out[c][r] = *v;
            }
        }
        Self { m: out }
    }

    /// True when the bottom row is exactly `(0, 0, 0, 1)`.
    pub fn is_affine(&self) -> bool {
        self.m[3] == [0.0, 0.0, 0.0, 1.0]
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * p.extend_point()).xyz()
    }

    /// Transforms a direction; translation is ignored.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (*self * v.extend_direction()).xyz()
    }

    pub fn determinant(&self) -> f32 {
        let c = Cofactors::new(&self.m);
        c.determinant()
    }

    /// Product of the Euclidean lengths of the four columns, an upper bound
    /// on `|det|`.
    pub fn column_length_product(&self) -> f32 {
        (0..4)
            .map(|c| (0..4).map(|r| self.m[r][c] * self.m[r][c]).sum::<f32>().sqrt())
            .product()
    }

    /// General 4x4 inverse via cofactor expansion.
    ///
    /// Callers are expected to invert only matrices that are invertible by
    /// construction (rigid or non-degenerate affine transforms). Flatten
    /// matrices fail with [`MathError::SingularMatrix`]. The singularity test
    /// is relative to the column lengths, so a small uniform scale is still
    /// invertible.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let a = &self.m;
        let c = Cofactors::new(a);
        let det = c.determinant();
        let bound = self.column_length_product();
        if det == 0.0 || !det.is_finite() || det.abs() < SINGULAR_EPSILON * bound {
            warn!(determinant = det, "refusing to invert singular matrix");
            return Err(MathError::SingularMatrix { determinant: det });
        }
        let Cofactors { s, c } = c;
        let inv = 1.0 / det;

        let b = [
            [
                a[1][1] * c[5] - a[1][2] * c[4] + a[1][3] * c[3],
                -a[0][1] * c[5] + a[0][2] * c[4] - a[0][3] * c[3],
                a[3][1] * s[5] - a[3][2] * s[4] + a[3][3] * s[3],
                -a[2][1] * s[5] + a[2][2] * s[4] - a[2][3] * s[3],
            ],
            [
                -a[1][0] * c[5] + a[1][2] * c[2] - a[1][3] * c[1],
                a[0][0] * c[5] - a[0][2] * c[2] + a[0][3] * c[1],
                -a[3][0] * s[5] + a[3][2] * s[2] - a[3][3] * s[1],
                a[2][0] * s[5] - a[2][2] * s[2] + a[2][3] * s[1],
            ],
            [
                a[1][0] * c[4] - a[1][1] * c[2] + a[1][3] * c[0],
                -a[0][0] * c[4] + a[0][1] * c[2] - a[0][3] * c[0],
                a[3][0] * s[4] - a[3][1] * s[2] + a[3][3] * s[0],
                -a[2][0] * s[4] + a[2][1] * s[2] - a[2][3] * s[0],
            ],
            [
                -a[1][0] * c[3] + a[1][1] * c[1] - a[1][2] * c[0],
                a[0][0] * c[3] - a[0][1] * c[1] + a[0][2] * c[0],
                -a[3][0] * s[3] + a[3][1] * s[1] - a[3][2] * s[0],
                a[2][0] * s[3] - a[2][1] * s[1] + a[2][2] * s[0],
            ],
        ];

        let mut out = [[0.0; 4]; 4];
        for (r, row) in b.iter().enumerate() {
            for (col, v) in row.iter().enumerate() {
                out[r][col] = v * inv;
            }
        }
        Ok(Self { m: out })
    }

    /// Largest absolute entry-wise difference is at most `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        self.max_abs_diff(other) <= eps
    }

    pub fn max_abs_diff(&self, other: &Self) -> f32 {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

/// 2x2 sub-determinants of the top and bottom row pairs.
struct Cofactors {
    s: [f32; 6],
    c: [f32; 6],
}

impl Cofactors {
    fn new(a: &[[f32; 4]; 4]) -> Self {
        let s = [
            a[0][0] * a[1][1] - a[1][0] * a[0][1],
            a[0][0] * a[1][2] - a[1][0] * a[0][2],
            a[0][0] * a[1][3] - a[1][0] * a[0][3],
            a[0][1] * a[1][2] - a[1][1] * a[0][2],
            a[0][1] * a[1][3] - a[1][1] * a[0][3],
            a[0][2] * a[1][3] - a[1][2] * a[0][3],
        ];
        let c = [
            a[2][0] * a[3][1] - a[3][0] * a[2][1],
            a[2][0] * a[3][2] - a[3][0] * a[2][2],
            a[2][0] * a[3][3] - a[3][0] * a[2][3],
            a[2][1] * a[3][2] - a[3][1] * a[2][2],
            a[2][1] * a[3][3] - a[3][1] * a[2][3],
            a[2][2] * a[3][3] - a[3][2] * a[2][3],
        ];
        Self { s, c }
    }

    fn determinant(&self) -> f32 {
        let (s, c) = (&self.s, &self.c);
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (0..4).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        Mat4 { m: out }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        let row = |r: usize| {
            let m = &self.m[r];
            m[0] * v.x + m[1] * v.y + m[2] * v.z + m[3] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.m {
            writeln!(
                f,
                "[{:>10.6} {:>10.6} {:>10.6} {:>10.6}]",
                row[0], row[1], row[2], row[3]
            )?;
        }
        Ok(())
    }
}
