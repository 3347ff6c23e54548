//! Affine transform builders.
//!
//! Every builder returns a fresh [`Mat4`] whose bottom row is `(0, 0, 0, 1)`.
//! Angles are in degrees. Composite operations around an arbitrary point,
//! axis or plane follow one pattern: a change of basis, the canonical
//! operation, then the exact inverse change of basis.

use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::math::{Mat4, Vec3};

/// Principal coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Coordinate plane, named by the two axes it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    XY,
    YZ,
    ZX,
}

impl Plane {
    /// The axis perpendicular to the plane.
    pub fn normal(self) -> Axis {
        match self {
            Plane::XY => Axis::Z,
            Plane::YZ => Axis::X,
            Plane::ZX => Axis::Y,
        }
    }
}

bitflags::bitflags! {
    /// Coordinates negated by a reflection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Reflect: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const Z = 1 << 2;
    }
}

impl Reflect {
    fn from_axis(axis: Axis) -> Self {
        match axis {
            Axis::X => Reflect::X,
            Axis::Y => Reflect::Y,
            Axis::Z => Reflect::Z,
        }
    }
}

/// `(sin, cos)` of an angle given in degrees.
pub fn sin_cos_deg(degrees: f32) -> (f32, f32) {
    degrees.to_radians().sin_cos()
}

pub fn translate(tx: f32, ty: f32, tz: f32) -> Mat4 {
    Mat4::from_rows([
        [1.0, 0.0, 0.0, tx],
        [0.0, 1.0, 0.0, ty],
        [0.0, 0.0, 1.0, tz],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn translate_by(t: Vec3) -> Mat4 {
    translate(t.x, t.y, t.z)
}

/// Non-uniform scale. A zero factor flattens onto a plane; the result is a
/// valid transform but not invertible.
pub fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Mat4::from_rows([
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, sz, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn scale_uniform(s: f32) -> Mat4 {
    scale(s, s, s)
}

/// Projects onto the coordinate plane perpendicular to `axis`.
pub fn flatten(axis: Axis) -> Mat4 {
    let mut factors = [1.0; 3];
    factors[axis.index()] = 0.0;
    scale(factors[0], factors[1], factors[2])
}

pub fn rotate_x(degrees: f32) -> Mat4 {
    let (s, c) = sin_cos_deg(degrees);
    Mat4::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, -s, 0.0],
        [0.0, s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotate_y(degrees: f32) -> Mat4 {
    let (s, c) = sin_cos_deg(degrees);
    Mat4::from_rows([
        [c, 0.0, s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotate_z(degrees: f32) -> Mat4 {
    let (s, c) = sin_cos_deg(degrees);
    Mat4::from_rows([
        [c, -s, 0.0, 0.0],
        [s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotate_about(axis: Axis, degrees: f32) -> Mat4 {
    match axis {
        Axis::X => rotate_x(degrees),
        Axis::Y => rotate_y(degrees),
        Axis::Z => rotate_z(degrees),
    }
}

/// Azimuth (about Y) and elevation (about Z), in degrees, that carry the +X
/// axis onto the unit direction `d`: `Ry(azimuth) * Rz(elevation) * X == d`.
pub fn alignment_angles(d: Vec3) -> (f32, f32) {
    let elevation = d.y.clamp(-1.0, 1.0).asin().to_degrees();
    let azimuth = (-d.z).atan2(d.x).to_degrees();
    (azimuth, elevation)
}

/// Rotation by `degrees` about the line through `point` with direction `axis`.
///
/// The axis is aligned onto +X with two principal rotations derived from its
/// spherical coordinates, rotated about X, then the alignment and the
/// translation are undone in reverse order.
pub fn rotate_around_axis(degrees: f32, point: Vec3, axis: Vec3) -> Result<Mat4, MathError> {
    let d = axis.normalized()?;
    let (azimuth, elevation) = alignment_angles(d);
    Ok(Transform::new()
        .then(translate_by(-point))
        .then(rotate_y(-azimuth))
        .then(rotate_z(-elevation))
        .then(rotate_x(degrees))
        .then(rotate_z(elevation))
        .then(rotate_y(azimuth))
        .then(translate_by(point))
        .matrix())
}

/// Adds `factor` times the `source` coordinate into the `target` coordinate:
/// `shear(Axis::X, Axis::Y, f)` gives `x' = x + f * y`.
pub fn shear(target: Axis, source: Axis, factor: f32) -> Mat4 {
    let mut m = Mat4::IDENTITY;
    m.m[target.index()][source.index()] += factor;
    m
}

/// Shear along X: `y' = y + hy * x`, `z' = z + hz * x`.
pub fn shear_x(hy: f32, hz: f32) -> Mat4 {
    shear(Axis::Y, Axis::X, hy) * shear(Axis::Z, Axis::X, hz)
}

/// Shear along Y: `x' = x + hx * y`, `z' = z + hz * y`.
pub fn shear_y(hx: f32, hz: f32) -> Mat4 {
    shear(Axis::X, Axis::Y, hx) * shear(Axis::Z, Axis::Y, hz)
}

/// Shear along Z: `x' = x + hx * z`, `y' = y + hy * z`.
pub fn shear_z(hx: f32, hy: f32) -> Mat4 {
    shear(Axis::X, Axis::Z, hx) * shear(Axis::Y, Axis::Z, hy)
}

pub fn reflect(flags: Reflect) -> Mat4 {
    let sign = |f: Reflect| if flags.contains(f) { -1.0 } else { 1.0 };
    scale(sign(Reflect::X), sign(Reflect::Y), sign(Reflect::Z))
}

/// Mirror over a coordinate plane: negates the coordinate normal to it.
pub fn planar_mirror(plane: Plane) -> Mat4 {
    reflect(Reflect::from_axis(plane.normal()))
}

/// Mirror through a coordinate axis: negates the two other coordinates.
pub fn axial_mirror(axis: Axis) -> Mat4 {
    reflect(Reflect::all() - Reflect::from_axis(axis))
}

/// Mirror through the origin.
pub fn central_mirror() -> Mat4 {
    reflect(Reflect::all())
}

/// `T(pivot) * m * T(-pivot)`: applies `m` with `pivot` as the fixed point.
pub fn about_point(pivot: Vec3, m: Mat4) -> Mat4 {
    translate_by(pivot) * m * translate_by(-pivot)
}

/// Applies `m` in the frame obtained by rotating the canonical axes with
/// `align` and moving the origin to `pivot`. `align` must be a pure rotation,
/// so its transpose is its inverse.
pub fn about_frame(pivot: Vec3, align: Mat4, m: Mat4) -> Mat4 {
    about_point(pivot, align * m * align.transpose())
}

/// Object placement: scale, then roll about Z, pitch about X, yaw about Y,
/// then translate.
pub fn world(position: Vec3, yaw: f32, pitch: f32, roll: f32, scale_factor: f32) -> Mat4 {
    Transform::new()
        .then(scale_uniform(scale_factor))
        .then(rotate_z(roll))
        .then(rotate_x(pitch))
        .then(rotate_y(yaw))
        .then(translate_by(position))
        .matrix()
}

/// Matrix for transforming normals: inverse-transpose of the linear part.
pub fn normal_matrix(m: &Mat4) -> Result<Mat4, MathError> {
    let mut linear = *m;
    for row in linear.m.iter_mut().take(3) {
        row[3] = 0.0;
    }
    linear.m[3] = [0.0, 0.0, 0.0, 1.0];
    Ok(linear.inverse()?.transpose())
}

/// Serializable object placement, see [`world`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
    #[serde(default)]
    pub roll: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            scale: default_scale(),
        }
    }
}

impl Placement {
    pub fn matrix(&self) -> Mat4 {
        world(self.position, self.yaw, self.pitch, self.roll, self.scale)
    }
}

/// Composes operations given in the order they are applied to a point.
///
/// `compose(&[a, b, c])` is `c * b * a`.
pub fn compose(ops: &[Mat4]) -> Mat4 {
    ops.iter().fold(Mat4::IDENTITY, |acc, m| *m * acc)
}

/// Builder for transform chains written in apply-first order.
///
/// ```
/// use glp_core::math::Vec3;
/// use glp_core::transform::{rotate_z, translate, Transform};
///
/// let m = Transform::new()
///     .then(rotate_z(90.0))
///     .then(translate(1.0, 0.0, 0.0))
///     .matrix();
/// let p = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
/// assert!(p.approx_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    /// Appends `op`, applied after everything already in the chain.
    pub fn then(self, op: Mat4) -> Self {
        Self {
            matrix: op * self.matrix,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}
