//! Curve and orientation interpolation.
//!
//! One cubic Bezier segment is defined by four control points and sampled
//! with `t` in `[0, 1]`. Positions use the Bernstein form so the endpoints are
//! reproduced exactly. Orientations use the De Casteljau pyramid with slerp in
//! place of linear interpolation.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::math::{Mat4, Vec3};
use crate::quat::Quat;
use crate::transform::translate_by;

/// Below this angle (as `1 - cos`) slerp falls back to normalized lerp.
pub const SLERP_LINEAR_THRESHOLD: f32 = 1e-6;

/// Anything that can be blended as a Bezier control point.
pub trait ControlPoint: Copy + Add<Output = Self> + Mul<f32, Output = Self> {}

impl<T> ControlPoint for T where T: Copy + Add<Output = T> + Mul<f32, Output = T> {}

/// Cubic Bernstein interpolation of `p[0..4]`.
pub fn bezier<T: ControlPoint>(p: [T; 4], t: f32) -> T {
    let u = 1.0 - t;
    p[0] * (u * u * u) + p[1] * (3.0 * u * u * t) + p[2] * (3.0 * u * t * t) + p[3] * (t * t * t)
}

/// Spherical linear interpolation along the shortest arc.
pub fn slerp(qa: Quat, qb: Quat, t: f32) -> Quat {
    let mut cos_theta = qa.dot(qb);
    let mut qb = qb;
    if cos_theta < 0.0 {
        cos_theta = -cos_theta;
        qb = -qb;
    }

    if cos_theta > 1.0 - SLERP_LINEAR_THRESHOLD {
        let blended = qa * (1.0 - t) + qb * t;
        // Both inputs are unit length and nearly equal, so the blend cannot
        // vanish; fall back to `qa` rather than fail on malformed input.
        return blended.normalized().unwrap_or(qa);
    }

    let theta = cos_theta.acos();
    let inv_sin = 1.0 / theta.sin();
    qa * (((1.0 - t) * theta).sin() * inv_sin) + qb * ((t * theta).sin() * inv_sin)
}

/// Quaternion Bezier: three levels of slerp over four orientation keys.
pub fn quaternion_bezier(q: [Quat; 4], t: f32) -> Quat {
    let q01 = slerp(q[0], q[1], t);
    let q12 = slerp(q[1], q[2], t);
    let q23 = slerp(q[2], q[3], t);
    let q012 = slerp(q01, q12, t);
    let q123 = slerp(q12, q23, t);
    slerp(q012, q123, t)
}

/// Keyframed placement: Bezier position and quaternion-Bezier rotation,
/// `T(position) * R(rotation)`.
pub fn keyframe_transform(positions: [Vec3; 4], rotations: [Quat; 4], t: f32) -> Mat4 {
    let position = bezier(positions, t);
    let rotation = quaternion_bezier(rotations, t);
    translate_by(position) * rotation.to_rotation_matrix()
}

/// One animation key: where the object is and how it is turned.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keyframe {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Quat,
}

impl Keyframe {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}
