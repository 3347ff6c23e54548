//! `glp_core`
//!
//! Hand-derived 4x4 homogeneous transforms for a graphics course pipeline:
//! affine builders, camera views, parallel and perspective projections,
//! quaternion orientation, and Bezier interpolation of positions and
//! orientations.
//!
//! Conventions:
//! - Matrices are row-major (`m[row][col]`) and act on column vectors.
//! - `a * b` applies `b` first. [`transform::Transform`] and
//!   [`transform::compose`] take operations in apply-first order.
//! - Angles are in degrees at every public entry point.
//! - No `unsafe`.

pub mod config;
pub mod curve;
pub mod error;
pub mod math;
pub mod mesh;
pub mod orientation;
pub mod projection;
pub mod quat;
pub mod render;
pub mod report;
pub mod transform;
pub mod view;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::curve::{bezier, keyframe_transform, quaternion_bezier, slerp, Keyframe};
    pub use crate::error::{MathError, MeshError};
    pub use crate::math::*;
    pub use crate::orientation::{AngularVelocity, Orientation, OrientationController, RotationFrame};
    pub use crate::projection::{Projection, ViewVolume};
    pub use crate::quat::Quat;
    pub use crate::render::{FrameMatrices, RenderBackend};
    pub use crate::transform::*;
    pub use crate::view::{look_at, view_from_euler, Camera, EulerAngles, FreeCamera};
}
