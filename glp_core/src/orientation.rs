//! Orientation integration.
//!
//! A free-flight object keeps one unit quaternion. Each frame the host samples
//! angular velocities about the three axes and advances the state exactly
//! once, in frame order. The update is a pure function of the previous state
//! and the sample; [`OrientationController`] only stores the result.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::MathError;
use crate::math::{Mat4, Vec3};
use crate::quat::Quat;

/// Per-tick angular velocity sample. `x` drives pitch, `y` yaw, `z` roll.
/// Values are typically in `[-1, 1]`; larger magnitudes are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngularVelocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AngularVelocity {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Which frame the incremental rotation is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationFrame {
    /// `change * current`: rotate about the fixed world axes.
    #[default]
    World,
    /// `current * change`: rotate about the object's own axes.
    Body,
}

/// Orientation state: a single unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub rotation: Quat,
}

impl Orientation {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
    };

    pub fn from_quat(q: Quat) -> Result<Self, MathError> {
        Ok(Self {
            rotation: q.normalized()?,
        })
    }

    /// Incremental rotation for one sample: yaw about Y, then pitch about X,
    /// then roll about Z, combined as `qYaw * qPitch * qRoll`.
    pub fn increment(rates: AngularVelocity, degrees_per_unit: f32) -> Quat {
        let q_roll = Quat::from_axis_angle(rates.z * degrees_per_unit, Vec3::Z);
        let q_pitch = Quat::from_axis_angle(rates.x * degrees_per_unit, Vec3::X);
        let q_yaw = Quat::from_axis_angle(rates.y * degrees_per_unit, Vec3::Y);
        q_yaw * q_pitch * q_roll
    }

    /// Advances one tick and returns the new state with its rotation matrix.
    pub fn tick(
        self,
        rates: AngularVelocity,
        degrees_per_unit: f32,
        frame: RotationFrame,
    ) -> Result<(Self, Mat4), MathError> {
        let change = Self::increment(rates, degrees_per_unit);
        let next = match frame {
            RotationFrame::World => change * self.rotation,
            RotationFrame::Body => self.rotation * change,
        };
        let next = Self {
            rotation: next.normalized()?,
        };
        Ok((next, next.matrix()))
    }

    pub fn matrix(&self) -> Mat4 {
        self.rotation.to_rotation_matrix()
    }
}

/// Owns the orientation state and the tick counter for a host loop.
#[derive(Debug, Clone)]
pub struct OrientationController {
    state: Orientation,
    degrees_per_unit: f32,
    frame: RotationFrame,
    ticks: u64,
}

impl Default for OrientationController {
    fn default() -> Self {
        Self::new(1.0, RotationFrame::World)
    }
}

impl OrientationController {
    pub fn new(degrees_per_unit: f32, frame: RotationFrame) -> Self {
        Self {
            state: Orientation::IDENTITY,
            degrees_per_unit,
            frame,
            ticks: 0,
        }
    }

    pub fn with_state(mut self, state: Orientation) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> Orientation {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, rates: AngularVelocity) -> Result<Mat4, MathError> {
        let (next, matrix) = self.state.tick(rates, self.degrees_per_unit, self.frame)?;
        self.state = next;
        self.ticks += 1;
        trace!(tick = self.ticks, ?rates, rotation = ?next.rotation, "orientation tick");
        Ok(matrix)
    }

    pub fn reset(&mut self) {
        self.state = Orientation::IDENTITY;
        self.ticks = 0;
    }
}
