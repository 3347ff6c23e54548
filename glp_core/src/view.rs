//! Camera/view construction.
//!
//! Both constructors map world space into camera space, where the camera sits
//! at the origin looking down -Z with +Y up.

use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::math::{Mat4, Vec3};
use crate::orientation::Orientation;
use crate::quat::Quat;
use crate::transform::{rotate_x, rotate_y, rotate_z, translate_by};

/// Yaw about Y, pitch about X, roll about Z, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
    #[serde(default)]
    pub roll: f32,
}

impl EulerAngles {
    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// `Ry(yaw) * Rx(pitch) * Rz(roll)`, the camera's orientation in the world.
    pub fn rotation(&self) -> Mat4 {
        rotate_y(self.yaw) * rotate_x(self.pitch) * rotate_z(self.roll)
    }
}

/// View matrix for a camera at `position` oriented by `angles`.
///
/// This is the inverse of `T(c) * Ry(yaw) * Rx(pitch) * Rz(roll)`, built
/// directly as `Rz(-roll) * Rx(-pitch) * Ry(-yaw) * T(-c)`.
pub fn view_from_euler(position: Vec3, angles: EulerAngles) -> Mat4 {
    rotate_z(-angles.roll) * rotate_x(-angles.pitch) * rotate_y(-angles.yaw) * translate_by(-position)
}

/// Right-handed look-at view matrix.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Mat4, MathError> {
    let forward = (target - eye)
        .normalized()
        .map_err(|_| MathError::DegenerateView)?;
    let side = forward.cross(up);
    // |forward x up| = |up| sin(angle); reject when the two are parallel.
    if side.length() <= 1e-6 * up.length() {
        return Err(MathError::DegenerateView);
    }
    let right = side.normalized().map_err(|_| MathError::DegenerateView)?;
    let true_up = right.cross(forward);

    Ok(Mat4::from_rows([
        [right.x, right.y, right.z, -right.dot(eye)],
        [true_up.x, true_up.y, true_up.z, -true_up.dot(eye)],
        [-forward.x, -forward.y, -forward.z, forward.dot(eye)],
        [0.0, 0.0, 0.0, 1.0],
    ]))
}

/// Recovers the angles of a rotation built as `Ry(yaw) * Rx(pitch) * Rz(roll)`.
///
/// At gimbal lock (pitch of +/-90 degrees) yaw and roll share an axis; roll is
/// reported as zero and the whole rotation is attributed to yaw.
pub fn euler_from_rotation(m: &Mat4) -> EulerAngles {
    let m = &m.m;
    let sin_pitch = (-m[1][2]).clamp(-1.0, 1.0);
    if sin_pitch.abs() < 1.0 - 1e-6 {
        EulerAngles {
            yaw: m[0][2].atan2(m[2][2]).to_degrees(),
            pitch: sin_pitch.asin().to_degrees(),
            roll: m[1][0].atan2(m[1][1]).to_degrees(),
        }
    } else {
        EulerAngles {
            yaw: (-m[2][0]).atan2(m[0][0]).to_degrees(),
            pitch: sin_pitch.signum() * 90.0,
            roll: 0.0,
        }
    }
}

/// Quaternion-driven free-flight camera.
///
/// The camera sits at `position` turned by `orientation`; its view is the
/// inverse placement `conj(q) * T(-position)`. Movement is given in the
/// camera's own axes: +X right, +Y up, +Z backward (forward is -Z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeCamera {
    position: Vec3,
    orientation: Orientation,
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0), Orientation::IDENTITY)
    }
}

impl FreeCamera {
    pub fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Moves by `delta` expressed in camera axes.
    pub fn translate_local(&mut self, delta: Vec3) {
        self.position = self.position + self.orientation.rotation.rotate(delta);
    }

    /// `T(position) * R(orientation)`, the camera's placement in the world.
    pub fn placement(&self) -> Mat4 {
        translate_by(self.position) * self.orientation.matrix()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.orientation.rotation.conjugate().to_rotation_matrix() * translate_by(-self.position)
    }
}

/// Configurable camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Camera {
    Euler {
        position: Vec3,
        #[serde(default)]
        angles: EulerAngles,
    },
    LookAt {
        eye: Vec3,
        target: Vec3,
        #[serde(default = "default_up")]
        up: Vec3,
    },
    /// Starting pose of a [`FreeCamera`].
    Free {
        position: Vec3,
        #[serde(default)]
        orientation: Quat,
    },
}

fn default_up() -> Vec3 {
    Vec3::Y
}

impl Default for Camera {
    fn default() -> Self {
        Camera::LookAt {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: default_up(),
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Result<Mat4, MathError> {
        match *self {
            Camera::Euler { position, angles } => Ok(view_from_euler(position, angles)),
            Camera::LookAt { eye, target, up } => look_at(eye, target, up),
            Camera::Free {
                position,
                orientation,
            } => Ok(FreeCamera::new(position, Orientation::from_quat(orientation)?).view_matrix()),
        }
    }

    /// The free-flight camera for a `Free` pose, `None` for the fixed kinds.
    /// The stored orientation is normalized.
    pub fn free(&self) -> Result<Option<FreeCamera>, MathError> {
        match *self {
            Camera::Free {
                position,
                orientation,
            } => Ok(Some(FreeCamera::new(
                position,
                Orientation::from_quat(orientation)?,
            ))),
            _ => Ok(None),
        }
    }

    pub fn position(&self) -> Vec3 {
        match *self {
            Camera::Euler { position, .. } => position,
            Camera::LookAt { eye, .. } => eye,
            Camera::Free { position, .. } => position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn euler_view_inverts_camera_placement() {
        let position = Vec3::new(1.0, 2.0, 3.0);
        let angles = EulerAngles::new(30.0, -20.0, 10.0);
        let placement = translate_by(position) * angles.rotation();
        let view = view_from_euler(position, angles);
        assert!((view * placement).approx_eq(&Mat4::IDENTITY, EPS));
    }

    #[test]
    fn euler_view_maps_camera_to_origin() {
        let position = Vec3::new(-4.0, 1.5, 8.0);
        let view = view_from_euler(position, EulerAngles::new(45.0, 10.0, 0.0));
        assert!(view.transform_point(position).approx_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let eye = Vec3::new(3.0, 2.0, 5.0);
        let target = Vec3::new(-1.0, 0.0, 0.0);
        let view = look_at(eye, target, Vec3::Y).unwrap();
        let t = view.transform_point(target);
        let dist = (target - eye).length();
        assert!(t.approx_eq(Vec3::new(0.0, 0.0, -dist), 1e-4));
        assert!(view.transform_point(eye).approx_eq(Vec3::ZERO, 1e-4));
    }

    #[test]
    fn look_at_matches_euler_for_straight_ahead() {
        let eye = Vec3::new(0.0, 1.0, 4.0);
        let a = look_at(eye, Vec3::new(0.0, 1.0, 0.0), Vec3::Y).unwrap();
        let b = view_from_euler(eye, EulerAngles::default());
        assert!(a.approx_eq(&b, EPS));
    }

    #[test]
    fn degenerate_look_at_fails() {
        let eye = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(look_at(eye, eye, Vec3::Y), Err(MathError::DegenerateView));
        assert_eq!(
            look_at(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::Y),
            Err(MathError::DegenerateView)
        );
        assert_eq!(
            look_at(Vec3::ZERO, Vec3::new(1e-9, 5.0, 0.0), Vec3::Y),
            Err(MathError::DegenerateView)
        );
        assert_eq!(
            look_at(Vec3::ZERO, Vec3::X, Vec3::ZERO),
            Err(MathError::DegenerateView)
        );
    }

    #[test]
    fn euler_angles_round_trip() {
        let angles = EulerAngles::new(-35.0, 25.0, 60.0);
        let back = euler_from_rotation(&angles.rotation());
        assert!((back.yaw - angles.yaw).abs() < 1e-3);
        assert!((back.pitch - angles.pitch).abs() < 1e-3);
        assert!((back.roll - angles.roll).abs() < 1e-3);
    }

    #[test]
    fn gimbal_lock_folds_roll_into_yaw() {
        let m = EulerAngles::new(20.0, 90.0, 0.0).rotation();
        let back = euler_from_rotation(&m);
        assert_eq!(back.pitch, 90.0);
        assert_eq!(back.roll, 0.0);
        assert!(back.rotation().approx_eq(&m, 1e-4));
    }

    #[test]
    fn free_camera_view_inverts_its_placement() {
        let axis = Vec3::new(1.0, 2.0, -0.5).normalized().unwrap();
        let q = Quat::from_axis_angle(70.0, axis);
        let cam = FreeCamera::new(
            Vec3::new(2.0, -1.0, 4.0),
            Orientation::from_quat(q).unwrap(),
        );
        assert!((cam.view_matrix() * cam.placement()).approx_eq(&Mat4::IDENTITY, 1e-5));
        assert!(cam
            .view_matrix()
            .transform_point(cam.position())
            .approx_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn free_camera_matches_euler_view_for_same_pose() {
        let angles = EulerAngles::new(30.0, -20.0, 10.0);
        let q = Quat::from_axis_angle(angles.yaw, Vec3::Y)
            * Quat::from_axis_angle(angles.pitch, Vec3::X)
            * Quat::from_axis_angle(angles.roll, Vec3::Z);
        let position = Vec3::new(1.0, 2.0, 5.0);
        let cam = FreeCamera::new(position, Orientation::from_quat(q).unwrap());
        assert!(cam
            .view_matrix()
            .approx_eq(&view_from_euler(position, angles), 1e-5));
    }

    #[test]
    fn free_camera_moves_along_its_own_axes() {
        let yawed = Orientation::from_quat(Quat::from_axis_angle(90.0, Vec3::Y)).unwrap();
        let mut cam = FreeCamera::new(Vec3::new(0.0, 0.0, 3.0), yawed);
        // forward is -Z in camera axes, which the yaw turns onto -X
        cam.translate_local(Vec3::new(0.0, 0.0, -1.0));
        assert!(cam.position().approx_eq(Vec3::new(-1.0, 0.0, 3.0), 1e-5));
        cam.translate_local(Vec3::new(0.0, 2.0, 0.0));
        assert!(cam.position().approx_eq(Vec3::new(-1.0, 2.0, 3.0), 1e-5));
    }

    #[test]
    fn free_camera_config_builds_view() {
        let cam: Camera = serde_json::from_str(
            r#"{"kind":"free","position":{"x":0,"y":0,"z":3}}"#,
        )
        .unwrap();
        let free = cam.free().unwrap().unwrap();
        assert_eq!(free, FreeCamera::default());
        assert_eq!(cam.view_matrix().unwrap(), free.view_matrix());
        assert_eq!(Camera::default().free().unwrap(), None);

        let zero = Camera::Free {
            position: Vec3::ZERO,
            orientation: Quat::new(0.0, 0.0, 0.0, 0.0),
        };
        assert_eq!(zero.view_matrix(), Err(MathError::ZeroLength));
    }

    #[test]
    fn camera_config_parses_look_at() {
        let cam: Camera = serde_json::from_str(
            r#"{"kind":"look_at","eye":{"x":0,"y":0,"z":5},"target":{"x":0,"y":0,"z":0}}"#,
        )
        .unwrap();
        assert_eq!(cam, Camera::default());
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 5.0));
    }
}
