//! Projection builders.
//!
//! Every projection maps the view volume into clip space where, after the
//! perspective divide, visible points land in `[-1, 1]` on all three axes.
//! Parallel projections keep the bottom row `(0, 0, 0, 1)`; perspective ones
//! put `-z` into `w`.
//!
//! Axonometric and oblique projections are the orthographic matrix applied
//! after a rotation or a shear of the scene. [`Projection`] names every
//! family so a single configuration value selects one.

use serde::{Deserialize, Serialize};

use crate::math::Mat4;
use crate::transform::{rotate_x, rotate_y, shear_z, sin_cos_deg};

/// Elevation that foreshortens all three axes equally (`atan(1/sqrt(2))`,
/// rounded the way the course references round it).
pub const ISOMETRIC_ELEVATION: f32 = 35.26;

/// Parallel projection of a box `2w` wide and `2w/a` tall between the near
/// and far planes.
pub fn orthographic(half_width: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::from_rows([
        [1.0 / half_width, 0.0, 0.0, 0.0],
        [0.0, aspect / half_width, 0.0, 0.0],
        [0.0, 0.0, -2.0 / (far - near), (far + near) / (near - far)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Symmetric perspective frustum with vertical field of view `fov_y` degrees.
pub fn perspective(fov_y: f32, near: f32, far: f32, aspect: f32) -> Mat4 {
    perspective_asymmetric(fov_y, near, far, aspect, 0.0)
}

/// Off-axis perspective: identical to [`perspective`] except for the
/// horizontal skew in entry (0, 2), `(r + l) / (r - l)` of the frustum.
pub fn perspective_asymmetric(fov_y: f32, near: f32, far: f32, aspect: f32, skew: f32) -> Mat4 {
    let tan_half = (fov_y.to_radians() / 2.0).tan();
    Mat4::from_rows([
        [1.0 / (aspect * tan_half), 0.0, skew, 0.0],
        [0.0, 1.0 / tan_half, 0.0, 0.0],
        [0.0, 0.0, (far + near) / (near - far), 2.0 * far * near / (near - far)],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// General frustum given its extents on the near plane.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::from_rows([
        [
            2.0 * near / (right - left),
            0.0,
            (right + left) / (right - left),
            0.0,
        ],
        [
            0.0,
            2.0 * near / (top - bottom),
            (top + bottom) / (top - bottom),
            0.0,
        ],
        [0.0, 0.0, (far + near) / (near - far), 2.0 * far * near / (near - far)],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// One half of a two-monitor setup sharing a single eye point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSide {
    Left,
    Right,
}

impl ScreenSide {
    /// Each screen spans from the shared edge to its outer edge, so the
    /// frustum is fully skewed to one side.
    pub fn skew(self) -> f32 {
        match self {
            ScreenSide::Left => -1.0,
            ScreenSide::Right => 1.0,
        }
    }
}

pub fn isometric(half_width: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    dimetric(ISOMETRIC_ELEVATION, half_width, aspect, near, far)
}

/// Two axes equally foreshortened: elevation `alpha`, azimuth fixed at 45.
pub fn dimetric(alpha: f32, half_width: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    trimetric(alpha, 45.0, half_width, aspect, near, far)
}

/// All axes foreshortened differently: elevation `alpha`, azimuth `beta`.
pub fn trimetric(alpha: f32, beta: f32, half_width: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    orthographic(half_width, aspect, near, far) * rotate_x(alpha) * rotate_y(beta)
}

/// Oblique projection with receding lines at `alpha` degrees, depth 1:1.
pub fn cavalier(alpha: f32, half_width: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    oblique(alpha, 1.0, half_width, aspect, near, far)
}

/// Oblique projection with receding lines at `alpha` degrees, depth halved.
pub fn cabinet(alpha: f32, half_width: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    oblique(alpha, 0.5, half_width, aspect, near, far)
}

fn oblique(alpha: f32, depth: f32, half_width: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let (s, c) = sin_cos_deg(alpha);
    orthographic(half_width, aspect, near, far) * shear_z(-depth * c, -depth * s)
}

/// Viewport and clipping parameters shared by every projection family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewVolume {
    /// Half width of the parallel view box.
    pub half_width: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

fn default_half_width() -> f32 {
    1.0
}

impl Default for ViewVolume {
    fn default() -> Self {
        Self {
            half_width: default_half_width(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Every supported projection family. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    Orthographic,
    Isometric,
    Dimetric { alpha: f32 },
    Trimetric { alpha: f32, beta: f32 },
    Cavalier { alpha: f32 },
    Cabinet { alpha: f32 },
    Perspective { fov_y: f32 },
    SplitScreen { fov_y: f32, side: ScreenSide },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective { fov_y: 90.0 }
    }
}

impl Projection {
    pub fn matrix(&self, v: &ViewVolume) -> Mat4 {
        let (w, a, n, f) = (v.half_width, v.aspect, v.near, v.far);
        match *self {
            Projection::Orthographic => orthographic(w, a, n, f),
            Projection::Isometric => isometric(w, a, n, f),
            Projection::Dimetric { alpha } => dimetric(alpha, w, a, n, f),
            Projection::Trimetric { alpha, beta } => trimetric(alpha, beta, w, a, n, f),
            Projection::Cavalier { alpha } => cavalier(alpha, w, a, n, f),
            Projection::Cabinet { alpha } => cabinet(alpha, w, a, n, f),
            Projection::Perspective { fov_y } => perspective(fov_y, n, f, a),
            Projection::SplitScreen { fov_y, side } => {
                perspective_asymmetric(fov_y, n, f, a, side.skew())
            }
        }
    }

    pub fn is_parallel(&self) -> bool {
        !matches!(
            self,
            Projection::Perspective { .. } | Projection::SplitScreen { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    const EPS: f32 = 1e-5;

    #[test]
    fn perspective_reference_entries() {
        let p = perspective(90.0, 0.1, 100.0, 16.0 / 9.0);
        assert!((p.get(0, 0) - 0.5625).abs() < EPS);
        assert!((p.get(1, 1) - 1.0).abs() < EPS);
        assert!((p.get(2, 2) + 1.002).abs() < EPS);
        assert!((p.get(2, 3) + 0.2002).abs() < EPS);
        assert_eq!(p.get(3, 2), -1.0);
        assert_eq!(p.get(3, 3), 0.0);
    }

    #[test]
    fn asymmetric_differs_only_in_skew() {
        let sym = perspective(60.0, 0.5, 50.0, 1.5);
        let right = perspective_asymmetric(60.0, 0.5, 50.0, 1.5, ScreenSide::Right.skew());
        let mut expected = sym;
        expected.m[0][2] = 1.0;
        assert_eq!(right, expected);
    }

    #[test]
    fn split_screen_matches_half_frustum() {
        let (n, f, a) = (0.1, 100.0, 16.0 / 9.0);
        let top = n * (45.0_f32).to_radians().tan();
        let width = 2.0 * top * a;
        let right = frustum(0.0, width, -top, top, n, f);
        let built = perspective_asymmetric(90.0, n, f, a, 1.0);
        assert!(right.approx_eq(&built, 1e-4));
    }

    #[test]
    fn orthographic_maps_near_and_far_to_clip_bounds() {
        let o = orthographic(40.0, 16.0 / 9.0, 1.0, 101.0);
        let near = o.transform_point(Vec3::new(40.0, 0.0, -1.0));
        let far = o.transform_point(Vec3::new(0.0, 22.5, -101.0));
        assert!(near.approx_eq(Vec3::new(1.0, 0.0, -1.0), EPS));
        assert!(far.approx_eq(Vec3::new(0.0, 1.0, 1.0), EPS));
        assert!(o.is_affine());
    }

    #[test]
    fn perspective_divide_maps_frustum_planes() {
        let p = perspective(90.0, 1.0, 10.0, 1.0);
        let near = (p * Vec3::new(1.0, 1.0, -1.0).extend_point()).project().unwrap();
        let far = (p * Vec3::new(0.0, 0.0, -10.0).extend_point()).project().unwrap();
        assert!(near.approx_eq(Vec3::new(1.0, 1.0, -1.0), EPS));
        assert!((far.z - 1.0).abs() < EPS);
    }

    #[test]
    fn isometric_foreshortens_axes_equally() {
        let m = isometric(1.0, 1.0, 1.0, 101.0);
        let lengths: Vec<f32> = [Vec3::X, Vec3::Y, Vec3::Z]
            .iter()
            .map(|axis| {
                let v = m.transform_vector(*axis);
                (v.x * v.x + v.y * v.y).sqrt()
            })
            .collect();
        assert!((lengths[0] - lengths[1]).abs() < 1e-3);
        assert!((lengths[1] - lengths[2]).abs() < 1e-3);
    }

    #[test]
    fn cabinet_halves_receding_depth() {
        let cav = cavalier(45.0, 1.0, 1.0, 1.0, 101.0);
        let cab = cabinet(45.0, 1.0, 1.0, 1.0, 101.0);
        let depth = |m: &Mat4| {
            let v = m.transform_vector(Vec3::Z);
            (v.x * v.x + v.y * v.y).sqrt()
        };
        assert!((depth(&cav) - 1.0).abs() < EPS);
        assert!((depth(&cab) - 0.5).abs() < EPS);
    }

    #[test]
    fn projection_enum_dispatches_to_builders() {
        let v = ViewVolume {
            half_width: 40.0,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 101.0,
        };
        assert_eq!(
            Projection::Cabinet { alpha: 60.0 }.matrix(&v),
            cabinet(60.0, 40.0, 16.0 / 9.0, 1.0, 101.0)
        );
        assert!(Projection::Isometric.is_parallel());
        assert!(!Projection::default().is_parallel());
    }

    #[test]
    fn projection_config_parses_tagged_variant() {
        let p: Projection =
            serde_json::from_str(r#"{"kind":"split_screen","fov_y":90,"side":"right"}"#).unwrap();
        assert_eq!(
            p,
            Projection::SplitScreen {
                fov_y: 90.0,
                side: ScreenSide::Right
            }
        );
    }
}
