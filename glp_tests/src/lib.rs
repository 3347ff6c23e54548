//! Reference matrices documented by the course assignments.
//!
//! Each case rebuilds a matrix with the `glp_core` builders and carries the
//! documented value it must reproduce. The integration tests and the
//! `reference_runner` binary both walk [`reference_cases`].

use glp_core::math::{Mat4, Vec3};
use glp_core::projection::{
    cabinet, cavalier, dimetric, isometric, orthographic, perspective, perspective_asymmetric,
    trimetric, ScreenSide,
};
use glp_core::transform::{
    about_frame, about_point, flatten, planar_mirror, rotate_around_axis, rotate_x, rotate_y,
    scale, scale_uniform, shear_x, sin_cos_deg, translate, world, Axis, Plane, Transform,
};
use glp_core::view::{look_at, view_from_euler, EulerAngles};

/// Per-entry tolerance against documented values.
pub const REFERENCE_EPSILON: f32 = 1e-4;

/// One documented matrix.
pub struct ReferenceCase {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub expected: [[f32; 4]; 4],
    pub build: fn() -> anyhow::Result<Mat4>,
}

impl ReferenceCase {
    /// Builds the matrix and returns its largest deviation from the
    /// documented value.
    pub fn max_error(&self) -> anyhow::Result<f32> {
        let built = (self.build)()?;
        Ok(built.max_abs_diff(&Mat4::from_rows(self.expected)))
    }

    /// `Ok(max error)` when within [`REFERENCE_EPSILON`], otherwise a
    /// message showing both matrices.
    pub fn check(&self) -> Result<f32, String> {
        let built = (self.build)().map_err(|e| format!("{e:#}"))?;
        let expected = Mat4::from_rows(self.expected);
        let err = built.max_abs_diff(&expected);
        if err <= REFERENCE_EPSILON {
            Ok(err)
        } else {
            Err(format!(
                "max error {err:.3e}\nbuilt:\n{built}\nexpected:\n{expected}"
            ))
        }
    }
}

const A04_W: f32 = 40.0;
const A04_A: f32 = 16.0 / 9.0;
const A04_N: f32 = 1.0;
const A04_F: f32 = 101.0;

/// Camera and car used by the A08 scene.
const A08_CAR: Vec3 = Vec3::new(2.0, 0.0, -3.0);
const A08_EYE: Vec3 = Vec3::new(0.0, 3.0, 4.0);

fn a08_world() -> Mat4 {
    world(A08_CAR, 45.0, 0.0, 0.0, 1.0)
}

fn a08_view() -> anyhow::Result<Mat4> {
    Ok(look_at(A08_EYE, A08_CAR, Vec3::Y)?)
}

fn a08_projection() -> Mat4 {
    perspective(60.0, 0.1, 1000.0, 16.0 / 9.0)
}

pub fn reference_cases() -> Vec<ReferenceCase> {
    vec![
        // A02: elementary transforms.
        ReferenceCase {
            id: "A02-T1",
            name: "Translate",
            category: "A02 Elementary",
            description: "translate(3, 0, -5)",
            expected: [
                [1.0, 0.0, 0.0, 3.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, -5.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(translate(3.0, 0.0, -5.0)),
        },
        ReferenceCase {
            id: "A02-R1",
            name: "Rotate about Y",
            category: "A02 Elementary",
            description: "rotate_y(-30)",
            expected: [
                [0.866025, 0.0, -0.5, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.5, 0.0, 0.866025, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(rotate_y(-30.0)),
        },
        ReferenceCase {
            id: "A02-S1",
            name: "Uniform scale",
            category: "A02 Elementary",
            description: "scale_uniform(2)",
            expected: [
                [2.0, 0.0, 0.0, 0.0],
                [0.0, 2.0, 0.0, 0.0],
                [0.0, 0.0, 2.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(scale_uniform(2.0)),
        },
        ReferenceCase {
            id: "A02-S2",
            name: "Non-uniform scale",
            category: "A02 Elementary",
            description: "scale(1.5, 0.5, 0.5)",
            expected: [
                [1.5, 0.0, 0.0, 0.0],
                [0.0, 0.5, 0.0, 0.0],
                [0.0, 0.0, 0.5, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(scale(1.5, 0.5, 0.5)),
        },
        ReferenceCase {
            id: "A02-S3",
            name: "Planar mirror",
            category: "A02 Elementary",
            description: "mirror across the YZ plane",
            expected: [
                [-1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(planar_mirror(Plane::YZ)),
        },
        ReferenceCase {
            id: "A02-S4",
            name: "Flatten",
            category: "A02 Elementary",
            description: "flatten onto the XZ plane",
            expected: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(flatten(Axis::Y)),
        },
        ReferenceCase {
            id: "A02-H1",
            name: "Shear",
            category: "A02 Elementary",
            description: "shear_x(1, 0): y' = y + x",
            expected: [
                [1.0, 0.0, 0.0, 0.0],
                [1.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(shear_x(1.0, 0.0)),
        },
        // A03: composed transforms.
        ReferenceCase {
            id: "A03-R1",
            name: "Rotate about arbitrary axis",
            category: "A03 Composite",
            description: "30 degrees about the axis through (1,1,0) at 15/45 degrees",
            expected: [
                [0.928525, 0.36519, 0.0669096, -0.293715],
                [-0.317823, 0.875, -0.36519, 0.442823],
                [-0.19191, 0.317823, 0.928525, -0.125913],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || {
                let (s15, c15) = sin_cos_deg(15.0);
                let (s45, c45) = sin_cos_deg(45.0);
                let axis = Vec3::new(c15 * c45, s15, -c15 * s45);
                Ok(rotate_around_axis(30.0, Vec3::new(1.0, 1.0, 0.0), axis)?)
            },
        },
        ReferenceCase {
            id: "A03-S1",
            name: "Scale about point",
            category: "A03 Composite",
            description: "scale by 2 keeping (1,1,0) fixed",
            expected: [
                [2.0, 0.0, 0.0, -1.0],
                [0.0, 2.0, 0.0, -1.0],
                [0.0, 0.0, 2.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(about_point(Vec3::new(1.0, 1.0, 0.0), scale_uniform(2.0))),
        },
        ReferenceCase {
            id: "A03-S2",
            name: "Mirror across rotated plane",
            category: "A03 Composite",
            description: "XY mirror in a frame at (1,2,0) turned 38 degrees about Y",
            expected: [
                [0.241922, 0.0, -0.970296, 0.758078],
                [0.0, 1.0, 0.0, 0.0],
                [-0.970296, 0.0, -0.241922, 0.970296],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || {
                Ok(about_frame(
                    Vec3::new(1.0, 2.0, 0.0),
                    rotate_y(38.0),
                    planar_mirror(Plane::XY),
                ))
            },
        },
        ReferenceCase {
            id: "A03-I1",
            name: "Inverse of placement",
            category: "A03 Composite",
            description: "inverse of scale 2, Rx(45), Ry(30), T(1,1,-2)",
            expected: [
                [0.433013, 0.0, -0.25, -0.933013],
                [0.176777, 0.353553, 0.306186, 0.0820423],
                [0.176777, -0.353553, 0.306186, 0.789149],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || {
                let placement = Transform::new()
                    .then(scale_uniform(2.0))
                    .then(rotate_x(45.0))
                    .then(rotate_y(30.0))
                    .then(translate(1.0, 1.0, -2.0))
                    .matrix();
                Ok(placement.inverse()?)
            },
        },
        // A04: parallel projections, w = 40, a = 16/9, n = 1, f = 101.
        ReferenceCase {
            id: "A04-PAR",
            name: "Orthographic",
            category: "A04 Parallel",
            description: "orthographic(40, 16/9, 1, 101)",
            expected: [
                [0.025, 0.0, 0.0, 0.0],
                [0.0, 0.04444444, 0.0, 0.0],
                [0.0, 0.0, -0.02, -1.02],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(orthographic(A04_W, A04_A, A04_N, A04_F)),
        },
        ReferenceCase {
            id: "A04-ISO",
            name: "Isometric",
            category: "A04 Parallel",
            description: "elevation 35.26, azimuth 45",
            expected: [
                [0.01767767, 0.0, 0.01767767, 0.0],
                [0.0181424, 0.0362907, -0.0181424, 0.0],
                [0.01154763, -0.01154575, -0.01154763, -1.02],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(isometric(A04_W, A04_A, A04_N, A04_F)),
        },
        ReferenceCase {
            id: "A04-DIM",
            name: "Dimetric",
            category: "A04 Parallel",
            description: "elevation 20, azimuth 45",
            expected: [
                [0.01767767, 0.0, 0.01767767, 0.0],
                [0.01074866, 0.04176412, -0.01074866, 0.0],
                [0.01328926, -0.006840403, -0.01328926, -1.02],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(dimetric(20.0, A04_W, A04_A, A04_N, A04_F)),
        },
        ReferenceCase {
            id: "A04-TRI",
            name: "Trimetric",
            category: "A04 Parallel",
            description: "elevation -30, azimuth 30",
            expected: [
                [0.02165064, 0.0, 0.0125, 0.0],
                [-0.01111111, 0.03849002, 0.01924501, 0.0],
                [0.008660254, 0.01, -0.015, -1.02],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(trimetric(-30.0, 30.0, A04_W, A04_A, A04_N, A04_F)),
        },
        ReferenceCase {
            id: "A04-CAV",
            name: "Cavalier",
            category: "A04 Parallel",
            description: "receding axis at 45 degrees, full depth",
            expected: [
                [0.025, 0.0, -0.01767767, 0.0],
                [0.0, 0.04444444, -0.03142697, 0.0],
                [0.0, 0.0, -0.02, -1.02],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(cavalier(45.0, A04_W, A04_A, A04_N, A04_F)),
        },
        ReferenceCase {
            id: "A04-CAB",
            name: "Cabinet",
            category: "A04 Parallel",
            description: "receding axis at 60 degrees, half depth",
            expected: [
                [0.025, 0.0, -0.00625, 0.0],
                [0.0, 0.04444444, -0.01924501, 0.0],
                [0.0, 0.0, -0.02, -1.02],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(cabinet(60.0, A04_W, A04_A, A04_N, A04_F)),
        },
        // A05: perspective.
        ReferenceCase {
            id: "A05-P1",
            name: "Perspective",
            category: "A05 Perspective",
            description: "fov 90, near 0.1, far 100, aspect 16/9",
            expected: [
                [0.5625, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, -1.002, -0.2002],
                [0.0, 0.0, -1.0, 0.0],
            ],
            build: || Ok(perspective(90.0, 0.1, 100.0, 16.0 / 9.0)),
        },
        ReferenceCase {
            id: "A05-PR",
            name: "Split screen, right",
            category: "A05 Perspective",
            description: "right half of a two-monitor frustum",
            expected: [
                [0.5625, 0.0, 1.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, -1.002, -0.2002],
                [0.0, 0.0, -1.0, 0.0],
            ],
            build: || {
                Ok(perspective_asymmetric(
                    90.0,
                    0.1,
                    100.0,
                    16.0 / 9.0,
                    ScreenSide::Right.skew(),
                ))
            },
        },
        // A06: Euler camera.
        ReferenceCase {
            id: "A06-V1",
            name: "Euler view",
            category: "A06 View",
            description: "camera at (1,2,5), yaw 30, pitch -20, roll 10",
            expected: [
                [0.823173, 0.163176, -0.543838, 1.56967],
                [-0.318796, 0.925417, -0.204874, -0.507667],
                [0.469846, 0.34202, 0.813798, -5.22288],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || {
                Ok(view_from_euler(
                    Vec3::new(1.0, 2.0, 5.0),
                    EulerAngles::new(30.0, -20.0, 10.0),
                ))
            },
        },
        // A08: car scene.
        ReferenceCase {
            id: "A08-W",
            name: "Car world",
            category: "A08 Scene",
            description: "car at (2,0,-3) heading 45 degrees",
            expected: [
                [0.707107, 0.0, 0.707107, 2.0],
                [0.0, 1.0, 0.0, 0.0],
                [-0.707107, 0.0, 0.707107, -3.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: || Ok(a08_world()),
        },
        ReferenceCase {
            id: "A08-V",
            name: "Look-at view",
            category: "A08 Scene",
            description: "camera at (0,3,4) looking at the car",
            expected: [
                [0.961524, 0.0, 0.274721, -1.09888],
                [0.104669, 0.924575, -0.366341, -1.30836],
                [-0.254, 0.381, 0.889001, -4.699],
                [0.0, 0.0, 0.0, 1.0],
            ],
            build: a08_view,
        },
        ReferenceCase {
            id: "A08-P",
            name: "Scene projection",
            category: "A08 Scene",
            description: "fov 60, near 0.1, far 1000, aspect 16/9",
            expected: [
                [0.974279, 0.0, 0.0, 0.0],
                [0.0, 1.73205, 0.0, 0.0],
                [0.0, 0.0, -1.0002, -0.20002],
                [0.0, 0.0, -1.0, 0.0],
            ],
            build: || Ok(a08_projection()),
        },
        ReferenceCase {
            id: "A08-WVP",
            name: "World-view-projection",
            category: "A08 Scene",
            description: "projection * view * world",
            expected: [
                [0.473152, 0.0, 0.851673, 0.0],
                [0.576867, 1.60141, -0.320482, 0.0],
                [0.808386, -0.381077, -0.449103, 7.67556],
                [0.808224, -0.381, -0.449013, 7.87401],
            ],
            build: || Ok(a08_projection() * a08_view()? * a08_world()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_ids_are_unique() {
        let cases = reference_cases();
        let mut ids: Vec<_> = cases.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cases.len());
    }
}
