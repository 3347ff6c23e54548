use glp_core::curve::{bezier, slerp};
use glp_core::math::{Mat4, Vec3, Vec4};
use glp_core::orientation::{AngularVelocity, OrientationController, RotationFrame};
use glp_core::projection::perspective;
use glp_core::quat::Quat;
use glp_core::transform::{
    rotate_around_axis, rotate_x, rotate_y, rotate_z, scale, scale_uniform, translate, Transform,
};
use glp_tests::{reference_cases, REFERENCE_EPSILON};
use rand::{rngs::StdRng, Rng, SeedableRng};

const EPS: f32 = 1e-5;

fn random_unit(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if v.length() > 0.1 {
            if let Ok(n) = v.normalized() {
                return n;
            }
        }
    }
}

#[test]
fn every_documented_matrix_is_reproduced() {
    let failures: Vec<String> = reference_cases()
        .iter()
        .filter_map(|case| case.check().err().map(|e| format!("{}: {e}", case.id)))
        .collect();
    assert!(failures.is_empty(), "{}", failures.join("\n\n"));
}

#[test]
fn a03_axis_rotation_matches_explicit_chain() -> anyhow::Result<()> {
    let chain = Transform::new()
        .then(translate(-1.0, -1.0, 0.0))
        .then(rotate_y(-45.0))
        .then(rotate_z(-15.0))
        .then(rotate_x(30.0))
        .then(rotate_z(15.0))
        .then(rotate_y(45.0))
        .then(translate(1.0, 1.0, 0.0))
        .matrix();
    let case = reference_cases()
        .into_iter()
        .find(|c| c.id == "A03-R1")
        .ok_or_else(|| anyhow::anyhow!("A03-R1 missing"))?;
    assert!(chain.approx_eq(&Mat4::from_rows(case.expected), REFERENCE_EPSILON));
    assert!(case.max_error()? <= REFERENCE_EPSILON);
    Ok(())
}

#[test]
fn rotations_are_orthonormal() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let deg = rng.gen_range(-360.0..360.0);
        let p = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        let axis = random_unit(&mut rng);
        let arbitrary = rotate_around_axis(deg, Vec3::ZERO, axis).unwrap();
        for r in [rotate_x(deg), rotate_y(deg), rotate_z(deg), arbitrary] {
            assert!((r * r.transpose()).approx_eq(&Mat4::IDENTITY, EPS));
            assert!((r.determinant() - 1.0).abs() < EPS);
        }

        let about_p = rotate_around_axis(deg, p, axis).unwrap();
        let on_axis = p + axis * rng.gen_range(-5.0..5.0);
        assert!(about_p.transform_point(on_axis).approx_eq(on_axis, 1e-4));
    }
}

#[test]
fn translation_inverse_is_exact() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let (x, y, z) = (
            rng.gen_range(-1e3..1e3),
            rng.gen_range(-1e3..1e3),
            rng.gen_range(-1e3..1e3),
        );
        assert_eq!(translate(x, y, z).inverse().unwrap(), translate(-x, -y, -z));
    }
}

#[test]
fn affine_matrix_times_inverse_is_identity() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..100 {
        let m = Transform::new()
            .then(scale(
                rng.gen_range(0.5..3.0),
                rng.gen_range(0.5..3.0),
                rng.gen_range(0.5..3.0),
            ))
            .then(rotate_around_axis(rng.gen_range(-180.0..180.0), Vec3::ZERO, random_unit(&mut rng)).unwrap())
            .then(translate(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            ))
            .matrix();
        let inv = m.inverse().unwrap();
        assert!((m * inv).approx_eq(&Mat4::IDENTITY, 1e-4));
    }
}

#[test]
fn small_uniform_scale_inverts() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..50 {
        let s = rng.gen_range(1e-4..3e-3);
        let m = Transform::new()
            .then(scale_uniform(s))
            .then(rotate_around_axis(rng.gen_range(-180.0..180.0), Vec3::ZERO, random_unit(&mut rng)).unwrap())
            .then(translate(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            ))
            .matrix();
        let inv = m.inverse().unwrap();
        assert!((m * inv).approx_eq(&Mat4::IDENTITY, 1e-4), "scale {s}");
    }
}

#[test]
fn zero_angle_quaternion_is_identity() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..50 {
        let axis = random_unit(&mut rng);
        assert_eq!(Quat::from_axis_angle(0.0, axis).to_rotation_matrix(), Mat4::IDENTITY);
    }
}

#[test]
fn idle_orientation_never_drifts() {
    let mut ctl = OrientationController::new(1.0, RotationFrame::World);
    for _ in 0..10_000 {
        assert_eq!(ctl.tick(AngularVelocity::ZERO).unwrap(), Mat4::IDENTITY);
    }
}

#[test]
fn bezier_endpoints_and_constant_slerp() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..100 {
        let p: [Vec3; 4] = std::array::from_fn(|_| {
            Vec3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            )
        });
        assert_eq!(bezier(p, 0.0), p[0]);
        assert_eq!(bezier(p, 1.0), p[3]);

        let q = Quat::from_axis_angle(rng.gen_range(-180.0..180.0), random_unit(&mut rng));
        let t = rng.gen_range(0.0..=1.0);
        assert!(slerp(q, q, t).approx_eq(q, 1e-5));
    }
}

#[test]
fn translating_origin() {
    let p = translate(3.0, 0.0, -5.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert_eq!(p, Vec4::new(3.0, 0.0, -5.0, 1.0));
}

#[test]
fn perspective_reference_entries() {
    let p = perspective(90.0, 0.1, 100.0, 16.0 / 9.0);
    assert!((p.get(0, 0) - 0.5625).abs() < EPS);
    assert!((p.get(2, 2) + 1.002).abs() < EPS);
    assert!((p.get(2, 3) + 0.2002).abs() < EPS);
    assert_eq!(p.get(3, 2), -1.0);
}
