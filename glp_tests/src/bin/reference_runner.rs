//! Reference-matrix runner with HTML and JSON report generation.
//!
//! Usage:
//!   cargo run -p glp_tests --bin reference_runner -- [output-dir]
//!
//! Rebuilds every documented assignment matrix plus a few pipeline checks
//! and writes `reference-matrices.html` / `.json` into the output directory
//! (default `test-reports`). Exits non-zero when any check fails.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use glp_core::config::ViewerConfig;
use glp_core::math::{Mat4, Vec3};
use glp_core::mesh::Mesh;
use glp_core::orientation::{AngularVelocity, OrientationController, RotationFrame};
use glp_core::quat::Quat;
use glp_core::render::RecordingRenderer;
use glp_core::report::{CheckResult, ReportBuilder};
use glp_core::transform::translate;
use glp_tests::{reference_cases, REFERENCE_EPSILON};
use glp_viewer::input::{ConstantInput, InputState};
use glp_viewer::Viewer;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("test-reports"));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;

    let mut builder = ReportBuilder::new("Reference Matrices")
        .subtitle("Assignment matrices rebuilt with the shared transform builders")
        .metadata("epsilon", &format!("{REFERENCE_EPSILON:e}"))
        .metadata("crate", concat!("glp_core ", env!("CARGO_PKG_VERSION")));

    info!("Running reference matrices");
    builder = run_reference_checks(builder);

    info!("Running pipeline checks");
    builder = run_pipeline_checks(builder);

    let report = builder.build();
    let stats = report.overall_stats();
    info!(
        total = stats.total,
        passed = stats.passed,
        failed = stats.failed,
        skipped = stats.skipped,
        pass_rate = stats.pass_rate(),
        "Reference run complete"
    );
    for failure in report.failures() {
        warn!(
            id = %failure.id,
            error = failure.error_message.as_deref().unwrap_or(""),
            "check failed"
        );
    }

    let html_path = output_dir.join("reference-matrices.html");
    let json_path = output_dir.join("reference-matrices.json");
    report
        .save_html(&html_path)
        .with_context(|| format!("write {}", html_path.display()))?;
    report
        .save_json(&json_path)
        .with_context(|| format!("write {}", json_path.display()))?;
    info!(html = %html_path.display(), json = %json_path.display(), "Reports saved");

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

/// Helper to run a check and capture its result.
fn run_check<F>(id: &str, name: &str, category: &str, description: &str, f: F) -> CheckResult
where
    F: FnOnce() -> Result<(), String>,
{
    let start = Instant::now();
    let result = f();
    let duration = start.elapsed();

    let check = CheckResult::new(id, name, category).with_description(description);
    match result {
        Ok(()) => check.pass(duration),
        Err(e) => check.fail(duration, &e),
    }
}

fn run_reference_checks(mut builder: ReportBuilder) -> ReportBuilder {
    for case in reference_cases() {
        let start = Instant::now();
        let outcome = case.check();
        let duration = start.elapsed();

        let check = CheckResult::new(case.id, case.name, case.category)
            .with_description(case.description);
        let check = match outcome {
            Ok(err) => check.with_max_error(err).pass(duration),
            Err(msg) => {
                let check = match case.max_error() {
                    Ok(err) => check.with_max_error(err),
                    Err(_) => check,
                };
                check.fail(duration, &msg)
            }
        };
        builder = builder.add_check(check);
    }
    builder
}

fn run_pipeline_checks(mut builder: ReportBuilder) -> ReportBuilder {
    const CATEGORY: &str = "Pipeline";

    builder = builder.add_check(run_check(
        "PIPE-001",
        "Idle orientation",
        CATEGORY,
        "zero input for 10000 ticks keeps the identity",
        || {
            let mut ctl = OrientationController::new(1.0, RotationFrame::World);
            for i in 0..10_000 {
                let m = ctl.tick(AngularVelocity::ZERO).map_err(|e| e.to_string())?;
                if m != Mat4::IDENTITY {
                    return Err(format!("drifted at tick {i}:\n{m}"));
                }
            }
            Ok(())
        },
    ));

    builder = builder.add_check(run_check(
        "PIPE-002",
        "Quaternion matches axis rotation",
        CATEGORY,
        "from_axis_angle(40, diagonal) against the arbitrary-axis builder",
        || {
            let axis = Vec3::new(1.0, 1.0, 1.0)
                .normalized()
                .map_err(|e| e.to_string())?;
            let by_quat = Quat::from_axis_angle(40.0, axis).to_rotation_matrix();
            let by_axis = glp_core::transform::rotate_around_axis(40.0, Vec3::ZERO, axis)
                .map_err(|e| e.to_string())?;
            let err = by_quat.max_abs_diff(&by_axis);
            if err > REFERENCE_EPSILON {
                return Err(format!("max error {err:.3e}"));
            }
            Ok(())
        },
    ));

    builder = builder.add_check(run_check(
        "PIPE-003",
        "Translation inverse",
        CATEGORY,
        "inverse of translate(3, 0, -5) is translate(-3, 0, 5) exactly",
        || {
            let inv = translate(3.0, 0.0, -5.0)
                .inverse()
                .map_err(|e| e.to_string())?;
            if inv != translate(-3.0, 0.0, 5.0) {
                return Err(format!("got\n{inv}"));
            }
            Ok(())
        },
    ));

    builder = builder.add_check(run_check(
        "PIPE-004",
        "Viewer keeps geometry in clip volume",
        CATEGORY,
        "default camera and projection after 60 frames of rotation",
        || {
            let mut viewer = Viewer::new(ViewerConfig::default(), RecordingRenderer::new())
                .map_err(|e| format!("{e:#}"))?;
            let frame = viewer
                .run_for_frames(60, &mut ConstantInput(InputState::new(0.5, 1.0, 0.25)))
                .map_err(|e| format!("{e:#}"))?
                .ok_or("no frame produced")?;
            for p in Mesh::uv_sphere(8, 16).map_err(|e| e.to_string())?.positions {
                let ndc = (frame.world_view_projection * p.extend_point())
                    .project()
                    .ok_or("vertex at infinity")?;
                if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
                    return Err(format!("{p:?} maps outside clip volume to {ndc:?}"));
                }
            }
            Ok(())
        },
    ));

    builder
}
