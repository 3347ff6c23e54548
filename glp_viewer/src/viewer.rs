//! Host loop.
//!
//! The viewer owns the orientation state, the camera and projection matrices
//! and a render backend. Each frame it takes one input sample, advances the
//! orientation exactly once and submits the resulting matrices.
//!
//! The object's world matrix is `animation * orientation * placement`:
//! the configured placement first, then the user's accumulated rotation,
//! then the keyframe path when one is configured. With `drive = camera` the
//! rotation and the input translation move a free-flight camera instead and
//! the object keeps `animation * placement`.

use std::time::Duration;

use anyhow::Context;
use glp_core::{
    config::{DriveTarget, ViewerConfig},
    math::Mat4,
    orientation::{Orientation, OrientationController},
    render::{FrameMatrices, RenderBackend},
    view::FreeCamera,
};
use tracing::{debug, info, trace};

use crate::{
    input::{InputSource, InputState},
    interp::KeyframeTrack,
};

/// Drives one object through the transform pipeline.
pub struct Viewer<R: RenderBackend> {
    config: ViewerConfig,
    controller: OrientationController,
    view: Mat4,
    projection: Mat4,
    placement: Mat4,
    free_camera: Option<FreeCamera>,
    track: Option<KeyframeTrack>,
    renderer: R,
    frame: u64,
}

impl<R: RenderBackend> Viewer<R> {
    pub fn new(config: ViewerConfig, renderer: R) -> anyhow::Result<Self> {
        config.validate().context("validate config")?;
        let view = config.camera.view_matrix().context("build camera view")?;
        let free_camera = match config.drive {
            DriveTarget::Object => None,
            DriveTarget::Camera => Some(
                config
                    .camera
                    .free()
                    .context("build free camera")?
                    .ok_or_else(|| anyhow::anyhow!("drive = camera needs a free camera"))?,
            ),
        };
        let mut controller = OrientationController::new(config.degrees_per_unit, config.frame);
        if let Some(camera) = &free_camera {
            controller = controller.with_state(camera.orientation());
        }
        let projection = config.projection.matrix(&config.volume);
        let track = if config.keyframes.is_empty() {
            None
        } else {
            Some(KeyframeTrack::new(config.keyframes.clone()).context("build keyframe track")?)
        };

        debug!(
            camera = ?config.camera,
            projection = ?config.projection,
            drive = ?config.drive,
            keyframes = config.keyframes.len(),
            "viewer created"
        );

        Ok(Self {
            controller,
            placement: config.object.matrix(),
            view,
            free_camera,
            projection,
            track,
            renderer,
            frame: 0,
            config,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Number of frames completed.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn orientation(&self) -> Orientation {
        self.controller.state()
    }

    /// The driven camera, when `drive = camera`.
    pub fn free_camera(&self) -> Option<&FreeCamera> {
        self.free_camera.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Position along the keyframe path for frame `frame`, looping.
    pub fn animation_phase(&self, frame: u64) -> f32 {
        let period = self.config.animation_frames.max(1);
        (frame % period) as f32 / period as f32
    }

    /// Runs one frame.
    pub fn tick(&mut self, input: InputState) -> anyhow::Result<FrameMatrices> {
        let rotation = self
            .controller
            .tick(input.angular_velocity())
            .with_context(|| format!("orientation update at frame {}", self.frame))?;

        let animation = match &self.track {
            Some(track) => track.sample(self.animation_phase(self.frame)),
            None => Mat4::IDENTITY,
        };
        let state = self.controller.state();
        let (world, view) = match &mut self.free_camera {
            Some(camera) => {
                camera.set_orientation(state);
                camera.translate_local(input.translation);
                (animation * self.placement, camera.view_matrix())
            }
            None => (animation * rotation * self.placement, self.view),
        };
        let matrices = FrameMatrices::new(world, view, self.projection).context("frame matrices")?;

        self.renderer.begin_frame();
        self.renderer.submit(&matrices);
        self.renderer.end_frame();

        trace!(frame = self.frame, ?input, "frame submitted");
        self.frame += 1;
        Ok(matrices)
    }

    /// Runs `n` frames back to back, returning the last frame's matrices.
    pub fn run_for_frames<S: InputSource + ?Sized>(
        &mut self,
        n: u64,
        source: &mut S,
    ) -> anyhow::Result<Option<FrameMatrices>> {
        let mut last = None;
        for _ in 0..n {
            let input = source.sample(self.frame);
            last = Some(self.tick(input)?);
        }
        Ok(last)
    }

    /// Runs at `tick_hz` frames per second until `frames` frames have run, or
    /// forever when `frames` is `None`. Late frames are run immediately, so
    /// every frame still sees exactly one sample in order.
    pub async fn run_paced<S: InputSource + ?Sized>(
        &mut self,
        source: &mut S,
        frames: Option<u64>,
    ) -> anyhow::Result<u64> {
        let tick_hz = self.config.tick_hz;
        let tick_interval = Duration::from_secs_f32(1.0 / tick_hz as f32);
        let report_every = u64::from(tick_hz);
        let mut next_tick = tokio::time::Instant::now();
        let mut ran = 0;

        while frames.map_or(true, |n| ran < n) {
            let input = source.sample(self.frame);
            let matrices = self.tick(input)?;
            ran += 1;

            if self.frame % report_every == 0 {
                info!(
                    frame = self.frame,
                    rotation = ?self.orientation().rotation,
                    wvp_row0 = ?matrices.world_view_projection.m[0],
                    "viewer status"
                );
            }

            next_tick += tick_interval;
            tokio::time::sleep_until(next_tick).await;
        }
        Ok(ran)
    }
}
