//! Rendering abstraction.
//!
//! This crate does not depend on a graphics backend. A backend receives the
//! finished matrices for each frame and uploads them however it likes.

use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::math::Mat4;
use crate::transform::normal_matrix;

/// Everything a shader needs to place one object for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMatrices {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// `projection * view * world`.
    pub world_view_projection: Mat4,
    /// Inverse transpose of `view * world`, for eye-space normals.
    pub normal: Mat4,
}

impl FrameMatrices {
    pub fn new(world: Mat4, view: Mat4, projection: Mat4) -> Result<Self, MathError> {
        let world_view = view * world;
        Ok(Self {
            world,
            view,
            projection,
            world_view_projection: projection * world_view,
            normal: normal_matrix(&world_view)?,
        })
    }
}

/// A minimal rendering API.
pub trait RenderBackend: Send {
    fn begin_frame(&mut self);
    fn submit(&mut self, frame: &FrameMatrices);
    fn end_frame(&mut self);
}

/// A no-op renderer useful for headless runs.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl RenderBackend for NullRenderer {
    fn begin_frame(&mut self) {}
    fn submit(&mut self, _frame: &FrameMatrices) {}
    fn end_frame(&mut self) {}
}

/// Keeps every submitted frame; used by tests to inspect what the host loop
/// produced.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<FrameMatrices>,
    open: bool,
    begun: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[FrameMatrices] {
        &self.frames
    }

    pub fn last(&self) -> Option<&FrameMatrices> {
        self.frames.last()
    }

    /// Number of `begin_frame` calls seen.
    pub fn frames_begun(&self) -> u64 {
        self.begun
    }
}

impl RenderBackend for RecordingRenderer {
    fn begin_frame(&mut self) {
        self.open = true;
        self.begun += 1;
    }

    fn submit(&mut self, frame: &FrameMatrices) {
        if !self.open {
            tracing::warn!("submit outside begin_frame/end_frame");
        }
        self.frames.push(*frame);
    }

    fn end_frame(&mut self) {
        self.open = false;
    }
}
