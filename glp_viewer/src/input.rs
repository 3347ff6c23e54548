//! Input sampling.
//!
//! Device handling lives outside this crate. The host loop only needs one
//! angular-velocity sample per frame, taken from an [`InputSource`].

use glp_core::math::Vec3;
use glp_core::orientation::AngularVelocity;
use serde::{Deserialize, Serialize};

/// Angular rates sampled at the start of a frame. `rvx` pitches, `rvy` yaws
/// and `rvz` rolls. `translation` moves a free-flight camera in its own axes
/// and is ignored when the object is driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    #[serde(default)]
    pub rvx: f32,
    #[serde(default)]
    pub rvy: f32,
    #[serde(default)]
    pub rvz: f32,
    #[serde(default)]
    pub translation: Vec3,
}

impl InputState {
    pub const fn new(rvx: f32, rvy: f32, rvz: f32) -> Self {
        Self {
            rvx,
            rvy,
            rvz,
            translation: Vec3::ZERO,
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn angular_velocity(self) -> AngularVelocity {
        AngularVelocity::new(self.rvx, self.rvy, self.rvz)
    }
}

/// Produces one sample per frame, in frame order.
pub trait InputSource {
    fn sample(&mut self, frame: u64) -> InputState;
}

/// The same sample every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantInput(pub InputState);

impl InputSource for ConstantInput {
    fn sample(&mut self, _frame: u64) -> InputState {
        self.0
    }
}

/// What a [`ScriptedInput`] yields once its samples run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptEnd {
    /// Keep returning the final sample.
    HoldLast,
    /// Return zero rates.
    #[default]
    Zero,
}

/// Replays a fixed sequence of samples.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    samples: Vec<InputState>,
    cursor: usize,
    end: ScriptEnd,
}

impl ScriptedInput {
    pub fn new(samples: Vec<InputState>, end: ScriptEnd) -> Self {
        Self {
            samples,
            cursor: 0,
            end,
        }
    }

    /// Parses a JSON array of samples.
    pub fn from_json_str(s: &str, end: ScriptEnd) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(s)?, end))
    }

    pub fn remaining(&self) -> usize {
        self.samples.len().saturating_sub(self.cursor)
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self, _frame: u64) -> InputState {
        if let Some(s) = self.samples.get(self.cursor) {
            self.cursor += 1;
            return *s;
        }
        match self.end {
            ScriptEnd::HoldLast => self.samples.last().copied().unwrap_or_default(),
            ScriptEnd::Zero => InputState::default(),
        }
    }
}

impl<F> InputSource for F
where
    F: FnMut(u64) -> InputState,
{
    fn sample(&mut self, frame: u64) -> InputState {
        self(frame)
    }
}
