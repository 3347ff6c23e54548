//! Keyframe interpolation.
//!
//! A track is a chain of cubic Bezier segments sharing endpoints: keys
//! `0..=3` form the first segment, `3..=6` the second, and so on. The host
//! samples it by a global parameter in `[0, 1]` spread evenly over the
//! segments.

use anyhow::Context;
use glp_core::curve::{bezier, keyframe_transform, quaternion_bezier, Keyframe};
use glp_core::math::{Mat4, Vec3};
use glp_core::quat::Quat;

/// Buffered keyframes for one animated object.
#[derive(Debug, Clone)]
pub struct KeyframeTrack {
    keys: Vec<Keyframe>,
}

impl KeyframeTrack {
    /// Needs `3k + 1` keys for `k >= 1` segments. Rotations are normalized.
    pub fn new(keys: Vec<Keyframe>) -> anyhow::Result<Self> {
        let n = keys.len();
        if n < 4 || (n - 1) % 3 != 0 {
            anyhow::bail!("keyframe track needs 3k + 1 keys (k >= 1), got {n}");
        }
        let keys = keys
            .into_iter()
            .enumerate()
            .map(|(i, k)| {
                let rotation = k
                    .rotation
                    .normalized()
                    .with_context(|| format!("keyframe {i}"))?;
                Ok(Keyframe::new(k.position, rotation))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    pub fn segments(&self) -> usize {
        (self.keys.len() - 1) / 3
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Maps a global parameter to `(segment, local t)`. Values outside
    /// `[0, 1]` are clamped.
    pub fn locate(&self, u: f32) -> (usize, f32) {
        let segments = self.segments();
        let scaled = u.clamp(0.0, 1.0) * segments as f32;
        let index = (scaled.floor() as usize).min(segments - 1);
        (index, scaled - index as f32)
    }

    /// Control positions and rotations of one segment.
    fn segment(&self, index: usize) -> ([Vec3; 4], [Quat; 4]) {
        let keys = &self.keys[index * 3..index * 3 + 4];
        (
            std::array::from_fn(|i| keys[i].position),
            std::array::from_fn(|i| keys[i].rotation),
        )
    }

    pub fn position(&self, u: f32) -> Vec3 {
        let (index, t) = self.locate(u);
        bezier(self.segment(index).0, t)
    }

    pub fn rotation(&self, u: f32) -> Quat {
        let (index, t) = self.locate(u);
        quaternion_bezier(self.segment(index).1, t)
    }

    /// `T(position(u)) * R(rotation(u))`.
    pub fn sample(&self, u: f32) -> Mat4 {
        let (index, t) = self.locate(u);
        let (positions, rotations) = self.segment(index);
        keyframe_transform(positions, rotations, t)
    }
}
