//! Configuration system.
//!
//! Loads viewer configuration from JSON strings or files. Every field has a
//! default, so `{}` is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::Keyframe;
use crate::error::ConfigError;
use crate::orientation::RotationFrame;
use crate::projection::{Projection, ViewVolume};
use crate::transform::Placement;
use crate::view::Camera;

/// What the orientation input turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveTarget {
    /// The object; the camera stays fixed.
    #[default]
    Object,
    /// A free-flight camera; needs a `free` camera.
    Camera,
}

/// Root configuration for the host loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Fixed frame rate of the host loop.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Stop after this many frames; run until interrupted when absent.
    #[serde(default)]
    pub frames: Option<u64>,
    /// Degrees turned per tick for an input of 1.0.
    #[serde(default = "default_degrees_per_unit")]
    pub degrees_per_unit: f32,
    #[serde(default)]
    pub frame: RotationFrame,
    #[serde(default)]
    pub drive: DriveTarget,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub projection: Projection,
    #[serde(default)]
    pub volume: ViewVolume,
    /// Model placement applied before the orientation.
    #[serde(default)]
    pub object: Placement,
    /// Optional animation path, `3k + 1` keys for `k` Bezier segments.
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
    /// Frames needed to traverse the whole keyframe path once.
    #[serde(default = "default_animation_frames")]
    pub animation_frames: u64,
}

fn default_tick_hz() -> u32 {
    60
}

fn default_degrees_per_unit() -> f32 {
    1.0
}

fn default_animation_frames() -> u64 {
    240
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            frames: None,
            degrees_per_unit: default_degrees_per_unit(),
            frame: RotationFrame::default(),
            drive: DriveTarget::default(),
            camera: Camera::default(),
            projection: Projection::default(),
            volume: ViewVolume::default(),
            object: Placement::default(),
            keyframes: Vec::new(),
            animation_frames: default_animation_frames(),
        }
    }
}

impl ViewerConfig {
    /// Parses and validates config from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading viewer config");
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values the host loop cannot run with. Matrix inputs are
    /// otherwise taken as given.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_hz == 0 {
            return Err(ConfigError::Invalid("tick_hz must be positive".into()));
        }
        let v = &self.volume;
        if !(v.near < v.far) {
            return Err(ConfigError::Invalid(format!(
                "near ({}) must be less than far ({})",
                v.near, v.far
            )));
        }
        if !(v.aspect > 0.0) || !(v.half_width > 0.0) {
            return Err(ConfigError::Invalid(
                "aspect and half_width must be positive".into(),
            ));
        }
        if self.drive == DriveTarget::Camera && !matches!(self.camera, Camera::Free { .. }) {
            return Err(ConfigError::Invalid(
                "drive = camera needs a camera of kind free".into(),
            ));
        }
        if !self.keyframes.is_empty() {
            let n = self.keyframes.len();
            if n < 4 || (n - 1) % 3 != 0 {
                return Err(ConfigError::Invalid(format!(
                    "{n} keyframes; expected 3k + 1 with k >= 1"
                )));
            }
            if self.animation_frames == 0 {
                return Err(ConfigError::Invalid(
                    "animation_frames must be positive".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::projection::ScreenSide;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!(cfg.tick_hz, 60);
        assert_eq!(cfg.frame, RotationFrame::World);
    }

    #[test]
    fn parses_full_config() {
        let cfg = ViewerConfig::from_json_str(
            r#"{
                "tick_hz": 30,
                "frames": 120,
                "degrees_per_unit": 2.5,
                "frame": "body",
                "camera": {"kind": "euler", "position": {"x": 0, "y": 1, "z": 6}},
                "projection": {"kind": "split_screen", "fov_y": 90, "side": "left"},
                "volume": {"aspect": 1.5, "near": 0.5, "far": 50},
                "object": {"position": {"x": 1, "y": 0, "z": 0}, "yaw": 45}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.tick_hz, 30);
        assert_eq!(cfg.frames, Some(120));
        assert_eq!(cfg.frame, RotationFrame::Body);
        assert_eq!(cfg.camera.position(), Vec3::new(0.0, 1.0, 6.0));
        assert_eq!(
            cfg.projection,
            Projection::SplitScreen {
                fov_y: 90.0,
                side: ScreenSide::Left
            }
        );
        assert_eq!(cfg.volume.half_width, 1.0);
        assert_eq!(cfg.object.scale, 1.0);
        assert_eq!(cfg.object.yaw, 45.0);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{"tick_hz": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{"volume": {"aspect": 1, "near": 10, "far": 1}}"#),
            Err(ConfigError::Invalid(_))
        ));
        let keys = r#"{"keyframes": [{"position": {"x":0,"y":0,"z":0}},
                                      {"position": {"x":1,"y":0,"z":0}}]}"#;
        assert!(matches!(
            ViewerConfig::from_json_str(keys),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn nan_volume_is_rejected() {
        let mut cfg = ViewerConfig::default();
        cfg.volume.aspect = f32::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = ViewerConfig::default();
        cfg.volume.half_width = f32::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn camera_drive_needs_free_camera() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{"drive": "camera"}"#),
            Err(ConfigError::Invalid(_))
        ));
        let cfg = ViewerConfig::from_json_str(
            r#"{"drive": "camera", "frame": "body",
                "camera": {"kind": "free", "position": {"x": 0, "y": 1, "z": 3}}}"#,
        )
        .unwrap();
        assert_eq!(cfg.drive, DriveTarget::Camera);
        assert_eq!(cfg.camera.position(), Vec3::new(0.0, 1.0, 3.0));
    }

    #[test]
    fn json_round_trip_keeps_config() {
        let mut cfg = ViewerConfig::default();
        cfg.projection = Projection::Cabinet { alpha: 60.0 };
        cfg.frames = Some(10);
        let text = cfg.to_json_string().unwrap();
        assert_eq!(ViewerConfig::from_json_str(&text).unwrap(), cfg);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ViewerConfig::load("/nonexistent/glp/viewer.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
