//! `glp_viewer`
//!
//! Host-side systems that feed the transform core:
//! - Per-frame angular-velocity sampling
//! - The frame loop: one orientation update per frame, in order
//! - Keyframe path sampling
//! - Hand-off of finished matrices to a render backend

pub mod input;
pub mod interp;
pub mod viewer;

pub use viewer::Viewer;
