//! Error types.
//!
//! The core is pure numerics, so the taxonomy is narrow: the only failures are
//! precondition violations that would otherwise leak NaNs into every matrix
//! downstream.

use std::fmt;

/// Numeric precondition violations raised by the math core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// Attempted to invert a matrix whose determinant is (nearly) zero.
    SingularMatrix { determinant: f32 },
    /// Look-at target coincides with the eye, or forward is parallel to up.
    DegenerateView,
    /// Attempted to normalize a zero-length vector or quaternion.
    ZeroLength,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::SingularMatrix { determinant } => {
                write!(f, "matrix is singular (determinant = {determinant})")
            }
            MathError::DegenerateView => {
                write!(f, "view direction is degenerate (zero or parallel to up)")
            }
            MathError::ZeroLength => write!(f, "cannot normalize a zero-length value"),
        }
    }
}

impl std::error::Error for MathError {}

/// Procedural mesh construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    /// Too few subdivisions to close the surface.
    TooFewSegments { requested: u32, minimum: u32 },
    /// The mesh would need more vertices than a `u16` index buffer can address.
    IndexOverflow { vertices: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::TooFewSegments { requested, minimum } => {
                write!(f, "need at least {minimum} segments, got {requested}")
            }
            MeshError::IndexOverflow { vertices } => {
                write!(f, "{vertices} vertices do not fit a u16 index buffer")
            }
        }
    }
}

impl std::error::Error for MeshError {}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config io error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_matrix_message_includes_determinant() {
        let e = MathError::SingularMatrix { determinant: 0.0 };
        assert!(e.to_string().contains("determinant = 0"));
    }
}
