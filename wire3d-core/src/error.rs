//! Error types for mesh loading and point projection.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a mesh load. No partial mesh is ever returned.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The mesh source could not be opened or read.
    #[error("cannot read mesh source {}: {source}", path.display())]
    SourceUnreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A coordinate or index token is not a number.
    #[error("line {line}: malformed numeric token `{token}`")]
    MalformedNumericToken {
        /// Line number (1-indexed).
        line: usize,
        /// Offending token.
        token: String,
    },

    /// A vertex record has fewer than three coordinates.
    #[error("line {line}: vertex record needs three coordinates")]
    MissingCoordinate {
        /// Line number (1-indexed).
        line: usize,
    },
}

/// Why a single camera-space point could not be mapped to the screen.
///
/// The pipeline recovers from these by dropping the edge involved.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ProjectError {
    #[error("homogeneous w = {w} is too close to zero")]
    DegenerateW { w: f32 },

    #[error("projected coordinate is not finite")]
    NonFinite,
}
