//! Wire3D Core Library - Geometry-to-screen pipeline for wireframe rendering
//!
//! This library provides the stateless core: the vector/matrix kernel, the
//! edge mesh model and its OBJ loader, the orbit camera, and the per-frame
//! clip-and-project pass with adaptive detail reduction.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod lod;
pub mod math;
pub mod obj;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use camera::{OrbitCamera, ProjectionMode};
pub use error::{LoadError, ProjectError};
pub use geometry::{Bounds, Edge, Mesh};
pub use lod::{LodConfig, LodState};
pub use projection::{
    project, FrameParams, FrameProjector, FrameStats, LodOptions, ScreenLine, Viewport,
};
pub use transform::{RotationState, Transform};
