//! Frame-time feedback for the level-of-detail threshold
//!
//! The controller never looks at the mesh. It only nudges the pixel length
//! below which [`crate::projection::FrameProjector`] drops segments, growing
//! it when frames run long and shrinking it when there is headroom.

/// Tuning for [`LodState::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodConfig {
    pub target_fps: f32,
    pub min_pixels: f32,
    pub max_pixels: f32,
    /// Multiplier applied when over budget
    pub grow: f32,
    /// Multiplier applied when under budget
    pub shrink: f32,
    /// Fraction of the budget above which detail is reduced
    pub high_water: f32,
    /// Fraction below which detail is restored
    pub low_water: f32,
    /// Weight of the running average when folding in a new sample
    pub history_weight: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            target_fps: 30.0,
            min_pixels: 0.25,
            max_pixels: 5.0,
            grow: 1.10,
            shrink: 0.90,
            high_water: 1.05,
            low_water: 0.80,
            history_weight: 0.85,
        }
    }
}

impl LodConfig {
    pub fn with_target_fps(target_fps: f32) -> Self {
        Self {
            target_fps,
            ..Self::default()
        }
    }

    /// Frame budget in milliseconds
    pub fn budget_ms(&self) -> f64 {
        1000.0 / f64::from(self.target_fps.max(1.0))
    }
}

/// Controller state carried from one frame to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodState {
    pub smoothed_ms: f64,
    pub lod_pixels: f32,
}

impl Default for LodState {
    fn default() -> Self {
        Self {
            smoothed_ms: 33.0,
            lod_pixels: 1.5,
        }
    }
}

impl LodState {
    /// Fold in the last frame's duration and pick the next threshold
    pub fn step(self, measured_ms: f64, config: &LodConfig) -> Self {
        let w = config.history_weight;
        let smoothed_ms = w * self.smoothed_ms + (1.0 - w) * measured_ms;
        let budget = config.budget_ms();

        let lod_pixels = if smoothed_ms > budget * f64::from(config.high_water) {
            (self.lod_pixels * config.grow).min(config.max_pixels)
        } else if smoothed_ms < budget * f64::from(config.low_water) {
            (self.lod_pixels * config.shrink).max(config.min_pixels)
        } else {
            self.lod_pixels
        };

        Self {
            smoothed_ms,
            lod_pixels,
        }
    }

    /// Frames per second implied by the smoothed frame time
    pub fn fps(&self) -> f64 {
        1000.0 / self.smoothed_ms.max(1e-3)
    }
}
