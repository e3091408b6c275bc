//! Orbit camera
use nalgebra::Point3;

use crate::geometry::{Bounds, Mesh};
use crate::math::{self, Mat4, Vec3};

/// Pitch limit applied by [`OrbitCamera::orbit`], just short of straight up/down
pub const PITCH_LIMIT: f32 = 1.55;

const MIN_RADIUS: f32 = 0.2;
const MIN_ORTHO_SCALE: f32 = 0.02;
const PAN_SPEED: f32 = 0.002;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera orbiting a target point at a spherical offset.
///
/// Fields are public: input handling mutates them between frames and the
/// projection pass only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Point3<f32>,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub mode: ProjectionMode,
    /// Vertical field of view in radians (perspective mode)
    pub fov_y: f32,
    /// Half-height of the view volume (orthographic mode)
    pub ortho_scale: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Point3::origin(),
            radius: 3.0,
            yaw: 0.8,
            pitch: 0.4,
            mode: ProjectionMode::Perspective,
            fov_y: 60f32.to_radians(),
            ortho_scale: 1.0,
            near: 0.05,
            far: 100.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit offset from the target towards the eye
    pub fn direction(&self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cp * cy, sp, cp * sy)
    }

    pub fn position(&self) -> Point3<f32> {
        self.target + self.direction() * self.radius
    }

    pub fn view_matrix(&self) -> Mat4 {
        math::look_at(&self.position(), &self.target, &Vec3::y())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.mode {
            ProjectionMode::Perspective => {
                math::perspective(self.fov_y, aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_h = self.ortho_scale;
                let half_w = half_h * aspect;
                math::orthographic(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        }
    }

    /// Re-derive the orbit parameters so the eye sits at `eye`, keeping the target
    pub fn look_from(&mut self, eye: Point3<f32>) {
        let d = eye - self.target;
        self.radius = math::length(&d);
        self.pitch = (d.y / self.radius.max(1e-6)).clamp(-1.0, 1.0).asin();
        self.yaw = d.z.atan2(d.x);
    }

    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scale the radius (perspective) or the view volume (orthographic)
    pub fn zoom(&mut self, factor: f32) {
        match self.mode {
            ProjectionMode::Perspective => self.radius = (self.radius * factor).max(MIN_RADIUS),
            ProjectionMode::Orthographic => {
                self.ortho_scale = (self.ortho_scale * factor).max(MIN_ORTHO_SCALE)
            }
        }
    }

    /// Slide the target in the view plane. Positive `dx` moves it left, positive `dy` up.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = math::normalize(&(self.target - self.position()));
        let right = math::normalize(&math::cross(&forward, &Vec3::y()));
        let up = math::cross(&right, &forward);
        let k = PAN_SPEED * self.radius;
        self.target += right * (-dx * k) + up * (dy * k);
    }

    pub fn toggle_projection(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }

    /// Centre on `bounds` and back off far enough to see all of it
    pub fn frame_bounds(&mut self, bounds: &Bounds) {
        let mut r = bounds.max_extent() * 0.5;
        if r < 1e-4 {
            r = 1.0;
        }
        self.target = bounds.center();
        self.radius = (3.0 * r).max(0.5);
        self.ortho_scale = r * 1.2;
        self.near = 0.01;
        self.far = 20_000.0;
    }

    /// Frame the whole mesh; an empty mesh leaves the camera untouched
    pub fn frame_mesh(&mut self, mesh: &Mesh) {
        if let Some(bounds) = mesh.bounds() {
            self.frame_bounds(&bounds);
        }
    }
}
