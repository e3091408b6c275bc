//! Edge projection pipeline: camera transform, near-plane clip, perspective
//! divide, viewport mapping, and throughput limits for interactive viewing.
use nalgebra::{Point2, Point3};

use crate::error::ProjectError;
use crate::geometry::Mesh;
use crate::math::{self, Mat4};
use crate::transform::Transform;

/// Clip-space `w` magnitudes below this are rejected before dividing
pub const MIN_W: f32 = 1e-6;

/// Default hard cap on emitted segments per frame
pub const DEFAULT_MAX_LINES: usize = 180_000;

/// A projected segment in pixel coordinates (origin top-left, Y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLine {
    pub a: Point2<f32>,
    pub b: Point2<f32>,
}

impl ScreenLine {
    pub fn length_squared(&self) -> f32 {
        (self.b - self.a).norm_squared()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Per-frame inputs shared by every edge
#[derive(Debug, Clone, Copy)]
pub struct FrameParams {
    pub view: Mat4,
    pub projection: Mat4,
    pub model: Mat4,
    /// Distance of the near plane in front of the eye
    pub near: f32,
    pub viewport: Viewport,
}

/// Detail and throughput limits for the interactive projector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodOptions {
    /// Segments shorter than this many pixels are dropped
    pub lod_pixels: Option<f32>,
    /// Stop emitting once this many segments are out
    pub max_lines: Option<usize>,
    /// Drop edges touching a vertex that failed pre-validation instead of clipping them
    pub skip_unvalidated: bool,
}

impl Default for LodOptions {
    fn default() -> Self {
        Self {
            lod_pixels: None,
            max_lines: Some(DEFAULT_MAX_LINES),
            skip_unvalidated: false,
        }
    }
}

impl LodOptions {
    /// No filtering at all; output matches [`project`]
    pub fn unlimited() -> Self {
        Self {
            lod_pixels: None,
            max_lines: None,
            skip_unvalidated: false,
        }
    }
}

/// Counters from the last [`FrameProjector::project_frame`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub considered: usize,
    pub emitted: usize,
    pub lod_culled: usize,
    pub near_rejected: usize,
    pub degenerate: usize,
    pub skipped: usize,
    /// The output cap stopped the pass before every edge was visited
    pub capped: bool,
}

/// Clip a camera-space segment against the plane `-z = near`.
///
/// Returns `None` when both endpoints are behind the plane. An endpoint
/// behind the plane is replaced by the intersection point, whose z is
/// exactly `-near`.
pub fn clip_to_near(
    a: Point3<f32>,
    b: Point3<f32>,
    near: f32,
) -> Option<(Point3<f32>, Point3<f32>)> {
    let a_in = -a.z >= near;
    let b_in = -b.z >= near;

    match (a_in, b_in) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        _ => {
            // Exactly one endpoint is in front, so b.z != a.z
            let t = (-near - a.z) / (b.z - a.z);
            let mut hit = a + (b - a) * t;
            hit.z = -near;
            if a_in {
                Some((a, hit))
            } else {
                Some((hit, b))
            }
        }
    }
}

/// Project a camera-space point to pixel coordinates
pub fn project_point(
    projection: &Mat4,
    point: &Point3<f32>,
    viewport: Viewport,
) -> Result<Point2<f32>, ProjectError> {
    let clip = math::transform_point(projection, point);
    if clip.w.abs() < MIN_W {
        return Err(ProjectError::DegenerateW { w: clip.w });
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let x = (ndc_x * 0.5 + 0.5) * viewport.width as f32;
    let y = (1.0 - (ndc_y * 0.5 + 0.5)) * viewport.height as f32;

    if x.is_finite() && y.is_finite() {
        Ok(Point2::new(x, y))
    } else {
        Err(ProjectError::NonFinite)
    }
}

/// Outcome of the full per-edge path
enum EdgeResult {
    Line(ScreenLine),
    BehindNear,
    Degenerate,
}

fn clip_and_project(
    a: Point3<f32>,
    b: Point3<f32>,
    projection: &Mat4,
    near: f32,
    viewport: Viewport,
) -> EdgeResult {
    let Some((a, b)) = clip_to_near(a, b, near) else {
        return EdgeResult::BehindNear;
    };
    match (
        project_point(projection, &a, viewport),
        project_point(projection, &b, viewport),
    ) {
        (Ok(a), Ok(b)) => EdgeResult::Line(ScreenLine { a, b }),
        _ => EdgeResult::Degenerate,
    }
}

fn to_camera(model_view: &Mat4, p: &Point3<f32>) -> Point3<f32> {
    Point3::from(math::transform_point(model_view, p).xyz())
}

/// Project every edge of `mesh`, clipping at the near plane and dropping
/// edges that cannot be projected.
pub fn project(
    mesh: &Mesh,
    view: &Mat4,
    projection: &Mat4,
    model: &Mat4,
    near: f32,
    viewport: Viewport,
) -> Vec<ScreenLine> {
    let model_view = Transform::model_view(view, model);
    let vertices = mesh.vertices();

    mesh.edges()
        .iter()
        .filter_map(|edge| {
            let a = to_camera(&model_view, &vertices[edge.a()]);
            let b = to_camera(&model_view, &vertices[edge.b()]);
            match clip_and_project(a, b, projection, near, viewport) {
                EdgeResult::Line(line) => Some(line),
                EdgeResult::BehindNear | EdgeResult::Degenerate => None,
            }
        })
        .collect()
}

/// Interactive projector with per-vertex side tables reused across frames.
///
/// Each vertex is transformed and, when in front of the near plane,
/// projected once per frame. Edges whose endpoints both pass reuse those
/// screen positions; only the rest take the clipping path.
#[derive(Debug, Default)]
pub struct FrameProjector {
    camera_space: Vec<Point3<f32>>,
    screen: Vec<Point2<f32>>,
    valid: Vec<bool>,
    lines: Vec<ScreenLine>,
    stats: FrameStats,
}

impl FrameProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[ScreenLine] {
        &self.lines
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Rebuild the segment list for one frame
    pub fn project_frame(
        &mut self,
        mesh: &Mesh,
        params: &FrameParams,
        options: &LodOptions,
    ) -> &[ScreenLine] {
        self.prepare_vertices(mesh, params);

        self.lines.clear();
        self.lines.reserve(mesh.edge_count());
        self.stats = FrameStats::default();

        let lod_sq = options.lod_pixels.map(|px| px * px);

        for edge in mesh.edges() {
            if options.max_lines.is_some_and(|max| self.lines.len() >= max) {
                self.stats.capped = true;
                break;
            }
            self.stats.considered += 1;

            let (ia, ib) = (edge.a(), edge.b());
            let line = if self.valid[ia] && self.valid[ib] {
                ScreenLine {
                    a: self.screen[ia],
                    b: self.screen[ib],
                }
            } else if options.skip_unvalidated {
                self.stats.skipped += 1;
                continue;
            } else {
                match clip_and_project(
                    self.camera_space[ia],
                    self.camera_space[ib],
                    &params.projection,
                    params.near,
                    params.viewport,
                ) {
                    EdgeResult::Line(line) => line,
                    EdgeResult::BehindNear => {
                        self.stats.near_rejected += 1;
                        continue;
                    }
                    EdgeResult::Degenerate => {
                        self.stats.degenerate += 1;
                        continue;
                    }
                }
            };

            if lod_sq.is_some_and(|min| line.length_squared() < min) {
                self.stats.lod_culled += 1;
                continue;
            }

            self.lines.push(line);
        }

        self.stats.emitted = self.lines.len();
        log::trace!("frame: {:?}", self.stats);
        &self.lines
    }

    fn prepare_vertices(&mut self, mesh: &Mesh, params: &FrameParams) {
        let model_view = Transform::model_view(&params.view, &params.model);
        let n = mesh.vertex_count();

        self.camera_space.clear();
        self.camera_space
            .extend(mesh.vertices().iter().map(|v| to_camera(&model_view, v)));

        self.screen.clear();
        self.screen.resize(n, Point2::origin());
        self.valid.clear();
        self.valid.resize(n, false);

        for (i, p) in self.camera_space.iter().enumerate() {
            if -p.z < params.near {
                continue;
            }
            if let Ok(s) = project_point(&params.projection, p, params.viewport) {
                self.screen[i] = s;
                self.valid[i] = true;
            }
        }
    }
}
