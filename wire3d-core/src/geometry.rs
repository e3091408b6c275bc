//! Wireframe mesh model: vertex positions plus unique undirected edges
use nalgebra::Point3;
use std::collections::HashSet;

/// An undirected link between two vertices, stored with the smaller index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    a: u32,
    b: u32,
}

impl Edge {
    /// Canonical edge for the unordered pair, or `None` for a self-loop.
    pub fn new(a: u32, b: u32) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { a, b }),
            std::cmp::Ordering::Greater => Some(Self { a: b, b: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn a(&self) -> usize {
        self.a as usize
    }

    pub fn b(&self) -> usize {
        self.b as usize
    }

    /// Packed `(min << 32) | max` key.
    pub fn key(&self) -> u64 {
        (u64::from(self.a) << 32) | u64::from(self.b)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Largest side length of the box.
    pub fn max_extent(&self) -> f32 {
        let size = self.max - self.min;
        size.x.max(size.y).max(size.z)
    }
}

/// A wireframe mesh. Built once, read-only while rendering.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Point3<f32>>,
    edges: Vec<Edge>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from raw index pairs.
    ///
    /// Self-loops, repeated unordered pairs and pairs referencing a vertex
    /// outside `vertices` are discarded. The order of surviving edges follows
    /// their first occurrence.
    pub fn from_edges<I>(vertices: Vec<Point3<f32>>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let count = vertices.len();
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        let mut out_of_range = 0usize;

        for (a, b) in pairs {
            if a >= count || b >= count {
                out_of_range += 1;
                continue;
            }
            let (Ok(a), Ok(b)) = (u32::try_from(a), u32::try_from(b)) else {
                out_of_range += 1;
                continue;
            };
            if let Some(edge) = Edge::new(a, b) {
                if seen.insert(edge.key()) {
                    edges.push(edge);
                }
            }
        }

        if out_of_range > 0 {
            log::debug!("dropped {out_of_range} edges referencing missing vertices");
        }

        Self { vertices, edges }
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Bounding box of all vertices, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.vertices.first()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for v in &self.vertices[1..] {
            bounds.min = bounds.min.inf(v);
            bounds.max = bounds.max.sup(v);
        }
        Some(bounds)
    }

    /// Create a cube wireframe (8 vertices, 12 edges) centred on the origin
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let vertices = (0..8)
            .map(|i| {
                Point3::new(
                    if i & 1 == 0 { -half } else { half },
                    if i & 2 == 0 { -half } else { half },
                    if i & 4 == 0 { -half } else { half },
                )
            })
            .collect();

        // Vertices differing in exactly one bit share a cube edge
        let pairs = (0..8usize).flat_map(|i| {
            [1usize, 2, 4]
                .into_iter()
                .filter(move |bit| i & bit == 0)
                .map(move |bit| (i, i | bit))
        });

        Self::from_edges(vertices, pairs)
    }
}
