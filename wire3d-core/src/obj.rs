//! Wavefront OBJ loader reducing polygon faces to unique wireframe edges
use nom::{
    character::complete::{char, i64 as integer},
    combinator::{all_consuming, opt, rest},
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};
use nalgebra::Point3;
use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::geometry::Mesh;

/// Load an OBJ file from disk
pub fn load(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| LoadError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_str(&source)?;
    log::info!(
        "loaded {} with {} vertices, {} unique edges",
        path.display(),
        mesh.vertex_count(),
        mesh.edge_count()
    );
    Ok(mesh)
}

/// Parse OBJ text already held in memory
///
/// Only `v` and `f` records matter; every other tag is skipped. Face indices
/// are 1-based, negative ones count back from the vertices read so far.
pub fn parse_str(source: &str) -> Result<Mesh, LoadError> {
    let mut vertices: Vec<Point3<f32>> = Vec::new();
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    let mut face: Vec<usize> = Vec::new();

    for (number, raw) in source.lines().enumerate() {
        let line_no = number + 1;
        let line = raw.split_once('#').map_or(raw, |(head, _)| head);
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f32; 3];
                for coord in &mut coords {
                    let token = tokens
                        .next()
                        .ok_or(LoadError::MissingCoordinate { line: line_no })?;
                    *coord = parse_coordinate(token, line_no)?;
                }
                vertices.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                face.clear();
                for token in tokens {
                    if let Some(index) = parse_face_index(token, line_no)? {
                        match resolve_index(index, vertices.len()) {
                            Some(resolved) => face.push(resolved),
                            None => log::debug!("line {line_no}: index {index} does not resolve"),
                        }
                    }
                }

                if face.len() < 2 {
                    log::debug!("line {line_no}: skipping face with {} indices", face.len());
                    continue;
                }
                push_boundary(&face, &mut pairs);
            }
            _ => {}
        }
    }

    Ok(Mesh::from_edges(vertices, pairs))
}

/// Map a 1-based or negative relative index onto a 0-based vertex index
fn resolve_index(index: i64, vertex_count: usize) -> Option<usize> {
    let resolved = match index {
        0 => return None,
        i if i > 0 => i - 1,
        i => i64::try_from(vertex_count).ok()? + i,
    };
    usize::try_from(resolved).ok()
}

/// Closed boundary of a polygon, wrap-around edge included
fn push_boundary(face: &[usize], pairs: &mut Vec<(usize, usize)>) {
    let n = face.len();
    for i in 0..n {
        let a = face[i];
        let b = face[(i + 1) % n];
        if a != b {
            pairs.push((a, b));
        }
    }
}

/// Coordinates must be finite; `nan` and `inf` spellings are rejected
fn parse_coordinate(token: &str, line: usize) -> Result<f32, LoadError> {
    match coordinate(token) {
        Ok((_, value)) if value.is_finite() => Ok(value),
        _ => Err(malformed(token, line)),
    }
}

/// Vertex index of a face token; `None` when the token has no leading index
fn parse_face_index(token: &str, line: usize) -> Result<Option<i64>, LoadError> {
    face_index(token)
        .map(|(_, index)| index)
        .map_err(|_| malformed(token, line))
}

fn malformed(token: &str, line: usize) -> LoadError {
    LoadError::MalformedNumericToken {
        line,
        token: token.to_string(),
    }
}

fn coordinate(input: &str) -> IResult<&str, f32> {
    all_consuming(float)(input)
}

// "7", "7/2", "7/2/3", "7//3"; texture and normal groups are discarded
fn face_index(input: &str) -> IResult<&str, Option<i64>> {
    all_consuming(terminated(opt(integer), opt(preceded(char('/'), rest))))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const QUAD: &str = "\
# a single quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    fn edge_set(mesh: &Mesh) -> HashSet<(usize, usize)> {
        mesh.edges().iter().map(|e| (e.a(), e.b())).collect()
    }

    #[test]
    fn test_quad_yields_four_edges() {
        let mesh = parse_str(QUAD).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 4);

        let edges = edge_set(&mesh);
        assert_eq!(edges.len(), 4);
        assert!(edges.contains(&(0, 3)), "wrap edge 4-1 missing");
    }

    #[test]
    fn test_shared_edges_are_deduplicated() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n";
        let mesh = parse_str(src).unwrap();
        assert_eq!(mesh.edge_count(), 5);
    }

    #[test]
    fn test_negative_index_counts_from_end() {
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(1, 3), Some(0));
        assert_eq!(resolve_index(0, 3), None);

        let mesh = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(
            edge_set(&mesh),
            HashSet::from([(0, 1), (1, 2), (0, 2)])
        );
    }

    #[test]
    fn test_auxiliary_indices_are_ignored() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2//1 3/1\n";
        let mesh = parse_str(src).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 3);
    }

    #[test]
    fn test_comments_blank_and_unknown_records() {
        let src = "\
# header

o thing
g group
usemtl none
v 0 0 0  # trailing comment
v 1 0 0
s off
l 1 2
f 1 2
";
        let mesh = parse_str(src).unwrap();
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(edge_set(&mesh), HashSet::from([(0, 1)]));
    }

    #[test]
    fn test_short_faces_are_skipped() {
        let src = "v 0 0 0\nv 1 0 0\nf 1\nf\nf 2 2\n";
        let mesh = parse_str(src).unwrap();
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.edge_count(), 0);
    }

    #[test]
    fn test_out_of_range_indices_never_reach_the_mesh() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\nf 0 -7 3\n";
        let mesh = parse_str(src).unwrap();
        assert!(mesh
            .edges()
            .iter()
            .all(|e| e.a() < mesh.vertex_count() && e.b() < mesh.vertex_count()));
        assert_eq!(edge_set(&mesh), HashSet::from([(0, 1)]));
    }

    #[test]
    fn test_malformed_coordinate_fails_load() {
        let err = parse_str("v 0 0 0\nv 1 abc 0\n").unwrap_err();
        match err {
            LoadError::MalformedNumericToken { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_coordinate_fails_load() {
        for (source, bad_line, bad_token) in [
            ("v nan 0 0\nv 1 0 0\nv inf 1 0\nf 1 2 3\n", 1, "nan"),
            ("v 0 0 0\nv inf 1 0\n", 2, "inf"),
            ("v 0 0 0\nv 1 0 0\nv 0 -infinity 0\n", 3, "-infinity"),
        ] {
            match parse_str(source).unwrap_err() {
                LoadError::MalformedNumericToken { line, token } => {
                    assert_eq!(line, bad_line);
                    assert_eq!(token, bad_token);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_malformed_index_fails_load() {
        let err = parse_str("v 0 0 0\nv 1 0 0\nf 1 2x\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedNumericToken { line: 3, .. }));

        let err = parse_str("v 0 0 0\nv 1 0 0\nf 1 -\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedNumericToken { line: 3, .. }));
    }

    #[test]
    fn test_short_vertex_fails_load() {
        let err = parse_str("v 1 2\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingCoordinate { line: 1 }));
    }

    #[test]
    fn test_extra_vertex_components_are_ignored() {
        let mesh = parse_str("v 1 2 3 1.0\nv 4.5e-1 -2 +3 0.2 0.3 0.4\n").unwrap();
        assert_eq!(mesh.vertices()[1], Point3::new(0.45, -2.0, 3.0));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("wire3d-quad-{}.obj", std::process::id()));
        fs::write(&path, QUAD).unwrap();
        let mesh = load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(mesh.edge_count(), 4);
    }

    #[test]
    fn test_unreadable_source() {
        let err = load("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, LoadError::SourceUnreadable { .. }));
        assert!(err.to_string().contains("here.obj"));
    }
}
