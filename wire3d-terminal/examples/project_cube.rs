/// Example: Project a mesh once and print the resulting segments
///
/// Usage: cargo run --example project_cube -- [path/to/file.obj]

use std::env;
use wire3d_core::{math, obj, project, Mesh, OrbitCamera, Viewport};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mesh = match env::args().nth(1) {
        Some(path) => obj::load(&path)?,
        None => Mesh::cube(2.0),
    };

    let mut camera = OrbitCamera::default();
    camera.frame_mesh(&mesh);

    let viewport = Viewport::new(1000, 800);
    let lines = project(
        &mesh,
        &camera.view_matrix(),
        &camera.projection_matrix(viewport.aspect()),
        &math::identity(),
        camera.near,
        viewport,
    );

    println!(
        "{} vertices, {} edges -> {} segments in {}x{}",
        mesh.vertex_count(),
        mesh.edge_count(),
        lines.len(),
        viewport.width,
        viewport.height
    );
    for line in &lines {
        println!(
            "({:8.2}, {:8.2}) -> ({:8.2}, {:8.2})",
            line.a.x, line.a.y, line.b.x, line.b.y
        );
    }

    Ok(())
}
