//! `mask info` - display project statistics.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use mask_mesh::{MaskMesh, edges};

pub fn run(input: &Path) -> Result<()> {
    let mesh = MaskMesh::load(input)?;

    println!("{}", format!("{}", input.display()).bold());
    println!(
        "  Vertices: {} ({} live)",
        mesh.vertex_count(),
        mesh.live_vertex_count()
    );
    println!("  Faces: {}", mesh.face_count());
    println!(
        "  Boundary edges: {}",
        edges::boundary_edges(&mesh.faces).len()
    );

    if let Some((min, max)) = bounds(&mesh) {
        println!(
            "  Bounds: ({}, {}, {}) to ({}, {}, {})",
            min.0, min.1, min.2, max.0, max.1, max.2
        );
    }

    Ok(())
}

/// Bounding box over live vertices, or None for an empty model.
fn bounds(mesh: &MaskMesh) -> Option<((i32, i32, i32), (i32, i32, i32))> {
    let mut live = mesh.vertices.iter().filter(|v| !v.is_tombstone());
    let first = live.next()?;
    let mut min = (first.x, first.y, first.z);
    let mut max = min;

    for v in live {
        min = (min.0.min(v.x), min.1.min(v.y), min.2.min(v.z));
        max = (max.0.max(v.x), max.1.max(v.y), max.2.max(v.z));
    }
    Some((min, max))
}
