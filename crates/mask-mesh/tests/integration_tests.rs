//! End-to-end tests for the mask mesh engine.
//!
//! These exercise the editing scenarios an interactive session produces:
//! edge-driven construction, merges, undo, project round-trips, and both
//! STL export pipelines.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use mask_mesh::{
    EdgeEdit, GridConfig, GridVertex, HistoryStack, MaskMesh, ShellParams, topology,
};
use tempfile::NamedTempFile;

fn cfg() -> GridConfig {
    GridConfig::default()
}

fn read_stl(path: &Path) -> stl_io::IndexedMesh {
    let file = File::open(path).expect("open stl");
    let mut reader = BufReader::new(file);
    stl_io::read_stl(&mut reader).expect("parse stl")
}

/// Two faces sharing the interior edge (1, 2).
fn quad_mesh() -> MaskMesh {
    MaskMesh {
        vertices: vec![
            GridVertex::flat(0, 0),
            GridVertex::flat(100, 0),
            GridVertex::flat(0, 100),
            GridVertex::flat(100, 100),
        ],
        faces: vec![[0, 1, 2], [2, 1, 3]],
    }
}

// =============================================================================
// Editing scenarios
// =============================================================================

#[test]
fn boundary_edge_extension_adds_vertex_and_face() {
    let mut mesh = MaskMesh::seed();
    let edit = topology::add_triangle_from_edge(&mut mesh, 1, 2, (100, 100), &cfg()).unwrap();

    assert!(matches!(edit, EdgeEdit::Extended { vertex: 3, .. }));
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 2);
    assert_eq!(mesh.vertices[3], GridVertex::flat(100, 100));
    assert!(mesh.validate().is_sound());
}

#[test]
fn shared_edge_request_splits_instead_of_extending() {
    let mut mesh = quad_mesh();
    let edit = topology::add_triangle_from_edge(&mut mesh, 1, 2, (50, 50), &cfg()).unwrap();

    // The two original faces are replaced by four, around one midpoint
    assert!(matches!(edit, EdgeEdit::InteriorSplit { midpoint: 4 }));
    assert_eq!(mesh.vertex_count(), 5);
    assert_eq!(mesh.face_count(), 4);
    assert!(mesh.validate().is_sound());
}

#[test]
fn seam_edge_request_subdivides_the_seam() {
    let mut mesh = MaskMesh::seed();
    // Edge (0, 2) runs along the seam: both endpoints have X = 0
    let edit = topology::add_triangle_from_edge(&mut mesh, 0, 2, (150, 150), &cfg()).unwrap();

    assert!(matches!(edit, EdgeEdit::SeamSplit { midpoint: 3 }));
    assert_eq!(mesh.vertices[3], GridVertex::flat(0, 50));
    assert_eq!(mesh.face_count(), 2);
    // The seam was subdivided, never extended past X = 0
    assert!(mesh.vertices.iter().all(|v| v.x >= 0));
    assert!(mesh.validate().is_sound());
}

#[test]
fn drag_merge_retargets_faces_and_tombstones_duplicate() {
    let mut mesh = quad_mesh();
    // Drag vertex 3 onto vertex 1's exact position, then merge
    mesh.vertices[3] = GridVertex::new(100, 0, 30);
    let merged = topology::merge_coincident_vertices(&mut mesh, 1).unwrap();

    assert_eq!(merged, 1);
    assert!(mesh.vertices[3].is_tombstone());
    assert_eq!(mesh.vertices[3], mask_mesh::TOMBSTONE);
    // The duplicate's height was adopted
    assert_eq!(mesh.vertices[1].z, 30);
    // The collapsed face was removed; no face references the tombstone
    assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    assert!(mesh.validate().is_sound());
}

#[test]
fn cleanup_passes_are_idempotent() {
    let mut mesh = quad_mesh();
    mesh.vertices[3] = GridVertex::new(0, 100, 0); // duplicates vertex 2 in XY

    topology::remove_degenerate_triangles(&mut mesh);
    topology::tombstone_unreferenced_vertices(&mut mesh);
    let once = mesh.clone();

    topology::remove_degenerate_triangles(&mut mesh);
    topology::tombstone_unreferenced_vertices(&mut mesh);
    assert_eq!(mesh, once);
}

#[test]
fn indices_stay_stable_across_edits() {
    let mut mesh = MaskMesh::seed();
    topology::add_triangle_from_edge(&mut mesh, 1, 2, (100, 100), &cfg()).unwrap();
    let v1_before = mesh.vertices[1];

    // Deleting a face tombstones orphans without renumbering anything
    topology::delete_faces_at(&mut mesh, (80, 80));
    assert_eq!(mesh.vertices[1], v1_before);
    assert_eq!(mesh.vertex_count(), 4);
}

// =============================================================================
// Undo
// =============================================================================

#[test]
fn undo_with_only_initial_snapshot_is_noop() {
    let mut mesh = MaskMesh::seed();
    let mut history = HistoryStack::new();
    history.reset(&mesh);

    let before = mesh.clone();
    assert!(!history.undo(&mut mesh));
    assert_eq!(mesh, before);
}

#[test]
fn undo_walks_back_through_edits() {
    let mut mesh = MaskMesh::seed();
    let mut history = HistoryStack::new();
    history.reset(&mesh);

    topology::add_triangle_from_edge(&mut mesh, 1, 2, (100, 100), &cfg()).unwrap();
    history.push(&mesh);
    topology::add_triangle_from_edge(&mut mesh, 1, 3, (200, 50), &cfg()).unwrap();
    history.push(&mesh);
    assert_eq!(mesh.face_count(), 3);

    assert!(history.undo(&mut mesh));
    assert_eq!(mesh.face_count(), 2);
    assert!(history.undo(&mut mesh));
    assert_eq!(mesh, MaskMesh::seed());
    assert!(!history.undo(&mut mesh));
}

// =============================================================================
// Project round-trip
// =============================================================================

#[test]
fn project_round_trip_is_bit_identical() {
    let mut mesh = quad_mesh();
    // Introduce a tombstone so the sentinel round-trips too
    mesh.faces.pop();
    topology::tombstone_unreferenced_vertices(&mut mesh);

    let file = NamedTempFile::new().expect("temp file");
    mesh.save(file.path()).expect("save");
    let reloaded = MaskMesh::load(file.path()).expect("load");

    assert_eq!(reloaded, mesh);
}

#[test]
fn foreign_json_is_rejected() {
    let file = NamedTempFile::new().expect("temp file");
    std::fs::write(
        file.path(),
        r#"{"Application":"some_other_editor","Vertices":[],"Triangles":[]}"#,
    )
    .expect("write");
    assert!(MaskMesh::load(file.path()).is_err());
}

// =============================================================================
// Winding
// =============================================================================

#[test]
fn unify_winding_leaves_adjacent_normals_agreeing() {
    let mut mesh = quad_mesh();
    // Wind the second face backwards
    mesh.faces[1] = [3, 1, 2];

    let flipped = mask_mesh::unify_winding_from_seed(&mut mesh, 0).unwrap();
    assert_eq!(flipped, 1);

    // Both faces are flat in z = 0, so agreement means same cross sign
    let cross_z = |face: [u32; 3]| {
        let [a, b, c] = face.map(|i| mesh.vertices[i as usize]);
        ((b.x - a.x) as f64) * ((c.y - a.y) as f64) - ((b.y - a.y) as f64) * ((c.x - a.x) as f64)
    };
    assert!(cross_z(mesh.faces[0]) * cross_z(mesh.faces[1]) > 0.0);
}

// =============================================================================
// STL export
// =============================================================================

#[test]
fn surface_export_mirrors_the_half() {
    let mut mesh = MaskMesh::seed();
    topology::add_triangle_from_edge(&mut mesh, 1, 2, (100, 100), &cfg()).unwrap();

    let file = NamedTempFile::new().expect("temp file");
    mesh.export_surface_stl(file.path()).expect("export");

    let stl = read_stl(file.path());
    // Two faces per side
    assert_eq!(stl.faces.len(), 4);

    // The mirrored half reaches into negative X
    let min_x = stl
        .vertices
        .iter()
        .map(|v| v.0[0])
        .fold(f32::INFINITY, f32::min);
    assert_eq!(min_x, -100.0);
}

#[test]
fn volume_export_produces_closed_unit_normal_shell() {
    // Single sloped face: per half 1 front + 1 back + 3 boundary edges
    // x 2 walls = 8 faces; 16 after mirroring
    let mesh = MaskMesh {
        vertices: vec![
            GridVertex::new(0, 0, 0),
            GridVertex::new(100, 0, 0),
            GridVertex::new(0, 100, 50),
        ],
        faces: vec![[0, 1, 2]],
    };

    let file = NamedTempFile::new().expect("temp file");
    mesh.export_volume_stl(file.path(), &ShellParams { thickness: 2.0 })
        .expect("export");

    let stl = read_stl(file.path());
    assert_eq!(stl.faces.len(), 16);

    for face in &stl.faces {
        let [nx, ny, nz] = face.normal.0;
        let length = (nx * nx + ny * ny + nz * nz).sqrt();
        assert!(
            (length - 1.0).abs() < 1e-4,
            "expected unit normal, got length {}",
            length
        );
    }
}

#[test]
fn volume_export_deduplicates_coincident_vertices() {
    // Two faces meeting at vertices that exist twice at the same position
    let mesh = MaskMesh {
        vertices: vec![
            GridVertex::new(0, 0, 0),
            GridVertex::new(100, 0, 0),
            GridVertex::new(0, 100, 0),
            GridVertex::new(100, 0, 0), // duplicate of 1
            GridVertex::new(0, 100, 0), // duplicate of 2
            GridVertex::new(100, 100, 0),
        ],
        faces: vec![[0, 1, 2], [4, 3, 5]],
    };

    let file = NamedTempFile::new().expect("temp file");
    mesh.export_volume_stl(file.path(), &ShellParams::default())
        .expect("export");

    // After dedup the two faces share edge (1, 2): 4 boundary edges, so
    // per half 2 + 2 + 4 x 2 = 12 faces, 24 mirrored
    assert_eq!(read_stl(file.path()).faces.len(), 24);
}

#[test]
fn export_failure_leaves_model_untouched() {
    let mesh = MaskMesh::seed();
    let snapshot = mesh.clone();
    let result = mesh.export_surface_stl("/nonexistent-dir/out.stl");
    assert!(result.is_err());
    assert_eq!(mesh, snapshot);
}
