//! Read-only invariant audit over a mesh.

use tracing::debug;

use crate::edges::edge_occurrences;
use crate::types::MaskMesh;

/// Summary of a validation pass.
///
/// A sound mesh has no face referencing a tombstone or an out-of-range
/// index, and no face collapsed in its XY projection. Boundary and
/// non-manifold edge counts are informational: an open half-surface always
/// has boundary edges, and a non-manifold edge is handled by splitting,
/// not rejected.
#[derive(Debug, Clone, Default)]
pub struct MaskReport {
    pub vertex_count: usize,
    pub live_vertex_count: usize,
    pub face_count: usize,
    /// Faces referencing an index beyond the vertex sequence.
    pub out_of_range_faces: usize,
    /// Faces referencing a tombstoned vertex.
    pub tombstone_faces: usize,
    /// Faces with two vertices coincident in (X, Y).
    pub degenerate_faces: usize,
    /// Edges contained in exactly one face.
    pub boundary_edge_count: usize,
    /// Edges contained in more than two faces.
    pub non_manifold_edge_count: usize,
}

impl MaskReport {
    /// Whether the structural invariants hold.
    pub fn is_sound(&self) -> bool {
        self.out_of_range_faces == 0 && self.tombstone_faces == 0 && self.degenerate_faces == 0
    }
}

impl std::fmt::Display for MaskReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mask Mesh Report:")?;
        writeln!(
            f,
            "  Vertices: {} ({} live)",
            self.vertex_count, self.live_vertex_count
        )?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Boundary edges: {}", self.boundary_edge_count)?;
        if self.non_manifold_edge_count > 0 {
            writeln!(f, "  Non-manifold edges: {}", self.non_manifold_edge_count)?;
        }
        if self.out_of_range_faces > 0 {
            writeln!(f, "  Out-of-range faces: {}", self.out_of_range_faces)?;
        }
        if self.tombstone_faces > 0 {
            writeln!(f, "  Tombstone-referencing faces: {}", self.tombstone_faces)?;
        }
        if self.degenerate_faces > 0 {
            writeln!(f, "  Degenerate faces: {}", self.degenerate_faces)?;
        }
        writeln!(
            f,
            "  Sound: {}",
            if self.is_sound() { "yes" } else { "NO" }
        )?;
        Ok(())
    }
}

/// Audit the mesh against its structural invariants.
pub fn validate_mesh(mesh: &MaskMesh) -> MaskReport {
    let mut report = MaskReport {
        vertex_count: mesh.vertex_count(),
        live_vertex_count: mesh.live_vertex_count(),
        face_count: mesh.face_count(),
        ..Default::default()
    };

    for &face in &mesh.faces {
        if face
            .iter()
            .any(|&i| i as usize >= mesh.vertices.len())
        {
            report.out_of_range_faces += 1;
            continue;
        }

        let [v1, v2, v3] = mesh.face_vertices(face);
        if v1.is_tombstone() || v2.is_tombstone() || v3.is_tombstone() {
            report.tombstone_faces += 1;
            continue;
        }

        let collapsed = (v1.x == v2.x && v1.y == v2.y)
            || (v2.x == v3.x && v2.y == v3.y)
            || (v3.x == v1.x && v3.y == v1.y);
        if collapsed {
            report.degenerate_faces += 1;
        }
    }

    for (_, count) in edge_occurrences(&mesh.faces) {
        if count == 1 {
            report.boundary_edge_count += 1;
        } else if count > 2 {
            report.non_manifold_edge_count += 1;
        }
    }

    debug!(
        "Validated mesh: {} face(s), {} boundary edge(s), sound: {}",
        report.face_count,
        report.boundary_edge_count,
        report.is_sound()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GridVertex, TOMBSTONE};

    #[test]
    fn test_seed_mesh_is_sound() {
        let report = validate_mesh(&MaskMesh::seed());
        assert!(report.is_sound());
        assert_eq!(report.boundary_edge_count, 3);
        assert_eq!(report.non_manifold_edge_count, 0);
    }

    #[test]
    fn test_tombstone_reference_flagged() {
        let mut mesh = MaskMesh::seed();
        mesh.vertices[1] = TOMBSTONE;
        let report = validate_mesh(&mesh);
        assert_eq!(report.tombstone_faces, 1);
        assert!(!report.is_sound());
    }

    #[test]
    fn test_degenerate_face_flagged() {
        let mut mesh = MaskMesh::seed();
        mesh.vertices[2] = GridVertex::new(100, 0, 30); // same XY as vertex 1
        let report = validate_mesh(&mesh);
        assert_eq!(report.degenerate_faces, 1);
        assert!(!report.is_sound());
    }

    #[test]
    fn test_out_of_range_face_flagged() {
        let mut mesh = MaskMesh::seed();
        mesh.faces.push([0, 1, 9]);
        let report = validate_mesh(&mesh);
        assert_eq!(report.out_of_range_faces, 1);
        assert!(!report.is_sound());
    }

    #[test]
    fn test_non_manifold_edge_counted() {
        let mut mesh = MaskMesh::seed();
        mesh.vertices.push(GridVertex::flat(100, 100));
        mesh.vertices.push(GridVertex::flat(50, 150));
        mesh.faces.push([1, 2, 3]);
        mesh.faces.push([2, 1, 4]);
        let report = validate_mesh(&mesh);
        assert_eq!(report.non_manifold_edge_count, 1);
        // Non-manifold is informational, not unsound
        assert!(report.is_sound());
    }
}
