//! Transient edge queries over the face sequence.
//!
//! Edges are never stored: an edge is an unordered pair of vertex indices
//! recomputed from the face list on demand. An edge contained in exactly
//! one face is a boundary edge, two faces an interior (manifold) edge,
//! more than two a non-manifold edge.

use hashbrown::HashMap;

use crate::types::MaskMesh;

/// Canonical (smaller, larger) key for an undirected edge.
#[inline]
pub fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Whether a face contains the undirected edge (a, b).
pub fn face_contains_edge(face: &[u32; 3], a: u32, b: u32) -> bool {
    for i in 0..3 {
        let v0 = face[i];
        let v1 = face[(i + 1) % 3];
        if (v0 == a && v1 == b) || (v0 == b && v1 == a) {
            return true;
        }
    }
    false
}

/// Indices of every face containing the undirected edge (a, b).
pub fn triangles_containing(mesh: &MaskMesh, a: u32, b: u32) -> Vec<usize> {
    mesh.faces
        .iter()
        .enumerate()
        .filter(|(_, face)| face_contains_edge(face, a, b))
        .map(|(i, _)| i)
        .collect()
}

/// The vertex of `face` that is not an endpoint of edge (a, b).
///
/// Returns `None` when the face does not actually contain the edge; that
/// is a caller error, not a valid mesh state.
pub fn opposite_vertex(face: &[u32; 3], a: u32, b: u32) -> Option<u32> {
    if !face_contains_edge(face, a, b) {
        return None;
    }
    face.iter().copied().find(|&v| v != a && v != b)
}

/// Check if edge (a, b) appears in `face` in the same direction (a -> b).
/// Returns `Some(true)` if same direction, `Some(false)` if opposite,
/// `None` if the edge is not part of the face.
pub fn edge_direction_in_face(face: &[u32; 3], a: u32, b: u32) -> Option<bool> {
    for i in 0..3 {
        let v0 = face[i];
        let v1 = face[(i + 1) % 3];
        if v0 == a && v1 == b {
            return Some(true);
        }
        if v0 == b && v1 == a {
            return Some(false);
        }
    }
    None
}

/// Count how many faces contain each undirected edge.
pub fn edge_occurrences(faces: &[[u32; 3]]) -> HashMap<(u32, u32), u32> {
    let mut counts: HashMap<(u32, u32), u32> = HashMap::new();
    for face in faces {
        for i in 0..3 {
            let key = edge_key(face[i], face[(i + 1) % 3]);
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

/// Every undirected edge contained in exactly one face.
pub fn boundary_edges(faces: &[[u32; 3]]) -> Vec<(u32, u32)> {
    edge_occurrences(faces)
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(edge, _)| edge)
        .collect()
}
