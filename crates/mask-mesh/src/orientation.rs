//! Winding unification and global flips.

use hashbrown::{HashMap, HashSet};
use nalgebra::Vector3;
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::edges::edge_key;
use crate::error::{MaskError, MaskResult};
use crate::types::MaskMesh;

/// Unnormalized face normal; only its direction matters here.
fn face_cross(mesh: &MaskMesh, face: [u32; 3]) -> Vector3<f64> {
    let [v1, v2, v3] = mesh.face_vertices(face);
    let p1 = v1.as_vec3();
    (v2.as_vec3() - p1).cross(&(v3.as_vec3() - p1))
}

/// Make winding consistent across every face reachable from `seed`.
///
/// Breadth-first traversal over the edge-sharing adjacency graph: each
/// newly visited neighbor is compared to the face it was reached from by
/// normal dot product, and flipped (V1/V3 swap) when the dot product is
/// not positive. Faces unreachable from the seed — disconnected islands —
/// are left untouched; that is a documented limitation, not something to
/// silently repair. Returns the number of faces flipped.
pub fn unify_winding_from_seed(mesh: &mut MaskMesh, seed: usize) -> MaskResult<usize> {
    if seed >= mesh.faces.len() {
        return Err(MaskError::out_of_range(seed, mesh.faces.len()));
    }

    // Undirected edge -> faces containing it. Flipping a face swaps its
    // traversal order but not its edge set, so the map stays valid while
    // faces are reoriented mid-walk.
    let mut edge_to_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (index, face) in mesh.faces.iter().enumerate() {
        for i in 0..3 {
            let key = edge_key(face[i], face[(i + 1) % 3]);
            edge_to_faces.entry(key).or_default().push(index);
        }
    }

    let mut processed: HashSet<usize> = HashSet::new();
    let mut queue: VecDeque<usize> = VecDeque::new();
    processed.insert(seed);
    queue.push_back(seed);

    let mut flipped = 0;

    while let Some(current) = queue.pop_front() {
        let current_face = mesh.faces[current];
        let current_normal = face_cross(mesh, current_face);

        for i in 0..3 {
            let key = edge_key(current_face[i], current_face[(i + 1) % 3]);
            let Some(neighbors) = edge_to_faces.get(&key) else {
                continue;
            };
            for &neighbor in neighbors {
                if neighbor == current || processed.contains(&neighbor) {
                    continue;
                }

                let neighbor_normal = face_cross(mesh, mesh.faces[neighbor]);
                if current_normal.dot(&neighbor_normal) <= 0.0 {
                    mesh.faces[neighbor].swap(0, 2);
                    flipped += 1;
                }

                processed.insert(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    if flipped > 0 {
        info!(
            "Unified winding from face {}: flipped {} of {} reachable face(s)",
            seed,
            flipped,
            processed.len()
        );
    } else {
        debug!(
            "Winding already consistent across {} reachable face(s)",
            processed.len()
        );
    }

    Ok(flipped)
}

/// Reverse the winding of every face. Returns the number of faces flipped.
pub fn flip_all(mesh: &mut MaskMesh) -> usize {
    for face in &mut mesh.faces {
        face.swap(0, 2);
    }
    info!("Flipped all {} face(s)", mesh.faces.len());
    mesh.faces.len()
}
