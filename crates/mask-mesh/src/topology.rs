//! Edge-driven construction and splitting of the half-mask surface.
//!
//! Interaction state (the active edge, drag flags) is owned by the caller;
//! every operation here is keyed explicitly by vertex indices and a target
//! point. Operations that structurally change the mesh are expected to be
//! followed by a history snapshot.

use hashbrown::HashSet;
use tracing::{debug, info};

use crate::edges::{edge_direction_in_face, opposite_vertex, triangles_containing};
use crate::error::{MaskError, MaskResult};
use crate::geometry::face_contains_point;
use crate::types::{GridConfig, GridVertex, MaskMesh, TOMBSTONE};

/// The route taken by [`add_triangle_from_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEdit {
    /// A new face was attached to a boundary (or free) edge.
    Extended { vertex: u32, reused_vertex: bool },
    /// Both endpoints sat on the mirror seam; the edge was subdivided.
    SeamSplit { midpoint: u32 },
    /// The edge was interior or non-manifold; it was bisected.
    InteriorSplit { midpoint: u32 },
}

/// Build a new face from edge (a, b) toward a target point, or split the
/// edge when extension is not allowed.
///
/// A seam edge (both endpoints at X = 0) is only ever subdivided, never
/// extended past the seam. An edge shared by more than one face is
/// bisected instead of extended, since extending it would overlap
/// existing geometry. Otherwise the target is snapped and clamped, an
/// existing vertex at that exact (X, Y) is reused or a new one appended
/// at height zero, and the new face is attached.
pub fn add_triangle_from_edge(
    mesh: &mut MaskMesh,
    a: u32,
    b: u32,
    target: (i32, i32),
    cfg: &GridConfig,
) -> MaskResult<EdgeEdit> {
    let va = mesh.vertex(a)?;
    let vb = mesh.vertex(b)?;

    if va.on_seam() && vb.on_seam() {
        let midpoint = split_seam_edge(mesh, a, b, cfg)?;
        return Ok(EdgeEdit::SeamSplit { midpoint });
    }

    let sharing = triangles_containing(mesh, a, b);
    if sharing.len() > 1 {
        let midpoint = split_edge_with_midpoint(mesh, a, b, cfg)?;
        return Ok(EdgeEdit::InteriorSplit { midpoint });
    }

    let x = cfg.clamp_x(cfg.snap(target.0));
    let y = cfg.clamp_y(cfg.snap(target.1));

    let (vertex, reused_vertex) = match mesh.find_vertex_at(x, y) {
        Some(index) => (index, true),
        None => (mesh.push_vertex(GridVertex::flat(x, y)), false),
    };

    // When the edge already belongs to a face, the new face is always
    // wound b -> a, whichever direction the neighbor traverses the edge.
    // Rendering and STL export both depend on this convention.
    let face = if sharing.is_empty() {
        [a, b, vertex]
    } else {
        [b, a, vertex]
    };
    mesh.faces.push(face);

    debug!(
        "Attached face {:?} at ({}, {}) (vertex {} {})",
        face,
        x,
        y,
        vertex,
        if reused_vertex { "reused" } else { "new" }
    );

    Ok(EdgeEdit::Extended {
        vertex,
        reused_vertex,
    })
}

/// Subdivide a seam edge (both endpoints at X = 0) at its midpoint.
///
/// Every face containing the edge is replaced by two halves sharing the
/// midpoint and the face's opposite vertex. Returns the midpoint index.
pub fn split_seam_edge(
    mesh: &mut MaskMesh,
    a: u32,
    b: u32,
    cfg: &GridConfig,
) -> MaskResult<u32> {
    let va = mesh.vertex(a)?;
    let vb = mesh.vertex(b)?;

    let sharing = triangles_containing(mesh, a, b);
    if sharing.is_empty() {
        return Err(MaskError::invalid_edge(a, b));
    }

    // X stays on the seam; Y and Z are snapped averages
    let mid_x = (va.x + vb.x) / 2;
    let mid_y = cfg.snap((va.y + vb.y) / 2);
    let mid_z = cfg.snap((va.z + vb.z) / 2);

    let midpoint = match mesh.find_vertex_at(mid_x, mid_y) {
        Some(index) => index,
        None => mesh.push_vertex(GridVertex::new(mid_x, mid_y, mid_z)),
    };

    let replaced = replace_split_faces(mesh, &sharing, a, b, midpoint, false);
    info!(
        "Split seam edge ({}, {}) at vertex {}: {} face(s) subdivided",
        a, b, midpoint, replaced
    );
    Ok(midpoint)
}

/// Bisect an interior (or non-manifold) edge at its snapped midpoint.
///
/// Each containing face is replaced by two halves that preserve the
/// face's own traversal direction of the edge (A-first vs B-first), so
/// winding stays consistent on both sides. Returns the midpoint index.
pub fn split_edge_with_midpoint(
    mesh: &mut MaskMesh,
    a: u32,
    b: u32,
    cfg: &GridConfig,
) -> MaskResult<u32> {
    let va = mesh.vertex(a)?;
    let vb = mesh.vertex(b)?;

    let sharing = triangles_containing(mesh, a, b);
    if sharing.is_empty() {
        return Err(MaskError::invalid_edge(a, b));
    }

    let mid_x = cfg.snap((va.x + vb.x) / 2);
    let mid_y = cfg.snap((va.y + vb.y) / 2);
    let mid_z = cfg.snap((va.z + vb.z) / 2);

    let midpoint = match mesh.find_vertex_at(mid_x, mid_y) {
        Some(index) => index,
        None => mesh.push_vertex(GridVertex::new(mid_x, mid_y, mid_z)),
    };

    let replaced = replace_split_faces(mesh, &sharing, a, b, midpoint, true);
    info!(
        "Split edge ({}, {}) at vertex {}: {} face(s) subdivided",
        a, b, midpoint, replaced
    );
    Ok(midpoint)
}

/// Replace each face in `sharing` with its two split halves.
///
/// With `per_face_direction`, the half-pair follows the direction the
/// face itself traverses the edge; otherwise the caller's (a, b) order is
/// used as-is. Returns the number of faces replaced.
fn replace_split_faces(
    mesh: &mut MaskMesh,
    sharing: &[usize],
    a: u32,
    b: u32,
    midpoint: u32,
    per_face_direction: bool,
) -> usize {
    let mut replacements: Vec<[u32; 3]> = Vec::with_capacity(sharing.len() * 2);
    let mut dropped: HashSet<usize> = HashSet::new();

    for &index in sharing {
        let face = mesh.faces[index];
        let Some(opposite) = opposite_vertex(&face, a, b) else {
            continue;
        };

        let (first, second) = if per_face_direction {
            match edge_direction_in_face(&face, a, b) {
                Some(false) => (b, a),
                _ => (a, b),
            }
        } else {
            (a, b)
        };

        replacements.push([first, midpoint, opposite]);
        replacements.push([midpoint, second, opposite]);
        dropped.insert(index);
    }

    let mut kept: Vec<[u32; 3]> = Vec::with_capacity(mesh.faces.len() + replacements.len());
    for (index, face) in mesh.faces.iter().enumerate() {
        if !dropped.contains(&index) {
            kept.push(*face);
        }
    }
    kept.extend(replacements);
    mesh.faces = kept;

    dropped.len()
}

/// Merge every other vertex at exactly `primary`'s (X, Y) into `primary`.
///
/// Runs after a drag ends. The Z of the last-found duplicate is copied
/// onto the primary, faces are retargeted to the primary index, degenerate
/// byproducts are cleaned up, and the duplicates are tombstoned. Returns
/// the number of vertices merged away.
pub fn merge_coincident_vertices(mesh: &mut MaskMesh, primary: u32) -> MaskResult<usize> {
    let anchor = mesh.vertex(primary)?;

    let mut duplicates: HashSet<u32> = HashSet::new();
    let mut adopted_z = None;
    for (index, vertex) in mesh.vertices.iter().enumerate() {
        let index = index as u32;
        if index != primary
            && !vertex.is_tombstone()
            && vertex.x == anchor.x
            && vertex.y == anchor.y
        {
            duplicates.insert(index);
            adopted_z = Some(vertex.z);
        }
    }

    if duplicates.is_empty() {
        return Ok(0);
    }

    if let Some(z) = adopted_z {
        mesh.vertices[primary as usize].z = z;
    }

    for face in &mut mesh.faces {
        for slot in face.iter_mut() {
            if duplicates.contains(slot) {
                *slot = primary;
            }
        }
    }

    remove_degenerate_triangles(mesh);

    for &index in &duplicates {
        mesh.vertices[index as usize] = TOMBSTONE;
    }

    info!(
        "Merged {} vertex/vertices into {} at ({}, {})",
        duplicates.len(),
        primary,
        anchor.x,
        anchor.y
    );
    Ok(duplicates.len())
}

/// Drop every face that references a tombstone or has two vertices
/// coincident in (X, Y). Returns the number of faces removed.
pub fn remove_degenerate_triangles(mesh: &mut MaskMesh) -> usize {
    let original_count = mesh.faces.len();

    mesh.faces.retain(|&[i0, i1, i2]| {
        let v1 = mesh.vertices[i0 as usize];
        let v2 = mesh.vertices[i1 as usize];
        let v3 = mesh.vertices[i2 as usize];

        if v1.is_tombstone() || v2.is_tombstone() || v3.is_tombstone() {
            return false;
        }

        let collapsed = (v1.x == v2.x && v1.y == v2.y)
            || (v2.x == v3.x && v2.y == v3.y)
            || (v3.x == v1.x && v3.y == v1.y);
        !collapsed
    });

    let removed = original_count - mesh.faces.len();
    if removed > 0 {
        info!("Removed {} degenerate face(s)", removed);
    }
    removed
}

/// Tombstone every vertex referenced by no surviving face.
/// Returns the number of vertices tombstoned.
pub fn tombstone_unreferenced_vertices(mesh: &mut MaskMesh) -> usize {
    let mut used: HashSet<u32> = HashSet::new();
    for face in &mesh.faces {
        used.insert(face[0]);
        used.insert(face[1]);
        used.insert(face[2]);
    }

    let mut removed = 0;
    for (index, vertex) in mesh.vertices.iter_mut().enumerate() {
        if !used.contains(&(index as u32)) && !vertex.is_tombstone() {
            *vertex = TOMBSTONE;
            removed += 1;
        }
    }

    if removed > 0 {
        debug!("Tombstoned {} unreferenced vertex/vertices", removed);
    }
    removed
}

/// Delete every live face whose XY projection contains the point, then
/// clean up degenerate faces and orphaned vertices. Returns the number of
/// faces deleted by the hit test itself.
pub fn delete_faces_at(mesh: &mut MaskMesh, point: (i32, i32)) -> usize {
    let (px, py) = (point.0 as f64, point.1 as f64);

    let hits: HashSet<usize> = mesh
        .faces
        .iter()
        .enumerate()
        .filter(|&(_, &face)| mesh.face_is_live(face) && face_contains_point(mesh, face, px, py))
        .map(|(index, _)| index)
        .collect();
    if hits.is_empty() {
        return 0;
    }

    let mut kept: Vec<[u32; 3]> = Vec::with_capacity(mesh.faces.len() - hits.len());
    for (index, face) in mesh.faces.iter().enumerate() {
        if !hits.contains(&index) {
            kept.push(*face);
        }
    }
    mesh.faces = kept;
    let removed = hits.len();

    remove_degenerate_triangles(mesh);
    tombstone_unreferenced_vertices(mesh);
    info!("Deleted {} face(s) at ({}, {})", removed, point.0, point.1);
    removed
}

/// Set a vertex height, clamped into the world. Returns the applied Z.
pub fn set_vertex_height(
    mesh: &mut MaskMesh,
    index: u32,
    z: i32,
    cfg: &GridConfig,
) -> MaskResult<i32> {
    let clamped = cfg.clamp_z(z);
    mesh.vertex_mut(index)?.z = clamped;
    Ok(clamped)
}

/// Scale every live vertex about the origin, rounding to the nearest grid
/// unit and clamping into the world.
pub fn scale_all(mesh: &mut MaskMesh, sx: f64, sy: f64, sz: f64, cfg: &GridConfig) {
    for vertex in &mut mesh.vertices {
        if vertex.is_tombstone() {
            continue;
        }
        vertex.x = cfg.clamp_x((vertex.x as f64 * sx + 0.5) as i32);
        vertex.y = cfg.clamp_y((vertex.y as f64 * sy + 0.5) as i32);
        vertex.z = cfg.clamp_z((vertex.z as f64 * sz + 0.5) as i32);
    }
    info!("Scaled model by ({}, {}, {})", sx, sy, sz);
}

/// Translate every live vertex, clamping into the world.
pub fn translate_all(mesh: &mut MaskMesh, dx: i32, dy: i32, dz: i32, cfg: &GridConfig) {
    for vertex in &mut mesh.vertices {
        if vertex.is_tombstone() {
            continue;
        }
        vertex.x = cfg.clamp_x(vertex.x + dx);
        vertex.y = cfg.clamp_y(vertex.y + dy);
        vertex.z = cfg.clamp_z(vertex.z + dz);
    }
    info!("Translated model by ({}, {}, {})", dx, dy, dz);
}
