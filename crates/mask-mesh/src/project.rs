//! Project file round-trip (JSON).
//!
//! The document carries an `Application` marker naming the format, the
//! vertex sequence (tombstones included, verbatim), and the face sequence.
//! Vertex order, face order, and tombstone sentinels survive a round-trip
//! bit-identically.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MaskError, MaskResult};
use crate::types::{GridVertex, MaskMesh};

/// The literal marker identifying this format and version. Files carrying
/// any other value are rejected, not loaded.
pub const APPLICATION_MARKER: &str = "lowpoly_mask_builder_v1";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProjectDocument {
    application: String,
    vertices: Vec<GridVertex>,
    triangles: Vec<TriangleRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TriangleRecord {
    v1: u32,
    v2: u32,
    v3: u32,
}

/// Write the mesh to a project file.
pub fn save_project(mesh: &MaskMesh, path: &Path) -> MaskResult<()> {
    let document = ProjectDocument {
        application: APPLICATION_MARKER.to_string(),
        vertices: mesh.vertices.clone(),
        triangles: mesh
            .faces
            .iter()
            .map(|&[v1, v2, v3]| TriangleRecord { v1, v2, v3 })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| MaskError::malformed_file(path, e.to_string()))?;
    fs::write(path, json).map_err(|e| MaskError::io_write(path, e))?;

    info!(
        "Saved {} vertices and {} faces to {:?}",
        mesh.vertex_count(),
        mesh.face_count(),
        path
    );
    Ok(())
}

/// Load a mesh from a project file.
///
/// Rejects files whose `Application` marker differs and files whose face
/// indices fall outside the vertex sequence, so the loaded model satisfies
/// the index invariants from the start.
pub fn load_project(path: &Path) -> MaskResult<MaskMesh> {
    let json = fs::read_to_string(path).map_err(|e| MaskError::io_read(path, e))?;

    let document: ProjectDocument =
        serde_json::from_str(&json).map_err(|e| MaskError::malformed_file(path, e.to_string()))?;

    if document.application != APPLICATION_MARKER {
        return Err(MaskError::malformed_file(
            path,
            format!("unrecognized application marker {:?}", document.application),
        ));
    }

    let vertex_count = document.vertices.len();
    for (index, triangle) in document.triangles.iter().enumerate() {
        for v in [triangle.v1, triangle.v2, triangle.v3] {
            if v as usize >= vertex_count {
                return Err(MaskError::malformed_file(
                    path,
                    format!(
                        "triangle {} references vertex {}, but file has {} vertices",
                        index, v, vertex_count
                    ),
                ));
            }
        }
    }

    let mesh = MaskMesh {
        vertices: document.vertices,
        faces: document
            .triangles
            .iter()
            .map(|t| [t.v1, t.v2, t.v3])
            .collect(),
    };

    info!(
        "Loaded {} vertices and {} faces from {:?}",
        mesh.vertex_count(),
        mesh.face_count(),
        path
    );
    Ok(mesh)
}

/// Load `path` when it exists and parses, otherwise fall back to the seed
/// model. This is the session start behavior: a `new_data` project sitting
/// next to the executable overrides the built-in single triangle.
pub fn load_or_default(path: &Path) -> MaskMesh {
    if path.exists() {
        match load_project(path) {
            Ok(mesh) => return mesh,
            Err(e) => warn!("Falling back to the seed model: {}", e),
        }
    }
    MaskMesh::seed()
}
