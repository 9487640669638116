//! Binary STL export: flat mirrored surface and extruded shell solid.
//!
//! Both exports read a consistent snapshot of the mesh and never mutate
//! it; a failed write leaves the in-memory model untouched. Tombstones are
//! elided and surviving indices compacted before anything is emitted.
//! Normals are recomputed per emitted triangle, never reused.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hashbrown::HashMap;
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::edges::edge_occurrences;
use crate::error::{MaskError, MaskResult};
use crate::geometry::face_normal;
use crate::types::{GridVertex, MaskMesh};

/// Parameters for the volumetric shell export.
#[derive(Debug, Clone)]
pub struct ShellParams {
    /// Shell thickness in world units (mm-equivalent).
    pub thickness: f64,
}

impl Default for ShellParams {
    fn default() -> Self {
        Self { thickness: 2.0 }
    }
}

/// Elide tombstones and remap surviving faces into a compact 0-based
/// vertex list. Faces referencing a tombstone are dropped with them.
fn compact_live(mesh: &MaskMesh) -> (Vec<GridVertex>, Vec<[u32; 3]>) {
    let mut remap: Vec<Option<u32>> = vec![None; mesh.vertices.len()];
    let mut vertices: Vec<GridVertex> = Vec::with_capacity(mesh.vertices.len());

    for (index, vertex) in mesh.vertices.iter().enumerate() {
        if !vertex.is_tombstone() {
            remap[index] = Some(vertices.len() as u32);
            vertices.push(*vertex);
        }
    }

    let mut faces: Vec<[u32; 3]> = Vec::with_capacity(mesh.faces.len());
    for &[i0, i1, i2] in &mesh.faces {
        if let (Some(a), Some(b), Some(c)) = (
            remap[i0 as usize],
            remap[i1 as usize],
            remap[i2 as usize],
        ) {
            faces.push([a, b, c]);
        }
    }

    (vertices, faces)
}

/// Merge exactly-coincident vertices (hash on the full (X, Y, Z) triple)
/// and remap faces through the merge. Accidental duplicates would
/// otherwise leave seams in the closed shell.
fn merge_duplicate_vertices(
    vertices: &[GridVertex],
    faces: &[[u32; 3]],
) -> (Vec<GridVertex>, Vec<[u32; 3]>) {
    let mut seen: HashMap<(i32, i32, i32), u32> = HashMap::new();
    let mut merged: Vec<GridVertex> = Vec::with_capacity(vertices.len());
    let mut index_map: Vec<u32> = Vec::with_capacity(vertices.len());

    for vertex in vertices {
        let key = (vertex.x, vertex.y, vertex.z);
        let index = *seen.entry(key).or_insert_with(|| {
            let index = merged.len() as u32;
            merged.push(*vertex);
            index
        });
        index_map.push(index);
    }

    let faces = faces
        .iter()
        .map(|&[a, b, c]| {
            [
                index_map[a as usize],
                index_map[b as usize],
                index_map[c as usize],
            ]
        })
        .collect();

    (merged, faces)
}

/// Mirror a vertex across the seam plane X = 0.
#[inline]
fn mirrored(vertex: GridVertex) -> GridVertex {
    GridVertex::new(-vertex.x, vertex.y, vertex.z)
}

/// Export the surface as a flat, zero-thickness two-sided sheet: the
/// edited right half plus its mirror, windings reversed on the mirrored
/// side so outward orientation is preserved.
pub fn export_surface_stl(mesh: &MaskMesh, path: &Path) -> MaskResult<()> {
    let (right_vertices, right_faces) = compact_live(mesh);
    let n = right_vertices.len() as u32;

    let mut vertices = right_vertices.clone();
    vertices.extend(right_vertices.iter().map(|&v| mirrored(v)));

    let mut faces = right_faces.clone();
    faces.extend(
        right_faces
            .iter()
            .map(|&[a, b, c]| [n + c, n + b, n + a]),
    );

    debug!(
        "Surface export: {} live vertices, {} faces per side",
        n,
        right_faces.len()
    );
    write_binary_stl(path, &vertices, &faces)
}

/// Export a closed, printable solid: the front surface extruded backward
/// along averaged vertex normals, boundary edges stitched with side
/// walls, and the whole half-solid mirrored across the seam.
pub fn export_volume_stl(mesh: &MaskMesh, path: &Path, params: &ShellParams) -> MaskResult<()> {
    let (raw_vertices, raw_faces) = compact_live(mesh);
    let (front_vertices, front_faces) = merge_duplicate_vertices(&raw_vertices, &raw_faces);
    let n = front_vertices.len();

    // Averaged face normal per vertex
    let mut accum: Vec<Vector3<f64>> = vec![Vector3::zeros(); n];
    let mut counts: Vec<u32> = vec![0; n];
    for &[a, b, c] in &front_faces {
        let normal = face_normal(
            front_vertices[a as usize].as_vec3(),
            front_vertices[b as usize].as_vec3(),
            front_vertices[c as usize].as_vec3(),
        )
        .unwrap_or_else(Vector3::z);

        for index in [a, b, c] {
            accum[index as usize] += normal;
            counts[index as usize] += 1;
        }
    }

    // Back vertices: offset against the averaged normal so the shell
    // grows away from the printed face, then round back onto the grid.
    let mut back_vertices: Vec<GridVertex> = front_vertices.clone();
    for index in 0..n {
        if counts[index] == 0 {
            continue;
        }
        let average = accum[index] / counts[index] as f64;
        let direction = if average.norm() > 1e-8 {
            average.normalize()
        } else {
            Vector3::z()
        };
        let offset = direction * -params.thickness;
        let front = front_vertices[index];
        back_vertices[index] = GridVertex::new(
            (front.x as f64 + offset.x).round() as i32,
            (front.y as f64 + offset.y).round() as i32,
            (front.z as f64 + offset.z).round() as i32,
        );
    }

    // Back faces: reversed winding, indices offset past the front set
    let n32 = n as u32;
    let back_faces: Vec<[u32; 3]> = front_faces
        .iter()
        .map(|&[a, b, c]| [c + n32, b + n32, a + n32])
        .collect();

    // Side walls along true boundary edges only (edges in exactly one
    // front face); interior edges never grow walls.
    let mut side_faces: Vec<[u32; 3]> = Vec::new();
    for ((a, b), count) in edge_occurrences(&front_faces) {
        if count != 1 {
            continue;
        }
        side_faces.push([a, b, b + n32]);
        side_faces.push([a, b + n32, a + n32]);
    }

    let front_count = front_faces.len();

    let mut half_vertices = front_vertices;
    half_vertices.extend(back_vertices);

    let mut half_faces = front_faces;
    half_faces.extend(back_faces);
    half_faces.extend(&side_faces);

    // Mirror the entire closed half across the seam
    let mirror_offset = half_vertices.len() as u32;
    let mut vertices = half_vertices.clone();
    vertices.extend(half_vertices.iter().map(|&v| mirrored(v)));

    let mut faces = half_faces.clone();
    faces.extend(
        half_faces
            .iter()
            .map(|&[a, b, c]| [mirror_offset + c, mirror_offset + b, mirror_offset + a]),
    );

    info!(
        "Shell export: {} front faces, {} side walls, {} faces total",
        front_count,
        side_faces.len(),
        faces.len()
    );
    write_binary_stl(path, &vertices, &faces)
}

/// Write vertices and faces as little-endian binary STL: 80-byte header,
/// triangle count, then 50 bytes per triangle (normal, three vertices,
/// zero attribute). Normals come from the face geometry in emitted order.
fn write_binary_stl(path: &Path, vertices: &[GridVertex], faces: &[[u32; 3]]) -> MaskResult<()> {
    let file = File::create(path).map_err(|e| MaskError::io_write(path, e))?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<stl_io::Triangle> = faces
        .iter()
        .map(|&[i0, i1, i2]| {
            let v1 = vertices[i0 as usize];
            let v2 = vertices[i1 as usize];
            let v3 = vertices[i2 as usize];

            let normal = face_normal(v1.as_vec3(), v2.as_vec3(), v3.as_vec3())
                .unwrap_or_else(Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [
                    stl_io::Vertex::new([v1.x as f32, v1.y as f32, v1.z as f32]),
                    stl_io::Vertex::new([v2.x as f32, v2.y as f32, v2.z as f32]),
                    stl_io::Vertex::new([v3.x as f32, v3.y as f32, v3.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| {
        MaskError::io_write(
            path,
            std::io::Error::other(e.to_string()),
        )
    })?;

    writer
        .flush()
        .map_err(|e| MaskError::io_write(path, e))?;

    info!("Saved {} triangles to {:?}", faces.len(), path);
    Ok(())
}
