//! Core mesh data types.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{MaskError, MaskResult};

/// A vertex on the integer world grid.
///
/// Coordinates are world-space units (mm-equivalent) on an axis-aligned
/// grid. A vertex with `x == -1 && y == -1` is a tombstone: logically
/// deleted, skipped by every consumer, never physically removed while the
/// session is live so that face indices stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GridVertex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// The tombstone sentinel written over logically deleted vertices.
pub const TOMBSTONE: GridVertex = GridVertex {
    x: -1,
    y: -1,
    z: -1,
};

impl GridVertex {
    /// Create a new vertex.
    #[inline]
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Create a vertex at height zero.
    #[inline]
    pub fn flat(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Whether this vertex is a tombstone.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        self.x == -1 && self.y == -1
    }

    /// Whether this vertex lies on the mirror seam (the plane X = 0).
    #[inline]
    pub fn on_seam(&self) -> bool {
        self.x == 0
    }

    /// Position as a floating-point vector for geometric math.
    #[inline]
    pub fn as_vec3(&self) -> Vector3<f64> {
        Vector3::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

/// World bounds and grid snapping for the edited half-surface.
///
/// The reference configuration is a 200 x 300 x 150 world with a 1-unit
/// grid; the mirror seam is the plane X = 0.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Extent of the editable half along X (the seam is X = 0).
    pub width: i32,
    /// Extent along Y.
    pub height: i32,
    /// Extent along Z (relief depth).
    pub depth: i32,
    /// Snap step for vertex placement.
    pub grid_size: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 300,
            depth: 150,
            grid_size: 1,
        }
    }
}

impl GridConfig {
    /// Snap a coordinate down to the grid.
    #[inline]
    pub fn snap(&self, v: i32) -> i32 {
        v / self.grid_size * self.grid_size
    }

    /// Clamp an X coordinate into the world.
    #[inline]
    pub fn clamp_x(&self, x: i32) -> i32 {
        x.clamp(0, self.width)
    }

    /// Clamp a Y coordinate into the world.
    #[inline]
    pub fn clamp_y(&self, y: i32) -> i32 {
        y.clamp(0, self.height)
    }

    /// Clamp a Z coordinate into the world.
    #[inline]
    pub fn clamp_z(&self, z: i32) -> i32 {
        z.clamp(0, self.depth)
    }
}

/// The editable half-mask surface: a vertex sequence and a face sequence.
///
/// Faces are `[v0, v1, v2]` index triples into the vertex sequence. The
/// traversal order encodes winding and therefore outward-normal direction;
/// every mutating operation preserves it deliberately. Indices are stable
/// for the whole session: deletion tombstones a vertex, it never renumbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskMesh {
    /// Vertex data, including tombstones.
    pub vertices: Vec<GridVertex>,

    /// Triangle faces as indices into the vertex sequence.
    pub faces: Vec<[u32; 3]>,
}

impl MaskMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create the default starting model: a single triangle spanning the
    /// seam corner, `{(0,0), (100,0), (0,100)}`.
    pub fn seed() -> Self {
        Self {
            vertices: vec![
                GridVertex::flat(0, 0),
                GridVertex::flat(100, 0),
                GridVertex::flat(0, 100),
            ],
            faces: vec![[0, 1, 2]],
        }
    }

    /// Number of vertices, tombstones included.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live (non-tombstoned) vertices.
    pub fn live_vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| !v.is_tombstone()).count()
    }

    /// Number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no faces or no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Checked vertex read.
    pub fn vertex(&self, index: u32) -> MaskResult<GridVertex> {
        self.vertices
            .get(index as usize)
            .copied()
            .ok_or_else(|| MaskError::out_of_range(index as usize, self.vertices.len()))
    }

    /// Checked mutable vertex access.
    pub fn vertex_mut(&mut self, index: u32) -> MaskResult<&mut GridVertex> {
        let count = self.vertices.len();
        self.vertices
            .get_mut(index as usize)
            .ok_or_else(|| MaskError::out_of_range(index as usize, count))
    }

    /// Checked face read.
    pub fn face(&self, index: usize) -> MaskResult<[u32; 3]> {
        self.faces
            .get(index)
            .copied()
            .ok_or_else(|| MaskError::out_of_range(index, self.faces.len()))
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, vertex: GridVertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Mark a vertex as logically deleted.
    pub fn tombstone(&mut self, index: u32) -> MaskResult<()> {
        *self.vertex_mut(index)? = TOMBSTONE;
        Ok(())
    }

    /// Find a live vertex at exactly this grid position.
    ///
    /// Lookup is by value, never by reference identity, so duplicate
    /// positions resolve to the first (lowest-index) occurrence.
    pub fn find_vertex_at(&self, x: i32, y: i32) -> Option<u32> {
        self.vertices
            .iter()
            .position(|v| !v.is_tombstone() && v.x == x && v.y == y)
            .map(|i| i as u32)
    }

    /// Whether all three vertices of a face are live.
    pub fn face_is_live(&self, face: [u32; 3]) -> bool {
        face.iter()
            .all(|&i| !self.vertices[i as usize].is_tombstone())
    }

    /// Resolve a face to its three vertices.
    #[inline]
    pub fn face_vertices(&self, face: [u32; 3]) -> [GridVertex; 3] {
        [
            self.vertices[face[0] as usize],
            self.vertices[face[1] as usize],
            self.vertices[face[2] as usize],
        ]
    }
}

impl Default for MaskMesh {
    fn default() -> Self {
        Self::new()
    }
}
