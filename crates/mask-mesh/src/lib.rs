//! Topology and geometry engine for a symmetric low-poly relief mask.
//!
//! This crate is the mesh core of an interactive relief editor: it owns an
//! index-stable vertex/triangle model of one half (X >= 0) of a
//! bilaterally symmetric height-displaced surface, the edge-driven editing
//! operations that mutate it, and the STL pipeline that turns the open
//! half-surface into a closed, printable solid.
//!
//! # Units and Coordinate System
//!
//! Vertices live on an integer world grid in mm-equivalent units; the
//! reference world is 200 x 300 x 150 (see [`GridConfig`]). X grows away
//! from the mirror seam (the plane X = 0), Y is the vertical extent of
//! the canvas, and Z is relief height toward the viewer.
//!
//! Face winding encodes outward-normal direction and is preserved
//! deliberately by every editing operation; exported STL normals and
//! backface culling both depend on it.
//!
//! # Tombstones
//!
//! Vertices are never removed mid-session. Logical deletion writes the
//! `(-1, -1, -1)` tombstone sentinel, keeping every surviving index
//! stable; tombstones are skipped by hit-testing, rasterization, and
//! validation, and elided at export time.
//!
//! # Quick Start
//!
//! ```no_run
//! use mask_mesh::{GridConfig, HistoryStack, MaskMesh, ShellParams, topology};
//!
//! let cfg = GridConfig::default();
//! let mut mesh = MaskMesh::seed();
//! let mut history = HistoryStack::new();
//! history.reset(&mesh);
//!
//! // Attach a face to the boundary edge (1, 2), toward (100, 100)
//! topology::add_triangle_from_edge(&mut mesh, 1, 2, (100, 100), &cfg).unwrap();
//! history.push(&mesh);
//!
//! // Save the project and export a printable shell
//! mesh.save("mask.lmb").unwrap();
//! mesh.export_volume_stl("mask.volume.stl", &ShellParams::default()).unwrap();
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`MaskResult`]. Malformed caller input
//! (an edge that belongs to no face, an index past the end) is an error;
//! degenerate triangles produced as a byproduct of merges and splits are
//! cleaned up silently, since they are an expected transient state.

mod error;
mod types;

pub mod edges;
pub mod export;
pub mod geometry;
pub mod heightmap;
pub mod history;
pub mod orientation;
pub mod project;
pub mod topology;
pub mod validate;

pub use error::{ErrorCode, MaskError, MaskResult};
pub use types::{GridConfig, GridVertex, MaskMesh, TOMBSTONE};

pub use export::{ShellParams, export_surface_stl, export_volume_stl};
pub use heightmap::render_height_map;
pub use history::{DEFAULT_UNDO_CAPACITY, HistoryStack};
pub use orientation::{flip_all, unify_winding_from_seed};
pub use project::{APPLICATION_MARKER, load_or_default, load_project, save_project};
pub use topology::{
    EdgeEdit, add_triangle_from_edge, delete_faces_at, merge_coincident_vertices,
    remove_degenerate_triangles, scale_all, set_vertex_height, split_edge_with_midpoint,
    split_seam_edge, tombstone_unreferenced_vertices, translate_all,
};
pub use validate::{MaskReport, validate_mesh};

// Convenience methods on MaskMesh
impl MaskMesh {
    /// Load a mesh from a project file.
    pub fn load(path: impl AsRef<std::path::Path>) -> MaskResult<Self> {
        project::load_project(path.as_ref())
    }

    /// Save the mesh to a project file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> MaskResult<()> {
        project::save_project(self, path.as_ref())
    }

    /// Audit the mesh against its structural invariants.
    pub fn validate(&self) -> MaskReport {
        validate::validate_mesh(self)
    }

    /// Export the flat mirrored surface as binary STL.
    pub fn export_surface_stl(&self, path: impl AsRef<std::path::Path>) -> MaskResult<()> {
        export::export_surface_stl(self, path.as_ref())
    }

    /// Export a closed extruded shell as binary STL.
    pub fn export_volume_stl(
        &self,
        path: impl AsRef<std::path::Path>,
        params: &ShellParams,
    ) -> MaskResult<()> {
        export::export_volume_stl(self, path.as_ref(), params)
    }

    /// Interpolated surface height at (x, y), if inside any face.
    pub fn height_at(&self, x: f64, y: f64) -> Option<f64> {
        geometry::height_at(self, x, y)
    }
}
