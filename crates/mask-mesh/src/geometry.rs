//! Planar hit-testing, height interpolation, and face normals.

use nalgebra::Vector3;

use crate::types::{GridVertex, MaskMesh};

/// Barycentric denominators below this are treated as degenerate
/// projections and fail the containment test.
const DEGENERATE_DENOMINATOR: f64 = 1e-4;

/// Tolerance on each barycentric coordinate and on their sum. Points on
/// or very near an edge are accepted so that adjacent faces leave no
/// unclassified gap along shared edges.
const BARYCENTRIC_EPSILON: f64 = 1e-6;

/// Plane-fit Z components below this fall back to the vertex average.
const VERTICAL_PLANE_EPSILON: f64 = 1e-6;

/// Cross products shorter than this have no meaningful direction.
const NORMAL_LENGTH_EPSILON: f64 = 1e-8;

/// Barycentric point-in-triangle test in the XY plane.
pub fn point_in_triangle(px: f64, py: f64, v1: GridVertex, v2: GridVertex, v3: GridVertex) -> bool {
    let (x1, y1) = (v1.x as f64, v1.y as f64);
    let (x2, y2) = (v2.x as f64, v2.y as f64);
    let (x3, y3) = (v3.x as f64, v3.y as f64);

    let denominator = (y2 - y3) * (x1 - x3) + (x3 - x2) * (y1 - y3);
    if denominator.abs() < DEGENERATE_DENOMINATOR {
        return false;
    }

    let alpha = ((y2 - y3) * (px - x3) + (x3 - x2) * (py - y3)) / denominator;
    let beta = ((y3 - y1) * (px - x3) + (x1 - x3) * (py - y3)) / denominator;
    let gamma = 1.0 - alpha - beta;

    alpha >= -BARYCENTRIC_EPSILON
        && beta >= -BARYCENTRIC_EPSILON
        && gamma >= -BARYCENTRIC_EPSILON
        && (alpha + beta + gamma - 1.0).abs() < BARYCENTRIC_EPSILON
}

/// Z of the plane through the three vertices at (px, py).
///
/// Fits the plane from two edge vectors and their cross product; when the
/// plane is near-vertical the unweighted average of the three vertex
/// heights is returned instead.
pub fn interpolate_z(px: f64, py: f64, v1: GridVertex, v2: GridVertex, v3: GridVertex) -> f64 {
    let p1 = v1.as_vec3();
    let e1 = v2.as_vec3() - p1;
    let e2 = v3.as_vec3() - p1;

    let normal = e1.cross(&e2);
    let (a, b, c) = (normal.x, normal.y, normal.z);
    let d = -(a * p1.x + b * p1.y + c * p1.z);

    if c.abs() > VERTICAL_PLANE_EPSILON {
        -(a * px + b * py + d) / c
    } else {
        (v1.z as f64 + v2.z as f64 + v3.z as f64) / 3.0
    }
}

/// Unit face normal via the cross product of (v2 - v1) and (v3 - v1).
///
/// Returns `None` when the cross product is shorter than 1e-8; callers
/// pick the fallback (`(0, 0, 1)` in extrusion contexts).
pub fn face_normal(v1: Vector3<f64>, v2: Vector3<f64>, v3: Vector3<f64>) -> Option<Vector3<f64>> {
    let n = (v2 - v1).cross(&(v3 - v1));
    let len = n.norm();
    if len > NORMAL_LENGTH_EPSILON {
        Some(n / len)
    } else {
        None
    }
}

/// Whether a live face's XY projection contains the point.
pub fn face_contains_point(mesh: &MaskMesh, face: [u32; 3], px: f64, py: f64) -> bool {
    let [v1, v2, v3] = mesh.face_vertices(face);
    point_in_triangle(px, py, v1, v2, v3)
}

/// Interpolated surface height at (x, y), from the first live face whose
/// projection contains the point. `None` outside every face.
pub fn height_at(mesh: &MaskMesh, x: f64, y: f64) -> Option<f64> {
    for &face in &mesh.faces {
        if !mesh.face_is_live(face) {
            continue;
        }
        let [v1, v2, v3] = mesh.face_vertices(face);
        if point_in_triangle(x, y, v1, v2, v3) {
            return Some(interpolate_z(x, y, v1, v2, v3));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn tri() -> (GridVertex, GridVertex, GridVertex) {
        (
            GridVertex::new(0, 0, 0),
            GridVertex::new(100, 0, 0),
            GridVertex::new(0, 100, 100),
        )
    }

    #[test]
    fn test_point_inside() {
        let (a, b, c) = tri();
        assert!(point_in_triangle(10.0, 10.0, a, b, c));
        assert!(!point_in_triangle(90.0, 90.0, a, b, c));
    }

    #[test]
    fn test_point_on_edge_included() {
        let (a, b, c) = tri();
        // Midpoints of all three edges count as inside
        assert!(point_in_triangle(50.0, 0.0, a, b, c));
        assert!(point_in_triangle(0.0, 50.0, a, b, c));
        assert!(point_in_triangle(50.0, 50.0, a, b, c));
        // Corners too
        assert!(point_in_triangle(0.0, 0.0, a, b, c));
    }

    #[test]
    fn test_degenerate_projection_rejected() {
        let a = GridVertex::new(0, 0, 0);
        let b = GridVertex::new(50, 0, 10);
        let c = GridVertex::new(100, 0, 20);
        assert!(!point_in_triangle(50.0, 0.0, a, b, c));
    }

    #[test]
    fn test_interpolate_z_planar() {
        let (a, b, c) = tri();
        // Plane rises from z=0 at y=0 to z=100 at y=100
        assert!(approx_eq(interpolate_z(10.0, 0.0, a, b, c), 0.0));
        assert!(approx_eq(interpolate_z(0.0, 50.0, a, b, c), 50.0));
        assert!(approx_eq(interpolate_z(25.0, 25.0, a, b, c), 25.0));
    }

    #[test]
    fn test_interpolate_z_vertical_plane_fallback() {
        // All three vertices on the line y = 0: vertical plane
        let a = GridVertex::new(0, 0, 0);
        let b = GridVertex::new(100, 0, 30);
        let c = GridVertex::new(50, 0, 60);
        assert!(approx_eq(interpolate_z(10.0, 10.0, a, b, c), 30.0));
    }

    #[test]
    fn test_face_normal() {
        let n = face_normal(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
        .expect("non-degenerate face");
        assert!(approx_eq(n.x, 0.0));
        assert!(approx_eq(n.y, 0.0));
        assert!(approx_eq(n.z, 1.0));
    }

    #[test]
    fn test_face_normal_degenerate() {
        let n = face_normal(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
        );
        assert!(n.is_none());
    }

    #[test]
    fn test_height_at() {
        let mesh = MaskMesh {
            vertices: vec![
                GridVertex::new(0, 0, 0),
                GridVertex::new(100, 0, 0),
                GridVertex::new(0, 100, 100),
            ],
            faces: vec![[0, 1, 2]],
        };
        assert!(approx_eq(height_at(&mesh, 0.0, 50.0).unwrap(), 50.0));
        assert!(height_at(&mesh, 150.0, 150.0).is_none());
    }
}
