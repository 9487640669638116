//! Grayscale height-map rasterization of the edited half.
//!
//! Rows are rasterized in parallel; each pixel maps to a world position
//! (Y axis flipped, world top at row zero) and samples the surface height.
//! The caller must not mutate the mesh while a scan is in flight — there
//! is exactly one logical editor thread.

use rayon::prelude::*;

use crate::geometry::height_at;
use crate::types::{GridConfig, MaskMesh};

/// Height value that maps to full white.
const GRAY_FULL_SCALE: f64 = 100.0;

/// Rasterize the surface into `width x height` grayscale pixels
/// (row-major, one byte per pixel). Pixels outside every face are black.
pub fn render_height_map(
    mesh: &MaskMesh,
    width: usize,
    height: usize,
    cfg: &GridConfig,
) -> Vec<u8> {
    let mut pixels = vec![0u8; width * height];
    if width == 0 || height == 0 {
        return pixels;
    }

    let world_w = cfg.width as f64;
    let world_h = cfg.height as f64;

    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, scanline)| {
            let wy = world_h - row as f64 * world_h / height as f64;
            for (col, pixel) in scanline.iter_mut().enumerate() {
                let wx = col as f64 * world_w / width as f64;
                *pixel = match height_at(mesh, wx, wy) {
                    Some(z) => (z / GRAY_FULL_SCALE * 255.0).clamp(0.0, 255.0) as u8,
                    None => 0,
                };
            }
        });

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridVertex;

    #[test]
    fn test_flat_mesh_renders_black_surface() {
        let mesh = MaskMesh::seed();
        let cfg = GridConfig::default();
        let pixels = render_height_map(&mesh, 20, 30, &cfg);
        assert_eq!(pixels.len(), 600);
        // Every pixel is black: z = 0 inside, background outside
        assert!(pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_raised_surface_renders_gray() {
        // A flat plateau at z = 50 covering the whole world
        let cfg = GridConfig::default();
        let mesh = MaskMesh {
            vertices: vec![
                GridVertex::new(0, 0, 50),
                GridVertex::new(200, 0, 50),
                GridVertex::new(200, 300, 50),
                GridVertex::new(0, 300, 50),
            ],
            faces: vec![[0, 1, 2], [0, 2, 3]],
        };

        let pixels = render_height_map(&mesh, 10, 10, &cfg);
        // z = 50 -> 127 gray
        let lit = pixels.iter().filter(|&&p| p == 127).count();
        assert!(lit > pixels.len() / 2, "expected mostly lit pixels");
    }

    #[test]
    fn test_empty_dimensions() {
        let mesh = MaskMesh::seed();
        let cfg = GridConfig::default();
        assert!(render_height_map(&mesh, 0, 10, &cfg).is_empty());
    }
}
