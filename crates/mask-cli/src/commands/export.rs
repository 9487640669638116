//! `mask export` - write a project out as binary STL.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use mask_mesh::{MaskMesh, ShellParams};

use crate::ExportMode;

pub fn run(input: &Path, output: &Path, mode: ExportMode, thickness: Option<f64>) -> Result<()> {
    let mesh = MaskMesh::load(input)?;

    match mode {
        ExportMode::Surface => {
            mesh.export_surface_stl(output)?;
            println!(
                "{} surface STL written to {}",
                "ok:".green().bold(),
                output.display()
            );
        }
        ExportMode::Volume => {
            let mut params = ShellParams::default();
            if let Some(thickness) = thickness {
                params.thickness = thickness;
            }
            mesh.export_volume_stl(output, &params)?;
            println!(
                "{} volume STL written to {} (thickness {})",
                "ok:".green().bold(),
                output.display(),
                params.thickness
            );
        }
    }

    Ok(())
}
