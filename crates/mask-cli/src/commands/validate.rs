//! `mask validate` - audit a project against the mesh invariants.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use mask_mesh::MaskMesh;

pub fn run(input: &Path) -> Result<()> {
    let mesh = MaskMesh::load(input)?;
    let report = mesh.validate();

    print!("{}", report);

    if report.is_sound() {
        println!("{}", "OK".green().bold());
    } else {
        println!("{}", "INVALID".red().bold());
        anyhow::bail!("mesh violates structural invariants");
    }

    Ok(())
}
