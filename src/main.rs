mod cli;
mod obj;

use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::time::Instant;

use clap::Parser;
use voxmesh_cpu::MeshBuilder;
use voxmesh_grid::VoxelGrid;

use cli::Cli;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let cfg = cli.mesh_config()?;
    let grid = VoxelGrid::from_path(&cli.grid)?;
    log::info!(
        "loaded {} voxels={} palette={} size={}x{}x{}",
        cli.grid.display(),
        grid.len(),
        grid.palette.len(),
        grid.size.x,
        grid.size.y,
        grid.size.z
    );

    let t0 = Instant::now();
    let builder = MeshBuilder::new(&grid, cfg)?;
    let mesh = builder.mesh();
    let outer = grid
        .voxels
        .iter()
        .filter(|v| builder.is_outer_voxel(v))
        .count();
    let bb = mesh.bounds();
    log::info!(
        "mesh verts={} faces={} outer_voxels={} bounds=({:.3},{:.3},{:.3})..({:.3},{:.3},{:.3}) ms={}",
        mesh.vertex_count(),
        mesh.face_count(),
        outer,
        bb.min.x,
        bb.min.y,
        bb.min.z,
        bb.max.x,
        bb.max.y,
        bb.max.z,
        t0.elapsed().as_millis()
    );

    if let Some(obj_path) = &cli.obj {
        let mtl_path = obj_path.with_extension("mtl");
        let ppm_path = obj_path.with_extension("ppm");
        let file_name = |p: &std::path::Path| {
            p.file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        fs::write(obj_path, obj::obj_string(mesh, &file_name(mtl_path.as_path())))?;
        fs::write(&mtl_path, obj::mtl_string(mesh, &file_name(ppm_path.as_path())))?;
        if !builder.config().vertex_color {
            let mut w = BufWriter::new(File::create(&ppm_path)?);
            obj::write_ppm(&builder.texture(), &mut w)?;
            w.flush()?;
        }
        log::info!("wrote {}", obj_path.display());
    }
    Ok(())
}
