use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use voxmesh_cpu::MeshConfig;

/// Mesh a voxel grid into a culled, welded triangle mesh.
#[derive(Parser, Debug)]
#[command(name = "voxmesh")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Voxel grid to triangle mesh", long_about = None)]
pub struct Cli {
    /// Grid description (TOML: size, palette, voxels)
    pub grid: PathBuf,

    /// Mesh settings file; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "F")]
    pub voxel_size: Option<f32>,

    /// Flat per-face colors instead of palette-strip UVs
    #[arg(long)]
    pub vertex_color: bool,

    /// Keep hidden faces and duplicate vertices
    #[arg(long)]
    pub no_optimize: bool,

    /// Center the model vertically instead of resting it on y = 0
    #[arg(long)]
    pub centered: bool,

    /// Fail on voxels outside the declared grid size
    #[arg(long)]
    pub strict_bounds: bool,

    /// Write Wavefront OBJ (plus MTL) here
    #[arg(long, value_name = "OUT.obj")]
    pub obj: Option<PathBuf>,
}

impl Cli {
    /// Config file (or defaults) with command-line flags applied on top.
    pub fn mesh_config(&self) -> Result<MeshConfig, Box<dyn Error>> {
        let mut cfg = match &self.config {
            Some(path) => MeshConfig::from_path(path)?,
            None => MeshConfig::default(),
        };
        if let Some(s) = self.voxel_size {
            cfg.voxel_size = s;
        }
        if self.vertex_color {
            cfg.vertex_color = true;
        }
        if self.no_optimize {
            cfg.optimize_faces = false;
            cfg.cull_faces = None;
            cfg.weld_vertices = None;
        }
        if self.centered {
            cfg.origin_to_bottom = false;
        }
        if self.strict_bounds {
            cfg.strict_bounds = true;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
