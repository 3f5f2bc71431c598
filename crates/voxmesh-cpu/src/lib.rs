//! CPU meshing crate: turns a voxel grid into a culled, welded triangle mesh.
#![forbid(unsafe_code)]

mod constants;

pub mod assemble;
pub mod builder;
pub mod cell;
pub mod color;
pub mod config;
pub mod error;
pub mod face;
pub mod mesh_build;
pub mod neighbors;
pub mod texture;

pub use assemble::{AssembleOptions, assemble, grid_offset, world_position};
pub use builder::{Material, MeshBuilder, RenderMesh};
pub use cell::{PartialCellMesh, mesh_cell};
pub use color::{CellShade, ColorMode, ColorResolver};
pub use config::MeshConfig;
pub use error::MeshError;
pub use face::Face;
pub use mesh_build::{FaceShading, MeshOutput, RenderBuffers};
pub use neighbors::{AdjacencyIndex, CellKey, NeighborMask};
pub use texture::{CachedTextureFactory, PaletteStripFactory, PaletteTexture, TextureFactory};

use voxmesh_grid::VoxelGrid;

/// One-shot build with the default palette strip factory.
pub fn build_mesh(grid: &VoxelGrid, config: &MeshConfig) -> Result<MeshOutput, MeshError> {
    let width = PaletteStripFactory.texture_width(&grid.palette);
    let opts = config.options(width)?;
    let adjacency = AdjacencyIndex::build(&grid.voxels);
    assemble(grid, &adjacency, &opts)
}
