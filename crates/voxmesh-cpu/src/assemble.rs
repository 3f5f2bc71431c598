//! Whole-grid assembly: validate, mesh every cell, merge, weld, and compute normals.

use std::time::Instant;

use voxmesh_geom::Vec3;
use voxmesh_grid::{GridSize, Voxel, VoxelGrid};

use crate::cell::{PartialCellMesh, mesh_cell};
use crate::color::{CellShade, ColorMode, ColorResolver};
use crate::constants::HALF_EXTENT;
#[cfg(feature = "parallel")]
use crate::constants::PARALLEL_MIN_VOXELS;
use crate::error::MeshError;
use crate::mesh_build::MeshOutput;
use crate::neighbors::AdjacencyIndex;

/// Resolved build settings; see [`crate::MeshConfig::options`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssembleOptions {
    pub voxel_size: f32,
    pub color_mode: ColorMode,
    pub cull_faces: bool,
    pub weld_vertices: bool,
    pub origin_to_bottom: bool,
    pub strict_bounds: bool,
}

/// Grid-space offsets that center the model on x/y, and on z unless `origin_to_bottom`.
#[inline]
pub fn grid_offset(size: GridSize, origin_to_bottom: bool) -> (f32, f32, f32) {
    let center = |n: u32| (n as f32 - 1.0) * -0.5;
    let oz = if origin_to_bottom { 0.0 } else { center(size.z) };
    (center(size.x), center(size.y), oz)
}

/// Mesh-space center of `voxel`. Grid `z` becomes up (`y`); grid `y` becomes `-z`.
#[inline]
pub fn world_position(voxel: &Voxel, offset: (f32, f32, f32), voxel_size: f32) -> Vec3 {
    let (ox, oy, oz) = offset;
    Vec3::new(
        (voxel.x as f32 + ox) * voxel_size,
        (voxel.z as f32 + oz) * voxel_size,
        -(voxel.y as f32 + oy) * voxel_size,
    )
}

/// Checks every voxel up front and returns its shade, in voxel order.
fn resolve_shades(grid: &VoxelGrid, opts: &AssembleOptions) -> Result<Vec<CellShade>, MeshError> {
    let resolver = ColorResolver::new(&grid.palette, opts.color_mode);
    grid.voxels
        .iter()
        .map(|v| {
            if opts.strict_bounds && !grid.in_bounds(v) {
                return Err(MeshError::VoxelOutOfBounds {
                    x: v.x,
                    y: v.y,
                    z: v.z,
                    size_x: grid.size.x,
                    size_y: grid.size.y,
                    size_z: grid.size.z,
                });
            }
            resolver.resolve(v)
        })
        .collect()
}

fn mesh_cells_serial(
    voxels: &[Voxel],
    shades: &[CellShade],
    adjacency: &AdjacencyIndex,
    opts: &AssembleOptions,
) -> Vec<Option<PartialCellMesh>> {
    voxels
        .iter()
        .zip(shades)
        .map(|(v, &shade)| mesh_cell(v, adjacency, opts.cull_faces, opts.voxel_size, shade))
        .collect()
}

#[cfg(feature = "parallel")]
fn mesh_cells_parallel(
    voxels: &[Voxel],
    shades: &[CellShade],
    adjacency: &AdjacencyIndex,
    opts: &AssembleOptions,
) -> Vec<Option<PartialCellMesh>> {
    use rayon::prelude::*;
    // Indexed collect keeps voxel order.
    voxels
        .par_iter()
        .zip(shades.par_iter())
        .map(|(v, &shade)| mesh_cell(v, adjacency, opts.cull_faces, opts.voxel_size, shade))
        .collect()
}

#[cfg(feature = "parallel")]
fn mesh_cells(
    voxels: &[Voxel],
    shades: &[CellShade],
    adjacency: &AdjacencyIndex,
    opts: &AssembleOptions,
) -> Vec<Option<PartialCellMesh>> {
    if voxels.len() >= PARALLEL_MIN_VOXELS {
        mesh_cells_parallel(voxels, shades, adjacency, opts)
    } else {
        mesh_cells_serial(voxels, shades, adjacency, opts)
    }
}

#[cfg(not(feature = "parallel"))]
fn mesh_cells(
    voxels: &[Voxel],
    shades: &[CellShade],
    adjacency: &AdjacencyIndex,
    opts: &AssembleOptions,
) -> Vec<Option<PartialCellMesh>> {
    mesh_cells_serial(voxels, shades, adjacency, opts)
}

/// Builds the merged mesh for `grid`. An empty grid gives an empty mesh.
///
/// Nothing is produced unless every voxel passes validation.
pub fn assemble(
    grid: &VoxelGrid,
    adjacency: &AdjacencyIndex,
    opts: &AssembleOptions,
) -> Result<MeshOutput, MeshError> {
    let t0 = Instant::now();
    let shades = resolve_shades(grid, opts)?;

    let mut out = MeshOutput::empty(opts.color_mode);
    if grid.voxels.is_empty() {
        return Ok(out);
    }

    let offset = grid_offset(grid.size, opts.origin_to_bottom);
    let cells = mesh_cells(&grid.voxels, &shades, adjacency, opts);
    let mut enclosed = 0usize;
    for (voxel, cell) in grid.voxels.iter().zip(&cells) {
        match cell {
            Some(cell) => out.append_cell(cell, world_position(voxel, offset, opts.voxel_size)),
            None => enclosed += 1,
        }
    }

    let welded = if opts.weld_vertices {
        out.weld_vertices(opts.voxel_size * HALF_EXTENT)
    } else {
        0
    };
    out.compute_face_normals();

    let ms: u32 = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    log::debug!(
        "assembled voxels={} enclosed={} verts={} faces={} welded={}",
        grid.voxels.len(),
        enclosed,
        out.vertex_count(),
        out.face_count(),
        welded
    );
    log::info!(target: "perf", "ms={} voxmesh_assemble voxels={} faces={}", ms, grid.voxels.len(), out.face_count());
    Ok(out)
}
