//! Errors raised while building a mesh.

use thiserror::Error;

/// A failed build. No partial mesh accompanies any of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A voxel names a palette entry that does not exist.
    #[error(
        "voxel at ({x}, {y}, {z}) uses palette index {index}, but the palette has {palette_len} entries"
    )]
    PaletteIndex {
        x: i32,
        y: i32,
        z: i32,
        index: u32,
        palette_len: usize,
    },

    /// A voxel lies outside the declared grid size (strict bounds only).
    #[error("voxel at ({x}, {y}, {z}) lies outside the grid size {size_x}x{size_y}x{size_z}")]
    VoxelOutOfBounds {
        x: i32,
        y: i32,
        z: i32,
        size_x: u32,
        size_y: u32,
        size_z: u32,
    },

    /// Voxel size is zero, negative, or not finite.
    #[error("voxel size must be a positive finite number, got {0}")]
    InvalidVoxelSize(f32),
}
