//! Shared constants for voxmesh-cpu. Centralizes common magic numbers.

// Unit cube topology
pub(crate) const CORNER_COUNT: usize = 8;
pub(crate) const FACE_COUNT: usize = 6;
pub(crate) const TRIS_PER_FACE: usize = 2;
pub(crate) const MAX_TRIS_PER_CELL: usize = FACE_COUNT * TRIS_PER_FACE;
pub(crate) const HALF_EXTENT: f32 = 0.5; // corner offsets are +-1, scaled by this and voxel size

// Palette strip texture: one texel per entry, sampled at texel centers
pub(crate) const TEXEL_CENTER: f32 = 0.5;
pub(crate) const PALETTE_STRIP_V: f32 = 0.5;
pub(crate) const PALETTE_STRIP_HEIGHT: usize = 1;

// Grids smaller than this mesh serially even with the `parallel` feature
#[cfg(feature = "parallel")]
pub(crate) const PARALLEL_MIN_VOXELS: usize = 4096;

// Config defaults
pub(crate) const DEFAULT_VOXEL_SIZE: f32 = 1.0;
