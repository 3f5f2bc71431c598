use voxmesh_grid::{Color, Voxel};

use crate::constants::{PALETTE_STRIP_V, TEXEL_CENTER};
use crate::error::MeshError;

/// How faces pick up their palette color. Exactly one mode per build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// Flat normalized RGB per face.
    VertexColor,
    /// UV into a 1-row palette strip `width` texels wide.
    Texture { width: usize },
}

/// Shade shared by every triangle of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellShade {
    Color([f32; 3]),
    Uv([f32; 2]),
}

/// UV of the texel center for `index` in a strip of `width` texels.
#[inline]
pub fn palette_uv(index: u32, width: usize) -> [f32; 2] {
    [
        (index as f32 + TEXEL_CENTER) / width.max(1) as f32,
        PALETTE_STRIP_V,
    ]
}

/// Resolves a voxel's palette index into its shade for the active mode.
#[derive(Clone, Copy, Debug)]
pub struct ColorResolver<'a> {
    palette: &'a [Color],
    mode: ColorMode,
}

impl<'a> ColorResolver<'a> {
    pub fn new(palette: &'a [Color], mode: ColorMode) -> Self {
        Self { palette, mode }
    }

    /// Fails on a palette index with no entry, in either mode.
    pub fn resolve(&self, voxel: &Voxel) -> Result<CellShade, MeshError> {
        let color = self
            .palette
            .get(voxel.color_index as usize)
            .ok_or(MeshError::PaletteIndex {
                x: voxel.x,
                y: voxel.y,
                z: voxel.z,
                index: voxel.color_index,
                palette_len: self.palette.len(),
            })?;
        Ok(match self.mode {
            ColorMode::VertexColor => CellShade::Color(color.normalized_rgb()),
            ColorMode::Texture { width } => CellShade::Uv(palette_uv(voxel.color_index, width)),
        })
    }
}
