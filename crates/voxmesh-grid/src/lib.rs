//! Voxel grid input model: extent, colored cells, and the indexed palette.
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Declared grid extent. Each axis is expected to be at least 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridSize {
    #[inline]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.x > 0 && self.y > 0 && self.z > 0
    }

    #[inline]
    pub fn volume(self) -> u64 {
        u64::from(self.x) * u64::from(self.y) * u64::from(self.z)
    }

    /// True if `(x, y, z)` lies in `[0, size)` on every axis.
    #[inline]
    pub fn contains(self, x: i32, y: i32, z: i32) -> bool {
        let inside = |v: i32, n: u32| v >= 0 && (v as u32) < n;
        inside(x, self.x) && inside(y, self.y) && inside(z, self.z)
    }
}

/// Palette entry, 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// RGB channels scaled into `[0, 1]`. Alpha is not part of the flat shade.
    #[inline]
    pub fn normalized_rgb(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// One occupied cell. Coordinates are signed so neighbor lookups at `-1`
/// need no special casing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub color_index: u32,
}

impl Voxel {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32, color_index: u32) -> Self {
        Self {
            x,
            y,
            z,
            color_index,
        }
    }
}

/// Sparse voxel model as produced by a file parser. Grid `z` is up.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VoxelGrid {
    pub size: GridSize,
    #[serde(default)]
    pub voxels: Vec<Voxel>,
    #[serde(default)]
    pub palette: Vec<Color>,
}

impl VoxelGrid {
    pub fn new(size: GridSize, voxels: Vec<Voxel>, palette: Vec<Color>) -> Self {
        Self {
            size,
            voxels,
            palette,
        }
    }

    /// Builds a grid by sampling `f` over every cell of `size` in x-fastest,
    /// then y, then z order. Cells where `f` returns `None` stay empty.
    pub fn from_fn(
        size: GridSize,
        palette: Vec<Color>,
        mut f: impl FnMut(i32, i32, i32) -> Option<u32>,
    ) -> Self {
        let mut voxels = Vec::new();
        for z in 0..size.z as i32 {
            for y in 0..size.y as i32 {
                for x in 0..size.x as i32 {
                    if let Some(ci) = f(x, y, z) {
                        voxels.push(Voxel::new(x, y, z, ci));
                    }
                }
            }
        }
        Self::new(size, voxels, palette)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Palette color for `voxel`, or `None` if its index has no entry.
    #[inline]
    pub fn color_of(&self, voxel: &Voxel) -> Option<Color> {
        self.palette.get(voxel.color_index as usize).copied()
    }

    #[inline]
    pub fn in_bounds(&self, voxel: &Voxel) -> bool {
        self.size.contains(voxel.x, voxel.y, voxel.z)
    }

    /// Parses a grid from TOML and checks the declared extent.
    ///
    /// ```toml
    /// size = { x = 2, y = 1, z = 1 }
    /// palette = [{ r = 255, g = 0, b = 0 }]
    /// voxels = [
    ///     { x = 0, y = 0, z = 0, color_index = 0 },
    ///     { x = 1, y = 0, z = 0, color_index = 0 },
    /// ]
    /// ```
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let grid: VoxelGrid = toml::from_str(toml_str)?;
        if !grid.size.is_valid() {
            return Err(format!(
                "grid size must be positive on every axis, got {}x{}x{}",
                grid.size.x, grid.size.y, grid.size.z
            )
            .into());
        }
        Ok(grid)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn to_toml_string(&self) -> Result<String, Box<dyn Error>> {
        Ok(toml::to_string(self)?)
    }
}
