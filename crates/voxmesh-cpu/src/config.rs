use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assemble::AssembleOptions;
use crate::color::ColorMode;
use crate::constants::DEFAULT_VOXEL_SIZE;
use crate::error::MeshError;

/// Build settings. Every field is optional in a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshConfig {
    /// Edge length of one voxel in output units.
    #[serde(default = "default_voxel_size")]
    pub voxel_size: f32,
    /// Flat per-face colors instead of palette-strip UVs.
    #[serde(default)]
    pub vertex_color: bool,
    /// Cull hidden faces and weld coincident vertices.
    #[serde(default = "default_true")]
    pub optimize_faces: bool,
    /// Put the bottom voxel layer at height 0 instead of centering vertically.
    #[serde(default = "default_true")]
    pub origin_to_bottom: bool,
    /// Overrides the culling half of `optimize_faces`.
    #[serde(default)]
    pub cull_faces: Option<bool>,
    /// Overrides the welding half of `optimize_faces`.
    #[serde(default)]
    pub weld_vertices: Option<bool>,
    /// Reject voxels outside the declared grid size.
    #[serde(default)]
    pub strict_bounds: bool,
}

fn default_voxel_size() -> f32 {
    DEFAULT_VOXEL_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            voxel_size: default_voxel_size(),
            vertex_color: false,
            optimize_faces: true,
            origin_to_bottom: true,
            cull_faces: None,
            weld_vertices: None,
            strict_bounds: false,
        }
    }
}

impl MeshConfig {
    #[inline]
    pub fn culls_faces(&self) -> bool {
        self.cull_faces.unwrap_or(self.optimize_faces)
    }

    #[inline]
    pub fn welds_vertices(&self) -> bool {
        self.weld_vertices.unwrap_or(self.optimize_faces)
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(MeshError::InvalidVoxelSize(self.voxel_size));
        }
        Ok(())
    }

    /// Color mode for a palette strip `texture_width` texels wide.
    #[inline]
    pub fn color_mode(&self, texture_width: usize) -> ColorMode {
        if self.vertex_color {
            ColorMode::VertexColor
        } else {
            ColorMode::Texture {
                width: texture_width,
            }
        }
    }

    /// Resolves the config into assembler options.
    pub fn options(&self, texture_width: usize) -> Result<AssembleOptions, MeshError> {
        self.validate()?;
        Ok(AssembleOptions {
            voxel_size: self.voxel_size,
            color_mode: self.color_mode(texture_width),
            cull_faces: self.culls_faces(),
            weld_vertices: self.welds_vertices(),
            origin_to_bottom: self.origin_to_bottom,
            strict_bounds: self.strict_bounds,
        })
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: MeshConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
