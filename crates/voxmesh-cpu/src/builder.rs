use voxmesh_grid::{Voxel, VoxelGrid};

use crate::assemble::assemble;
use crate::config::MeshConfig;
use crate::error::MeshError;
use crate::mesh_build::MeshOutput;
use crate::neighbors::AdjacencyIndex;
use crate::texture::{PaletteStripFactory, TextureFactory};

/// Surface description handed to a renderer alongside the mesh.
#[derive(Clone, Debug, PartialEq)]
pub enum Material<T> {
    /// Shade from the mesh's per-face colors.
    VertexColors,
    /// Sample `T` with the mesh's UVs.
    Textured(T),
}

/// Mesh plus material, ready for a rendering surface.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderMesh<T> {
    pub mesh: MeshOutput,
    pub material: Material<T>,
}

/// Owns the configuration and texture factory for one grid and keeps the last
/// successful mesh.
///
/// Construction runs a build, so a `MeshBuilder` always holds a mesh that
/// matches its current config.
pub struct MeshBuilder<'g, F: TextureFactory = PaletteStripFactory> {
    grid: &'g VoxelGrid,
    config: MeshConfig,
    factory: F,
    adjacency: AdjacencyIndex,
    mesh: MeshOutput,
}

impl<'g> MeshBuilder<'g, PaletteStripFactory> {
    pub fn new(grid: &'g VoxelGrid, config: MeshConfig) -> Result<Self, MeshError> {
        Self::with_texture_factory(grid, config, PaletteStripFactory)
    }
}

impl<'g, F: TextureFactory> MeshBuilder<'g, F> {
    pub fn with_texture_factory(
        grid: &'g VoxelGrid,
        config: MeshConfig,
        factory: F,
    ) -> Result<Self, MeshError> {
        let mode = config.color_mode(factory.texture_width(&grid.palette));
        let mut builder = Self {
            grid,
            config,
            factory,
            adjacency: AdjacencyIndex::default(),
            mesh: MeshOutput::empty(mode),
        };
        builder.build()?;
        Ok(builder)
    }

    /// Rebuilds adjacency and mesh from scratch.
    ///
    /// On error the held mesh is reset to empty rather than left stale.
    pub fn build(&mut self) -> Result<&MeshOutput, MeshError> {
        self.adjacency = AdjacencyIndex::build(&self.grid.voxels);
        let width = self.factory.texture_width(&self.grid.palette);
        let result = self
            .config
            .options(width)
            .and_then(|opts| assemble(self.grid, &self.adjacency, &opts));
        match result {
            Ok(mesh) => {
                self.mesh = mesh;
                Ok(&self.mesh)
            }
            Err(e) => {
                self.mesh = MeshOutput::empty(self.config.color_mode(width));
                log::warn!("mesh build failed: {}", e);
                Err(e)
            }
        }
    }

    /// Replaces the config and rebuilds.
    pub fn set_config(&mut self, config: MeshConfig) -> Result<&MeshOutput, MeshError> {
        self.config = config;
        self.build()
    }

    #[inline]
    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    #[inline]
    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    #[inline]
    pub fn mesh(&self) -> &MeshOutput {
        &self.mesh
    }

    pub fn into_mesh(self) -> MeshOutput {
        self.mesh
    }

    /// Palette texture from the injected factory, regardless of color mode.
    pub fn texture(&self) -> F::Texture {
        self.factory.texture(&self.grid.palette)
    }

    pub fn material(&self) -> Material<F::Texture> {
        if self.config.vertex_color {
            Material::VertexColors
        } else {
            Material::Textured(self.texture())
        }
    }

    /// Packages the current mesh with its material.
    pub fn create_mesh(&self) -> RenderMesh<F::Texture> {
        RenderMesh {
            mesh: self.mesh.clone(),
            material: self.material(),
        }
    }

    /// True unless all six axis neighbors of `voxel` are occupied.
    /// Independent of face culling settings.
    #[inline]
    pub fn is_outer_voxel(&self, voxel: &Voxel) -> bool {
        self.adjacency.is_outer(voxel)
    }
}
