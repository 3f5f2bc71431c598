//! Geometry for a single cell: face culling against neighbors plus corner compaction.

use voxmesh_geom::Vec3;
use voxmesh_grid::Voxel;

use crate::color::CellShade;
use crate::constants::{CORNER_COUNT, MAX_TRIS_PER_CELL};
use crate::face::{Face, corner_position};
use crate::mesh_build::FaceShading;
use crate::neighbors::{AdjacencyIndex, NeighborMask};

const UNUSED: u32 = u32::MAX;

/// Visible part of one cell, centered on the cell and scaled by voxel size.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialCellMesh {
    /// Only the corners referenced by `triangles`, in ascending corner order.
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub shading: FaceShading,
}

impl PartialCellMesh {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Builds the visible faces of `voxel`. Returns `None` when every face is hidden.
///
/// With `cull_faces`, a face is skipped when the neighbor across it is occupied.
pub fn mesh_cell(
    voxel: &Voxel,
    adjacency: &AdjacencyIndex,
    cull_faces: bool,
    voxel_size: f32,
    shade: CellShade,
) -> Option<PartialCellMesh> {
    let hidden = if cull_faces {
        adjacency.occupied_neighbors(voxel.x, voxel.y, voxel.z)
    } else {
        NeighborMask::NONE
    };
    mesh_cell_masked(hidden, voxel_size, shade)
}

/// Same as [`mesh_cell`] with the hidden faces already known.
pub fn mesh_cell_masked(
    hidden: NeighborMask,
    voxel_size: f32,
    shade: CellShade,
) -> Option<PartialCellMesh> {
    if hidden.is_enclosed() {
        return None;
    }

    let mut corner_tris: Vec<[usize; 3]> = Vec::with_capacity(MAX_TRIS_PER_CELL);
    for face in Face::ALL {
        if !hidden.contains(face) {
            corner_tris.extend(face.triangles());
        }
    }

    let map = compaction_map(&corner_tris);
    let positions = (0..CORNER_COUNT)
        .filter(|&c| map[c] != UNUSED)
        .map(|c| corner_position(c, voxel_size))
        .collect();
    let triangles = corner_tris
        .iter()
        .map(|t| t.map(|c| map[c]))
        .collect();

    let mut shading = match shade {
        CellShade::Color(_) => FaceShading::Colors(Vec::with_capacity(corner_tris.len())),
        CellShade::Uv(_) => FaceShading::Uvs(Vec::with_capacity(corner_tris.len())),
    };
    shading.push_n(shade, corner_tris.len());

    Some(PartialCellMesh {
        positions,
        triangles,
        shading,
    })
}

/// Old corner index -> compacted index, numbered in ascending corner order.
/// Corners no triangle references map to `UNUSED`.
fn compaction_map(tris: &[[usize; 3]]) -> [u32; CORNER_COUNT] {
    let mut used = [false; CORNER_COUNT];
    for t in tris {
        for &c in t {
            used[c] = true;
        }
    }
    let mut map = [UNUSED; CORNER_COUNT];
    let mut next = 0u32;
    for (c, slot) in map.iter_mut().enumerate() {
        if used[c] {
            *slot = next;
            next += 1;
        }
    }
    map
}
