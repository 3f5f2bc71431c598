use hashbrown::HashSet;
use voxmesh_grid::Voxel;

use crate::constants::FACE_COUNT;
use crate::face::Face;

/// Grid coordinate used as an occupancy key. No packing, so any `i32` extent works.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellKey {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Neighbor one step across `face`, or `None` if that leaves the `i32` range.
    #[inline]
    pub fn neighbor(self, face: Face) -> Option<CellKey> {
        let (dx, dy, dz) = face.grid_delta();
        Some(CellKey {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }
}

impl From<&Voxel> for CellKey {
    fn from(v: &Voxel) -> Self {
        CellKey::new(v.x, v.y, v.z)
    }
}

/// Bit `face.index()` is set when the neighbor hiding that face is occupied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborMask(u8);

impl NeighborMask {
    pub const NONE: NeighborMask = NeighborMask(0);
    pub const ALL: NeighborMask = NeighborMask((1 << FACE_COUNT) - 1);

    #[inline]
    pub fn insert(&mut self, face: Face) {
        self.0 |= 1 << face.index();
    }

    #[inline]
    pub fn contains(self, face: Face) -> bool {
        (self.0 >> face.index()) & 1 == 1
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// All six neighbors present.
    #[inline]
    pub fn is_enclosed(self) -> bool {
        self == NeighborMask::ALL
    }
}

/// Read-only set of occupied cells, built once per grid.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
    cells: HashSet<CellKey>,
}

impl AdjacencyIndex {
    pub fn build(voxels: &[Voxel]) -> Self {
        let mut cells = HashSet::with_capacity(voxels.len());
        cells.extend(voxels.iter().map(CellKey::from));
        Self { cells }
    }

    #[inline]
    pub fn has(&self, x: i32, y: i32, z: i32) -> bool {
        self.cells.contains(&CellKey::new(x, y, z))
    }

    /// Which of the six axis neighbors of `(x, y, z)` are occupied.
    pub fn occupied_neighbors(&self, x: i32, y: i32, z: i32) -> NeighborMask {
        let here = CellKey::new(x, y, z);
        let mut mask = NeighborMask::NONE;
        for face in Face::ALL {
            if here.neighbor(face).is_some_and(|k| self.cells.contains(&k)) {
                mask.insert(face);
            }
        }
        mask
    }

    /// True unless all six axis neighbors of `voxel` are occupied.
    #[inline]
    pub fn is_outer(&self, voxel: &Voxel) -> bool {
        !self.occupied_neighbors(voxel.x, voxel.y, voxel.z).is_enclosed()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_shape(cx: i32, cy: i32, cz: i32) -> Vec<Voxel> {
        let mut v = vec![Voxel::new(cx, cy, cz, 0)];
        for face in Face::ALL {
            let (dx, dy, dz) = face.grid_delta();
            v.push(Voxel::new(cx + dx, cy + dy, cz + dz, 0));
        }
        v
    }

    #[test]
    fn center_of_plus_is_enclosed() {
        let voxels = plus_shape(3, 3, 3);
        let adj = AdjacencyIndex::build(&voxels);
        assert_eq!(adj.len(), 7);
        assert!(adj.occupied_neighbors(3, 3, 3).is_enclosed());
        assert!(!adj.is_outer(&voxels[0]));
        for arm in &voxels[1..] {
            assert!(adj.is_outer(arm));
            assert_eq!(adj.occupied_neighbors(arm.x, arm.y, arm.z).count(), 1);
        }
    }

    #[test]
    fn coordinates_beyond_sixteen_bits_do_not_collide() {
        let voxels = [Voxel::new(70_000, -5, 1 << 20, 0), Voxel::new(4464, -5, 0, 0)];
        let adj = AdjacencyIndex::build(&voxels);
        assert!(adj.has(70_000, -5, 1 << 20));
        assert!(adj.has(4464, -5, 0));
        assert!(!adj.has(70_000, -5, 0));
        assert!(!adj.has(4464, -5, 1 << 20));
    }

    #[test]
    fn neighbor_lookup_at_i32_limits_is_empty() {
        let v = Voxel::new(i32::MAX, i32::MIN, 0, 0);
        let adj = AdjacencyIndex::build(&[v]);
        assert_eq!(adj.occupied_neighbors(v.x, v.y, v.z), NeighborMask::NONE);
    }

    #[test]
    fn mask_tracks_individual_faces() {
        let adj = AdjacencyIndex::build(&[Voxel::new(0, 0, 1, 0), Voxel::new(0, 1, 0, 0)]);
        let mask = adj.occupied_neighbors(0, 0, 0);
        assert!(mask.contains(Face::PosY));
        assert!(mask.contains(Face::NegZ));
        assert_eq!(mask.count(), 2);
    }
}
