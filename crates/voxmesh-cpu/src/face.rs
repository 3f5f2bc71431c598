use voxmesh_geom::Vec3;

use crate::constants::{CORNER_COUNT, FACE_COUNT, HALF_EXTENT, TRIS_PER_FACE};

/// Unit cube corners in mesh space (y up) as `+-1` offsets from the cell center.
pub const CORNERS: [(i8, i8, i8); CORNER_COUNT] = [
    (-1, 1, -1),
    (1, 1, -1),
    (-1, 1, 1),
    (1, 1, 1),
    (-1, -1, -1),
    (1, -1, -1),
    (-1, -1, 1),
    (1, -1, 1),
];

// Corner triples per face, wound so that (c - b) x (a - b) points outward.
const FACE_TRIANGLES: [[[usize; 3]; TRIS_PER_FACE]; FACE_COUNT] = [
    [[6, 2, 0], [6, 0, 4]], // NegX
    [[5, 1, 3], [5, 3, 7]], // PosX
    [[5, 7, 6], [5, 6, 4]], // NegY
    [[2, 3, 1], [2, 1, 0]], // PosY
    [[4, 0, 1], [4, 1, 5]], // NegZ
    [[7, 3, 2], [7, 2, 6]], // PosZ
];

/// Cube face, named by its outward direction in mesh space.
///
/// Mesh space is y-up with grid `y` mapped onto `-z`, so the face that looks
/// down grid `+y` is `NegZ`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    NegX = 0,
    PosX = 1,
    NegY = 2,
    PosY = 3,
    NegZ = 4,
    PosZ = 5,
}

impl Face {
    /// All faces in emission order.
    pub const ALL: [Face; FACE_COUNT] = [
        Face::NegX,
        Face::PosX,
        Face::NegY,
        Face::PosY,
        Face::NegZ,
        Face::PosZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `Face`.
    #[inline]
    pub fn from_index(i: usize) -> Option<Face> {
        Face::ALL.get(i).copied()
    }

    /// The two triangles of this face as corner indices into [`CORNERS`].
    #[inline]
    pub fn triangles(self) -> [[usize; 3]; TRIS_PER_FACE] {
        FACE_TRIANGLES[self.index()]
    }

    /// Outward unit normal in mesh space.
    #[inline]
    pub fn normal(self) -> Vec3 {
        match self {
            Face::NegX => Vec3::new(-1.0, 0.0, 0.0),
            Face::PosX => Vec3::new(1.0, 0.0, 0.0),
            Face::NegY => Vec3::new(0.0, -1.0, 0.0),
            Face::PosY => Vec3::new(0.0, 1.0, 0.0),
            Face::NegZ => Vec3::new(0.0, 0.0, -1.0),
            Face::PosZ => Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Grid-space offset `(dx, dy, dz)` of the neighbor that hides this face.
    #[inline]
    pub fn grid_delta(self) -> (i32, i32, i32) {
        match self {
            Face::NegX => (-1, 0, 0),
            Face::PosX => (1, 0, 0),
            Face::NegY => (0, 0, -1),
            Face::PosY => (0, 0, 1),
            Face::NegZ => (0, 1, 0),
            Face::PosZ => (0, -1, 0),
        }
    }
}

/// Position of cube corner `i` relative to the cell center.
#[inline]
pub fn corner_position(i: usize, voxel_size: f32) -> Vec3 {
    let (x, y, z) = CORNERS[i];
    let s = voxel_size * HALF_EXTENT;
    Vec3::new(f32::from(x) * s, f32::from(y) * s, f32::from(z) * s)
}
