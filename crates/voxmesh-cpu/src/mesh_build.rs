use hashbrown::HashMap;
use voxmesh_geom::{Aabb, Vec3};

use crate::cell::PartialCellMesh;
use crate::color::{CellShade, ColorMode};

/// Per-face shading. The variant is fixed by the build's [`ColorMode`].
#[derive(Clone, Debug, PartialEq)]
pub enum FaceShading {
    /// One normalized RGB color per face.
    Colors(Vec<[f32; 3]>),
    /// One UV per face corner.
    Uvs(Vec<[[f32; 2]; 3]>),
}

impl FaceShading {
    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::VertexColor => FaceShading::Colors(Vec::new()),
            ColorMode::Texture { .. } => FaceShading::Uvs(Vec::new()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            FaceShading::Colors(c) => c.len(),
            FaceShading::Uvs(u) => u.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn colors(&self) -> Option<&[[f32; 3]]> {
        match self {
            FaceShading::Colors(c) => Some(c),
            FaceShading::Uvs(_) => None,
        }
    }

    pub fn uvs(&self) -> Option<&[[[f32; 2]; 3]]> {
        match self {
            FaceShading::Uvs(u) => Some(u),
            FaceShading::Colors(_) => None,
        }
    }

    /// Appends `n` faces sharing `shade`. A shade of the other variant is ignored.
    pub(crate) fn push_n(&mut self, shade: CellShade, n: usize) {
        match (self, shade) {
            (FaceShading::Colors(c), CellShade::Color(rgb)) => {
                c.extend(std::iter::repeat_n(rgb, n));
            }
            (FaceShading::Uvs(u), CellShade::Uv(uv)) => {
                u.extend(std::iter::repeat_n([uv, uv, uv], n));
            }
            _ => debug_assert!(false, "shade does not match build color mode"),
        }
    }

    fn extend_from(&mut self, other: &FaceShading) {
        match (self, other) {
            (FaceShading::Colors(a), FaceShading::Colors(b)) => a.extend_from_slice(b),
            (FaceShading::Uvs(a), FaceShading::Uvs(b)) => a.extend_from_slice(b),
            _ => debug_assert!(false, "mixed shading variants"),
        }
    }

    fn retain_faces(&mut self, keep: &[bool]) {
        let mut i = 0;
        let mut next = || {
            let k = keep[i];
            i += 1;
            k
        };
        match self {
            FaceShading::Colors(c) => c.retain(|_| next()),
            FaceShading::Uvs(u) => u.retain(|_| next()),
        }
    }
}

/// Merged mesh for a whole grid: indexed triangles with per-face shading and normals.
///
/// A well-formed mesh has every face index `< positions.len()` and one
/// shading entry per face. Meshes from [`crate::assemble`] always are;
/// hand-built ones are checked where they are consumed.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshOutput {
    pub positions: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
    pub shading: FaceShading,
    /// One flat normal per face, filled by [`MeshOutput::compute_face_normals`].
    pub normals: Vec<Vec3>,
}

impl MeshOutput {
    pub fn empty(mode: ColorMode) -> Self {
        Self {
            positions: Vec::new(),
            faces: Vec::new(),
            shading: FaceShading::for_mode(mode),
            normals: Vec::new(),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }

    /// Appends a cell translated by `offset`, shifting its indices past the existing vertices.
    pub fn append_cell(&mut self, cell: &PartialCellMesh, offset: Vec3) {
        let base = self.positions.len() as u32;
        self.positions
            .extend(cell.positions.iter().map(|&p| p + offset));
        self.faces
            .extend(cell.triangles.iter().map(|t| t.map(|i| i + base)));
        self.shading.extend_from(&cell.shading);
    }

    /// Merges vertices that land on the same point of a lattice with spacing `step`.
    ///
    /// Cube corners sit on the half-voxel lattice, so `step = voxel_size / 2`
    /// merges exactly the coincident corners at any scale. The first
    /// occurrence of a position keeps its slot and relative order. Faces that
    /// collapse to fewer than three distinct vertices are dropped together with
    /// their shading, and vertices left unreferenced are compacted away.
    /// Normals are cleared. Returns the number of vertices removed; a
    /// non-positive or non-finite `step` leaves the mesh untouched.
    pub fn weld_vertices(&mut self, step: f32) -> usize {
        if !(step.is_finite() && step > 0.0) {
            return 0;
        }
        let before = self.positions.len();
        let mut first: HashMap<(i64, i64, i64), u32> = HashMap::with_capacity(before);
        let mut unique: Vec<Vec3> = Vec::with_capacity(before);
        let mut remap: Vec<u32> = Vec::with_capacity(before);
        for &p in &self.positions {
            let idx = *first.entry(lattice_key(p, step)).or_insert_with(|| {
                unique.push(p);
                (unique.len() - 1) as u32
            });
            remap.push(idx);
        }
        self.positions = unique;

        let mut keep = Vec::with_capacity(self.faces.len());
        for f in &mut self.faces {
            *f = f.map(|i| remap[i as usize]);
            keep.push(f[0] != f[1] && f[1] != f[2] && f[0] != f[2]);
        }
        if keep.iter().any(|k| !k) {
            let mut i = 0;
            self.faces.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
            self.shading.retain_faces(&keep);
            self.drop_unreferenced_vertices();
        }
        self.normals.clear();
        before - self.positions.len()
    }

    /// Removes vertices no face references, keeping the survivors' order.
    fn drop_unreferenced_vertices(&mut self) {
        let mut used = vec![false; self.positions.len()];
        for f in &self.faces {
            for &i in f {
                used[i as usize] = true;
            }
        }
        if used.iter().all(|&u| u) {
            return;
        }
        let mut map = vec![u32::MAX; used.len()];
        let mut next = 0u32;
        for (slot, &u) in map.iter_mut().zip(&used) {
            if u {
                *slot = next;
                next += 1;
            }
        }
        let mut i = 0;
        self.positions.retain(|_| {
            let u = used[i];
            i += 1;
            u
        });
        for f in &mut self.faces {
            *f = f.map(|i| map[i as usize]);
        }
    }

    /// Flat per-face normals from the current positions.
    pub fn compute_face_normals(&mut self) {
        let pos = &self.positions;
        self.normals = self
            .faces
            .iter()
            .map(|&[a, b, c]| {
                Vec3::triangle_normal(pos[a as usize], pos[b as usize], pos[c as usize])
            })
            .collect();
    }

    /// Expands faces into per-corner arrays for upload by a renderer.
    ///
    /// Every face gets its own three vertices so that flat normals and
    /// per-face shading survive. `uv` is filled in texture mode and `col` in
    /// vertex-color mode; the other stays empty. Faces with an out-of-range
    /// index or no shading entry are skipped.
    pub fn to_render_buffers(&self) -> RenderBuffers {
        let mut out = RenderBuffers::default();
        out.reserve_faces(self.faces.len());
        let mut skipped = 0usize;
        for (fi, face) in self.faces.iter().enumerate() {
            let corners = face.map(|i| self.positions.get(i as usize).copied());
            let [Some(p0), Some(p1), Some(p2)] = corners else {
                skipped += 1;
                continue;
            };
            if fi >= self.shading.len() {
                skipped += 1;
                continue;
            }
            let n = self.normals.get(fi).copied().unwrap_or(Vec3::ZERO);
            for (corner, p) in [p0, p1, p2].into_iter().enumerate() {
                out.pos.extend_from_slice(&p.to_array());
                out.norm.extend_from_slice(&n.to_array());
                match &self.shading {
                    FaceShading::Colors(c) => {
                        let [r, g, b] = c[fi];
                        out.col
                            .extend_from_slice(&[unit_to_u8(r), unit_to_u8(g), unit_to_u8(b), 255]);
                    }
                    FaceShading::Uvs(u) => out.uv.extend_from_slice(&u[fi][corner]),
                }
                out.idx.push(out.idx.len() as u32);
            }
        }
        if skipped > 0 {
            log::warn!("render buffers skipped {} malformed faces", skipped);
        }
        out
    }
}

/// Flat vertex arrays ready for GPU upload.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct RenderBuffers {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub col: Vec<u8>,
    pub idx: Vec<u32>,
}

impl RenderBuffers {
    /// Pre-reserve capacity for `n_faces` triangles worth of data.
    #[inline]
    pub fn reserve_faces(&mut self, n_faces: usize) {
        // 3 vertices per face
        self.pos.reserve(n_faces * 3 * 3);
        self.norm.reserve(n_faces * 3 * 3);
        self.idx.reserve(n_faces * 3);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }
}

#[inline]
fn lattice_key(p: Vec3, step: f32) -> (i64, i64, i64) {
    let step = f64::from(step);
    let q = |v: f32| (f64::from(v) / step).round() as i64;
    (q(p.x), q(p.y), q(p.z))
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
