//! Wavefront OBJ/MTL export for a built mesh.
//!
//! Faces carry flat normals (`vn` per face). Texture mode writes one `vt` per
//! face corner and a single palette material; vertex-color mode writes one
//! material per distinct face color.

use std::fmt::Write as _;
use std::io::{self, Write};

use hashbrown::HashMap;
use voxmesh_cpu::{FaceShading, MeshOutput, PaletteTexture};
use voxmesh_geom::Vec3;

/// Material name used for the palette strip in texture mode.
pub const PALETTE_MATERIAL: &str = "palette";

fn push_vec(out: &mut String, tag: &str, v: Vec3) {
    let _ = writeln!(out, "{} {} {} {}", tag, v.x, v.y, v.z);
}

fn color_key(rgb: [f32; 3]) -> [u32; 3] {
    rgb.map(f32::to_bits)
}

/// Distinct face colors in first-seen order, with each face's material slot.
fn color_materials(colors: &[[f32; 3]]) -> (Vec<[f32; 3]>, Vec<usize>) {
    let mut slots: HashMap<[u32; 3], usize> = HashMap::new();
    let mut unique = Vec::new();
    let per_face = colors
        .iter()
        .map(|&rgb| {
            *slots.entry(color_key(rgb)).or_insert_with(|| {
                unique.push(rgb);
                unique.len() - 1
            })
        })
        .collect();
    (unique, per_face)
}

/// OBJ text referencing `mtl_file` for materials.
pub fn obj_string(mesh: &MeshOutput, mtl_file: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "mtllib {}", mtl_file);
    for &p in &mesh.positions {
        push_vec(&mut out, "v", p);
    }
    for &n in &mesh.normals {
        push_vec(&mut out, "vn", n);
    }
    match &mesh.shading {
        FaceShading::Uvs(uvs) => {
            for face in uvs {
                for uv in face {
                    let _ = writeln!(out, "vt {} {}", uv[0], uv[1]);
                }
            }
            let _ = writeln!(out, "usemtl {}", PALETTE_MATERIAL);
            for (fi, f) in mesh.faces.iter().enumerate() {
                let t = fi * 3 + 1;
                let n = fi + 1;
                let _ = writeln!(
                    out,
                    "f {}/{}/{} {}/{}/{} {}/{}/{}",
                    f[0] + 1,
                    t,
                    n,
                    f[1] + 1,
                    t + 1,
                    n,
                    f[2] + 1,
                    t + 2,
                    n
                );
            }
        }
        FaceShading::Colors(colors) => {
            let (_, slots) = color_materials(colors);
            let mut current = None;
            for (fi, (f, &slot)) in mesh.faces.iter().zip(&slots).enumerate() {
                if current != Some(slot) {
                    let _ = writeln!(out, "usemtl c{}", slot);
                    current = Some(slot);
                }
                let n = fi + 1;
                let _ = writeln!(
                    out,
                    "f {}//{} {}//{} {}//{}",
                    f[0] + 1,
                    n,
                    f[1] + 1,
                    n,
                    f[2] + 1,
                    n
                );
            }
        }
    }
    out
}

/// MTL text. `texture_file` is the palette image referenced in texture mode.
pub fn mtl_string(mesh: &MeshOutput, texture_file: &str) -> String {
    let mut out = String::new();
    match &mesh.shading {
        FaceShading::Uvs(_) => {
            let _ = writeln!(out, "newmtl {}", PALETTE_MATERIAL);
            let _ = writeln!(out, "Kd 1 1 1");
            let _ = writeln!(out, "map_Kd {}", texture_file);
        }
        FaceShading::Colors(colors) => {
            let (unique, _) = color_materials(colors);
            for (i, rgb) in unique.iter().enumerate() {
                let _ = writeln!(out, "newmtl c{}", i);
                let _ = writeln!(out, "Kd {} {} {}", rgb[0], rgb[1], rgb[2]);
            }
        }
    }
    out
}

/// Binary PPM (P6) of the palette strip; alpha is dropped.
pub fn write_ppm<W: Write>(tex: &PaletteTexture, out: &mut W) -> io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", tex.width, tex.height)?;
    for px in tex.rgba.chunks_exact(4) {
        out.write_all(&px[..3])?;
    }
    Ok(())
}
