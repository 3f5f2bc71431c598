use voxmesh_cpu::{
    CachedTextureFactory, FaceShading, Material, MeshBuilder, MeshConfig, MeshError,
    PaletteStripFactory, TextureFactory, build_mesh,
};
use voxmesh_geom::Vec3;
use voxmesh_grid::{Color, GridSize, Voxel, VoxelGrid};

fn grid(size: (u32, u32, u32), coords: &[(i32, i32, i32)], palette: Vec<Color>) -> VoxelGrid {
    VoxelGrid::new(
        GridSize::new(size.0, size.1, size.2),
        coords
            .iter()
            .map(|&(x, y, z)| Voxel::new(x, y, z, 0))
            .collect(),
        palette,
    )
}

fn red() -> Vec<Color> {
    vec![Color::rgba(255, 0, 0, 255)]
}

fn vertex_color() -> MeshConfig {
    MeshConfig {
        vertex_color: true,
        ..MeshConfig::default()
    }
}

#[test]
fn two_adjacent_voxels_cull_shared_faces() {
    let g = grid((2, 1, 1), &[(0, 0, 0), (1, 0, 0)], red());
    let mesh = build_mesh(&g, &MeshConfig::default()).unwrap();
    assert_eq!(mesh.face_count(), 20);
    // Welded: two 8-corner cubes sharing a 4-corner face.
    assert_eq!(mesh.vertex_count(), 12);
}

#[test]
fn single_voxel_vertex_color_is_flat_red() {
    let g = grid((1, 1, 1), &[(0, 0, 0)], red());
    let mesh = build_mesh(&g, &vertex_color()).unwrap();
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.face_count(), 12);
    let colors = mesh.shading.colors().unwrap();
    assert_eq!(colors.len(), 12);
    assert!(colors.iter().all(|&c| c == [1.0, 0.0, 0.0]));
    let rb = mesh.to_render_buffers();
    assert!(rb.col.chunks(4).all(|c| c == [255, 0, 0, 255]));
}

#[test]
fn empty_grid_is_an_empty_mesh() {
    let g = grid((4, 4, 4), &[], red());
    let mesh = build_mesh(&g, &MeshConfig::default()).unwrap();
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.face_count(), 0);
    assert!(mesh.normals.is_empty());
}

#[test]
fn single_voxel_texture_mode_shares_one_uv() {
    let g = grid((1, 1, 1), &[(0, 0, 0)], red());
    let mesh = build_mesh(&g, &MeshConfig::default()).unwrap();
    let uvs = mesh.shading.uvs().unwrap();
    assert_eq!(uvs.len(), 12);
    let u0 = uvs[0][0][0];
    for face in uvs {
        for uv in face {
            assert_eq!(uv[1], 0.5);
            assert_eq!(uv[0], u0);
        }
    }
    // One palette entry -> one-texel strip, sampled at its center.
    assert_eq!(u0, 0.5);
}

#[test]
fn texture_u_follows_palette_index() {
    let palette: Vec<Color> = (0..4).map(|i| Color::rgb(i, i, i)).collect();
    let g = VoxelGrid::new(
        GridSize::new(8, 1, 1),
        vec![Voxel::new(0, 0, 0, 1), Voxel::new(4, 0, 0, 3)],
        palette,
    );
    let mesh = build_mesh(&g, &MeshConfig::default()).unwrap();
    let uvs = mesh.shading.uvs().unwrap();
    assert_eq!(uvs[0][0], [0.375, 0.5]);
    assert_eq!(uvs[12][0], [0.875, 0.5]);
}

#[test]
fn build_twice_is_identical() {
    let g = grid(
        (3, 3, 2),
        &[(0, 0, 0), (1, 0, 0), (1, 1, 0), (1, 1, 1), (2, 2, 1)],
        red(),
    );
    let mut builder = MeshBuilder::new(&g, MeshConfig::default()).unwrap();
    let first = builder.mesh().clone();
    let second = builder.build().unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(builder.into_mesh(), first);
}

#[test]
fn bad_palette_index_aborts_build() {
    let g = VoxelGrid::new(
        GridSize::new(2, 1, 1),
        vec![Voxel::new(0, 0, 0, 0), Voxel::new(1, 0, 0, 7)],
        red(),
    );
    for cfg in [MeshConfig::default(), vertex_color()] {
        let err = build_mesh(&g, &cfg).unwrap_err();
        assert_eq!(
            err,
            MeshError::PaletteIndex {
                x: 1,
                y: 0,
                z: 0,
                index: 7,
                palette_len: 1
            }
        );
    }
    assert!(MeshBuilder::new(&g, MeshConfig::default()).is_err());
}

#[test]
fn enclosed_voxel_with_bad_index_still_fails() {
    // Interior cell of a 3x3x3 block would emit nothing, but is still validated.
    let mut g = VoxelGrid::from_fn(GridSize::new(3, 3, 3), red(), |_, _, _| Some(0));
    for v in &mut g.voxels {
        if (v.x, v.y, v.z) == (1, 1, 1) {
            v.color_index = 9;
        }
    }
    assert!(matches!(
        build_mesh(&g, &MeshConfig::default()),
        Err(MeshError::PaletteIndex { index: 9, .. })
    ));
}

#[test]
fn strict_bounds_rejects_stray_voxel() {
    let g = grid((2, 2, 2), &[(0, 0, 0), (2, 0, 0)], red());
    // Trusted by default.
    assert!(build_mesh(&g, &MeshConfig::default()).is_ok());
    let cfg = MeshConfig {
        strict_bounds: true,
        ..MeshConfig::default()
    };
    assert_eq!(
        build_mesh(&g, &cfg).unwrap_err(),
        MeshError::VoxelOutOfBounds {
            x: 2,
            y: 0,
            z: 0,
            size_x: 2,
            size_y: 2,
            size_z: 2
        }
    );
}

#[test]
fn optimize_off_keeps_every_face_and_seam() {
    let g = grid((2, 1, 1), &[(0, 0, 0), (1, 0, 0)], red());
    let cfg = MeshConfig {
        optimize_faces: false,
        ..MeshConfig::default()
    };
    let mesh = build_mesh(&g, &cfg).unwrap();
    assert_eq!(mesh.face_count(), 24);
    assert_eq!(mesh.vertex_count(), 16);
}

#[test]
fn culling_and_welding_can_be_split() {
    let g = grid((2, 1, 1), &[(0, 0, 0), (1, 0, 0)], red());
    let cull_only = MeshConfig {
        weld_vertices: Some(false),
        ..MeshConfig::default()
    };
    let mesh = build_mesh(&g, &cull_only).unwrap();
    assert_eq!((mesh.face_count(), mesh.vertex_count()), (20, 16));

    let weld_only = MeshConfig {
        cull_faces: Some(false),
        ..MeshConfig::default()
    };
    let mesh = build_mesh(&g, &weld_only).unwrap();
    assert_eq!((mesh.face_count(), mesh.vertex_count()), (24, 12));
}

#[test]
fn origin_to_bottom_controls_vertical_centering() {
    let g = grid((1, 1, 3), &[(0, 0, 0), (0, 0, 1), (0, 0, 2)], red());
    let bottom = build_mesh(&g, &MeshConfig::default()).unwrap().bounds();
    assert_eq!(bottom.min.y, -0.5);
    assert_eq!(bottom.max.y, 2.5);

    let centered = MeshConfig {
        origin_to_bottom: false,
        ..MeshConfig::default()
    };
    let bb = build_mesh(&g, &centered).unwrap().bounds();
    assert_eq!((bb.min.y, bb.max.y), (-1.5, 1.5));
}

#[test]
fn grid_y_maps_to_negative_depth() {
    let g = grid((1, 3, 1), &[(0, 2, 0)], red());
    let bb = build_mesh(&g, &MeshConfig::default()).unwrap().bounds();
    // Center of y=2 in a 3-deep grid sits at depth -(2 - 1) = -1.
    assert_eq!(bb.center(), Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn voxel_size_scales_positions() {
    let g = grid((1, 1, 1), &[(0, 0, 0)], red());
    let cfg = MeshConfig {
        voxel_size: 0.25,
        ..MeshConfig::default()
    };
    let bb = build_mesh(&g, &cfg).unwrap().bounds();
    assert_eq!(bb.size(), Vec3::new(0.25, 0.25, 0.25));
}

#[test]
fn tiny_voxels_keep_every_corner() {
    for size in [1e-4, 1e-5] {
        let cfg = MeshConfig {
            voxel_size: size,
            ..MeshConfig::default()
        };
        let single = build_mesh(&grid((1, 1, 1), &[(0, 0, 0)], red()), &cfg).unwrap();
        assert_eq!((single.vertex_count(), single.face_count()), (8, 12), "size {size}");
        let pair = build_mesh(&grid((2, 1, 1), &[(0, 0, 0), (1, 0, 0)], red()), &cfg).unwrap();
        assert_eq!((pair.vertex_count(), pair.face_count()), (12, 20), "size {size}");
        let mut used = vec![false; pair.vertex_count()];
        for f in &pair.faces {
            for &i in f {
                used[i as usize] = true;
            }
        }
        assert!(used.into_iter().all(|u| u), "size {size}");
    }
}

#[test]
fn large_voxels_still_weld_shared_corners() {
    let cfg = MeshConfig {
        voxel_size: 250.0,
        ..MeshConfig::default()
    };
    let pair = build_mesh(&grid((2, 1, 1), &[(0, 0, 0), (1, 0, 0)], red()), &cfg).unwrap();
    assert_eq!((pair.vertex_count(), pair.face_count()), (12, 20));
}

#[test]
fn normals_point_out_of_the_model() {
    let g = grid((2, 1, 1), &[(0, 0, 0), (1, 0, 0)], red());
    let mesh = build_mesh(&g, &MeshConfig::default()).unwrap();
    let center = mesh.bounds().center();
    for (face, n) in mesh.faces.iter().zip(&mesh.normals) {
        let p = mesh.positions[face[0] as usize];
        assert!((p - center).dot(*n) > 0.0);
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}

#[test]
fn builder_exposes_boundary_query() {
    let g = VoxelGrid::from_fn(GridSize::new(3, 3, 3), red(), |_, _, _| Some(0));
    let cfg = MeshConfig {
        optimize_faces: false,
        ..MeshConfig::default()
    };
    let builder = MeshBuilder::new(&g, cfg).unwrap();
    assert_eq!(builder.adjacency().len(), 27);
    let outer = g.voxels.iter().filter(|v| builder.is_outer_voxel(v)).count();
    assert_eq!(outer, 26);
    assert!(!builder.is_outer_voxel(&Voxel::new(1, 1, 1, 0)));
}

#[test]
fn create_mesh_picks_material_from_mode() {
    let g = grid((1, 1, 1), &[(0, 0, 0)], red());
    let textured = MeshBuilder::new(&g, MeshConfig::default()).unwrap();
    let rm = textured.create_mesh();
    match rm.material {
        Material::Textured(tex) => assert_eq!(tex, PaletteStripFactory.texture(&g.palette)),
        Material::VertexColors => panic!("expected a textured material"),
    }
    assert!(matches!(rm.mesh.shading, FaceShading::Uvs(_)));

    let colored = MeshBuilder::new(&g, vertex_color()).unwrap();
    assert_eq!(colored.create_mesh().material, Material::VertexColors);
}

#[test]
fn failed_rebuild_clears_previous_mesh() {
    let g = grid((1, 1, 1), &[(0, 0, 0)], red());
    let mut builder = MeshBuilder::new(&g, MeshConfig::default()).unwrap();
    assert_eq!(builder.mesh().face_count(), 12);
    let bad = MeshConfig {
        voxel_size: 0.0,
        ..MeshConfig::default()
    };
    assert_eq!(
        builder.set_config(bad).unwrap_err(),
        MeshError::InvalidVoxelSize(0.0)
    );
    assert!(builder.mesh().is_empty());
}

#[test]
fn injected_factory_sets_strip_width() {
    struct Wide;
    impl TextureFactory for Wide {
        type Texture = usize;
        fn texture(&self, _palette: &[Color]) -> usize {
            256
        }
        fn texture_width(&self, _palette: &[Color]) -> usize {
            256
        }
    }
    let g = grid((1, 1, 1), &[(0, 0, 0)], red());
    let builder = MeshBuilder::with_texture_factory(&g, MeshConfig::default(), Wide).unwrap();
    let uv = builder.mesh().shading.uvs().unwrap()[0][0];
    assert_eq!(uv, [0.5 / 256.0, 0.5]);
    assert_eq!(builder.texture(), 256);

    let cached = CachedTextureFactory::new(PaletteStripFactory);
    let b = MeshBuilder::with_texture_factory(&g, MeshConfig::default(), cached).unwrap();
    assert_eq!(b.texture(), b.texture());
}
