//! GPU sync buffer, draw list and material binding tests
//!
//! Everything here runs against host memory; no adapter is required.

use glam::{Mat4, Quat, Vec3};
use lumen_assets::{
    AssetDescription, ImageRecord, IndexAccessor, Material, MeshRecord, NodeRecord,
    PrimitiveRecord, TextureRecord,
};
use lumen_renderer::{
    BackendRegion, DrawCommand, DrawList, FallbackTexture, GpuSyncBuffer, HostRegion,
    MATRIX_STRIDE, RenderError, TextureSlot, resolve_material,
};
use lumen_scene::{NodeMatrices, Scene, build_scene, evaluate_transforms};

const EPSILON: f32 = 1e-5;

// ============================================================================
// Helpers
// ============================================================================

fn triangle(material: Option<usize>) -> PrimitiveRecord {
    PrimitiveRecord {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        indices: IndexAccessor::from_u8(&[0, 1, 2]),
        material,
        ..Default::default()
    }
}

/// root(0, scaled) -> [1 (one triangle), 2 (two triangles)]
fn scene() -> Scene {
    let mut root = NodeRecord::new(0);
    root.scale = Some([2.0, 1.0, 1.0]);
    root.children = vec![1, 2];

    let mut a = NodeRecord::new(1);
    a.translation = Some([0.0, 3.0, 0.0]);
    a.mesh = Some(0);

    let mut b = NodeRecord::new(2);
    b.rotation = Some(Quat::from_rotation_x(0.5).to_array());
    b.mesh = Some(1);

    build_scene(&AssetDescription {
        nodes: vec![root, a, b],
        roots: vec![0],
        meshes: vec![
            MeshRecord {
                name: None,
                primitives: vec![triangle(Some(0))],
            },
            MeshRecord {
                name: None,
                primitives: vec![triangle(None), triangle(Some(0))],
            },
        ],
        ..Default::default()
    })
    .unwrap()
}

fn synced_host_buffer(scene: &Scene) -> GpuSyncBuffer<HostRegion> {
    let mut sync = GpuSyncBuffer::host(scene.node_count());
    evaluate_transforms(&scene.nodes, sync.matrices_mut());
    sync.sync().unwrap();
    sync
}

// ============================================================================
// Sync buffer
// ============================================================================

#[test]
fn regions_are_sized_to_node_count() {
    let sync = GpuSyncBuffer::host(5);
    assert_eq!(sync.world_region().capacity(), 5 * 64);
    assert_eq!(sync.normal_region().capacity(), 5 * MATRIX_STRIDE);
}

#[test]
fn sync_copies_every_matrix() {
    let scene = scene();
    let sync = synced_host_buffer(&scene);

    for index in 0..scene.node_count() {
        let world = sync.world_region().read_matrix(index).unwrap();
        let normal = sync.normal_region().read_matrix(index).unwrap();
        assert_eq!(world, sync.matrices().world()[index]);
        assert_eq!(normal, sync.matrices().normal()[index]);

        let expected = scene.nodes.compose_world_matrix(index).unwrap();
        assert!(world.abs_diff_eq(expected, EPSILON));
        assert!(normal.abs_diff_eq(expected.inverse().transpose(), EPSILON));
    }
}

#[test]
fn region_bytes_are_column_major_floats() {
    let scene = scene();
    let sync = synced_host_buffer(&scene);

    // Node 1 sits at (0, 3, 0) under a root scaled on X only.
    let bytes = &sync.world_region().bytes()[64..128];
    let floats: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    assert_eq!(floats[0], 2.0);
    assert_eq!(&floats[12..16], &[0.0, 3.0, 0.0, 1.0]);
}

#[test]
fn every_sync_is_a_full_copy() {
    let mut scene = scene();
    let mut sync = synced_host_buffer(&scene);
    assert_eq!(sync.world_region().writes(), 1);

    if let Some(trs) = scene.nodes.local_mut(1).and_then(|l| l.as_trs_mut()) {
        trs.translation = Vec3::new(0.0, -1.0, 0.0);
    }
    evaluate_transforms(&scene.nodes, sync.matrices_mut());
    let written = sync.sync().unwrap();

    assert_eq!(written, 2 * 3 * 64);
    assert_eq!(sync.world_region().writes(), 2);
    assert_eq!(sync.normal_region().writes(), 2);
    let moved = sync.world_region().read_matrix(1).unwrap();
    assert!(moved.w_axis.abs_diff_eq(glam::Vec4::new(0.0, -1.0, 0.0, 1.0), EPSILON));
}

#[test]
fn undersized_region_is_rejected() {
    let err = GpuSyncBuffer::new(NodeMatrices::new(4), HostRegion::new(4 * 64), HostRegion::new(3 * 64))
        .err()
        .unwrap();
    match err {
        RenderError::RegionTooSmall {
            region,
            capacity,
            required,
        } => {
            assert_eq!(region, "Normal");
            assert_eq!(capacity, 192);
            assert_eq!(required, 256);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn matrices_outgrowing_regions_fail_to_sync() {
    let scene = scene();
    let mut sync = GpuSyncBuffer::host(1);
    evaluate_transforms(&scene.nodes, sync.matrices_mut());
    assert!(matches!(sync.sync(), Err(RenderError::RegionTooSmall { .. })));
}

#[test]
fn identity_before_first_evaluation() {
    let mut sync = GpuSyncBuffer::host(2);
    sync.sync().unwrap();
    assert_eq!(sync.world_region().read_matrix(1), Some(Mat4::IDENTITY));
    assert_eq!(sync.world_region().read_matrix(2), None);
}

// ============================================================================
// Draw list
// ============================================================================

#[test]
fn draw_list_records_node_per_primitive() {
    let draws = DrawList::from_store(&scene().nodes);
    assert_eq!(
        draws.commands,
        vec![
            DrawCommand {
                node_index: 1,
                first_index: 0,
                index_count: 3,
                material: Some(0),
            },
            DrawCommand {
                node_index: 2,
                first_index: 3,
                index_count: 3,
                material: None,
            },
            DrawCommand {
                node_index: 2,
                first_index: 6,
                index_count: 3,
                material: Some(0),
            },
        ]
    );
    assert_eq!(draws.total_indices(), 9);
}

// ============================================================================
// Materials
// ============================================================================

#[test]
fn absent_textures_get_their_fallback() {
    let binding = resolve_material(&Material::default(), &[], &[]);
    assert_eq!(
        binding.slots(),
        [
            TextureSlot::Fallback(FallbackTexture::White),
            TextureSlot::Fallback(FallbackTexture::White),
            TextureSlot::Fallback(FallbackTexture::FlatNormal),
            TextureSlot::Fallback(FallbackTexture::White),
            TextureSlot::Fallback(FallbackTexture::Black),
        ]
    );
    assert_eq!(binding.uniform.base_color, [1.0; 4]);
}

#[test]
fn textures_resolve_through_to_images() {
    let textures = [TextureRecord { image: 1 }, TextureRecord { image: 0 }];
    let images = [
        None,
        Some(ImageRecord {
            width: 1,
            height: 1,
            pixels: vec![10, 20, 30, 255],
        }),
    ];
    let material = Material {
        base_color_texture: Some(0),
        emissive_texture: Some(1),
        normal_texture: Some(7),
        ..Default::default()
    };

    let binding = resolve_material(&material, &textures, &images);
    assert_eq!(binding.base_color, TextureSlot::Image(1));
    // Texture 1 points at an image that failed to decode.
    assert_eq!(binding.emissive, TextureSlot::Fallback(FallbackTexture::Black));
    // Texture 7 does not exist.
    assert_eq!(binding.normal, TextureSlot::Fallback(FallbackTexture::FlatNormal));
}
