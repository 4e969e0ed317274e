//! World/normal matrix propagation tests
//!
//! Tests for:
//! - Chained parent products against a hand-built matrix product
//! - Normal matrices under non-uniform scale
//! - Agreement between the top-down pass and the per-node ancestor walk

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3, Vec4};
use lumen_assets::{AssetDescription, NodeRecord};
use lumen_core::LocalTransform;
use lumen_scene::{NodeMatrices, build_scene, evaluate_transforms};

const EPSILON: f32 = 1e-5;

fn trs_node(index: usize, translation: [f32; 3], rotation: Quat, scale: [f32; 3]) -> NodeRecord {
    NodeRecord {
        translation: Some(translation),
        rotation: Some(rotation.to_array()),
        scale: Some(scale),
        ..NodeRecord::new(index)
    }
}

fn chain_of_three() -> AssetDescription {
    let mut a = trs_node(0, [1.0, 0.0, 0.0], Quat::IDENTITY, [1.0, 1.0, 1.0]);
    let mut b = trs_node(1, [0.0, 2.0, 0.0], Quat::from_rotation_z(FRAC_PI_2), [1.0, 1.0, 1.0]);
    let c = trs_node(2, [0.0, 0.0, 3.0], Quat::IDENTITY, [2.0, 2.0, 2.0]);
    a.children = vec![1];
    b.children = vec![2];

    AssetDescription {
        nodes: vec![a, b, c],
        roots: vec![0],
        ..Default::default()
    }
}

// ============================================================================
// World matrices
// ============================================================================

#[test]
fn chain_world_matrix_is_root_first_product() {
    let scene = build_scene(&chain_of_three()).unwrap();
    let mut matrices = NodeMatrices::for_store(&scene.nodes);
    assert_eq!(evaluate_transforms(&scene.nodes, &mut matrices), 3);

    let ma = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
    let mb = Mat4::from_rotation_translation(Quat::from_rotation_z(FRAC_PI_2), Vec3::new(0.0, 2.0, 0.0));
    let mc = Mat4::from_scale_rotation_translation(Vec3::splat(2.0), Quat::IDENTITY, Vec3::new(0.0, 0.0, 3.0));

    let world = matrices.world();
    assert!(world[0].abs_diff_eq(ma, EPSILON));
    assert!(world[1].abs_diff_eq(ma * mb, EPSILON));
    assert!(world[2].abs_diff_eq(ma * mb * mc, EPSILON));
}

#[test]
fn top_down_pass_matches_ancestor_walk() {
    let scene = build_scene(&chain_of_three()).unwrap();
    let mut matrices = NodeMatrices::for_store(&scene.nodes);
    evaluate_transforms(&scene.nodes, &mut matrices);

    for index in 0..scene.nodes.len() {
        let walked = scene.nodes.compose_world_matrix(index).unwrap();
        assert!(matrices.world()[index].abs_diff_eq(walked, EPSILON), "node {index}");
    }
}

#[test]
fn local_edit_shows_up_after_next_pass() {
    let mut scene = build_scene(&chain_of_three()).unwrap();
    let mut matrices = NodeMatrices::for_store(&scene.nodes);
    evaluate_transforms(&scene.nodes, &mut matrices);
    let before = matrices.world()[2].transform_point3(Vec3::ZERO);
    assert!(before.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), EPSILON));

    let trs = scene
        .nodes
        .local_mut(0)
        .and_then(LocalTransform::as_trs_mut)
        .unwrap();
    trs.translation = Vec3::new(5.0, 0.0, 0.0);
    evaluate_transforms(&scene.nodes, &mut matrices);

    let after = matrices.world()[2].transform_point3(Vec3::ZERO);
    assert!(after.abs_diff_eq(Vec3::new(5.0, 2.0, 3.0), EPSILON));
}

#[test]
fn matrix_node_keeps_its_baked_transform() {
    let baked = Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0));
    let description = AssetDescription {
        nodes: vec![NodeRecord {
            matrix: Some(baked.to_cols_array()),
            ..NodeRecord::new(0)
        }],
        roots: vec![0],
        ..Default::default()
    };

    let scene = build_scene(&description).unwrap();
    let mut matrices = NodeMatrices::for_store(&scene.nodes);
    evaluate_transforms(&scene.nodes, &mut matrices);
    assert!(matrices.world()[0].abs_diff_eq(baked, EPSILON));
}

// ============================================================================
// Normal matrices
// ============================================================================

#[test]
fn normal_matrix_keeps_normals_perpendicular_under_scale() {
    let description = AssetDescription {
        nodes: vec![trs_node(0, [0.0; 3], Quat::IDENTITY, [2.0, 1.0, 1.0])],
        roots: vec![0],
        ..Default::default()
    };
    let scene = build_scene(&description).unwrap();
    let mut matrices = NodeMatrices::for_store(&scene.nodes);
    evaluate_transforms(&scene.nodes, &mut matrices);

    let world = matrices.world()[0];
    let normal_matrix = matrices.normal()[0];

    // Surface spanned by a 45° edge in XY; its normal points along (1, -1, 0).
    let tangent = Vec3::new(1.0, 1.0, 0.0);
    let normal = Vec3::new(1.0, -1.0, 0.0).normalize();

    let world_tangent = (world * tangent.extend(0.0)).truncate();
    let world_normal = (normal_matrix * Vec4::from((normal, 0.0))).truncate();

    assert!(world_tangent.dot(world_normal).abs() < EPSILON);
    // Plain world matrix would not preserve this.
    assert!(world_tangent.dot((world * normal.extend(0.0)).truncate()).abs() > 0.1);
}

#[test]
fn tiny_invertible_scale_keeps_exact_normal_matrix() {
    // Cumulative scale of 1e-5 per axis: det is about 1e-15 but still invertible.
    let mut root = trs_node(0, [0.0; 3], Quat::IDENTITY, [0.01; 3]);
    root.children = vec![1];
    let child = trs_node(1, [0.0, 4.0, 0.0], Quat::from_rotation_y(0.3), [0.001; 3]);

    let description = AssetDescription {
        nodes: vec![root, child],
        roots: vec![0],
        ..Default::default()
    };
    let scene = build_scene(&description).unwrap();
    let mut matrices = NodeMatrices::for_store(&scene.nodes);
    evaluate_transforms(&scene.nodes, &mut matrices);

    let world = matrices.world()[1];
    let expected = world.inverse().transpose();
    assert!(expected.is_finite());
    assert_eq!(matrices.normal()[1], expected);

    // Uniform scale only shortens normals; the direction survives.
    let world_normal = matrices.normal()[1].transform_vector3(Vec3::Z).normalize();
    let rotated = Quat::from_rotation_y(0.3) * Vec3::Z;
    assert!(world_normal.abs_diff_eq(rotated, EPSILON));
}
