//! Integration tests for glTF scene loading and export.
//!
//! Tests the complete flow:
//! 1. Generate a glTF scene programmatically
//! 2. Load and export through memblob-export
//! 3. Validate the blobs against the source data

mod generate_test_assets;

use generate_test_assets::{quad_primitive, write_gltf, write_gltf_animated, PrimitiveData};
use serde_json::json;
use tempfile::tempdir;

use memblob_export::formats::{decode_triangles, decode_vertices};
use memblob_export::scene::LoadOptions;
use memblob_export::{export_file, load_scene, ExportError, ExportOptions};

#[test]
fn test_node_transforms_are_baked_parent_first() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_gltf(
        dir.path(),
        "nested",
        vec![("Plane", vec![quad_primitive()])],
        json!([
            { "name": "Parent", "translation": [0.0, 0.0, 5.0], "children": [1] },
            { "name": "Child", "translation": [1.0, 0.0, 0.0], "mesh": 0 }
        ]),
        &[0],
    );

    let scene = load_scene(&path, &LoadOptions::default()).expect("Failed to load glTF");

    assert_eq!(scene.name, "nested");
    assert_eq!(scene.meshes.len(), 1);
    let mesh = &scene.meshes[0];
    assert_eq!(mesh.name, "Child");
    assert_eq!(mesh.positions[0], [1.0, 0.0, 5.0]);
    assert_eq!(mesh.positions[2], [2.0, 1.0, 5.0]);
    assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
}

#[test]
fn test_transforms_can_be_left_alone() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_gltf(
        dir.path(),
        "moved",
        vec![("Plane", vec![quad_primitive()])],
        json!([{ "translation": [3.0, 3.0, 3.0], "mesh": 0 }]),
        &[0],
    );

    let scene = load_scene(
        &path,
        &LoadOptions {
            apply_transforms: false,
        },
    )
    .expect("Failed to load glTF");

    // Unnamed node falls back to the mesh name
    assert_eq!(scene.meshes[0].name, "Plane");
    assert_eq!(scene.meshes[0].positions[0], [0.0, 0.0, 0.0]);
}

#[test]
fn test_animated_node_keeps_local_positions() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_gltf_animated(
        dir.path(),
        "animated",
        vec![("Door", vec![quad_primitive()]), ("Wall", vec![quad_primitive()])],
        json!([
            { "name": "Door", "translation": [4.0, 0.0, 0.0], "mesh": 0 },
            { "name": "Wall", "translation": [4.0, 0.0, 0.0], "mesh": 1 }
        ]),
        &[0, 1],
        Some(0),
    );

    let scene = load_scene(&path, &LoadOptions::default()).expect("Failed to load glTF");

    assert_eq!(scene.meshes.len(), 2);
    let door = &scene.meshes[0];
    assert_eq!(door.name, "Door");
    assert_eq!(door.positions, quad_primitive().positions);
    // Static sibling still gets its transform baked
    let wall = &scene.meshes[1];
    assert_eq!(wall.positions[0], [4.0, 0.0, 0.0]);
}

#[test]
fn test_export_quad_round_trips() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_gltf(
        dir.path(),
        "quad",
        vec![("Plane", vec![quad_primitive()])],
        json!([{ "name": "Plane", "mesh": 0 }]),
        &[0],
    );

    let report = export_file(&path, None, &ExportOptions::default()).expect("Export failed");
    assert_eq!(report.exported.len(), 1);
    assert!(report.skipped.is_empty());

    let vnuv = std::fs::read(dir.path().join("quad.vnuv")).expect("Missing .vnuv");
    let vti = std::fs::read(dir.path().join("quad.vti")).expect("Missing .vti");
    assert_eq!(vnuv.len(), 4 * 32);
    assert_eq!(vti.len(), 2 * 12);

    let source = quad_primitive();
    let vertices = decode_vertices(&vnuv).expect("Bad vertex blob");
    for (i, vertex) in vertices.iter().enumerate() {
        assert_eq!(vertex.position, source.positions[i]);
        assert_eq!(vertex.uv, source.uvs.as_ref().unwrap()[i]);
        assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
    }
    assert_eq!(
        decode_triangles(&vti).expect("Bad index blob"),
        vec![[0, 1, 2], [0, 2, 3]]
    );
}

#[test]
fn test_bad_primitives_are_skipped_and_offsets_hold() {
    let dir = tempdir().expect("Failed to create temp dir");
    let lines = PrimitiveData {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        normals: None,
        uvs: Some(vec![[0.0, 0.0], [1.0, 0.0]]),
        indices: vec![0, 1],
        mode: 1,
    };
    let no_uv = PrimitiveData {
        uvs: None,
        normals: None,
        ..quad_primitive()
    };
    let path = write_gltf(
        dir.path(),
        "mixed",
        vec![
            ("First", vec![quad_primitive(), lines]),
            ("Bare", vec![no_uv]),
            ("Last", vec![quad_primitive()]),
        ],
        json!([
            { "mesh": 0 },
            { "mesh": 1 },
            { "mesh": 2 }
        ]),
        &[0, 1, 2],
    );

    let report = export_file(&path, None, &ExportOptions::default()).expect("Export failed");

    let exported: Vec<&str> = report.exported.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(exported, vec!["First.0", "Last"]);
    assert_eq!(report.skipped.len(), 2);
    assert!(matches!(
        &report.skipped[0],
        ExportError::MalformedGeometry { mesh, .. } if mesh == "First.1"
    ));
    assert!(matches!(
        &report.skipped[1],
        ExportError::MissingUv { mesh, .. } if mesh == "Bare"
    ));

    let vti = std::fs::read(dir.path().join("mixed.vti")).expect("Missing .vti");
    let triangles = decode_triangles(&vti).expect("Bad index blob");
    assert_eq!(triangles, vec![[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]]);
}

#[test]
fn test_missing_normals_are_calculated() {
    let dir = tempdir().expect("Failed to create temp dir");
    let no_normals = PrimitiveData {
        normals: None,
        ..quad_primitive()
    };
    let path = write_gltf(
        dir.path(),
        "flat",
        vec![("Plane", vec![no_normals])],
        json!([{ "mesh": 0 }]),
        &[0],
    );

    let scene = load_scene(&path, &LoadOptions::default()).expect("Failed to load glTF");
    for normal in &scene.meshes[0].normals {
        assert!((normal[2] - 1.0).abs() < 1e-6, "normal {:?}", normal);
    }
}
