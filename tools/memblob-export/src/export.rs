//! Single-scene export (scene file -> .vnuv + .vti)

use anyhow::Result;
use std::path::{Path, PathBuf};

use memblob_shared::MEMBLOB_FORMAT;

use crate::formats::write_blob_pair;
use crate::mesh::{serialize_meshes, ExportError, MeshSummary, UvSeamPolicy};
use crate::scene::{load_scene, prepare_scene, LoadOptions, PrepareOptions, Scene};

/// Everything that shapes one export
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub load: LoadOptions,
    pub prepare: PrepareOptions,
    pub uv_seams: UvSeamPolicy,
}

/// Outcome of exporting one scene
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub scene: String,
    pub vnuv_path: PathBuf,
    pub vti_path: PathBuf,
    pub exported: Vec<MeshSummary>,
    pub skipped: Vec<ExportError>,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

/// `<base>.vnuv` and `<base>.vti`
pub fn blob_paths(base: &Path) -> (PathBuf, PathBuf) {
    (
        base.with_extension(MEMBLOB_FORMAT.vertex_ext),
        base.with_extension(MEMBLOB_FORMAT.index_ext),
    )
}

/// Serialize an already loaded scene and write the blob pair
///
/// Mesh failures are logged and reported, never returned as errors. Only I/O
/// failures abort.
pub fn export_scene(
    scene: &Scene,
    vnuv_path: &Path,
    vti_path: &Path,
    uv_seams: UvSeamPolicy,
) -> Result<ExportReport> {
    let mesh_count = scene.meshes.len();
    let serialized = serialize_meshes(&scene.meshes, uv_seams);

    write_blob_pair(
        vnuv_path,
        vti_path,
        &serialized.vertices,
        &serialized.triangles,
    )?;

    if serialized.exported.is_empty() && mesh_count > 0 {
        tracing::warn!(
            "Scene {}: none of {} meshes exported, wrote empty blobs",
            scene.name,
            mesh_count
        );
    }

    Ok(ExportReport {
        scene: scene.name.clone(),
        vnuv_path: vnuv_path.to_path_buf(),
        vti_path: vti_path.to_path_buf(),
        vertex_count: serialized.vertices.len(),
        triangle_count: serialized.triangles.len(),
        exported: serialized.exported,
        skipped: serialized.skipped,
    })
}

/// Load, prepare and export one scene file
///
/// `output_base` is the output path without extension; it defaults to the
/// input path.
pub fn export_file(
    input: &Path,
    output_base: Option<&Path>,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let mut scene = load_scene(input, &options.load)?;
    tracing::info!("Loaded {:?}: {} meshes", input, scene.meshes.len());

    prepare_scene(&mut scene, &options.prepare);

    let (vnuv_path, vti_path) = blob_paths(output_base.unwrap_or(input));
    let report = export_scene(&scene, &vnuv_path, &vti_path, options.uv_seams)?;

    tracing::info!(
        "{:?} -> {:?}, {:?}",
        input,
        report.vnuv_path,
        report.vti_path
    );
    Ok(report)
}
