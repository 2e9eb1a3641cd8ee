//! Scene loading
//!
//! A [`SceneLoader`] plays the part of the content host: it opens a scene file
//! and hands back immutable [`Mesh`] values in document order. Nothing past
//! this point touches file formats or host state.

mod gltf;
mod obj;

pub use self::gltf::GltfLoader;
pub use self::obj::ObjLoader;

use anyhow::Result;
use std::path::Path;

use crate::mesh::{ops, Mesh};

/// Meshes loaded from one scene file
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Scene name (file stem)
    pub name: String,
    pub meshes: Vec<Mesh>,
}

/// Options applied while loading
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Bake node transforms into vertex data (glTF only)
    pub apply_transforms: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            apply_transforms: true,
        }
    }
}

/// Options applied between loading and serialization
#[derive(Debug, Clone, Copy)]
pub struct PrepareOptions {
    /// Fan-triangulate meshes that still have non-triangle faces
    pub triangulate: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self { triangulate: true }
    }
}

/// Source of meshes for one scene file format
pub trait SceneLoader {
    /// Human-readable loader name
    fn name(&self) -> &'static str;

    /// Lowercase file extensions handled, without dot
    fn extensions(&self) -> &'static [&'static str];

    /// Load every mesh object in the file
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Scene>;
}

/// Every built-in loader
pub fn loaders() -> Vec<Box<dyn SceneLoader>> {
    vec![Box::new(ObjLoader), Box::new(GltfLoader)]
}

/// Extensions with a built-in loader
pub fn supported_extensions() -> Vec<&'static str> {
    loaders()
        .iter()
        .flat_map(|loader| loader.extensions().iter().copied())
        .collect()
}

/// Pick a loader by file extension (case-insensitive)
pub fn loader_for_path(path: &Path) -> Option<Box<dyn SceneLoader>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())?;
    loaders()
        .into_iter()
        .find(|loader| loader.extensions().contains(&ext.as_str()))
}

/// Load a scene file with the loader matching its extension
pub fn load_scene(path: &Path, options: &LoadOptions) -> Result<Scene> {
    let Some(loader) = loader_for_path(path) else {
        anyhow::bail!(
            "Unsupported scene format: {:?} (use {})",
            path,
            supported_extensions().join(", ")
        );
    };
    tracing::debug!("Loading {:?} with {} loader", path, loader.name());
    loader.load(path, options)
}

/// Run host operators on every mesh before export
pub fn prepare_scene(scene: &mut Scene, options: &PrepareOptions) {
    if !options.triangulate {
        return;
    }
    for mesh in &mut scene.meshes {
        if !mesh.is_triangulated() {
            *mesh = ops::triangulate(mesh);
        }
    }
}

/// Scene name for a path: its file stem
pub(crate) fn scene_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string())
}
