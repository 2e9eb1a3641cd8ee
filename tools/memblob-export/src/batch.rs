//! Directory batch export
//!
//! Every scene file in a directory is exported to its own `.vnuv`/`.vti`
//! pair. A file that fails to load or write is logged and counted; the batch
//! moves on to the next one.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::export::{export_file, ExportOptions};
use crate::mesh::UvSeamPolicy;
use crate::scene::{supported_extensions, LoadOptions, PrepareOptions};

/// `[batch]` manifest section, also built from CLI flags
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Output directory (input directory if unset)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_true")]
    pub triangulate: bool,
    #[serde(default = "default_true")]
    pub apply_transforms: bool,
    #[serde(default)]
    pub uv_seams: UvSeamPolicy,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    supported_extensions().into_iter().map(str::to_string).collect()
}

fn default_true() -> bool {
    true
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: None,
            extensions: default_extensions(),
            triangulate: true,
            apply_transforms: true,
            uv_seams: UvSeamPolicy::default(),
        }
    }
}

impl BatchConfig {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            load: LoadOptions {
                apply_transforms: self.apply_transforms,
            },
            prepare: PrepareOptions {
                triangulate: self.triangulate,
            },
            uv_seams: self.uv_seams,
        }
    }
}

/// Totals for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub files_exported: usize,
    pub files_failed: usize,
    pub meshes_exported: usize,
    pub meshes_skipped: usize,
}

/// Scene files directly inside `dir`, sorted by file name
pub fn collect_inputs(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to scan {:?}", dir))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if matches {
            inputs.push(entry.into_path());
        }
    }
    Ok(inputs)
}

/// Export every matching file in the configured directory
///
/// `output_override` wins over `config.output_dir`.
pub fn run_batch(config: &BatchConfig, output_override: Option<&Path>) -> Result<BatchReport> {
    if !config.input_dir.is_dir() {
        anyhow::bail!("Input directory not found: {:?}", config.input_dir);
    }
    let output_dir = output_override
        .map(Path::to_path_buf)
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| config.input_dir.clone());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let inputs = collect_inputs(&config.input_dir, &config.extensions)?;
    tracing::info!(
        "Found {} scene files in {:?}: {:?}",
        inputs.len(),
        config.input_dir,
        inputs
            .iter()
            .filter_map(|p| p.file_name())
            .collect::<Vec<_>>()
    );

    let options = config.export_options();
    let mut report = BatchReport::default();
    // Lowercased stems already claimed, so case-insensitive filesystems agree
    let mut claimed: HashSet<String> = HashSet::new();

    for input in &inputs {
        tracing::info!("Processing {:?}", input);
        let (Some(file_name), Some(stem)) = (input.file_name(), input.file_stem()) else {
            continue;
        };
        if !claimed.insert(stem.to_string_lossy().to_lowercase()) {
            report.files_failed += 1;
            tracing::error!(
                "Failed {:?}: output {:?} already written by an earlier file",
                input,
                stem
            );
            continue;
        }
        // blob_paths swaps the extension, so dotted stems survive
        let output_base = output_dir.join(file_name);

        match export_file(input, Some(&output_base), &options) {
            Ok(export) => {
                report.files_exported += 1;
                report.meshes_exported += export.exported.len();
                report.meshes_skipped += export.skipped.len();
            }
            Err(err) => {
                report.files_failed += 1;
                tracing::error!("Failed {:?}: {:#}", input, err);
            }
        }
    }

    tracing::info!(
        "Done. {} files exported, {} failed, {} meshes exported, {} skipped",
        report.files_exported,
        report.files_failed,
        report.meshes_exported,
        report.meshes_skipped
    );
    Ok(report)
}
