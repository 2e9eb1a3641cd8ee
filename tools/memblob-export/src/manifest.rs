//! Manifest parsing and build orchestration
//!
//! Parses memblob.toml and coordinates batch export and shader constant
//! generation. Relative paths resolve against the manifest's directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use memblob_shared::MEMBLOB_FORMAT;

use crate::batch::{run_batch, BatchConfig, BatchReport};
use crate::scene::supported_extensions;
use crate::shader_constant::{self, ShaderConstantOptions, DEFAULT_VALUES_PER_LINE};

/// Root manifest structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub batch: Option<BatchConfig>,
    /// Keyed by array name
    #[serde(default)]
    pub shader_constants: BTreeMap<String, ShaderConstantEntry>,
    /// Directory holding the manifest
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Shared output directory (next to inputs if unset)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ShaderConstantEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        output: Option<PathBuf>,
        #[serde(default)]
        values_per_line: Option<usize>,
    },
}

impl ShaderConstantEntry {
    pub fn path(&self) -> &Path {
        match self {
            ShaderConstantEntry::Simple(p) => p,
            ShaderConstantEntry::Detailed { path, .. } => path,
        }
    }

    pub fn output(&self) -> Option<&Path> {
        match self {
            ShaderConstantEntry::Simple(_) => None,
            ShaderConstantEntry::Detailed { output, .. } => output.as_deref(),
        }
    }

    pub fn values_per_line(&self) -> usize {
        match self {
            ShaderConstantEntry::Simple(_) => DEFAULT_VALUES_PER_LINE,
            ShaderConstantEntry::Detailed {
                values_per_line, ..
            } => values_per_line.unwrap_or(DEFAULT_VALUES_PER_LINE),
        }
    }
}

/// What a manifest build produced
#[derive(Debug, Default)]
pub struct BuildReport {
    pub batch: Option<BatchReport>,
    pub shader_constants: Vec<PathBuf>,
}

impl Manifest {
    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Batch section with paths made absolute
    fn resolved_batch(&self) -> Option<BatchConfig> {
        self.batch.as_ref().map(|batch| BatchConfig {
            input_dir: self.resolve(&batch.input_dir),
            output_dir: batch
                .output_dir
                .as_ref()
                .or(self.output.dir.as_ref())
                .map(|dir| self.resolve(dir)),
            ..batch.clone()
        })
    }

    fn shader_constant_output(&self, entry: &ShaderConstantEntry) -> PathBuf {
        if let Some(output) = entry.output() {
            return self.resolve(output);
        }
        let input = self.resolve(entry.path());
        let file_name = Path::new(input.file_stem().unwrap_or_default())
            .with_extension(MEMBLOB_FORMAT.shader_constant_ext);
        match &self.output.dir {
            Some(dir) => self.resolve(dir).join(file_name),
            None => input.with_file_name(file_name),
        }
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    manifest.root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(manifest)
}

/// Validate manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.batch.is_none() && manifest.shader_constants.is_empty() {
        anyhow::bail!("Manifest has nothing to build (add [batch] or [shader_constants])");
    }

    if let Some(batch) = manifest.resolved_batch() {
        if !batch.input_dir.is_dir() {
            anyhow::bail!("Batch input directory not found: {:?}", batch.input_dir);
        }
        if batch.extensions.is_empty() {
            anyhow::bail!("Batch extensions list is empty");
        }
        let supported = supported_extensions();
        for ext in &batch.extensions {
            if !supported.iter().any(|s| s.eq_ignore_ascii_case(ext)) {
                anyhow::bail!(
                    "Unsupported batch extension {:?} (use {})",
                    ext,
                    supported.join(", ")
                );
            }
        }
    }

    for (name, entry) in &manifest.shader_constants {
        let path = manifest.resolve(entry.path());
        if !path.exists() {
            anyhow::bail!("Shader constant {}: image not found: {:?}", name, path);
        }
        // Reuse the renderer's checks on name and line width
        shader_constant::render_constant_array(name, &[], entry.values_per_line())
            .with_context(|| format!("Shader constant {}", name))?;
    }

    Ok(())
}

/// Build everything the manifest lists
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<BuildReport> {
    validate(manifest)?;
    let mut report = BuildReport::default();

    if let Some(batch) = manifest.resolved_batch() {
        report.batch = Some(run_batch(&batch, output_override)?);
    }

    for (name, entry) in &manifest.shader_constants {
        let input = manifest.resolve(entry.path());
        let output = match output_override {
            Some(dir) => dir.join(
                manifest
                    .shader_constant_output(entry)
                    .file_name()
                    .unwrap_or_default(),
            ),
            None => manifest.shader_constant_output(entry),
        };
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }

        let options = ShaderConstantOptions {
            name: name.clone(),
            values_per_line: entry.values_per_line(),
        };
        shader_constant::convert_image(&input, &output, &options)?;
        tracing::info!("{:?} -> {:?}", input, output);
        report.shader_constants.push(output);
    }

    Ok(report)
}
