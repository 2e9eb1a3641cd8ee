//! memblob-export - raw mesh blob export tool
//!
//! Converts scene files (OBJ, glTF, GLB) to headerless vertex/index blobs
//! (.vnuv, .vti) and images to shader constant arrays (.cginc)

use anyhow::Result;
use clap::{Parser, Subcommand};
use memblob_shared::MEMBLOB_FORMAT;
use std::path::PathBuf;

// Use modules from library
use memblob_export::{batch, export, inspect, manifest, shader_constant, UvSeamPolicy};

#[derive(Parser)]
#[command(name = "memblob-export")]
#[command(about = "Memblob raw mesh export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build everything listed in a manifest file
    Build {
        /// Path to memblob.toml manifest
        #[arg(default_value = "memblob.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to memblob.toml manifest
        #[arg(default_value = "memblob.toml")]
        manifest: PathBuf,
    },

    /// Export every scene file in a directory
    Batch {
        /// Directory to scan (not recursive)
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Output directory (defaults to the scanned directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave non-triangle faces as they are
        #[arg(long)]
        no_triangulate: bool,

        /// Leave node transforms unapplied
        #[arg(long)]
        no_transforms: bool,

        /// Duplicate vertices whose face corners carry different UVs
        #[arg(long)]
        split_seams: bool,
    },

    /// Export a single scene file
    Mesh {
        /// Input scene file (OBJ/glTF/GLB)
        input: PathBuf,

        /// Output path without extension (defaults to the input path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Duplicate vertices whose face corners carry different UVs
        #[arg(long)]
        split_seams: bool,
    },

    /// Convert an image to a shader constant array
    ShaderConstant {
        /// Input PNG/JPG file
        input: PathBuf,

        /// Output .cginc file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Array name
        #[arg(short, long, default_value = shader_constant::DEFAULT_ARRAY_NAME)]
        name: String,

        /// Values per source line
        #[arg(long, default_value_t = shader_constant::DEFAULT_VALUES_PER_LINE)]
        per_line: usize,
    },

    /// Read back a .vnuv/.vti pair and validate it
    Inspect {
        /// Blob path without extension
        base: PathBuf,
    },
}

fn seam_policy(split_seams: bool) -> UvSeamPolicy {
    if split_seams {
        UvSeamPolicy::SplitSeams
    } else {
        UvSeamPolicy::FirstLoop
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let report = manifest::build_all(&config, output.as_deref())?;
            if let Some(batch) = report.batch {
                if batch.files_failed > 0 {
                    tracing::warn!("{} scene files failed", batch.files_failed);
                }
            }
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Batch {
            dir,
            output,
            no_triangulate,
            no_transforms,
            split_seams,
        } => {
            let config = batch::BatchConfig {
                input_dir: dir,
                output_dir: output,
                triangulate: !no_triangulate,
                apply_transforms: !no_transforms,
                uv_seams: seam_policy(split_seams),
                ..Default::default()
            };
            batch::run_batch(&config, None)?;
        }

        Commands::Mesh {
            input,
            output,
            split_seams,
        } => {
            let options = export::ExportOptions {
                uv_seams: seam_policy(split_seams),
                ..Default::default()
            };
            let report = export::export_file(&input, output.as_deref(), &options)?;
            tracing::info!(
                "Done! {} meshes, {} vertices, {} triangles ({} meshes skipped)",
                report.exported.len(),
                report.vertex_count,
                report.triangle_count,
                report.skipped.len()
            );
        }

        Commands::ShaderConstant {
            input,
            output,
            name,
            per_line,
        } => {
            let output = output
                .unwrap_or_else(|| input.with_extension(MEMBLOB_FORMAT.shader_constant_ext));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let options = shader_constant::ShaderConstantOptions {
                name,
                values_per_line: per_line,
            };
            shader_constant::convert_image(&input, &output, &options)?;
            tracing::info!("Done!");
        }

        Commands::Inspect { base } => {
            let report = inspect::inspect_blob_pair(&base)?;
            tracing::info!(
                "{:?}: {} vertices, {} triangles",
                base,
                report.vertex_count,
                report.triangle_count
            );
            if let Some((min, max)) = report.bounds {
                tracing::info!("Bounds: {:?} .. {:?}", min, max);
            }
        }
    }

    Ok(())
}
