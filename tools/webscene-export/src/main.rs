//! webscene-export - scene export tool
//!
//! Compiles OBJ/glTF meshes into indexed vertex-buffer records and writes the
//! scene description a web runtime loads.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

// Use modules from library
use webscene_export::{manifest, scene, WEB_SCENE_LAYOUT};

#[derive(Parser)]
#[command(name = "webscene-export")]
#[command(about = "webscene mesh and scene export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a scene from a manifest file
    Build {
        /// Path to scene.toml manifest
        #[arg(default_value = "scene.toml")]
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
        /// Path to scene.toml manifest
        #[arg(default_value = "scene.toml")]
        manifest: PathBuf,
    },

    /// Compile a single mesh file into a mesh record
    Mesh {
        /// Input mesh file (OBJ/glTF/GLB)
        input: PathBuf,

        /// Output record file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Record name (default: cleaned file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Mesh index inside glTF files (default: first mesh)
        #[arg(long)]
        mesh_index: Option<usize>,
    },

    /// Validate a mesh record and print its statistics
    Inspect {
        /// Mesh record file
        record: PathBuf,
    },
}

/// Directory relative manifest paths resolve against
fn manifest_dir(manifest: &Path) -> PathBuf {
    manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
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
                tracing::info!("Building scene from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let base_dir = manifest_dir(&manifest);
            manifest::validate(&config, &base_dir)?;
            let report = scene::build_scene(&config, &base_dir, output.as_deref())?;
            if !report.failed_meshes.is_empty() {
                tracing::warn!(
                    "{} mesh(es) failed: {}",
                    report.failed_meshes.len(),
                    report.failed_meshes.join(", ")
                );
            }
            tracing::info!("Build complete: {:?}", report.scene_record);
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config, &manifest_dir(&manifest))?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Mesh {
            input,
            output,
            name,
            mesh_index,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(WEB_SCENE_LAYOUT.mesh_ext));
            let name = name.unwrap_or_else(|| {
                let stem = input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("mesh");
                manifest::clean_name(stem)
            });
            tracing::info!("Compiling {:?} -> {:?}", input, output);
            scene::export_mesh(&input, &output, &name, mesh_index)?;
            tracing::info!("Done!");
        }

        Commands::Inspect { record } => {
            let mesh = scene::load_mesh_record(&record)?;
            println!("name:      {}", mesh.name);
            println!("vertices:  {}", mesh.vertex_count());
            println!("triangles: {}", mesh.triangle_count());
            println!("indices:   {}", mesh.indices.len());
        }
    }

    Ok(())
}
