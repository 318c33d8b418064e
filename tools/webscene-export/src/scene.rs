//! Scene build orchestration
//!
//! Compiles every distinct mesh referenced by a manifest, writes one mesh
//! record per mesh data name, registers textures, writes the scene record and
//! provisions the runtime bundle.

use anyhow::{Context, Result};
use hashbrown::HashSet;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use webscene_shared::fs::{read_file_with_limit, MAX_RECORD_BYTES};
use webscene_shared::{MeshRecord, SceneObject, SceneRecord, TextureRecord, WEB_SCENE_LAYOUT};

use crate::formats::mesh_record_string;
use crate::manifest::{clean_name, SceneManifest};
use crate::mesh::{compile_file, CompiledMesh};
use crate::runtime::{AssetBundle, ProvisionOutcome};

/// Summary of a scene build
#[derive(Debug)]
pub struct BuildReport {
    pub scene_record: PathBuf,
    pub mesh_records: Vec<PathBuf>,
    /// Mesh data names that failed to compile and were left out
    pub failed_meshes: Vec<String>,
    pub textures: usize,
    pub objects: usize,
    pub runtime: Vec<ProvisionOutcome>,
}

/// One distinct mesh to compile
struct MeshJob {
    data: String,
    source: PathBuf,
    mesh_index: Option<usize>,
}

/// Compiled mesh plus its serialized record
struct MeshOutput {
    data: String,
    vertex_count: usize,
    index_count: usize,
    fits_u16: bool,
    record: String,
}

fn compile_job(job: &MeshJob) -> Result<MeshOutput> {
    let mesh = compile_file(&job.source, job.mesh_index)?;
    let record = mesh_record_string(&job.data, &mesh)
        .with_context(|| format!("Failed to encode mesh record '{}'", job.data))?;
    Ok(MeshOutput {
        data: job.data.clone(),
        vertex_count: mesh.vertex_count(),
        index_count: mesh.indices.len(),
        fits_u16: mesh.fits_u16_indices(),
        record,
    })
}

/// Build all outputs for a manifest
///
/// Relative manifest paths resolve against `base_dir`; `output_override`
/// replaces `[output] dir`. Meshes that fail to compile are skipped together
/// with their objects; manifest and IO errors abort the build.
pub fn build_scene(
    manifest: &SceneManifest,
    base_dir: &Path,
    output_override: Option<&Path>,
) -> Result<BuildReport> {
    let output_dir = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.join(&manifest.output.dir));
    let script_dir = output_dir.join(WEB_SCENE_LAYOUT.script_dir);
    std::fs::create_dir_all(&script_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", script_dir))?;

    // Distinct mesh data, in order of first use
    let mut seen = HashSet::new();
    let jobs: Vec<MeshJob> = manifest
        .objects
        .iter()
        .filter_map(|object| {
            let data = object.data_name();
            seen.insert(data.clone()).then(|| MeshJob {
                data,
                source: base_dir.join(&object.mesh),
                mesh_index: object.mesh_index,
            })
        })
        .collect();

    // Compile meshes in parallel; order of results follows the jobs
    let results: Vec<(String, Result<MeshOutput>)> = jobs
        .par_iter()
        .map(|job| (job.data.clone(), compile_job(job)))
        .collect();

    let mut mesh_records = Vec::new();
    let mut mesh_paths = Vec::new();
    let mut failed_meshes = Vec::new();

    for (data, result) in results {
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Skipping mesh '{}': {:#}", data, e);
                failed_meshes.push(data);
                continue;
            }
        };

        if !output.fits_u16 {
            tracing::warn!(
                "Mesh '{}' has {} vertices and needs 32-bit indices",
                output.data,
                output.vertex_count
            );
        }

        let relative = WEB_SCENE_LAYOUT.mesh_record_path(&output.data);
        let path = output_dir.join(&relative);
        std::fs::write(&path, &output.record)
            .with_context(|| format!("Failed to write mesh record: {:?}", path))?;
        tracing::info!(
            "Wrote mesh '{}': {} vertices, {} indices -> {:?}",
            output.data,
            output.vertex_count,
            output.index_count,
            path
        );

        mesh_records.push(path);
        mesh_paths.push(relative);
    }

    let textures = register_textures(manifest, base_dir, &output_dir)?;
    let texture_files: HashSet<String> = textures.iter().map(|t| t.file.clone()).collect();

    let objects: Vec<SceneObject> = manifest
        .objects
        .iter()
        .filter_map(|object| {
            let data = object.data_name();
            if failed_meshes.contains(&data) {
                tracing::warn!("Dropping object '{}': mesh '{}' failed", object.name, data);
                return None;
            }

            let texture = object.texture.as_deref().and_then(|file| {
                if texture_files.contains(file) {
                    Some(clean_name(file))
                } else {
                    tracing::warn!("Object '{}' texture '{}' not available", object.name, file);
                    None
                }
            });

            Some(SceneObject {
                name: clean_name(&object.name),
                translate: object.translate,
                rotate: object.rotate,
                scale: object.scale,
                texture,
                mesh: WEB_SCENE_LAYOUT.mesh_record_path(&data),
            })
        })
        .collect();

    let scene_name = clean_name(&manifest.output.scene);
    let record = SceneRecord {
        name: scene_name,
        version: WEB_SCENE_LAYOUT.version,
        renderer: manifest.renderer.clone(),
        textures,
        objects,
        meshes: mesh_paths,
    };

    let scene_record = output_dir.join(WEB_SCENE_LAYOUT.scene_record_path(&record.name));
    write_scene_record(&scene_record, &record)?;
    tracing::info!(
        "Wrote scene '{}': {} objects, {} meshes, {} textures",
        record.name,
        record.objects.len(),
        record.meshes.len(),
        record.textures.len()
    );

    let bundle = AssetBundle::from_sources(&manifest.runtime, base_dir)?;
    let runtime = bundle.provision(&script_dir)?;

    Ok(BuildReport {
        scene_record,
        mesh_records,
        failed_meshes,
        textures: record.textures.len(),
        objects: record.objects.len(),
        runtime,
    })
}

/// Copy declared textures into the output root and record their dimensions.
///
/// Textures are unique by file name; missing sources are skipped.
fn register_textures(
    manifest: &SceneManifest,
    base_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<TextureRecord>> {
    let mut seen = HashSet::new();
    let mut ids = HashSet::new();
    let mut textures = Vec::new();

    for entry in &manifest.textures {
        let Some(file) = entry.file_name() else {
            tracing::warn!("Skipping texture with no file name: {:?}", entry.path());
            continue;
        };
        if !seen.insert(file) {
            continue;
        }

        let id = clean_name(file);
        if !ids.insert(id.clone()) {
            tracing::warn!("Skipping texture '{}': id '{}' is already taken", file, id);
            continue;
        }

        let source = base_dir.join(entry.path());
        if !source.is_file() {
            tracing::warn!("Skipping missing texture: {:?}", source);
            continue;
        }

        let (width, height) = image::image_dimensions(&source)
            .with_context(|| format!("Failed to read texture: {:?}", source))?;

        let target = output_dir.join(file);
        if !target.exists() {
            std::fs::copy(&source, &target)
                .with_context(|| format!("Failed to copy texture to {:?}", target))?;
        }

        tracing::debug!("Texture {} {}x{}", file, width, height);
        textures.push(TextureRecord {
            id,
            file: file.to_string(),
            width,
            height,
        });
    }

    Ok(textures)
}

fn write_scene_record(path: &Path, record: &SceneRecord) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create scene record: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record)
        .with_context(|| format!("Failed to write scene record: {:?}", path))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Compile a single mesh file and write its record.
pub fn export_mesh(
    input: &Path,
    output: &Path,
    name: &str,
    mesh_index: Option<usize>,
) -> Result<CompiledMesh> {
    let mesh = compile_file(input, mesh_index)?;

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    crate::formats::write_mesh_record(&mut writer, name, &mesh)
        .with_context(|| format!("Failed to write mesh record: {:?}", output))?;
    writer.flush()?;

    tracing::info!(
        "Compiled mesh '{}': {} vertices, {} indices ({} triangles)",
        name,
        mesh.vertex_count(),
        mesh.indices.len(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

/// Read a mesh record back and check its invariants.
pub fn load_mesh_record(path: &Path) -> Result<MeshRecord> {
    let bytes = read_file_with_limit(path, MAX_RECORD_BYTES)?;
    let text = std::str::from_utf8(&bytes)
        .with_context(|| format!("Mesh record is not UTF-8: {:?}", path))?;
    let record = MeshRecord::from_json(text)
        .with_context(|| format!("Failed to parse mesh record: {:?}", path))?;
    record
        .validate()
        .with_context(|| format!("Invalid mesh record: {:?}", path))?;
    Ok(record)
}
