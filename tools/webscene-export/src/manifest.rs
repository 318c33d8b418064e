//! Scene manifest parsing
//!
//! Parses scene.toml: output location, renderer settings, runtime files,
//! textures and the objects to export.

use anyhow::{Context, Result};
use hashbrown::{HashMap, HashSet};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use webscene_shared::RendererConfig;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    /// Runtime bundle: file name in the script directory -> source path
    #[serde(default)]
    pub runtime: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub textures: Vec<TextureEntry>,
    #[serde(default)]
    pub objects: Vec<ObjectEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Scene record basename
    #[serde(default = "default_scene_name")]
    pub scene: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            scene: default_scene_name(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out/")
}

fn default_scene_name() -> String {
    "scene".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TextureEntry {
    Simple(PathBuf),
    Detailed { path: PathBuf },
}

impl TextureEntry {
    pub fn path(&self) -> &Path {
        match self {
            TextureEntry::Simple(p) => p,
            TextureEntry::Detailed { path } => path,
        }
    }

    /// File name objects use to reference this texture.
    pub fn file_name(&self) -> Option<&str> {
        self.path().file_name().and_then(|n| n.to_str())
    }
}

/// One placed mesh instance
#[derive(Debug, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    /// Mesh source (.obj, .gltf, .glb)
    pub mesh: PathBuf,
    /// Mesh data name shared by instances; defaults to the source file stem
    #[serde(default)]
    pub data: Option<String>,
    /// Mesh to pick inside glTF sources
    #[serde(default)]
    pub mesh_index: Option<usize>,
    #[serde(default)]
    pub translate: [f32; 3],
    /// Euler angles in degrees
    #[serde(default)]
    pub rotate: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    /// Texture file name (must match a declared texture)
    #[serde(default)]
    pub texture: Option<String>,
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl ObjectEntry {
    /// Cleaned mesh data name used for the record file.
    pub fn data_name(&self) -> String {
        let raw = match &self.data {
            Some(data) => data.as_str(),
            None => self
                .mesh
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&self.name),
        };
        clean_name(raw)
    }
}

impl SceneManifest {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse scene manifest")
    }
}

/// Make a name safe for record files and runtime identifiers.
///
/// `.`, `-` and path separators become `_`, double quotes are dropped.
pub fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|&c| c != '"')
        .map(|c| match c {
            '.' | '-' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<SceneManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    SceneManifest::parse(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Validate a manifest without building
///
/// Relative paths resolve against `base_dir`.
pub fn validate(manifest: &SceneManifest, base_dir: &Path) -> Result<()> {
    let mut names = HashSet::new();
    let mut data_sources: HashMap<String, (&Path, Option<usize>)> = HashMap::new();

    let mut texture_files = HashSet::new();
    let mut texture_ids: HashMap<String, &str> = HashMap::new();
    for file in manifest.textures.iter().filter_map(TextureEntry::file_name) {
        if !texture_files.insert(file) {
            continue;
        }
        if let Some(existing) = texture_ids.insert(clean_name(file), file) {
            anyhow::bail!(
                "Textures '{}' and '{}' map to the same id '{}'",
                existing,
                file,
                clean_name(file)
            );
        }
    }

    for object in &manifest.objects {
        let name = clean_name(&object.name);
        if !names.insert(name.clone()) {
            anyhow::bail!("Duplicate object name '{}' (after cleaning: '{}')", object.name, name);
        }

        let source = base_dir.join(&object.mesh);
        if !source.exists() {
            anyhow::bail!("Object '{}' mesh not found: {:?}", object.name, source);
        }

        let key = (object.mesh.as_path(), object.mesh_index);
        let data = object.data_name();
        if let Some(existing) = data_sources.insert(data.clone(), key) {
            if existing != key {
                anyhow::bail!(
                    "Mesh data '{}' refers to different sources ({:?} and {:?})",
                    data,
                    existing.0,
                    object.mesh
                );
            }
        }

        if let Some(texture) = &object.texture {
            if !texture_files.contains(texture.as_str()) {
                anyhow::bail!(
                    "Object '{}' uses undeclared texture '{}'",
                    object.name,
                    texture
                );
            }
        }
    }

    for (name, source) in &manifest.runtime {
        let path = base_dir.join(source);
        if !path.is_file() {
            anyhow::bail!("Runtime asset '{}' source not found: {:?}", name, path);
        }
    }

    Ok(())
}
