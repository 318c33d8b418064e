//! Output layout for exported scenes.
//!
//! `SceneLayout` is the single source of truth for where an exporter places
//! records inside its output directory and what a runtime expects to find.
//!
//! # Example
//!
//! ```
//! use webscene_shared::WEB_SCENE_LAYOUT;
//!
//! assert_eq!(WEB_SCENE_LAYOUT.script_dir, "js");
//! assert_eq!(WEB_SCENE_LAYOUT.mesh_record_path("Cube"), "js/Cube.json");
//! ```

/// Directory and extension conventions for an exported scene.
#[derive(Debug, Clone, Copy)]
pub struct SceneLayout {
    /// Directory (relative to the output root) holding records and runtime files
    pub script_dir: &'static str,

    /// Mesh record extension without dot
    pub mesh_ext: &'static str,

    /// Scene record extension without dot
    pub scene_ext: &'static str,

    /// Scene record format version
    pub version: u32,
}

impl SceneLayout {
    pub const fn new(
        script_dir: &'static str,
        mesh_ext: &'static str,
        scene_ext: &'static str,
        version: u32,
    ) -> Self {
        Self {
            script_dir,
            mesh_ext,
            scene_ext,
            version,
        }
    }

    /// Path of a mesh record relative to the output root, using `/` separators.
    pub fn mesh_record_path(&self, data_name: &str) -> String {
        format!("{}/{}.{}", self.script_dir, data_name, self.mesh_ext)
    }

    /// Path of the scene record relative to the output root.
    pub fn scene_record_path(&self, scene_name: &str) -> String {
        format!("{}/{}.{}", self.script_dir, scene_name, self.scene_ext)
    }
}

/// Layout used by the web exporter.
pub const WEB_SCENE_LAYOUT: SceneLayout = SceneLayout::new("js", "json", "json", 1);
