//! Serialized scene-description records.
//!
//! These are the documents an exporter writes and a renderer runtime loads:
//! one [`MeshRecord`] per distinct mesh and one [`SceneRecord`] tying objects,
//! textures and renderer settings together.

use serde::{Deserialize, Serialize};

/// Indexed vertex buffer for one mesh.
///
/// The three attribute arrays are parallel: vertex `i` owns
/// `texcoords[2i..2i+2]`, `vertices[3i..3i+3]` and `normals[3i..3i+3]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRecord {
    pub name: String,
    pub texcoords: Vec<f32>,
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Structural problems in a [`MeshRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("{array} has {len} values, not a multiple of {stride}")]
    Stride {
        array: &'static str,
        len: usize,
        stride: usize,
    },

    #[error("attribute arrays disagree on vertex count (texcoords {texcoords}, vertices {vertices}, normals {normals})")]
    VertexCountMismatch {
        texcoords: usize,
        vertices: usize,
        normals: usize,
    },

    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    #[error("index {index} at position {position} out of range (vertex count {vertex_count})")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
}

impl MeshRecord {
    /// Number of unique vertices described by the attribute arrays.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check the indexed-buffer invariants: strides, matching vertex counts,
    /// whole triangles and in-range indices.
    pub fn validate(&self) -> Result<(), RecordError> {
        for (array, len, stride) in [
            ("texcoords", self.texcoords.len(), 2),
            ("vertices", self.vertices.len(), 3),
            ("normals", self.normals.len(), 3),
        ] {
            if len % stride != 0 {
                return Err(RecordError::Stride { array, len, stride });
            }
        }

        let texcoords = self.texcoords.len() / 2;
        let vertices = self.vertices.len() / 3;
        let normals = self.normals.len() / 3;
        if texcoords != vertices || normals != vertices {
            return Err(RecordError::VertexCountMismatch {
                texcoords,
                vertices,
                normals,
            });
        }

        if self.indices.len() % 3 != 0 {
            return Err(RecordError::PartialTriangle(self.indices.len()));
        }

        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertices)
        {
            return Err(RecordError::IndexOutOfRange {
                position,
                index,
                vertex_count: vertices,
            });
        }

        Ok(())
    }

    /// Parse a record from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Shader and variable names a runtime renderer binds the exported data to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub canvas_id: String,
    pub clear_color: [f32; 4],
    pub clear_depth: f32,
    pub vertex_program_id: String,
    pub fragment_program_id: String,
    pub light_variable_name: String,
    pub sampler2d_variable_name: String,
    pub normal_matrix_variable_name: String,
    pub object_matrix_variable_name: String,
    pub modelview_matrix_variable_name: String,
    pub projection_matrix_variable_name: String,
    /// Attribute names in binding order: normal, texcoord, position
    pub vertex_attribute_names: [String; 3],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            canvas_id: "canvas3d".to_string(),
            clear_color: [0.97, 0.97, 0.97, 1.0],
            clear_depth: 10000.0,
            vertex_program_id: "vprog".to_string(),
            fragment_program_id: "fprog".to_string(),
            light_variable_name: "lightDir".to_string(),
            sampler2d_variable_name: "sampler2d".to_string(),
            normal_matrix_variable_name: "u_normalMatrix".to_string(),
            object_matrix_variable_name: "u_objectMatrix".to_string(),
            modelview_matrix_variable_name: "u_modelViewMatrix".to_string(),
            projection_matrix_variable_name: "u_projMatrix".to_string(),
            vertex_attribute_names: [
                "vNormal".to_string(),
                "vTexCoord".to_string(),
                "vPosition".to_string(),
            ],
        }
    }
}

/// Image a runtime should load as a texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRecord {
    /// Identifier objects refer to
    pub id: String,
    /// File name relative to the output root
    pub file: String,
    pub width: u32,
    pub height: u32,
}

/// One placed instance of a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub translate: [f32; 3],
    /// Euler rotation in degrees
    pub rotate: [f32; 3],
    pub scale: [f32; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    /// Mesh record path relative to the output root
    pub mesh: String,
}

/// Top-level scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub name: String,
    pub version: u32,
    pub renderer: RendererConfig,
    pub textures: Vec<TextureRecord>,
    pub objects: Vec<SceneObject>,
    /// Distinct mesh record paths, in load order
    pub meshes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_record() -> MeshRecord {
        MeshRecord {
            name: "Plane".to_string(),
            texcoords: vec![0.0; 8],
            vertices: vec![0.0; 12],
            normals: vec![0.0; 12],
            indices: vec![0, 1, 2, 3, 0, 2],
        }
    }

    #[test]
    fn valid_record_passes() {
        let record = quad_record();
        assert_eq!(record.validate(), Ok(()));
        assert_eq!(record.vertex_count(), 4);
        assert_eq!(record.triangle_count(), 2);
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mut record = quad_record();
        record.indices[4] = 4;
        assert_eq!(
            record.validate(),
            Err(RecordError::IndexOutOfRange {
                position: 4,
                index: 4,
                vertex_count: 4
            })
        );
    }

    #[test]
    fn mismatched_arrays_are_reported() {
        let mut record = quad_record();
        record.normals.truncate(9);
        assert!(matches!(
            record.validate(),
            Err(RecordError::VertexCountMismatch { normals: 3, .. })
        ));

        let mut record = quad_record();
        record.texcoords.pop();
        assert!(matches!(
            record.validate(),
            Err(RecordError::Stride { array: "texcoords", .. })
        ));

        let mut record = quad_record();
        record.indices.pop();
        assert_eq!(record.validate(), Err(RecordError::PartialTriangle(5)));
    }

    #[test]
    fn parses_exported_json() {
        let text = r#"{"name":"Tri","texcoords":[0,0,1,0,0,1],"vertices":[0,0,0,1,0,0,0,1,0],"normals":[0,0,1,0,0,1,0,0,1],"indices":[0,1,2]}"#;
        let record = MeshRecord::from_json(text).unwrap();
        assert_eq!(record.name, "Tri");
        assert_eq!(record.vertex_count(), 3);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn renderer_config_fills_missing_keys() {
        let config: RendererConfig =
            serde_json::from_str(r#"{"vertex_program_id":"vs"}"#).unwrap();
        assert_eq!(config.vertex_program_id, "vs");
        assert_eq!(config.fragment_program_id, "fprog");
    }
}
