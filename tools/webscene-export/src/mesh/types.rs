//! Types for mesh compilation

use webscene_shared::MeshRecord;

/// Components per position
pub const POSITION_COMPONENTS: usize = 3;
/// Components per normal
pub const NORMAL_COMPONENTS: usize = 3;
/// Components per texture coordinate
pub const TEX_COORD_COMPONENTS: usize = 2;

/// Largest vertex count addressable with u16 indices (WebGL 1 element limit).
pub const MAX_U16_VERTICES: usize = u16::MAX as usize + 1;

/// Attributes a host reports for one face corner.
///
/// Slices are checked for arity by the compiler; `tex_coord` is `None` when
/// the mesh has no texture-coordinate layer and then defaults to (0, 0).
#[derive(Debug, Clone, Copy)]
pub struct CornerAttributes<'a> {
    pub position: &'a [f32],
    pub normal: &'a [f32],
    pub tex_coord: Option<&'a [f32]>,
}

/// One deduplicated vertex: `[u, v, px, py, pz, nx, ny, nz]`.
///
/// Equality is exact `f32` equality per component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexAttributes(pub [f32; 8]);

impl VertexAttributes {
    pub fn new(tex_coord: [f32; 2], position: [f32; 3], normal: [f32; 3]) -> Self {
        let [u, v] = tex_coord;
        let [px, py, pz] = position;
        let [nx, ny, nz] = normal;
        Self([u, v, px, py, pz, nx, ny, nz])
    }

    pub fn tex_coord(&self) -> &[f32] {
        &self.0[0..2]
    }

    pub fn position(&self) -> &[f32] {
        &self.0[2..5]
    }

    pub fn normal(&self) -> &[f32] {
        &self.0[5..8]
    }
}

/// Result of mesh compilation: parallel attribute arrays plus triangle indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledMesh {
    /// 2 floats per vertex
    pub texcoords: Vec<f32>,
    /// 3 floats per vertex
    pub positions: Vec<f32>,
    /// 3 floats per vertex
    pub normals: Vec<f32>,
    /// Triangle list into the attribute arrays
    pub indices: Vec<u32>,
}

impl CompiledMesh {
    pub(crate) fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            texcoords: Vec::with_capacity(vertices * TEX_COORD_COMPONENTS),
            positions: Vec::with_capacity(vertices * POSITION_COMPONENTS),
            normals: Vec::with_capacity(vertices * NORMAL_COMPONENTS),
            indices: Vec::with_capacity(indices),
        }
    }

    pub(crate) fn push_vertex(&mut self, vertex: &VertexAttributes) {
        self.texcoords.extend_from_slice(vertex.tex_coord());
        self.positions.extend_from_slice(vertex.position());
        self.normals.extend_from_slice(vertex.normal());
    }

    /// Number of unique vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether every index fits a 16-bit element buffer.
    pub fn fits_u16_indices(&self) -> bool {
        self.vertex_count() <= MAX_U16_VERTICES
    }

    /// Attributes of unique vertex `index`, if it exists.
    pub fn vertex(&self, index: usize) -> Option<VertexAttributes> {
        if index >= self.vertex_count() {
            return None;
        }
        let t = &self.texcoords[index * 2..index * 2 + 2];
        let p = &self.positions[index * 3..index * 3 + 3];
        let n = &self.normals[index * 3..index * 3 + 3];
        Some(VertexAttributes::new(
            [t[0], t[1]],
            [p[0], p[1], p[2]],
            [n[0], n[1], n[2]],
        ))
    }

    /// Package as a serializable scene record.
    pub fn to_record(&self, name: &str) -> MeshRecord {
        MeshRecord {
            name: name.to_string(),
            texcoords: self.texcoords.clone(),
            vertices: self.positions.clone(),
            normals: self.normals.clone(),
            indices: self.indices.clone(),
        }
    }
}
