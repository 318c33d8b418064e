//! Mesh compilation errors

/// Boxed error returned by an attribute provider.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What is wrong with a malformed face.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaceDefect {
    #[error("{0} corners (expected 3 or 4)")]
    CornerCount(usize),

    #[error("corner {corner} {attribute} has {found} components (expected {expected})")]
    Arity {
        corner: usize,
        attribute: &'static str,
        found: usize,
        expected: usize,
    },
}

/// Failure while compiling one mesh. No partial output accompanies an error.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// Face shape or attribute arity the compiler cannot handle
    #[error("malformed face {face}: {defect}")]
    MalformedFace { face: usize, defect: FaceDefect },

    /// The host could not supply a corner's attributes
    #[error("attribute provider failed for face {face} corner {corner}")]
    AttributeProvider {
        face: usize,
        corner: usize,
        #[source]
        source: ProviderError,
    },
}

impl MeshError {
    pub fn is_malformed_face(&self) -> bool {
        matches!(self, MeshError::MalformedFace { .. })
    }
}
