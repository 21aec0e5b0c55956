//! Errors raised while building or transforming mesh resources.

use thiserror::Error;

/// Failure of a mesh generation or topology operation.
///
/// Every variant names the model and part (or instance) involved so that
/// callers walking a large hierarchy can report which asset was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A topology operation needs per-vertex normals and the part has none.
    #[error("part '{part}' of model '{model}' has no normals")]
    MissingNormals { model: String, part: String },

    /// A topology operation needs triangle indices and the part has none.
    #[error("part '{part}' of model '{model}' has no triangle indices")]
    MissingTriangleIndices { model: String, part: String },

    /// Outline offsets must be finite and strictly positive.
    #[error("invalid outline offset {0}")]
    InvalidOffset(f32),

    /// Occluder inset ratios must be finite and non-negative.
    #[error("invalid occluder inset ratio {0}")]
    InvalidInsetRatio(f32),

    /// Two entries of the same collection share an identifier.
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    /// An instance references a model that is not part of the contents.
    #[error("instance '{instance}' references unknown model '{model}'")]
    UnknownModel { instance: String, model: String },

    /// A per-vertex attribute does not have one entry per position.
    #[error("part '{part}': {attribute} has {actual} entries, expected {expected}")]
    AttributeLength {
        part: String,
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A triangle index points past the end of the position array.
    #[error("part '{part}': index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        part: String,
        index: u32,
        vertex_count: usize,
    },

    /// The index list does not describe whole triangles.
    #[error("part '{part}': {count} indices do not form whole triangles")]
    IncompleteTriangle { part: String, count: usize },
}

/// Result alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
