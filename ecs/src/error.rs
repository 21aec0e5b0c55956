//! Error types for scene operations.

use skein_core::geometry::GeometryError;
use skein_core::material::{MaterialError, MaterialValueKind};
use skein_core::mesh::MeshError;
use thiserror::Error;

use crate::Entity;

/// Failure of a scene operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("{0} is not alive")]
    DeadEntity(Entity),

    #[error("cannot parent {child} under {parent}: it would create a cycle")]
    HierarchyCycle { child: Entity, parent: Entity },

    #[error("{0} has no parent")]
    NoParent(Entity),

    /// The entity's world matrix has no inverse (zero scale on some axis).
    #[error("world transform of {0} is not invertible")]
    SingularTransform(Entity),

    /// Weighted re-application only works on float parameters.
    #[error("saved parameter '{name}' holds {kind}, only floats can be weighted")]
    UnsupportedValueKind {
        name: String,
        kind: MaterialValueKind,
    },

    #[error("joint '{joint}' needs missing ancestor '{missing}'")]
    MissingJoint { joint: String, missing: String },
}

pub type Result<T> = std::result::Result<T, Error>;
