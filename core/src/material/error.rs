use thiserror::Error;

use super::types::{MaterialKind, MaterialValueKind};

/// Material parameter access errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    #[error("{0} material has no named parameters")]
    NotShaderGraph(MaterialKind),

    #[error("{0} material has no PBR inputs")]
    NotPhysicallyBased(MaterialKind),

    #[error("unknown material parameter '{0}'")]
    UnknownParameter(String),

    #[error("parameter '{name}' holds {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: MaterialValueKind,
        actual: MaterialValueKind,
    },
}

pub type MaterialResult<T> = Result<T, MaterialError>;
