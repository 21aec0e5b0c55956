//! CPU-side material definitions.
//!
//! - [`Material`] — kind, pipeline state and a flat property list
//! - [`MaterialSemantic`] / [`MaterialValue`] — property tag and typed value
//! - [`MaterialError`] — parameter access failures

mod error;
mod types;

pub use error::{MaterialError, MaterialResult};
pub use types::{
    AlphaMode, Material, MaterialKind, MaterialProperty, MaterialSemantic, MaterialValue,
    MaterialValueKind, TextureRef,
};
