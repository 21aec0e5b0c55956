//! # Skein Core
//!
//! Mesh resources, materials, geometry buffer decoding and math helpers
//! shared by the Skein scene graph.

pub mod geometry;
pub mod material;
pub mod math;
pub mod mesh;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
