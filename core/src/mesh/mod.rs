//! Mesh resources, topology passes and generators.
//!
//! - [`MeshContents`] - Editable models, instances and skeletons
//! - [`MeshResource`] - Shared, validated mesh referenced by entities
//! - [`topology`] - Double-sided and outline passes over contents
//! - [`generators`] - Box, cone and sphere shapes

mod data;
mod error;
pub mod generators;
pub mod topology;

pub use data::{
    DEFAULT_INSTANCE_ID, DEFAULT_MODEL_ID, DEFAULT_PART_ID, JointInfluence, JointInfluences,
    MeshContents, MeshInstance, MeshModel, MeshPart, MeshResource, MeshSkeleton,
};
pub use error::{MeshError, MeshResult};
pub use topology::{
    DEFAULT_OCCLUDER_INSET_RATIO, OCCLUDER_SUFFIX, OTHER_SIDE_SUFFIX, OUTLINE_SUFFIX,
    OutlineParams,
};
