mod disabled;
mod hierarchy;
mod markers;
mod model;
mod name;
mod saved;
mod skeleton;
mod transform;

pub use disabled::Disabled;
pub use hierarchy::{Children, Parent};
pub use markers::{GenerateDoubleSide, IgnoreOutlineGeneration, Opacity};
pub use model::ModelComponent;
pub use name::Name;
pub use saved::{SavedMaterialParam, SavedMaterials, SavedMeshResource};
pub use skeleton::SkeletalPose;
pub use transform::Transform;
