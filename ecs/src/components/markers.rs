//! Marker and tuning components read by the subtree operations.

/// Excludes an entity from [`add_mesh_outline`](crate::meshes::add_mesh_outline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IgnoreOutlineGeneration;

/// Requests a back face for the entity and its descendants when
/// [`add_double_side`](crate::meshes::add_double_side) runs with
/// [`DoubleSideOptions::only_marked`](crate::meshes::DoubleSideOptions::only_marked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerateDoubleSide;

/// Render opacity multiplier of an entity and its descendants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(pub f32);

impl Default for Opacity {
    fn default() -> Self {
        Self(1.0)
    }
}

crate::component::impl_component!(IgnoreOutlineGeneration, GenerateDoubleSide, Opacity);
