//! Backups attached by the save/restore helpers.

use skein_core::material::{Material, MaterialValue};
use skein_core::mesh::MeshResource;

/// Material list captured before a replacement.
///
/// Its presence marks the entity as "materials saved"; restoring removes it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavedMaterials {
    pub original_materials: Vec<Material>,
}

/// Mesh captured before an in-place mesh edit.
#[derive(Debug, Clone)]
pub struct SavedMeshResource {
    pub original_mesh: MeshResource,
}

/// Original value of one named shader-graph parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedMaterialParam {
    pub name: String,
    pub original_value: MaterialValue,
}

impl SavedMaterialParam {
    pub fn new(name: impl Into<String>, original_value: MaterialValue) -> Self {
        Self {
            name: name.into(),
            original_value,
        }
    }
}

crate::component::impl_component!(SavedMaterials, SavedMeshResource, SavedMaterialParam);
