//! Renderable model: a shared mesh plus the materials its parts index into.

use skein_core::material::Material;
use skein_core::mesh::{MeshContents, MeshResource, MeshResult, OutlineParams, topology};

/// A mesh resource and its material list.
///
/// Each mesh part selects a material by `material_index` into
/// [`materials`](Self::materials).
#[derive(Debug, Clone)]
pub struct ModelComponent {
    pub mesh: MeshResource,
    pub materials: Vec<Material>,
}

impl ModelComponent {
    pub fn new(mesh: MeshResource, materials: Vec<Material>) -> Self {
        Self { mesh, materials }
    }

    /// Skeleton count of the current mesh.
    pub fn skeleton_count(&self) -> usize {
        self.mesh.read().skeletons.len()
    }

    /// First material, if any.
    pub fn first_material(&self) -> Option<&Material> {
        self.materials.first()
    }

    /// Gives this component its own copy of the mesh.
    ///
    /// Afterwards, [`MeshResource::replace`] on this component's mesh no
    /// longer affects other holders of the previous resource. Skinned parts
    /// get their influences-per-vertex recomputed. On failure the component
    /// is left untouched.
    pub fn make_mesh_unique(&mut self) -> MeshResult<()> {
        let mut contents = self.mesh.contents();
        contents.refresh_joint_influences();
        self.mesh = MeshResource::generate(contents)?;
        Ok(())
    }

    /// Returns a copy with a reversed-winding duplicate of every model.
    ///
    /// With `back_material`, the material is appended and every duplicate
    /// part uses it; otherwise duplicates keep their original slot.
    pub fn generate_double_sided(&self, back_material: Option<Material>) -> MeshResult<Self> {
        let mut materials = self.materials.clone();
        let back_index = back_material.map(|material| {
            materials.push(material);
            materials.len() - 1
        });

        let contents = topology::double_sided(&self.mesh.read(), back_index)?;
        Ok(Self {
            mesh: regenerate(contents)?,
            materials,
        })
    }

    /// Returns a copy whose mesh also holds an outline shell and its occluder.
    ///
    /// Appends `outline_material` and an occlusion material, in that order.
    pub fn generate_outline(
        &self,
        outline_material: Material,
        params: &OutlineParams,
    ) -> MeshResult<Self> {
        let mut materials = self.materials.clone();
        materials.push(outline_material);
        let outline_index = materials.len() - 1;
        materials.push(Material::occlusion());
        let occluder_index = materials.len() - 1;

        let contents =
            topology::outline(&self.mesh.read(), params, outline_index, occluder_index)?;
        Ok(Self {
            mesh: regenerate(contents)?,
            materials,
        })
    }
}

fn regenerate(mut contents: MeshContents) -> MeshResult<MeshResource> {
    contents.refresh_joint_influences();
    MeshResource::generate(contents)
}

crate::component::impl_component!(ModelComponent);
