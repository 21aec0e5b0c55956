//! Mesh resource data structures.
//!
//! This module provides:
//! - [`MeshPart`] - A single drawable piece of geometry bound to one material slot
//! - [`MeshModel`] - A named collection of parts
//! - [`MeshInstance`] - A placement of a model with its own transform
//! - [`MeshSkeleton`] - Joint names used by skinned parts
//! - [`MeshContents`] - The full editable description of a mesh
//! - [`MeshResource`] - A shared, generated mesh that entities reference

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::math::{Mat4, Vec3};

use super::error::{MeshError, MeshResult};

/// Identifier used for the single model built by the convenience constructors.
pub const DEFAULT_MODEL_ID: &str = "model";
/// Identifier used for the single instance built by the convenience constructors.
pub const DEFAULT_INSTANCE_ID: &str = "main";
/// Identifier used for the single part built by the convenience constructors.
pub const DEFAULT_PART_ID: &str = "part";

/// One joint weight attached to a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointInfluence {
    /// Index into the skeleton's joint list.
    pub joint_index: u32,
    /// Blend weight of the joint.
    pub weight: f32,
}

impl JointInfluence {
    pub const fn new(joint_index: u32, weight: f32) -> Self {
        Self {
            joint_index,
            weight,
        }
    }
}

/// Flat per-vertex joint influences.
///
/// Vertex `v` owns the entries
/// `influences[v * influences_per_vertex..(v + 1) * influences_per_vertex]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JointInfluences {
    pub influences: Vec<JointInfluence>,
    pub influences_per_vertex: usize,
}

impl JointInfluences {
    pub fn new(influences: Vec<JointInfluence>, influences_per_vertex: usize) -> Self {
        Self {
            influences,
            influences_per_vertex,
        }
    }

    /// Influences of a single vertex, or `None` if the vertex is out of range.
    pub fn vertex(&self, vertex: usize) -> Option<&[JointInfluence]> {
        let start = vertex.checked_mul(self.influences_per_vertex)?;
        self.influences.get(start..start + self.influences_per_vertex)
    }
}

/// A drawable piece of geometry bound to one material slot of its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub id: String,
    /// Index into the owning model component's material list.
    pub material_index: usize,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    /// Triangle list, three indices per triangle.
    pub triangle_indices: Option<Vec<u32>>,
    pub joint_influences: Option<JointInfluences>,
}

impl MeshPart {
    /// Creates an empty part using the given material slot.
    pub fn new(id: impl Into<String>, material_index: usize) -> Self {
        Self {
            id: id.into(),
            material_index,
            positions: Vec::new(),
            normals: None,
            triangle_indices: None,
            joint_influences: None,
        }
    }

    #[must_use]
    pub fn with_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = positions;
        self
    }

    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    #[must_use]
    pub fn with_triangle_indices(mut self, indices: Vec<u32>) -> Self {
        self.triangle_indices = Some(indices);
        self
    }

    #[must_use]
    pub fn with_joint_influences(mut self, influences: JointInfluences) -> Self {
        self.joint_influences = Some(influences);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.as_ref().map_or(0, |i| i.len() / 3)
    }

    fn validate(&self) -> MeshResult<()> {
        let vertex_count = self.positions.len();

        if let Some(normals) = &self.normals
            && normals.len() != vertex_count
        {
            return Err(MeshError::AttributeLength {
                part: self.id.clone(),
                attribute: "normals",
                expected: vertex_count,
                actual: normals.len(),
            });
        }

        if let Some(indices) = &self.triangle_indices {
            if indices.len() % 3 != 0 {
                return Err(MeshError::IncompleteTriangle {
                    part: self.id.clone(),
                    count: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    part: self.id.clone(),
                    index,
                    vertex_count,
                });
            }
        }

        if let Some(joints) = &self.joint_influences {
            let expected = joints.influences_per_vertex * vertex_count;
            if joints.influences.len() != expected {
                return Err(MeshError::AttributeLength {
                    part: self.id.clone(),
                    attribute: "joint influences",
                    expected,
                    actual: joints.influences.len(),
                });
            }
        }

        Ok(())
    }
}

/// A named collection of parts.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshModel {
    pub id: String,
    pub parts: Vec<MeshPart>,
}

impl MeshModel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_part(mut self, part: MeshPart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn part(&self, id: &str) -> Option<&MeshPart> {
        self.parts.iter().find(|p| p.id == id)
    }
}

/// A placement of a model inside the resource.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    pub id: String,
    /// Identifier of the referenced [`MeshModel`].
    pub model: String,
    pub transform: Mat4,
}

impl MeshInstance {
    pub fn new(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            transform: Mat4::identity(),
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

/// Joint names of a skeleton referenced by skinned parts.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSkeleton {
    pub id: String,
    pub joint_names: Vec<String>,
}

impl MeshSkeleton {
    pub fn new(id: impl Into<String>, joint_names: Vec<String>) -> Self {
        Self {
            id: id.into(),
            joint_names,
        }
    }
}

/// Editable description of a mesh: models, instances and skeletons.
///
/// Contents are plain data. They become usable by entities once turned into a
/// [`MeshResource`] through [`MeshResource::generate`], which validates them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshContents {
    pub models: Vec<MeshModel>,
    pub instances: Vec<MeshInstance>,
    pub skeletons: Vec<MeshSkeleton>,
}

impl MeshContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents with one part wrapped in model `"model"` and instance `"main"`.
    pub fn single_part(part: MeshPart) -> Self {
        Self {
            models: vec![MeshModel::new(DEFAULT_MODEL_ID).with_part(part)],
            instances: vec![MeshInstance::new(DEFAULT_INSTANCE_ID, DEFAULT_MODEL_ID)],
            skeletons: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: MeshModel) -> Self {
        self.models.push(model);
        self
    }

    #[must_use]
    pub fn with_instance(mut self, instance: MeshInstance) -> Self {
        self.instances.push(instance);
        self
    }

    #[must_use]
    pub fn with_skeleton(mut self, skeleton: MeshSkeleton) -> Self {
        self.skeletons.push(skeleton);
        self
    }

    pub fn model(&self, id: &str) -> Option<&MeshModel> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn instance(&self, id: &str) -> Option<&MeshInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    /// Iterates over every part of every model.
    pub fn parts(&self) -> impl Iterator<Item = &MeshPart> {
        self.models.iter().flat_map(|m| m.parts.iter())
    }

    /// Highest material slot referenced by any part, if any part exists.
    pub fn max_material_index(&self) -> Option<usize> {
        self.parts().map(|p| p.material_index).max()
    }

    /// Checks identifier uniqueness, instance references and per-part
    /// attribute consistency.
    pub fn validate(&self) -> MeshResult<()> {
        ensure_unique("model", self.models.iter().map(|m| m.id.as_str()))?;
        ensure_unique("instance", self.instances.iter().map(|i| i.id.as_str()))?;
        ensure_unique("skeleton", self.skeletons.iter().map(|s| s.id.as_str()))?;

        for model in &self.models {
            ensure_unique("part", model.parts.iter().map(|p| p.id.as_str()))?;
            for part in &model.parts {
                part.validate()?;
            }
        }

        for instance in &self.instances {
            if self.model(&instance.model).is_none() {
                return Err(MeshError::UnknownModel {
                    instance: instance.id.clone(),
                    model: instance.model.clone(),
                });
            }
        }

        Ok(())
    }

    /// Recomputes `influences_per_vertex` of every skinned part from the
    /// length of its influence list.
    ///
    /// Does nothing when the contents carry no skeletons.
    pub fn refresh_joint_influences(&mut self) {
        if self.skeletons.is_empty() {
            return;
        }
        for part in self.models.iter_mut().flat_map(|m| m.parts.iter_mut()) {
            let vertex_count = part.positions.len();
            if vertex_count == 0 {
                continue;
            }
            if let Some(joints) = part.joint_influences.as_mut() {
                if joints.influences.len() % vertex_count != 0 {
                    log::warn!(
                        "part '{}': {} joint influences do not divide evenly over {} vertices",
                        part.id,
                        joints.influences.len(),
                        vertex_count
                    );
                }
                joints.influences_per_vertex = joints.influences.len() / vertex_count;
            }
        }
    }
}

fn ensure_unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> MeshResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(MeshError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// A generated mesh shared by every entity that references it.
///
/// Cloning a `MeshResource` clones the handle, not the data: all clones observe
/// [`replace`](Self::replace). Use [`MeshResource::generate`] on a copy of the
/// contents to obtain an independent resource.
#[derive(Clone)]
pub struct MeshResource {
    contents: Arc<RwLock<MeshContents>>,
}

impl MeshResource {
    /// Validates `contents` and wraps them in a new, unshared resource.
    pub fn generate(contents: MeshContents) -> MeshResult<Self> {
        contents.validate()?;
        Ok(Self {
            contents: Arc::new(RwLock::new(contents)),
        })
    }

    /// Returns an owned copy of the current contents.
    pub fn contents(&self) -> MeshContents {
        self.contents.read().clone()
    }

    /// Borrows the current contents without copying.
    pub fn read(&self) -> RwLockReadGuard<'_, MeshContents> {
        self.contents.read()
    }

    /// Replaces the contents in place. Every holder of this resource sees the change.
    pub fn replace(&self, contents: MeshContents) -> MeshResult<()> {
        contents.validate()?;
        *self.contents.write() = contents;
        Ok(())
    }

    /// Returns `true` if both handles point at the same underlying mesh.
    pub fn shares_storage_with(&self, other: &MeshResource) -> bool {
        Arc::ptr_eq(&self.contents, &other.contents)
    }

    /// Number of handles currently referencing this mesh.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.contents)
    }
}

impl fmt::Debug for MeshResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contents = self.contents.read();
        f.debug_struct("MeshResource")
            .field("models", &contents.models.len())
            .field("instances", &contents.instances.len())
            .field("skeletons", &contents.skeletons.len())
            .field("handles", &Arc::strong_count(&self.contents))
            .finish()
    }
}
