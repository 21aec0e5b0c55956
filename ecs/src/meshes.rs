//! Mesh operations over a subtree.
//!
//! Each operation visits the [`ModelComponent`]s of enabled entities in
//! pre-order and swaps in a regenerated component. A failure on one entity
//! leaves that entity's component untouched and the walk continues.

use skein_core::material::Material;
use skein_core::mesh::{MeshResource, MeshResult, OutlineParams};

use crate::component::{Component, ComponentKind};
use crate::components::{
    GenerateDoubleSide, IgnoreOutlineGeneration, ModelComponent, SavedMeshResource,
};
use crate::hierarchy::is_enabled_in_hierarchy;
use crate::traversal::{collect_with, find_ancestor_with};
use crate::{Entity, TraversalReport, World};

/// Knobs for [`add_double_side`].
#[derive(Debug, Clone, Default)]
pub struct DoubleSideOptions {
    /// Material for the back faces. `None` reuses each part's own material.
    pub back_material: Option<Material>,
    /// Entities carrying any of these components are left single-sided.
    pub ignore: Vec<ComponentKind>,
    /// Only touch entities at or below a [`GenerateDoubleSide`] marker.
    pub only_marked: bool,
}

impl DoubleSideOptions {
    #[must_use]
    pub fn with_back_material(mut self, material: Material) -> Self {
        self.back_material = Some(material);
        self
    }

    #[must_use]
    pub fn with_ignored<T: Component>(self) -> Self {
        self.with_ignored_kind(ComponentKind::of::<T>())
    }

    #[must_use]
    pub fn with_ignored_kind(mut self, kind: ComponentKind) -> Self {
        self.ignore.push(kind);
        self
    }

    #[must_use]
    pub fn with_only_marked(mut self, only_marked: bool) -> Self {
        self.only_marked = only_marked;
        self
    }
}

/// Model entities of the subtree that are enabled in the hierarchy.
///
/// Unlike the parameter operations, a disabled entity does not hide its
/// descendants from the walk; each entity is judged on its own chain.
fn enabled_models(world: &World, root: Entity) -> Vec<Entity> {
    collect_with::<ModelComponent>(world, root)
        .into_iter()
        .filter(|&e| is_enabled_in_hierarchy(world, e))
        .collect()
}

/// Rebuilds the model of every entity in `entities` with `generate`.
fn regenerate_models(
    world: &mut World,
    entities: impl IntoIterator<Item = Entity>,
    mut generate: impl FnMut(&ModelComponent) -> MeshResult<ModelComponent>,
) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in entities {
        let Some(model) = world.get::<ModelComponent>(entity) else {
            continue;
        };
        match generate(model) {
            Ok(model) => {
                world.insert(entity, model);
                report.record_update(entity);
            }
            Err(err) => report.record_failure(entity, err),
        }
    }
    report
}

/// Adds an outline shell and its occluder to every enabled model.
///
/// Entities with [`IgnoreOutlineGeneration`] are skipped. Each updated model
/// gets `outline_material` and an occlusion material appended.
pub fn add_mesh_outline(
    world: &mut World,
    root: Entity,
    outline_material: &Material,
    params: &OutlineParams,
) -> TraversalReport {
    if let Err(err) = params.validate() {
        let mut report = TraversalReport::new();
        report.record_failure(root, err);
        return report;
    }

    let entities: Vec<_> = enabled_models(world, root)
        .into_iter()
        .filter(|&e| !world.has::<IgnoreOutlineGeneration>(e))
        .collect();
    let report = regenerate_models(world, entities, |model| {
        model.generate_outline(outline_material.clone(), params)
    });
    log::debug!("outlined {} models", report.updated.len());
    report
}

/// Detaches every enabled model from meshes it shares with other entities.
pub fn make_mesh_resources_unique(world: &mut World, root: Entity) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in enabled_models(world, root) {
        let Some(model) = world.get_mut::<ModelComponent>(entity) else {
            continue;
        };
        match model.make_mesh_unique() {
            Ok(()) => report.record_update(entity),
            Err(err) => report.record_failure(entity, err),
        }
    }
    report
}

/// Adds back faces to every enabled model that `options` selects.
pub fn add_double_side(
    world: &mut World,
    root: Entity,
    options: &DoubleSideOptions,
) -> TraversalReport {
    let entities: Vec<_> = enabled_models(world, root)
        .into_iter()
        .filter(|&e| !options.ignore.iter().any(|&kind| world.has_kind(e, kind)))
        .filter(|&e| {
            !options.only_marked || find_ancestor_with::<GenerateDoubleSide>(world, e).is_some()
        })
        .collect();
    let report = regenerate_models(world, entities, |model| {
        model.generate_double_sided(options.back_material.clone())
    });
    log::debug!("double-sided {} models", report.updated.len());
    report
}

/// Snapshots the mesh of every model in the subtree.
///
/// The snapshot is a separate resource, so later in-place replacement of the
/// model's mesh does not reach it. Entities already holding a
/// [`SavedMeshResource`] keep their first snapshot.
pub fn save_original_mesh(world: &mut World, root: Entity) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in collect_with::<ModelComponent>(world, root) {
        if world.has::<SavedMeshResource>(entity) {
            continue;
        }
        let Some(model) = world.get::<ModelComponent>(entity) else {
            continue;
        };
        match MeshResource::generate(model.mesh.contents()) {
            Ok(original_mesh) => {
                world.insert(entity, SavedMeshResource { original_mesh });
                report.record_update(entity);
            }
            Err(err) => report.record_failure(entity, err),
        }
    }
    report
}

/// Puts saved meshes back and removes the snapshot.
pub fn restore_original_mesh(world: &mut World, root: Entity) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in collect_with::<SavedMeshResource>(world, root) {
        if !world.has::<ModelComponent>(entity) {
            continue;
        }
        let Some(saved) = world.remove::<SavedMeshResource>(entity) else {
            continue;
        };
        if let Some(model) = world.get_mut::<ModelComponent>(entity) {
            model.mesh = saved.original_mesh;
            report.record_update(entity);
        }
    }
    report
}
