//! Material operations over a subtree.
//!
//! Backup and restore of whole material lists, wholesale replacement, and
//! reading or writing named shader-graph parameters. Every mutating
//! operation returns a [`TraversalReport`].

use skein_core::material::{Material, MaterialResult, MaterialValue};

use crate::components::{ModelComponent, SavedMaterialParam, SavedMaterials};
use crate::hierarchy::{is_enabled, is_enabled_in_hierarchy};
use crate::traversal::{collect_pruned, collect_with};
use crate::{Entity, Error, Result, TraversalReport, World};

/// Knobs for [`replace_and_save_materials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceMaterialOptions {
    /// Carry each old material's PBR inputs, except base color, over to its
    /// replacement. Only applies when both materials are physically based.
    pub copy_pbr_inputs: bool,
}

impl ReplaceMaterialOptions {
    #[must_use]
    pub fn with_copy_pbr_inputs(mut self, copy: bool) -> Self {
        self.copy_pbr_inputs = copy;
        self
    }
}

/// Captures the material list of every model in the subtree.
///
/// Entities that already carry [`SavedMaterials`] keep their first backup.
pub fn save_materials(world: &mut World, root: Entity) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in collect_with::<ModelComponent>(world, root) {
        if save_entity_materials(world, entity) {
            report.record_update(entity);
        }
    }
    log::debug!("saved materials of {} entities", report.updated.len());
    report
}

fn save_entity_materials(world: &mut World, entity: Entity) -> bool {
    if world.has::<SavedMaterials>(entity) {
        return false;
    }
    let Some(model) = world.get::<ModelComponent>(entity) else {
        return false;
    };
    let saved = SavedMaterials {
        original_materials: model.materials.clone(),
    };
    world.insert(entity, saved);
    true
}

/// Saves every model's materials, then overwrites each slot with `replacement`.
pub fn replace_and_save_materials(
    world: &mut World,
    root: Entity,
    replacement: &Material,
    options: &ReplaceMaterialOptions,
) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in collect_with::<ModelComponent>(world, root) {
        save_entity_materials(world, entity);
        let Some(model) = world.get_mut::<ModelComponent>(entity) else {
            continue;
        };
        match replaced_materials(&model.materials, replacement, options) {
            Ok(materials) => {
                model.materials = materials;
                report.record_update(entity);
            }
            Err(err) => report.record_failure(entity, err),
        }
    }
    log::debug!("replaced materials of {} entities", report.updated.len());
    report
}

fn replaced_materials(
    current: &[Material],
    replacement: &Material,
    options: &ReplaceMaterialOptions,
) -> MaterialResult<Vec<Material>> {
    current
        .iter()
        .map(|old| {
            let mut material = replacement.clone();
            if options.copy_pbr_inputs
                && old.is_physically_based()
                && material.is_physically_based()
            {
                old.copy_parameters_except_base_color(&mut material)?;
            }
            Ok(material)
        })
        .collect()
}

/// Puts saved materials back and removes the backup.
///
/// Saved slots overwrite the current list by position; slots missing from
/// the current list are appended. Entities without a [`ModelComponent`]
/// keep their backup. Running it twice is a no-op.
pub fn restore_original_materials(world: &mut World, root: Entity) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in collect_with::<SavedMaterials>(world, root) {
        if !world.has::<ModelComponent>(entity) {
            continue;
        }
        let Some(saved) = world.remove::<SavedMaterials>(entity) else {
            continue;
        };
        if let Some(model) = world.get_mut::<ModelComponent>(entity) {
            for (index, material) in saved.original_materials.into_iter().enumerate() {
                match model.materials.get_mut(index) {
                    Some(slot) => *slot = material,
                    None => model.materials.push(material),
                }
            }
            report.record_update(entity);
        }
    }
    log::debug!("restored materials of {} entities", report.updated.len());
    report
}

/// Entities the parameter operations visit: the enabled part of the subtree.
///
/// A disabled entity hides its whole subtree. Nothing is visited when `root`
/// itself is not enabled in the hierarchy.
fn enabled_subtree(world: &World, root: Entity) -> Vec<Entity> {
    if !is_enabled_in_hierarchy(world, root) {
        return Vec::new();
    }
    collect_pruned(world, root, is_enabled)
}

fn parameter_of<'a>(model: &'a ModelComponent, name: &str) -> Option<&'a MaterialValue> {
    model
        .materials
        .iter()
        .filter(|m| m.is_shader_graph())
        .find_map(|m| m.get_parameter(name))
}

/// Records the current value of parameter `name` on every enabled entity
/// whose shader-graph material exposes it.
///
/// Takes the value from the first material that exposes the parameter.
/// An existing [`SavedMaterialParam`] is overwritten.
pub fn save_material_param(world: &mut World, root: Entity, name: &str) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in enabled_subtree(world, root) {
        let value = world
            .get::<ModelComponent>(entity)
            .and_then(|model| parameter_of(model, name))
            .cloned();
        if let Some(value) = value {
            world.insert(entity, SavedMaterialParam::new(name, value));
            report.record_update(entity);
        }
    }
    report
}

/// First value of parameter `name` in a pre-order walk of the enabled subtree.
pub fn get_material_param<'w>(world: &'w World, root: Entity, name: &str) -> Option<&'w MaterialValue> {
    enabled_subtree(world, root)
        .into_iter()
        .filter_map(|entity| world.get::<ModelComponent>(entity))
        .find_map(|model| parameter_of(model, name))
}

/// Writes `value` to parameter `name` of every shader-graph material that
/// exposes it, across the enabled subtree.
///
/// An entity whose materials reject the value (wrong kind) is left unchanged
/// and reported as a failure.
pub fn set_material_param(
    world: &mut World,
    root: Entity,
    name: &str,
    value: &MaterialValue,
) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in enabled_subtree(world, root) {
        apply_parameter(world, entity, name, value, &mut report);
    }
    report
}

/// Scales parameter `name` by `weight` relative to its saved original.
///
/// An entity holding a [`SavedMaterialParam`] for `name` gets
/// `weight * original`; one without gets `weight` itself. Saved values that
/// are not floats cannot be weighted: the entity is skipped and reported
/// with [`Error::UnsupportedValueKind`].
pub fn set_material_param_weight(
    world: &mut World,
    root: Entity,
    name: &str,
    weight: f32,
) -> TraversalReport {
    let mut report = TraversalReport::new();
    for entity in enabled_subtree(world, root) {
        let exposes = world
            .get::<ModelComponent>(entity)
            .is_some_and(|model| parameter_of(model, name).is_some());
        if !exposes {
            continue;
        }

        let saved = world
            .get::<SavedMaterialParam>(entity)
            .filter(|saved| saved.name == name);
        let value = match saved {
            Some(saved) => match saved.original_value.as_float() {
                Some(original) => MaterialValue::Float(original * weight),
                None => {
                    let kind = saved.original_value.kind();
                    report.record_failure(
                        entity,
                        Error::UnsupportedValueKind {
                            name: name.to_string(),
                            kind,
                        },
                    );
                    continue;
                }
            },
            None => MaterialValue::Float(weight),
        };
        apply_parameter(world, entity, name, &value, &mut report);
    }
    report
}

fn apply_parameter(
    world: &mut World,
    entity: Entity,
    name: &str,
    value: &MaterialValue,
    report: &mut TraversalReport,
) {
    let Some(model) = world.get_mut::<ModelComponent>(entity) else {
        return;
    };
    let mut materials = model.materials.clone();
    let mut changed = false;
    for material in materials
        .iter_mut()
        .filter(|m| m.is_shader_graph() && m.has_parameter(name))
    {
        if let Err(err) = material.set_parameter(name, value.clone()) {
            report.record_failure(entity, err);
            return;
        }
        changed = true;
    }
    if changed {
        model.materials = materials;
        report.record_update(entity);
    }
}

/// The first material of the entity's model, if it is a shader graph.
pub fn first_shader_graph_material(world: &World, entity: Entity) -> Option<&Material> {
    world
        .get::<ModelComponent>(entity)?
        .first_material()
        .filter(|m| m.is_shader_graph())
}

/// The first material of the entity's model, if it is physically based.
pub fn first_physically_based_material(world: &World, entity: Entity) -> Option<&Material> {
    world
        .get::<ModelComponent>(entity)?
        .first_material()
        .filter(|m| m.is_physically_based())
}

/// Edits the entity's first shader-graph material in place.
///
/// `edit` works on a copy that is written back only when it succeeds.
/// Returns `Ok(false)` when the entity has no such material.
pub fn update_shader_graph_material(
    world: &mut World,
    entity: Entity,
    edit: impl FnOnce(&mut Material) -> MaterialResult<()>,
) -> Result<bool> {
    let Some(mut material) = first_shader_graph_material(world, entity).cloned() else {
        return Ok(false);
    };
    edit(&mut material)?;
    if let Some(slot) = world
        .get_mut::<ModelComponent>(entity)
        .and_then(|model| model.materials.first_mut())
    {
        *slot = material;
    }
    Ok(true)
}
