//! Transform-space queries: world matrices, conversions between entity
//! spaces, distances and visual bounds.
//!
//! World matrices are computed on demand by walking the parent chain, so
//! they are always current after a [`Transform`] or hierarchy edit.

use skein_core::math::{BoundingBox, Mat4, Vec3, distance as point_distance};

use crate::components::{ModelComponent, Transform};
use crate::hierarchy::{ancestors, parent, set_parent};
use crate::traversal::subtree;
use crate::{Entity, Error, Result, World};

/// The entity's local [`Transform`], identity when it has none.
pub fn local_transform(world: &World, entity: Entity) -> Transform {
    world.get::<Transform>(entity).copied().unwrap_or_default()
}

pub fn local_matrix(world: &World, entity: Entity) -> Mat4 {
    local_transform(world, entity).compute_matrix()
}

/// Accumulated matrix from the entity's local space to world space.
pub fn world_matrix(world: &World, entity: Entity) -> Mat4 {
    ancestors(world, entity).fold(local_matrix(world, entity), |matrix, ancestor| {
        local_matrix(world, ancestor) * matrix
    })
}

/// Matrix from world space into the space of `space`, or identity for world
/// space itself.
fn inverse_space(world: &World, space: Option<Entity>) -> Result<Mat4> {
    match space {
        Some(entity) => world_matrix(world, entity)
            .try_inverse()
            .ok_or(Error::SingularTransform(entity)),
        None => Ok(Mat4::identity()),
    }
}

fn space_matrix(world: &World, space: Option<Entity>) -> Mat4 {
    space.map_or_else(Mat4::identity, |entity| world_matrix(world, entity))
}

/// Re-expresses `transform`, given in the space of `from`, in the space of `to`.
///
/// `None` stands for world space on either side.
///
/// # Errors
///
/// [`Error::SingularTransform`] when the target space cannot be inverted.
pub fn convert_transform(
    world: &World,
    transform: &Transform,
    from: Option<Entity>,
    to: Option<Entity>,
) -> Result<Transform> {
    let matrix = inverse_space(world, to)? * space_matrix(world, from) * transform.compute_matrix();
    Ok(Transform::from_matrix(&matrix))
}

/// Distance between the local translations of two entities.
///
/// Translations are compared as-is, so the result is only meaningful for
/// entities sharing a parent space.
pub fn distance(world: &World, a: Entity, b: Entity) -> f32 {
    point_distance(
        &local_transform(world, a).translation,
        &local_transform(world, b).translation,
    )
}

pub fn distance_to_point(world: &World, entity: Entity, point: &Vec3) -> f32 {
    point_distance(&local_transform(world, entity).translation, point)
}

/// Whether two entities are strictly closer than `max`.
pub fn is_within_distance(world: &World, a: Entity, b: Entity, max: f32) -> bool {
    distance(world, a, b) < max
}

pub fn is_point_within_distance(world: &World, entity: Entity, point: &Vec3, max: f32) -> bool {
    distance_to_point(world, entity, point) < max
}

/// Axis-aligned bounds of every mesh in the subtree, expressed in the space
/// of `relative_to` (world space for `None`).
///
/// Each part is boxed in its own space and the box corners transformed, so
/// the result encloses the geometry but may be larger than a tight fit
/// under rotation. Returns `Ok(None)` when the subtree has no vertices.
pub fn visual_bounds(
    world: &World,
    root: Entity,
    relative_to: Option<Entity>,
) -> Result<Option<BoundingBox>> {
    let to_target = inverse_space(world, relative_to)?;
    let mut bounds: Option<BoundingBox> = None;

    for entity in subtree(world, root) {
        let Some(model) = world.get::<ModelComponent>(entity) else {
            continue;
        };
        let entity_to_target = to_target * world_matrix(world, entity);
        let contents = model.mesh.read();

        let placements: Vec<_> = if contents.instances.is_empty() {
            contents
                .models
                .iter()
                .map(|m| (m, Mat4::identity()))
                .collect()
        } else {
            contents
                .instances
                .iter()
                .filter_map(|i| Some((contents.model(&i.model)?, i.transform)))
                .collect()
        };

        for (mesh_model, instance_matrix) in placements {
            let matrix = entity_to_target * instance_matrix;
            for part in &mesh_model.parts {
                let Some(part_bounds) = BoundingBox::from_points(&part.positions) else {
                    continue;
                };
                let part_bounds = part_bounds.transformed(&matrix);
                bounds = Some(match bounds {
                    Some(b) => b.union(&part_bounds),
                    None => part_bounds,
                });
            }
        }
    }
    Ok(bounds)
}

/// Inserts a pivot entity between `entity` and its parent, placed at the
/// center of the entity's visual bounds.
///
/// The entity keeps its world transform. Without any geometry the pivot sits
/// at the entity's own translation. Returns the new pivot.
///
/// # Errors
///
/// [`Error::NoParent`] for a root entity, [`Error::SingularTransform`] when
/// the parent space cannot be inverted.
pub fn fix_object_pivot(world: &mut World, entity: Entity) -> Result<Entity> {
    let parent = parent(world, entity).ok_or(Error::NoParent(entity))?;
    let local = local_transform(world, entity);
    let center = visual_bounds(world, entity, Some(parent))?
        .map_or(local.translation, |b| b.center());

    let pivot = world.spawn();
    world.insert(pivot, Transform::from_translation(center));
    set_parent(world, pivot, parent)?;

    let relative = convert_transform(world, &local, Some(parent), Some(pivot))?;
    set_parent(world, entity, pivot)?;
    world.insert(entity, relative);
    log::debug!("{entity} moved under new pivot {pivot}");
    Ok(pivot)
}
