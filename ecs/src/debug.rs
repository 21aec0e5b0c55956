//! Debug visualization helpers: marker boxes and skeleton bone cones.

use std::collections::HashMap;

use skein_core::material::Material;
use skein_core::math::{Mat4, Vec3};
use skein_core::mesh::MeshResource;
use skein_core::mesh::generators::{generate_box, generate_cone};

use crate::components::{ModelComponent, Opacity, SkeletalPose, Transform};
use crate::hierarchy::{parent, set_parent};
use crate::spatial::convert_transform;
use crate::traversal::{collect_with, find_descendant_named};
use crate::{Entity, Error, Result, TraversalReport, World};

/// Name of the entity that holds the bone markers.
pub const BONES_DEBUG_GROUP: &str = "bonesDebug";

/// Name of the scene root that visual markers fall back to.
pub const APP_ROOT_NAME: &str = "appRoot";

/// Edge length of the boxes made by [`get_or_create_visual_marker`].
pub const VISUAL_MARKER_SIZE: f32 = 0.02;

const BONE_COLOR: [f32; 4] = [0.5, 0.0, 0.5, 1.0];
const BONE_CONE_SEGMENTS: u32 = 12;

/// Knobs for [`visualize_bones`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneVisualizationOptions {
    /// Height of each bone cone. The cone radius is a third of it.
    pub size: f32,
    /// Opacity applied to visualized models so the bones show through.
    pub opacity: f32,
}

impl Default for BoneVisualizationOptions {
    fn default() -> Self {
        Self {
            size: 0.5,
            opacity: 0.5,
        }
    }
}

impl BoneVisualizationOptions {
    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Spawns an entity showing a metallic box of the given color.
pub fn create_entity_box(world: &mut World, color: [f32; 4], size: f32) -> Result<Entity> {
    let mesh = MeshResource::generate(generate_box(size))?;
    let entity = world.spawn();
    world.insert(
        entity,
        ModelComponent::new(mesh, vec![Material::simple(color, 0.0, true)]),
    );
    Ok(entity)
}

/// Finds the marker named `name` below `parent`, creating a small box there
/// if it does not exist yet.
///
/// Without `parent`, the root entity named [`APP_ROOT_NAME`] is used. When
/// that does not exist either, the new marker is left unparented.
pub fn get_or_create_visual_marker(
    world: &mut World,
    name: &str,
    color: [f32; 4],
    parent: Option<Entity>,
) -> Result<Entity> {
    let container =
        parent.or_else(|| world.roots().find(|&e| world.name(e) == Some(APP_ROOT_NAME)));

    if let Some(existing) = container.and_then(|c| find_descendant_named(world, c, name)) {
        return Ok(existing);
    }

    let marker = create_entity_box(world, color, VISUAL_MARKER_SIZE)?;
    world.set_name(marker, name);
    if let Some(container) = container {
        set_parent(world, marker, container)?;
    }
    Ok(marker)
}

/// Shows the current pose of every skinned model in the subtree as cones.
///
/// Markers live in a [`BONES_DEBUG_GROUP`] entity next to `root` (under its
/// parent, or under `root` itself when it has none) and are reused on later
/// calls. Each marker is named after its joint path with `/` replaced by
/// `_` and placed at the joint's accumulated transform. Visualized models get
/// an [`Opacity`].
///
/// A joint whose path prefix is missing from the pose is reported as
/// [`Error::MissingJoint`] and skipped; the model's other joints still get
/// markers. Failing to attach the group is recorded against `root`.
pub fn visualize_bones(
    world: &mut World,
    root: Entity,
    options: &BoneVisualizationOptions,
) -> TraversalReport {
    let mut report = TraversalReport::new();
    let group = match bones_group(world, root) {
        Ok(group) => group,
        Err(err) => {
            report.record_failure(root, err);
            return report;
        }
    };

    let skinned: Vec<_> = collect_with::<ModelComponent>(world, root)
        .into_iter()
        .filter(|&e| {
            world
                .get::<ModelComponent>(e)
                .is_some_and(|model| model.skeleton_count() > 0)
        })
        .collect();

    for entity in skinned {
        let Some(pose) = world.get::<SkeletalPose>(entity).cloned() else {
            log::debug!("{entity} is skinned but has no pose, skipping");
            continue;
        };
        world.insert(entity, Opacity(options.opacity));

        let joints: HashMap<&str, &Transform> = pose.joints().collect();
        let mut failed = false;
        for (joint, _) in pose.joints() {
            let combined = match joint_path_matrix(&joints, joint) {
                Ok(matrix) => matrix,
                Err(err) => {
                    report.record_failure(entity, err);
                    failed = true;
                    continue;
                }
            };
            let marker = match bone_marker(world, group, &joint.replace('/', "_"), options.size) {
                Ok(marker) => marker,
                Err(err) => {
                    report.record_failure(entity, err);
                    failed = true;
                    continue;
                }
            };
            let placed = convert_transform(
                world,
                &Transform::from_matrix(&combined),
                Some(entity),
                Some(group),
            );
            match placed {
                Ok(transform) => {
                    world.insert(marker, transform);
                }
                Err(err) => {
                    report.record_failure(entity, err);
                    failed = true;
                }
            }
        }
        if !failed {
            report.record_update(entity);
        }
    }
    log::debug!("visualized bones of {} models", report.updated.len());
    report
}

/// The [`BONES_DEBUG_GROUP`] entity next to `root`, created on first use.
fn bones_group(world: &mut World, root: Entity) -> Result<Entity> {
    let group_parent = parent(world, root).unwrap_or(root);
    if let Some(group) = find_descendant_named(world, group_parent, BONES_DEBUG_GROUP) {
        return Ok(group);
    }
    let group = world.spawn_named(BONES_DEBUG_GROUP);
    if let Err(err) = set_parent(world, group, group_parent) {
        world.despawn(group);
        return Err(err);
    }
    Ok(group)
}

/// Product of the local transforms along a joint path, root joint first.
fn joint_path_matrix(joints: &HashMap<&str, &Transform>, joint: &str) -> Result<Mat4> {
    let mut matrix = Mat4::identity();
    let mut end = 0;
    for segment in joint.split('/') {
        end += segment.len();
        let prefix = &joint[..end];
        let transform = joints.get(prefix).ok_or_else(|| Error::MissingJoint {
            joint: joint.to_string(),
            missing: prefix.to_string(),
        })?;
        matrix *= transform.compute_matrix();
        // skip the separator
        end += 1;
    }
    Ok(matrix)
}

fn bone_marker(world: &mut World, group: Entity, name: &str, size: f32) -> Result<Entity> {
    if let Some(marker) = find_descendant_named(world, group, name) {
        return Ok(marker);
    }
    let marker = world.spawn_named(name);
    set_parent(world, marker, group)?;

    let mesh = MeshResource::generate(generate_cone(size, size / 3.0, BONE_CONE_SEGMENTS))?;
    let cone = world.spawn();
    world.insert(
        cone,
        ModelComponent::new(mesh, vec![Material::simple(BONE_COLOR, 0.0, true)]),
    );
    world.insert(cone, Transform::from_translation(Vec3::new(0.0, size / 2.0, 0.0)));
    set_parent(world, cone, marker)?;
    Ok(marker)
}
