//! Parent-child hierarchy operations.
//!
//! All operations maintain consistency between [`Parent`] and [`Children`]
//! components. Enabled state lives here too, since it is inherited down
//! the hierarchy.

use crate::components::{Children, Disabled, Parent};
use crate::{Entity, Error, Result, World};

/// Sets `entity` as a child of `parent`, appended after existing children.
///
/// If `entity` already has a different parent, it is removed from the old
/// parent's children first.
///
/// # Errors
///
/// [`Error::DeadEntity`] if either entity is dead, [`Error::HierarchyCycle`]
/// if `parent` is `entity` or one of its descendants.
pub fn set_parent(world: &mut World, entity: Entity, parent: Entity) -> Result<()> {
    for e in [entity, parent] {
        if !world.is_alive(e) {
            return Err(Error::DeadEntity(e));
        }
    }
    if entity == parent || ancestors(world, parent).any(|a| a == entity) {
        return Err(Error::HierarchyCycle {
            child: entity,
            parent,
        });
    }

    if let Some(old_parent) = world.get::<Parent>(entity).map(|p| p.0) {
        if old_parent == parent {
            return Ok(());
        }
        if let Some(children) = world.get_mut::<Children>(old_parent) {
            children.0.retain(|&e| e != entity);
        }
    }

    world.insert(entity, Parent(parent));

    if let Some(children) = world.get_mut::<Children>(parent) {
        if !children.0.contains(&entity) {
            children.0.push(entity);
        }
    } else {
        world.insert(parent, Children(vec![entity]));
    }
    Ok(())
}

/// Removes the parent relationship from `entity`.
///
/// Does nothing if `entity` has no parent.
pub fn remove_parent(world: &mut World, entity: Entity) {
    let Some(parent) = world.remove::<Parent>(entity) else {
        return;
    };
    if let Some(children) = world.get_mut::<Children>(parent.0) {
        children.0.retain(|&e| e != entity);
    }
}

/// Despawns an entity and all its descendants.
pub fn despawn_recursive(world: &mut World, entity: Entity) {
    remove_parent(world, entity);

    let mut stack = vec![entity];
    while let Some(current) = stack.pop() {
        if let Some(children) = world.remove::<Children>(current) {
            stack.extend(children.0);
        }
        world.despawn(current);
    }
}

pub fn parent(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<Parent>(entity).map(|p| p.0)
}

/// Children of `entity` in insertion order.
pub fn children(world: &World, entity: Entity) -> &[Entity] {
    world
        .get::<Children>(entity)
        .map(Children::as_slice)
        .unwrap_or_default()
}

/// Iterates from the parent of `entity` up to the root.
pub fn ancestors(world: &World, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
    std::iter::successors(parent(world, entity), move |&e| parent(world, e))
}

/// Topmost ancestor of `entity`, or `entity` itself if it has no parent.
pub fn root_of(world: &World, entity: Entity) -> Entity {
    ancestors(world, entity).last().unwrap_or(entity)
}

/// Enables or disables a single entity.
pub fn set_enabled(world: &mut World, entity: Entity, enabled: bool) {
    if enabled {
        world.remove::<Disabled>(entity);
    } else {
        world.insert(entity, Disabled);
    }
}

/// Whether the entity itself is enabled, ignoring its ancestors.
pub fn is_enabled(world: &World, entity: Entity) -> bool {
    world.is_alive(entity) && !world.has::<Disabled>(entity)
}

/// Whether the entity and every ancestor are enabled.
pub fn is_enabled_in_hierarchy(world: &World, entity: Entity) -> bool {
    is_enabled(world, entity) && ancestors(world, entity).all(|a| !world.has::<Disabled>(a))
}
