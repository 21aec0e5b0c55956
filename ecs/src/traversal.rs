//! Depth-first hierarchy queries.
//!
//! Walks are pre-order (a node before its children, children in insertion
//! order) and use an explicit stack, so hierarchy depth is not bounded by
//! the call stack.

use crate::component::{Component, ComponentKind};
use crate::hierarchy::{ancestors, children};
use crate::{Entity, World};

/// Pre-order iterator over an entity and all of its descendants.
pub struct Subtree<'w> {
    world: &'w World,
    stack: Vec<Entity>,
}

impl Iterator for Subtree<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let entity = self.stack.pop()?;
        self.stack
            .extend(children(self.world, entity).iter().rev().copied());
        Some(entity)
    }
}

/// Iterates over `root` and its descendants in pre-order.
pub fn subtree(world: &World, root: Entity) -> Subtree<'_> {
    let stack = if world.is_alive(root) {
        vec![root]
    } else {
        Vec::new()
    };
    Subtree { world, stack }
}

/// Iterates over the descendants of `root` in pre-order, excluding `root`.
pub fn descendants(world: &World, root: Entity) -> impl Iterator<Item = Entity> + '_ {
    subtree(world, root).skip(1)
}

/// Pre-order walk that drops every node failing `keep` together with its
/// whole subtree.
pub fn collect_pruned(
    world: &World,
    root: Entity,
    mut keep: impl FnMut(&World, Entity) -> bool,
) -> Vec<Entity> {
    let mut visited = Vec::new();
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        if !world.is_alive(entity) || !keep(world, entity) {
            continue;
        }
        visited.push(entity);
        stack.extend(children(world, entity).iter().rev().copied());
    }
    visited
}

/// Nearest entity, starting at `entity` itself and walking up, that has a `T`.
pub fn find_ancestor_with<T: Component>(world: &World, entity: Entity) -> Option<Entity> {
    self_and_ancestors(world, entity).find(|&e| world.has::<T>(e))
}

/// Nearest entity, starting at `entity` itself, that has any of `kinds`.
pub fn find_ancestor_with_any(
    world: &World,
    entity: Entity,
    kinds: &[ComponentKind],
) -> Option<Entity> {
    self_and_ancestors(world, entity).find(|&e| kinds.iter().any(|&k| world.has_kind(e, k)))
}

/// Nearest entity, starting at `entity` itself, whose name is `name`.
pub fn find_ancestor_named(world: &World, entity: Entity, name: &str) -> Option<Entity> {
    self_and_ancestors(world, entity).find(|&e| world.name(e) == Some(name))
}

fn self_and_ancestors(world: &World, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
    world
        .is_alive(entity)
        .then_some(entity)
        .into_iter()
        .chain(ancestors(world, entity))
}

/// First `T` found in a pre-order walk of `root`'s subtree.
pub fn find_first_component<T: Component>(world: &World, root: Entity) -> Option<&T> {
    subtree(world, root).find_map(|e| world.get::<T>(e))
}

/// First descendant of `root` (excluding `root`) named `name`.
pub fn find_descendant_named(world: &World, root: Entity, name: &str) -> Option<Entity> {
    descendants(world, root).find(|&e| world.name(e) == Some(name))
}

/// Whether `root` or any descendant has a `T`.
pub fn has_component_in_hierarchy<T: Component>(world: &World, root: Entity) -> bool {
    subtree(world, root).any(|e| world.has::<T>(e))
}

/// Calls `visit` for `root` and every descendant carrying a `T`.
pub fn for_each_with<T: Component>(world: &World, root: Entity, mut visit: impl FnMut(Entity, &T)) {
    for entity in subtree(world, root) {
        if let Some(component) = world.get::<T>(entity) {
            visit(entity, component);
        }
    }
}

/// Calls `visit` for every descendant of `root` (excluding `root`) carrying a `T`.
pub fn for_each_descendant_with<T: Component>(
    world: &World,
    root: Entity,
    mut visit: impl FnMut(Entity, &T),
) {
    for entity in descendants(world, root) {
        if let Some(component) = world.get::<T>(entity) {
            visit(entity, component);
        }
    }
}

/// Entities in `root`'s subtree carrying a `T`, in pre-order.
///
/// Collect first when the visit needs to mutate the world.
pub fn collect_with<T: Component>(world: &World, root: Entity) -> Vec<Entity> {
    subtree(world, root).filter(|&e| world.has::<T>(e)).collect()
}

/// Removes `T` from `root` and every descendant. Returns how many were removed.
pub fn remove_component_from_hierarchy<T: Component>(world: &mut World, root: Entity) -> usize {
    remove_kind_from_hierarchy(world, root, ComponentKind::of::<T>())
}

/// Type-erased form of [`remove_component_from_hierarchy`].
pub fn remove_kind_from_hierarchy(world: &mut World, root: Entity, kind: ComponentKind) -> usize {
    let entities: Vec<_> = subtree(world, root).collect();
    entities
        .into_iter()
        .filter(|&e| world.remove_kind(e, kind))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Disabled, IgnoreOutlineGeneration, Opacity};
    use crate::hierarchy::{set_enabled, set_parent};

    /// root
    /// ├── a
    /// │   ├── a1
    /// │   └── a2
    /// └── b
    ///     └── b1
    struct Tree {
        world: World,
        root: Entity,
        a: Entity,
        a1: Entity,
        a2: Entity,
        b: Entity,
        b1: Entity,
    }

    fn tree() -> Tree {
        let mut world = World::new();
        let root = world.spawn_named("root");
        let a = world.spawn_named("a");
        let a1 = world.spawn_named("a1");
        let a2 = world.spawn_named("a2");
        let b = world.spawn_named("b");
        let b1 = world.spawn_named("b1");
        for (child, parent) in [(a, root), (a1, a), (a2, a), (b, root), (b1, b)] {
            set_parent(&mut world, child, parent).unwrap();
        }
        Tree {
            world,
            root,
            a,
            a1,
            a2,
            b,
            b1,
        }
    }

    #[test]
    fn subtree_is_preorder() {
        let t = tree();
        assert_eq!(
            subtree(&t.world, t.root).collect::<Vec<_>>(),
            vec![t.root, t.a, t.a1, t.a2, t.b, t.b1]
        );
        assert_eq!(
            descendants(&t.world, t.a).collect::<Vec<_>>(),
            vec![t.a1, t.a2]
        );
    }

    #[test]
    fn pruned_walk_skips_subtrees() {
        let mut t = tree();
        set_enabled(&mut t.world, t.a, false);
        let visited = collect_pruned(&t.world, t.root, |w, e| !w.has::<Disabled>(e));
        assert_eq!(visited, vec![t.root, t.b, t.b1]);
    }

    #[test]
    fn ancestor_queries_include_self() {
        let mut t = tree();
        t.world.insert(t.a, Opacity(0.5));

        assert_eq!(find_ancestor_with::<Opacity>(&t.world, t.a2), Some(t.a));
        assert_eq!(find_ancestor_with::<Opacity>(&t.world, t.a), Some(t.a));
        assert_eq!(find_ancestor_with::<Opacity>(&t.world, t.b1), None);

        let kinds = [
            ComponentKind::of::<IgnoreOutlineGeneration>(),
            ComponentKind::of::<Opacity>(),
        ];
        assert_eq!(find_ancestor_with_any(&t.world, t.a1, &kinds), Some(t.a));
        assert_eq!(find_ancestor_named(&t.world, t.b1, "root"), Some(t.root));
        assert_eq!(find_ancestor_named(&t.world, t.b1, "b1"), Some(t.b1));
        assert_eq!(find_ancestor_named(&t.world, t.b1, "a"), None);
    }

    #[test]
    fn first_component_in_preorder() {
        let mut t = tree();
        t.world.insert(t.b1, Opacity(0.1));
        t.world.insert(t.a2, Opacity(0.2));

        assert_eq!(
            find_first_component::<Opacity>(&t.world, t.root),
            Some(&Opacity(0.2))
        );
        assert!(has_component_in_hierarchy::<Opacity>(&t.world, t.b));
        assert!(!has_component_in_hierarchy::<Opacity>(&t.world, t.a1));
    }

    #[test]
    fn descendant_by_name_excludes_root() {
        let t = tree();
        assert_eq!(find_descendant_named(&t.world, t.root, "b1"), Some(t.b1));
        assert_eq!(find_descendant_named(&t.world, t.root, "root"), None);
    }

    #[test]
    fn for_each_variants() {
        let mut t = tree();
        t.world.insert(t.root, Opacity(1.0));
        t.world.insert(t.a1, Opacity(0.5));

        let mut all = Vec::new();
        for_each_with::<Opacity>(&t.world, t.root, |e, _| all.push(e));
        assert_eq!(all, vec![t.root, t.a1]);

        let mut below = Vec::new();
        for_each_descendant_with::<Opacity>(&t.world, t.root, |e, o| below.push((e, o.0)));
        assert_eq!(below, vec![(t.a1, 0.5)]);

        assert_eq!(collect_with::<Opacity>(&t.world, t.a), vec![t.a1]);
    }

    #[test]
    fn remove_from_hierarchy() {
        let mut t = tree();
        for e in [t.root, t.a2, t.b1] {
            t.world.insert(e, IgnoreOutlineGeneration);
        }

        assert_eq!(
            remove_component_from_hierarchy::<IgnoreOutlineGeneration>(&mut t.world, t.a),
            1
        );
        assert!(t.world.has::<IgnoreOutlineGeneration>(t.b1));
        assert_eq!(
            remove_kind_from_hierarchy(
                &mut t.world,
                t.root,
                ComponentKind::of::<IgnoreOutlineGeneration>()
            ),
            2
        );
        assert!(!has_component_in_hierarchy::<IgnoreOutlineGeneration>(
            &t.world, t.root
        ));
    }
}
