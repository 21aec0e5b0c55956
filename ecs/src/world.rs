use std::any::TypeId;
use std::collections::HashMap;

use crate::component::{Component, ComponentKind};
use crate::components::{Name, Parent};
use crate::entity::{Entity, EntityAllocator};
use crate::sparse_set::ComponentStorage;

/// A scene: entities and their components.
///
/// Component storages are created on first insert, so any [`Component`]
/// type can be attached without registration.
///
/// # Example
///
/// ```
/// use skein_ecs::{Component, World};
///
/// struct Position { x: f32, y: f32 }
/// impl Component for Position {
///     const NAME: &'static str = "Position";
/// }
///
/// let mut world = World::new();
/// let entity = world.spawn();
/// world.insert(entity, Position { x: 0.0, y: 1.0 });
/// assert_eq!(world.get::<Position>(entity).map(|p| p.y), Some(1.0));
/// ```
pub struct World {
    entities: EntityAllocator,
    components: HashMap<TypeId, ComponentStorage>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            components: HashMap::new(),
        }
    }

    /// Spawns a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Spawns a new entity with a [`Name`].
    pub fn spawn_named(&mut self, name: impl Into<String>) -> Entity {
        let entity = self.spawn();
        self.insert(entity, Name::new(name));
        entity
    }

    /// Despawns an entity, removing all of its components.
    ///
    /// Does not touch the hierarchy; use
    /// [`despawn_recursive`](crate::hierarchy::despawn_recursive) for that.
    /// Returns false if the entity was already dead.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        for storage in self.components.values_mut() {
            storage.remove_untyped(entity.index());
        }
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.count()
    }

    /// Iterates over all alive entities.
    pub fn iter_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive()
    }

    /// Alive entities without a [`Parent`].
    pub fn roots(&self) -> impl Iterator<Item = Entity> + '_ {
        self.iter_entities().filter(|&e| !self.has::<Parent>(e))
    }

    /// Inserts a component on an entity, returning the previous value.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not alive.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        assert!(
            self.entities.is_alive(entity),
            "Cannot insert component on dead entity {entity}"
        );

        self.components
            .entry(TypeId::of::<T>())
            .or_insert_with(ComponentStorage::new::<T>)
            .typed_mut::<T>()?
            .insert(entity.index(), component)
    }

    /// Removes a component from an entity.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.components
            .get_mut(&TypeId::of::<T>())?
            .typed_mut::<T>()?
            .remove(entity.index())
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.components
            .get(&TypeId::of::<T>())?
            .typed::<T>()?
            .get(entity.index())
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.components
            .get_mut(&TypeId::of::<T>())?
            .typed_mut::<T>()?
            .get_mut(entity.index())
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Type-erased presence check.
    pub fn has_kind(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.entities.is_alive(entity)
            && self
                .components
                .get(&kind.type_id())
                .is_some_and(|s| s.contains_untyped(entity.index()))
    }

    /// Type-erased removal. Returns true if the entity had the component.
    pub fn remove_kind(&mut self, entity: Entity, kind: ComponentKind) -> bool {
        self.entities.is_alive(entity)
            && self
                .components
                .get_mut(&kind.type_id())
                .is_some_and(|s| s.remove_untyped(entity.index()))
    }

    /// Type names of every component attached to `entity`.
    pub fn component_names_of(&self, entity: Entity) -> Vec<&'static str> {
        if !self.entities.is_alive(entity) {
            return Vec::new();
        }
        let mut names: Vec<_> = self
            .components
            .values()
            .filter(|s| s.contains_untyped(entity.index()))
            .map(|s| s.type_name())
            .collect();
        names.sort_unstable();
        names
    }

    /// The entity's [`Name`], if any.
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.get::<Name>(entity).map(Name::as_str)
    }

    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) {
        self.insert(entity, Name::new(name));
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
