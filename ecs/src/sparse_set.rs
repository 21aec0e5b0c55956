use std::any::Any;

/// Typed sparse set storing components of type T.
///
/// Uses a sparse array (entity index → dense index) and a dense array
/// (contiguous component data + entity mapping) for O(1) insert/remove/get
/// and cache-friendly iteration.
pub struct SparseSet<T: 'static> {
    /// `entity_index -> dense_index`. `None` means the entity does not have
    /// this component.
    sparse: Vec<Option<u32>>,
    dense: Vec<T>,
    /// Entity indices corresponding to each dense element.
    entities: Vec<u32>,
}

impl<T: 'static> SparseSet<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Inserts a component for the given entity index, returning the
    /// previous value if there was one.
    pub fn insert(&mut self, entity_index: u32, value: T) -> Option<T> {
        let idx = entity_index as usize;

        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }

        if let Some(dense_idx) = self.sparse[idx] {
            Some(std::mem::replace(&mut self.dense[dense_idx as usize], value))
        } else {
            self.sparse[idx] = Some(self.dense.len() as u32);
            self.dense.push(value);
            self.entities.push(entity_index);
            None
        }
    }

    /// Removes a component for the given entity index.
    pub fn remove(&mut self, entity_index: u32) -> Option<T> {
        let idx = entity_index as usize;
        let dense_idx = self.sparse.get_mut(idx)?.take()? as usize;
        let last_dense = self.dense.len() - 1;

        if dense_idx != last_dense {
            // Swap-remove: move last element into the removed slot
            let swapped_entity = self.entities[last_dense];
            self.sparse[swapped_entity as usize] = Some(dense_idx as u32);
            self.entities[dense_idx] = swapped_entity;
        }

        self.entities.pop();
        Some(self.dense.swap_remove(dense_idx))
    }

    pub fn get(&self, entity_index: u32) -> Option<&T> {
        let dense_idx = (*self.sparse.get(entity_index as usize)?)? as usize;
        self.dense.get(dense_idx)
    }

    pub fn get_mut(&mut self, entity_index: u32) -> Option<&mut T> {
        let dense_idx = (*self.sparse.get(entity_index as usize)?)? as usize;
        self.dense.get_mut(dense_idx)
    }

    pub fn contains(&self, entity_index: u32) -> bool {
        matches!(self.sparse.get(entity_index as usize), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }
}

impl<T: 'static> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

type RemoveFn = fn(&mut dyn Any, u32) -> bool;
type ContainsFn = fn(&dyn Any, u32) -> bool;

/// A type-erased sparse set that stores components of a single type.
///
/// Used internally by [`World`](crate::World) so that despawning and
/// kind-based lookups work without knowing the component type.
pub(crate) struct ComponentStorage {
    inner: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
    remove_fn: RemoveFn,
    contains_fn: ContainsFn,
}

impl ComponentStorage {
    pub fn new<T: Send + Sync + 'static>() -> Self {
        Self {
            inner: Box::new(SparseSet::<T>::new()),
            type_name: std::any::type_name::<T>(),
            remove_fn: |any, entity_index| {
                any.downcast_mut::<SparseSet<T>>()
                    .is_some_and(|set| set.remove(entity_index).is_some())
            },
            contains_fn: |any, entity_index| {
                any.downcast_ref::<SparseSet<T>>()
                    .is_some_and(|set| set.contains(entity_index))
            },
        }
    }

    /// Downcasts to the typed sparse set.
    pub fn typed<T: 'static>(&self) -> Option<&SparseSet<T>> {
        self.inner.downcast_ref::<SparseSet<T>>()
    }

    /// Downcasts to the typed sparse set (mutable).
    pub fn typed_mut<T: 'static>(&mut self) -> Option<&mut SparseSet<T>> {
        self.inner.downcast_mut::<SparseSet<T>>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Removes a component by entity index (type-erased). Returns true if removed.
    pub fn remove_untyped(&mut self, entity_index: u32) -> bool {
        (self.remove_fn)(self.inner.as_mut(), entity_index)
    }

    /// Checks if the entity has this component (type-erased).
    pub fn contains_untyped(&self, entity_index: u32) -> bool {
        (self.contains_fn)(self.inner.as_ref(), entity_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut set = SparseSet::new();
        assert_eq!(set.insert(3, "a"), None);
        assert_eq!(set.insert(3, "b"), Some("a"));
        assert_eq!(set.get(3), Some(&"b"));
        assert_eq!(set.get(2), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn swap_remove_keeps_mapping() {
        let mut set = SparseSet::new();
        set.insert(0, 10);
        set.insert(1, 11);
        set.insert(2, 12);

        assert_eq!(set.remove(0), Some(10));
        assert_eq!(set.remove(0), None);
        assert_eq!(set.get(2), Some(&12));
        assert_eq!(set.get(1), Some(&11));
        assert!(!set.contains(0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn type_erased_operations() {
        let mut storage = ComponentStorage::new::<u64>();
        storage.typed_mut::<u64>().unwrap().insert(5, 7);

        assert!(storage.contains_untyped(5));
        assert!(storage.remove_untyped(5));
        assert!(!storage.contains_untyped(5));
        assert!(storage.typed::<u32>().is_none());
        assert_eq!(storage.type_name(), "u64");
    }
}
