// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Component storage and management
//!
//! Components are plain data attached to entities. Each component type lives
//! in its own [`SparseSet`]: a sparse array indexed by entity slot that points
//! into a dense array of payloads, giving O(1) insert/lookup/remove and
//! contiguous iteration.

use crate::ecs::Entity;
use std::any::Any;

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior.
pub trait Component: 'static + Send + Sync {}

/// Storage interface for components of a single type
pub trait ComponentStorage: Send + Sync {
    /// The component type this storage manages
    type Component: Component;

    /// Insert or overwrite the component for `entity`, returning the stored value
    fn insert(&mut self, entity: Entity, component: Self::Component) -> &mut Self::Component;

    /// Remove a component for the given entity
    fn remove(&mut self, entity: Entity) -> Option<Self::Component>;

    /// Get a reference to a component for the given entity
    fn get(&self, entity: Entity) -> Option<&Self::Component>;

    /// Get a mutable reference to a component for the given entity
    fn get_mut(&mut self, entity: Entity) -> Option<&mut Self::Component>;

    /// Check if an entity has this component
    fn contains(&self, entity: Entity) -> bool;

    /// Clear all components
    fn clear(&mut self);
}

/// Sparse-set component storage
///
/// `sparse[entity.index()]` holds the dense slot of that entity's component.
/// The dense arrays stay packed: removal swaps the last element into the
/// vacated slot.
///
/// Slots are keyed by entity index only, so a set holds at most one
/// generation per index. The owner of a slot is expected to be removed
/// before its index is reused; [`World`](crate::ecs::World) does this when
/// an entity is destroyed. Inserting a newer generation into a slot still
/// held by an older one replaces the old owner.
///
/// # Example
///
/// ```
/// use scene_engine::ecs::{ComponentStorage, Entity, SparseSet};
/// use scene_engine::scene::Transform;
///
/// let mut storage = SparseSet::<Transform>::new();
/// let entity = Entity::new(3, 0);
///
/// storage.insert(entity, Transform::from_xyz(1.0, 2.0, 3.0));
/// assert!(storage.contains(entity));
/// assert_eq!(storage.get(entity).unwrap().position.x, 1.0);
/// ```
pub struct SparseSet<T: Component> {
    sparse: Vec<Option<u32>>,
    dense: Vec<T>,
    entities: Vec<Entity>,
}

impl<T: Component> SparseSet<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a storage with room for `capacity` components
    pub fn with_capacity(capacity: usize) -> Self {
        SparseSet {
            sparse: Vec::with_capacity(capacity),
            dense: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of components stored
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Check if the storage is empty
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Entities in dense order, parallel to [`components`](Self::components)
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The packed component array
    pub fn components(&self) -> &[T] {
        &self.dense
    }

    /// Iterate over `(entity, &component)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterate over `(entity, &mut component)` pairs in dense order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let slot = (*self.sparse.get(entity.index() as usize)?)? as usize;
        (self.entities[slot] == entity).then_some(slot)
    }
}

impl<T: Component> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for SparseSet<T> {
    type Component = T;

    fn insert(&mut self, entity: Entity, component: T) -> &mut T {
        let index = entity.index() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }

        let slot = match self.sparse[index] {
            Some(slot) => {
                let slot = slot as usize;
                // Only this entity or a stale owner of its index may sit here.
                debug_assert!(
                    self.entities[slot].generation() <= entity.generation(),
                    "{entity} would replace newer owner {}",
                    self.entities[slot]
                );
                self.dense[slot] = component;
                self.entities[slot] = entity;
                slot
            }
            None => {
                let slot = self.dense.len();
                self.sparse[index] = Some(slot as u32);
                self.dense.push(component);
                self.entities.push(entity);
                slot
            }
        };

        debug_assert_eq!(self.dense.len(), self.entities.len());
        &mut self.dense[slot]
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.dense_index(entity)?;
        self.sparse[entity.index() as usize] = None;

        let last = self.dense.len() - 1;
        if slot != last {
            let moved = self.entities[last];
            self.sparse[moved.index() as usize] = Some(slot as u32);
        }

        self.entities.swap_remove(slot);
        let component = self.dense.swap_remove(slot);

        debug_assert_eq!(self.dense.len(), self.entities.len());
        Some(component)
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        let slot = self.dense_index(entity)?;
        Some(&self.dense[slot])
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = self.dense_index(entity)?;
        Some(&mut self.dense[slot])
    }

    fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
        self.entities.clear();
    }
}

/// Type-erased view of a storage, used by the world when it does not know
/// the concrete component type (entity destruction, hook dispatch).
pub(crate) trait ErasedStorage: Send + Sync {
    fn contains_entity(&self, entity: Entity) -> bool;
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn clear_all(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for SparseSet<T> {
    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn clear_all(&mut self) {
        self.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
