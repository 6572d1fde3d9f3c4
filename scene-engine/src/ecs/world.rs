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
//! World management
//!
//! The World is the component store: it assigns entity identifiers, owns
//! every component payload, and dispatches destroy hooks before a component
//! is physically removed.
//!
//! The world is designed for single-writer access from the main update
//! loop. Nothing here locks.

use crate::ecs::component::ErasedStorage;
use crate::ecs::hooks::{DestroyHook, DestroyHooks};
use crate::ecs::entity::EntityAllocator;
use crate::ecs::{Component, ComponentStorage, Entity, SparseSet};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identifier of a [`World`] instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldId(u64);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "World({})", self.0)
    }
}

/// The main ECS world container
///
/// # Example
///
/// ```
/// use scene_engine::ecs::World;
/// use scene_engine::scene::Transform;
///
/// let mut world = World::new();
/// let entity = world.create_entity();
/// world.set(entity, Transform::from_xyz(1.0, 0.0, 0.0));
///
/// assert!(world.has::<Transform>(entity));
/// assert_eq!(world.get::<Transform>(entity).position.x, 1.0);
/// ```
pub struct World {
    id: WorldId,
    entities: EntityAllocator,
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
    hooks: DestroyHooks,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World {
            id: WorldId(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed)),
            entities: EntityAllocator::new(),
            storages: HashMap::new(),
            hooks: DestroyHooks::default(),
        }
    }

    /// Identifier of this world instance
    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Create a new entity with no components
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.allocate();
        log::trace!("{}: created {}", self.id, entity);
        entity
    }

    /// Destroy an entity and every component it owns
    ///
    /// Destroy hooks of each component type the entity owns fire first,
    /// while all of its components are still readable. The slot generation
    /// is then bumped so old handles stop resolving.
    ///
    /// Returns `false` if the entity was not alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }

        let owned: Vec<TypeId> = self
            .storages
            .iter()
            .filter(|(_, storage)| storage.contains_entity(entity))
            .map(|(type_id, _)| *type_id)
            .collect();

        for type_id in owned {
            self.fire_destroy_hooks(type_id, entity);
        }

        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }

        self.entities.deallocate(entity);
        log::trace!("{}: destroyed {}", self.id, entity);
        true
    }

    /// Check if an entity is alive
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Get the number of alive entities
    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    /// Get an iterator over all alive entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive()
    }

    /// Remove every entity and component without firing hooks
    ///
    /// Registered hooks stay registered. Handles issued before the clear
    /// stay dead and never match an entity created afterwards.
    pub fn clear(&mut self) {
        for storage in self.storages.values_mut() {
            storage.clear_all();
        }
        self.entities.clear();
    }

    /// Insert or overwrite a component, returning the stored value
    ///
    /// The entity must be alive; this is only checked in debug builds.
    pub fn set<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        debug_assert!(
            self.entities.is_alive(entity),
            "cannot set {} on dead {}",
            type_name::<T>(),
            entity
        );
        self.storage_mut_or_insert::<T>().insert(entity, value)
    }

    /// Get a component that the entity is known to have
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`. Use [`try_get`](Self::try_get) when
    /// absence is expected.
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        self.try_get(entity).unwrap_or_else(|| missing_component::<T>(entity))
    }

    /// Mutable counterpart of [`get`](Self::get)
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.try_get_mut(entity)
            .unwrap_or_else(|| missing_component::<T>(entity))
    }

    /// Get a component if present
    pub fn try_get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Get a mutable component if present
    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Check if an entity has a component
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>().is_some_and(|storage| storage.contains(entity))
    }

    /// Remove a component, firing its destroy hooks first
    ///
    /// Returns `None` (and fires nothing) if the entity has no `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.has::<T>(entity) {
            return None;
        }
        self.fire_destroy_hooks(TypeId::of::<T>(), entity);
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Register a hook that runs right before a `T` is removed from any entity
    ///
    /// The hook runs exactly once per removal, synchronously, with the
    /// component still in place. Hooks must not remove the same component
    /// from the same entity again.
    pub fn on_destroy<T: Component>(
        &mut self,
        hook: impl Fn(&mut World, Entity) + Send + Sync + 'static,
    ) {
        let hook: DestroyHook = Arc::new(hook);
        self.hooks.register(TypeId::of::<T>(), hook);
    }

    /// Number of destroy hooks registered for `T`
    pub fn destroy_hook_count<T: Component>(&self) -> usize {
        self.hooks.count(TypeId::of::<T>())
    }

    /// Read-only view of the storage for `T`, if any `T` was ever set
    pub fn storage<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<SparseSet<T>>()
    }

    /// Iterate over every entity that has a `T`
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.storage::<T>().into_iter().flat_map(|storage| storage.iter())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
    }

    fn storage_mut_or_insert<T: Component>(&mut self) -> &mut SparseSet<T> {
        self.storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()))
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .unwrap_or_else(|| panic!("storage for {} has the wrong type", type_name::<T>()))
    }

    fn fire_destroy_hooks(&mut self, component: TypeId, entity: Entity) {
        if let Some(hooks) = self.hooks.hooks_for(component) {
            for hook in hooks {
                hook(self, entity);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cold]
fn missing_component<T>(entity: Entity) -> ! {
    panic!("{} has no component of type {}", entity, type_name::<T>())
}
