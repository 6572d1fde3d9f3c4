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
//! Entity handle bound to a scene

use crate::ecs::{Component, Entity, World};
use crate::scene::{Children, Scene, SceneGraph, SceneGraphComponent, Transform};

/// Mutable view of one entity inside a [`Scene`]
///
/// The handle borrows the scene for as long as it lives, so component
/// references it hands out can never outlive the store. Keep the [`Entity`]
/// (which is `Copy`) around and ask [`Scene::entity`] for a new handle when
/// needed.
pub struct EntityHandle<'s> {
    scene: &'s mut Scene,
    entity: Entity,
}

impl<'s> EntityHandle<'s> {
    pub(crate) fn new(scene: &'s mut Scene, entity: Entity) -> Self {
        EntityHandle { scene, entity }
    }

    /// Underlying entity identifier
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Read-only access to the scene's world
    pub fn world(&self) -> &World {
        &self.scene.world
    }

    /// Insert or overwrite a component
    ///
    /// Writing a `Transform` directly on a scene-graph node bypasses
    /// propagation; use [`move_to`](Self::move_to) instead.
    pub fn set<T: Component>(&mut self, value: T) -> &mut T {
        self.scene.world.set(self.entity, value)
    }

    /// Get a component the entity is known to have
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    pub fn get<T: Component>(&self) -> &T {
        self.scene.world.get(self.entity)
    }

    /// Mutable counterpart of [`get`](Self::get)
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    pub fn get_mut<T: Component>(&mut self) -> &mut T {
        self.scene.world.get_mut(self.entity)
    }

    /// Get a component if present
    pub fn try_get<T: Component>(&self) -> Option<&T> {
        self.scene.world.try_get(self.entity)
    }

    /// Check if the entity has a component
    pub fn has<T: Component>(&self) -> bool {
        self.scene.world.has::<T>(self.entity)
    }

    /// Remove a component, firing its destroy hooks first
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        self.scene.world.remove::<T>(self.entity)
    }

    /// Append `child` to this entity's children
    ///
    /// # Panics
    ///
    /// Same preconditions as
    /// [`SceneGraph::create_parent_child_relationship`].
    pub fn make_parent_of(&mut self, child: Entity) {
        let scene = &mut *self.scene;
        scene
            .graph
            .create_parent_child_relationship(&mut scene.world, self.entity, child);
    }

    /// Append this entity to the children of `parent`
    ///
    /// # Panics
    ///
    /// Same preconditions as
    /// [`SceneGraph::create_parent_child_relationship`].
    pub fn make_child_of(&mut self, parent: Entity) {
        let scene = &mut *self.scene;
        scene
            .graph
            .create_parent_child_relationship(&mut scene.world, parent, self.entity);
    }

    /// Move the entity, honoring scene-graph membership
    ///
    /// Outside the scene graph this overwrites the `Transform`. On a node it
    /// replaces the local transform and recomputes the world transform of
    /// the whole subtree before returning.
    pub fn move_to(&mut self, transform: Transform) {
        let scene = &mut *self.scene;
        if scene.world.has::<SceneGraphComponent>(self.entity) {
            scene
                .graph
                .set_local_transform(&mut scene.world, self.entity, transform);
        } else {
            scene.world.set(self.entity, transform);
        }
    }

    /// Cached world transform
    pub fn world_transform(&self) -> Option<&Transform> {
        self.try_get::<Transform>()
    }

    /// Local transform, if the entity is a scene-graph node
    pub fn local_transform(&self) -> Option<&Transform> {
        self.try_get::<SceneGraphComponent>()
            .map(SceneGraphComponent::local_transform)
    }

    /// Parent in the scene graph
    pub fn parent(&self) -> Option<Entity> {
        SceneGraph::parent_of(&self.scene.world, self.entity)
    }

    /// Children in sibling-list order
    pub fn children(&self) -> Children<'_> {
        SceneGraph::children(&self.scene.world, self.entity)
    }
}
