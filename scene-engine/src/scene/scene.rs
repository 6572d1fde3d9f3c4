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
//! Scene: a world, its scene graph and its scripts

use crate::ecs::{Entity, World};
use crate::error::{HierarchyError, ScriptError};
use crate::scene::{extract_render_instances, EntityHandle, RenderInstance, SceneGraph, SceneGraphConfig, Transform};
use crate::scripting::{NativeScript, ScriptRegistry, ScriptSlot};

/// One loaded scene
///
/// Owns its [`World`] and the [`SceneGraph`] bound to it, so the
/// one-coordinator-per-world rule holds by construction. Dropping the scene
/// tears everything down.
///
/// # Example
///
/// ```
/// use scene_engine::scene::{Scene, Transform};
/// use glam::Vec3;
///
/// let mut scene = Scene::new();
/// let root = scene.spawn(Transform::IDENTITY);
/// let arm = scene.spawn(Transform::IDENTITY);
/// scene.entity(arm).make_child_of(root);
/// scene.entity(arm).move_to(Transform::from_xyz(1.0, 0.0, 0.0));
///
/// scene.entity(root).move_to(Transform::from_xyz(5.0, 0.0, 0.0));
/// assert_eq!(scene.world().get::<Transform>(arm).position, Vec3::new(6.0, 0.0, 0.0));
/// ```
pub struct Scene {
    pub(crate) world: World,
    pub(crate) graph: SceneGraph,
    pub(crate) scripts: ScriptRegistry,
}

impl Scene {
    /// Create an empty scene with default scene-graph configuration
    pub fn new() -> Self {
        Self::with_config(SceneGraphConfig::default())
    }

    /// Create an empty scene
    pub fn with_config(config: SceneGraphConfig) -> Self {
        let mut world = World::new();
        let graph = SceneGraph::with_config(&mut world, config);
        Scene {
            world,
            graph,
            scripts: ScriptRegistry::new(),
        }
    }

    /// The component store
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the component store
    ///
    /// Writing `Transform` or removing components here is allowed, but
    /// world transforms of scene-graph nodes should be changed through
    /// [`EntityHandle::move_to`].
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The scene-graph coordinator
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Attached scripts
    pub fn scripts(&self) -> &ScriptRegistry {
        &self.scripts
    }

    /// Create an entity with no components
    pub fn create_entity(&mut self) -> Entity {
        self.world.create_entity()
    }

    /// Create an entity with a world `Transform`
    pub fn spawn(&mut self, transform: Transform) -> Entity {
        let entity = self.world.create_entity();
        self.world.set(entity, transform);
        entity
    }

    /// Handle for `entity`
    ///
    /// The entity must be alive; this is only checked in debug builds.
    pub fn entity(&mut self, entity: Entity) -> EntityHandle<'_> {
        debug_assert!(self.world.is_entity_alive(entity), "handle requested for dead {entity}");
        EntityHandle::new(self, entity)
    }

    /// Destroy an entity
    ///
    /// Scripts attached to it get `on_destroy` (if they were created) and
    /// are dropped; then the entity is destroyed, which repairs the scene
    /// graph. Returns false if the entity was not alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let detached = self.scripts.detach_entity(entity);
        if !self.world.is_entity_alive(entity) {
            return false;
        }

        for mut slot in detached {
            if !slot.created {
                continue;
            }
            let mut handle = EntityHandle::new(self, entity);
            if let Err(message) = slot.script.on_destroy(&mut handle) {
                log::warn!(
                    "script '{}' failed in on_destroy for {entity}: {message}",
                    slot.script.name()
                );
            }
        }

        self.world.destroy_entity(entity)
    }

    /// Attach a script to a live entity
    pub fn attach_script(&mut self, entity: Entity, script: Box<dyn NativeScript>) -> Result<(), ScriptError> {
        if !self.world.is_entity_alive(entity) {
            return Err(ScriptError::DeadEntity(entity));
        }
        self.scripts.attach(entity, script)
    }

    /// Run one frame of scripts
    ///
    /// Scripts run in attachment order; a script's first update calls
    /// `on_create` before `on_update`. The first failure stops the frame and
    /// is returned; scripts that did not run this frame run next frame.
    /// Scripts whose entity no longer exists are dropped.
    pub fn update(&mut self, dt: f32) -> Result<(), ScriptError> {
        let mut slots = self.scripts.take_slots();
        slots.retain(|slot| {
            let alive = self.world.is_entity_alive(slot.entity);
            if !alive {
                log::warn!("dropping script '{}': {} is gone", slot.script.name(), slot.entity);
            }
            alive
        });

        let result = self.run_scripts(&mut slots, dt);
        if let Err(err) = &result {
            log::warn!("{err}");
        }

        self.scripts.restore(slots);
        result
    }

    /// World matrices of every entity with a `Transform`
    pub fn extract_render_instances(&self) -> Vec<RenderInstance> {
        extract_render_instances(&self.world)
    }

    /// Check every scene-graph invariant
    pub fn validate(&self) -> Result<(), HierarchyError> {
        self.graph.validate(&self.world)
    }

    fn run_scripts(&mut self, slots: &mut [ScriptSlot], dt: f32) -> Result<(), ScriptError> {
        for slot in slots.iter_mut() {
            let mut handle = EntityHandle::new(self, slot.entity);

            if !slot.created {
                slot.script
                    .on_create(&mut handle)
                    .map_err(|message| ScriptError::failed(slot.script.name(), message))?;
                slot.created = true;
            }

            slot.script
                .on_update(&mut handle, dt)
                .map_err(|message| ScriptError::failed(slot.script.name(), message))?;
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
