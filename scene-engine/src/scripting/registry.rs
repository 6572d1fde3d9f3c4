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
//! Script registry
//!
//! Keeps attached scripts in attachment order. Running them is the job of
//! [`Scene::update`](crate::scene::Scene::update), which takes the slots out
//! while scripts hold a handle into the scene.

use super::api::{NativeScript, SCRIPT_API_VERSION};
use crate::ecs::Entity;
use crate::error::ScriptError;
use semver::Version;

pub(crate) struct ScriptSlot {
    pub entity: Entity,
    pub script: Box<dyn NativeScript>,
    pub created: bool,
}

/// Scripts attached to the entities of one scene
#[derive(Default)]
pub struct ScriptRegistry {
    slots: Vec<ScriptSlot>,
}

impl ScriptRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        ScriptRegistry { slots: Vec::new() }
    }

    /// Attach a script to an entity
    ///
    /// Fails if the script's API version is incompatible with
    /// [`SCRIPT_API_VERSION`] or if the entity already has a script with
    /// the same name. Entity liveness is checked by the scene.
    pub fn attach(&mut self, entity: Entity, script: Box<dyn NativeScript>) -> Result<(), ScriptError> {
        let name = script.name().to_string();

        let api_version = script.api_version();
        if !is_version_compatible(api_version, SCRIPT_API_VERSION) {
            return Err(ScriptError::IncompatibleApi {
                name,
                found: api_version.to_string(),
                expected: SCRIPT_API_VERSION.to_string(),
            });
        }

        if self.get(entity, &name).is_some() {
            return Err(ScriptError::AlreadyAttached { name, entity });
        }

        log::debug!("script '{name}' attached to {entity}");
        self.slots.push(ScriptSlot {
            entity,
            script,
            created: false,
        });
        Ok(())
    }

    /// Look up a script by entity and name
    pub fn get(&self, entity: Entity, name: &str) -> Option<&dyn NativeScript> {
        self.slots
            .iter()
            .find(|slot| slot.entity == entity && slot.script.name() == name)
            .map(|slot| slot.script.as_ref())
    }

    /// Look up a script by entity and downcast it to its concrete type
    pub fn get_as<S: NativeScript + 'static>(&self, entity: Entity, name: &str) -> Option<&S> {
        self.get(entity, name)?.as_any().downcast_ref::<S>()
    }

    /// Names of the scripts attached to `entity`, in attachment order
    pub fn scripts_of(&self, entity: Entity) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|slot| slot.entity == entity)
            .map(|slot| slot.script.name())
            .collect()
    }

    /// Total number of attached scripts
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no script is attached
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn take_slots(&mut self) -> Vec<ScriptSlot> {
        std::mem::take(&mut self.slots)
    }

    /// Put slots back, ahead of anything attached while they were out
    pub(crate) fn restore(&mut self, mut slots: Vec<ScriptSlot>) {
        slots.append(&mut self.slots);
        self.slots = slots;
    }

    pub(crate) fn detach_entity(&mut self, entity: Entity) -> Vec<ScriptSlot> {
        let (detached, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.slots)
            .into_iter()
            .partition(|slot| slot.entity == entity);
        self.slots = kept;
        detached
    }
}

/// Check if a script API version is compatible with the engine's
///
/// Major versions must match. For 0.x versions the minor version is
/// breaking and must match too; from 1.0 on, a script may target an older
/// minor version than the engine provides.
pub fn is_version_compatible(script_version: &str, engine_version: &str) -> bool {
    let (Ok(script), Ok(engine)) = (Version::parse(script_version), Version::parse(engine_version)) else {
        return false;
    };

    if script.major != engine.major {
        return false;
    }

    if script.major != 0 {
        script.minor <= engine.minor
    } else {
        script.minor == engine.minor
    }
}
