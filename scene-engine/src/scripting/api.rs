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
//! Native script API
//!
//! Scripts see their entity only through an [`EntityHandle`]. Scene-graph
//! changes go through `make_parent_of`, `make_child_of` and `move_to`;
//! scripts never touch scene-graph links directly.

use crate::scene::EntityHandle;
use std::any::Any;

/// Version of the native script API
///
/// Checked against [`NativeScript::api_version`] when a script is attached.
/// Format: MAJOR.MINOR.PATCH following semantic versioning.
pub const SCRIPT_API_VERSION: &str = "0.1.0";

/// Behavior attached to a single entity
///
/// # Example
///
/// ```
/// use scene_engine::scene::{EntityHandle, Scene, Transform};
/// use scene_engine::scripting::NativeScript;
/// use glam::Vec3;
/// use std::any::Any;
///
/// struct Drift {
///     speed: f32,
/// }
///
/// impl NativeScript for Drift {
///     fn name(&self) -> &str {
///         "drift"
///     }
///
///     fn on_update(&mut self, entity: &mut EntityHandle<'_>, dt: f32) -> Result<(), String> {
///         let mut pose = *entity.get::<Transform>();
///         pose.position += Vec3::X * self.speed * dt;
///         entity.move_to(pose);
///         Ok(())
///     }
///
///     fn as_any(&self) -> &dyn Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// }
///
/// let mut scene = Scene::new();
/// let ship = scene.spawn(Transform::IDENTITY);
/// scene.attach_script(ship, Box::new(Drift { speed: 2.0 })).unwrap();
/// scene.update(0.5).unwrap();
///
/// assert_eq!(scene.world().get::<Transform>(ship).position, Vec3::new(1.0, 0.0, 0.0));
/// ```
pub trait NativeScript: Send + Sync {
    /// Name of this script
    ///
    /// Must be unique among the scripts attached to one entity.
    fn name(&self) -> &str;

    /// Script API version this script was built against
    fn api_version(&self) -> &str {
        SCRIPT_API_VERSION
    }

    /// Called once, right before the script's first update
    fn on_create(&mut self, _entity: &mut EntityHandle<'_>) -> Result<(), String> {
        Ok(())
    }

    /// Called every [`Scene::update`](crate::scene::Scene::update)
    fn on_update(&mut self, _entity: &mut EntityHandle<'_>, _dt: f32) -> Result<(), String> {
        Ok(())
    }

    /// Called before the entity is destroyed, if `on_create` has run
    fn on_destroy(&mut self, _entity: &mut EntityHandle<'_>) -> Result<(), String> {
        Ok(())
    }

    /// Allow downcasting to concrete script types
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to concrete script types
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
