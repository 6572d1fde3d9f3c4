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
//! Render extraction
//!
//! Read-only snapshot of cached world transforms for a renderer. Nothing
//! here looks at scene-graph links: by the time a frame is extracted every
//! world transform is already current.

use crate::ecs::{Entity, World};
use crate::scene::Transform;
use glam::Mat4;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One entity's model matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderInstance {
    /// Source entity
    pub entity: Entity,
    /// World-space model matrix
    pub model: Mat4,
}

/// Build a [`RenderInstance`] for every entity with a `Transform`
///
/// Output order follows the dense `Transform` storage. With the `parallel`
/// feature the matrices are built on the Rayon thread pool.
pub fn extract_render_instances(world: &World) -> Vec<RenderInstance> {
    let Some(storage) = world.storage::<Transform>() else {
        return Vec::new();
    };

    #[cfg(feature = "parallel")]
    {
        storage
            .entities()
            .par_iter()
            .zip(storage.components().par_iter())
            .map(|(&entity, transform)| RenderInstance {
                entity,
                model: transform.matrix(),
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        storage
            .iter()
            .map(|(entity, transform)| RenderInstance {
                entity,
                model: transform.matrix(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_empty_world() {
        assert!(extract_render_instances(&World::new()).is_empty());
    }

    #[test]
    fn test_one_instance_per_transform() {
        let mut world = World::new();
        let a = world.create_entity();
        world.set(a, Transform::from_xyz(1.0, 2.0, 3.0));
        let _bare = world.create_entity();
        let b = world.create_entity();
        world.set(b, Transform::IDENTITY.with_scale(Vec3::splat(2.0)));

        let instances = extract_render_instances(&world);
        assert_eq!(instances.len(), 2);

        let first = instances.iter().find(|i| i.entity == a).unwrap();
        assert_eq!(first.model.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));

        let second = instances.iter().find(|i| i.entity == b).unwrap();
        assert_eq!(second.model, Mat4::from_scale(Vec3::splat(2.0)));
    }
}
