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
//! # Scene Engine
//!
//! Engine core built around an ECS component store and a scene graph with
//! eager world-transform propagation.
//!
//! ## Features
//!
//! - **ECS Store**: generational entities, sparse-set storage, destroy hooks
//! - **Scene Graph**: intrusive circular sibling lists, parent/child
//!   creation, subtree recompute on every move, repair when a node is destroyed
//! - **Scripting**: native behavior scripts with API version checks
//! - **Parallelization**: optional Rayon-backed render extraction
//!
//! ## Example
//!
//! ```rust
//! use scene_engine::scene::{Scene, Transform};
//! use glam::Vec3;
//!
//! let mut scene = Scene::new();
//! let r = scene.spawn(Transform::IDENTITY);
//! let a = scene.spawn(Transform::IDENTITY);
//! let b = scene.spawn(Transform::IDENTITY);
//!
//! scene.entity(r).make_parent_of(a);
//! scene.entity(a).move_to(Transform::from_xyz(1.0, 0.0, 0.0));
//! scene.entity(b).make_child_of(a);
//! scene.entity(b).move_to(Transform::from_xyz(0.0, 1.0, 0.0));
//!
//! scene.entity(r).move_to(Transform::from_xyz(5.0, 0.0, 0.0));
//! assert_eq!(scene.world().get::<Transform>(b).position, Vec3::new(6.0, 1.0, 0.0));
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Error types
pub mod error;

/// Scene graph and transform propagation
pub mod scene;

/// Native behavior scripts
pub mod scripting;

pub use ecs::{Entity, World};
pub use error::{HierarchyError, ScriptError};
pub use scene::{EntityHandle, Scene, SceneGraph, Transform};
