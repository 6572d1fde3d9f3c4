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
//! Error types
//!
//! Precondition violations in the scene graph are panics, not values.
//! The types here cover what a caller can act on: the report produced by
//! [`SceneGraph::validate`](crate::scene::SceneGraph::validate) and failures
//! of native scripts.

use crate::ecs::Entity;
use thiserror::Error;

/// A broken scene-graph invariant, as found by validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    /// A scene-graph node has no cached world `Transform`
    #[error("{0} is in the scene graph but has no Transform")]
    MissingTransform(Entity),

    /// A link points at an entity that is not a scene-graph node
    #[error("{entity}.{link} points at {target}, which is not a scene-graph node")]
    DanglingLink {
        /// Node holding the link
        entity: Entity,
        /// Name of the link field
        link: &'static str,
        /// Entity the link points at
        target: Entity,
    },

    /// A child does not appear exactly once in its parent's child list
    #[error("{child} appears {occurrences} times in the child list of {parent}")]
    ChildNotListed {
        /// The child
        child: Entity,
        /// Its parent
        parent: Entity,
        /// How often the child was found
        occurrences: usize,
    },

    /// The child list of `parent` is not a consistent circular list
    #[error("child list of {parent} is broken at {at}")]
    BrokenSiblingList {
        /// Owner of the list
        parent: Entity,
        /// First node where the list was found inconsistent
        at: Entity,
    },

    /// A listed child names a different parent
    #[error("{child} is listed under {listed_under} but its parent is {actual:?}")]
    WrongParent {
        /// The child
        child: Entity,
        /// Node whose list contains the child
        listed_under: Entity,
        /// The child's own parent link
        actual: Option<Entity>,
    },

    /// A root's cached transform differs from its local transform
    #[error("root {0} has a world transform different from its local transform")]
    RootTransformMismatch(Entity),

    /// A child's cached transform is not its local transform composed with its parent's
    #[error("world transform of {0} is stale")]
    WorldTransformMismatch(Entity),
}

/// Failure reported by the scripting layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    /// The script targets an incompatible scripting API
    #[error("script '{name}' API version {found} is incompatible with engine API version {expected}")]
    IncompatibleApi {
        /// Script name
        name: String,
        /// Version the script declares
        found: String,
        /// Version the engine provides
        expected: String,
    },

    /// A script with the same name is already attached to the entity
    #[error("script '{name}' is already attached to {entity}")]
    AlreadyAttached {
        /// Script name
        name: String,
        /// Target entity
        entity: Entity,
    },

    /// The target entity is not alive
    #[error("{0} is not alive")]
    DeadEntity(Entity),

    /// A script callback reported a failure
    #[error("script '{name}' failed: {message}")]
    Failed {
        /// Script name
        name: String,
        /// Failure description
        message: String,
    },
}

impl ScriptError {
    /// Build a [`ScriptError::Failed`]
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        ScriptError::Failed {
            name: name.into(),
            message: message.into(),
        }
    }
}
