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
//! Scene-graph node data

use crate::ecs::{Component, Entity};
use crate::scene::Transform;

/// Per-entity scene-graph node
///
/// The children of a node form a circular doubly-linked list threaded
/// through the children's `next`/`prev` links, with `first_child` and
/// `last_child` marking head and tail on the parent. A lone child links to
/// itself. Every link is a weak entity handle: the world owns the nodes,
/// and the destroy hook installed by
/// [`SceneGraph`](crate::scene::SceneGraph) repairs links before a node
/// disappears.
///
/// Links are read-only outside the crate; structure changes go through
/// [`SceneGraph`](crate::scene::SceneGraph) and
/// [`EntityHandle`](crate::scene::EntityHandle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneGraphComponent {
    pub(crate) local_transform: Transform,
    pub(crate) parent: Option<Entity>,
    pub(crate) first_child: Option<Entity>,
    pub(crate) last_child: Option<Entity>,
    pub(crate) next: Option<Entity>,
    pub(crate) prev: Option<Entity>,
}

impl SceneGraphComponent {
    /// Unlinked node with the given local pose
    pub(crate) fn new(local_transform: Transform) -> Self {
        SceneGraphComponent {
            local_transform,
            parent: None,
            first_child: None,
            last_child: None,
            next: None,
            prev: None,
        }
    }

    /// Pose relative to the parent (or to world space for a root)
    pub fn local_transform(&self) -> &Transform {
        &self.local_transform
    }

    /// Parent node, `None` for a root
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// Head of the child list
    pub fn first_child(&self) -> Option<Entity> {
        self.first_child
    }

    /// Tail of the child list
    pub fn last_child(&self) -> Option<Entity> {
        self.last_child
    }

    /// Next sibling in the circular list
    pub fn next_sibling(&self) -> Option<Entity> {
        self.next
    }

    /// Previous sibling in the circular list
    pub fn prev_sibling(&self) -> Option<Entity> {
        self.prev
    }

    /// True when the node has no parent
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True when the node has at least one child
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

impl Component for SceneGraphComponent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_unlinked_root() {
        let node = SceneGraphComponent::new(Transform::from_xyz(1.0, 2.0, 3.0));
        assert!(node.is_root());
        assert!(!node.has_children());
        assert_eq!(node.next_sibling(), None);
        assert_eq!(node.prev_sibling(), None);
        assert_eq!(node.local_transform().position.z, 3.0);
    }
}
