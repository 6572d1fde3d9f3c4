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
//! Scene-graph coordinator
//!
//! [`SceneGraph`] maintains the tree stored in [`SceneGraphComponent`]s and
//! keeps every node's cached world [`Transform`] in sync with its local
//! transform and its ancestors. Propagation is eager: when a call returns,
//! every affected world transform is already up to date.
//!
//! Node states:
//!
//! ```text
//! Unattached --create_parent_child_relationship--> Root | Child
//! Child      --parent's node destroyed-----------> Root
//! Root|Child --own node destroyed----------------> Unattached
//! ```
//!
//! # Preconditions
//!
//! Violations panic:
//! - both entities passed to [`SceneGraph::create_parent_child_relationship`]
//!   own a `Transform`
//! - a child is never given a second parent, never parented to itself or
//!   to one of its descendants
//! - operations that need a node are only called on entities that have one
//! - nothing mutates sibling lists while a propagation walk is running

use crate::ecs::{Entity, World, WorldId};
use crate::error::HierarchyError;
use crate::scene::{SceneGraphComponent, SceneGraphConfig, Transform, Traversal};

/// Coordinator for one world's scene graph
///
/// Exactly one scene graph can be bound to a world: binding registers the
/// repair hook for [`SceneGraphComponent`] removal, and a second binding
/// panics.
///
/// # Example
///
/// ```
/// use scene_engine::ecs::World;
/// use scene_engine::scene::{SceneGraph, Transform};
/// use glam::Vec3;
///
/// let mut world = World::new();
/// let graph = SceneGraph::init(&mut world);
///
/// let root = world.create_entity();
/// world.set(root, Transform::from_xyz(5.0, 0.0, 0.0));
/// let child = world.create_entity();
/// world.set(child, Transform::IDENTITY);
///
/// graph.create_parent_child_relationship(&mut world, root, child);
/// graph.set_local_transform(&mut world, child, Transform::from_xyz(0.0, 1.0, 0.0));
///
/// assert_eq!(world.get::<Transform>(child).position, Vec3::new(5.0, 1.0, 0.0));
/// ```
#[derive(Debug)]
pub struct SceneGraph {
    world: WorldId,
    config: SceneGraphConfig,
}

impl SceneGraph {
    /// Bind a scene graph with default configuration to `world`
    ///
    /// # Panics
    ///
    /// Panics if a scene graph is already bound to `world`.
    pub fn init(world: &mut World) -> Self {
        Self::with_config(world, SceneGraphConfig::default())
    }

    /// Bind a scene graph with the given configuration to `world`
    ///
    /// # Panics
    ///
    /// Panics if a scene graph is already bound to `world`.
    pub fn with_config(world: &mut World, config: SceneGraphConfig) -> Self {
        assert_eq!(
            world.destroy_hook_count::<SceneGraphComponent>(),
            0,
            "a scene graph is already bound to {}",
            world.id()
        );

        let validation = config.validate_after_mutation.then_some(config.tolerance);
        world.on_destroy::<SceneGraphComponent>(move |world, entity| {
            repair_on_destroy(world, entity);
            if let Some(tolerance) = validation {
                if let Err(err) = check_hierarchy(world, tolerance, Some(entity)) {
                    panic!("scene graph invariant violated after removing {entity}: {err}");
                }
            }
        });
        log::debug!("scene graph bound to {} ({:?})", world.id(), config.traversal);

        SceneGraph {
            world: world.id(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SceneGraphConfig {
        &self.config
    }

    /// World this scene graph is bound to
    pub fn world_id(&self) -> WorldId {
        self.world
    }

    /// Append `child` to the children of `parent`
    ///
    /// Missing nodes are materialized first: `parent` starts as a root whose
    /// local transform is its current `Transform`; `child` starts with an
    /// identity local transform, discarding whatever world pose it had.
    /// Existing nodes are reused untouched. The subtree under `parent` is
    /// recomputed before returning.
    ///
    /// # Panics
    ///
    /// Panics if either entity lacks a `Transform`, if `parent == child`,
    /// if `child` already has a parent, or if `parent` is a descendant of
    /// `child`.
    pub fn create_parent_child_relationship(&self, world: &mut World, parent: Entity, child: Entity) {
        self.assert_bound(world);
        assert!(
            world.has::<Transform>(parent),
            "{parent} needs a Transform before joining the scene graph"
        );
        assert!(
            world.has::<Transform>(child),
            "{child} needs a Transform before joining the scene graph"
        );
        assert_ne!(parent, child, "cannot make {parent} a child of itself");

        if !world.has::<SceneGraphComponent>(parent) {
            let pose = *world.get::<Transform>(parent);
            world.set(parent, SceneGraphComponent::new(pose));
        }
        if !world.has::<SceneGraphComponent>(child) {
            world.set(child, SceneGraphComponent::new(Transform::IDENTITY));
        }

        if let Some(current) = world.get::<SceneGraphComponent>(child).parent {
            panic!("{child} already has parent {current}; moving a child between parents is not supported");
        }
        assert!(
            !is_ancestor(world, child, parent),
            "making {child} a child of its descendant {parent} would create a cycle"
        );

        link_at_tail(world, parent, child);
        world.get_mut::<SceneGraphComponent>(child).parent = Some(parent);
        log::debug!("{child} appended under {parent}");

        self.update_transform_with_children(world, parent);
        self.validate_if_enabled(world);
    }

    /// Recompute the cached world transform of `entity` and its whole subtree
    ///
    /// A root's world transform is its local transform; any other node's is
    /// its local transform composed with its parent's cached world transform.
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no [`SceneGraphComponent`].
    pub fn update_transform_with_children(&self, world: &mut World, entity: Entity) {
        self.assert_bound(world);
        assert!(
            world.has::<SceneGraphComponent>(entity),
            "{entity} is not part of the scene graph"
        );

        match self.config.traversal {
            Traversal::Recursive => propagate_recursive(world, entity),
            Traversal::Worklist => propagate_worklist(world, entity),
        }
    }

    /// Overwrite the local transform of `entity` and recompute its subtree
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no [`SceneGraphComponent`].
    pub fn set_local_transform(&self, world: &mut World, entity: Entity, local: Transform) {
        self.assert_bound(world);
        match world.try_get_mut::<SceneGraphComponent>(entity) {
            Some(node) => node.local_transform = local,
            None => panic!("{entity} is not part of the scene graph"),
        }
        self.update_transform_with_children(world, entity);
        self.validate_if_enabled(world);
    }

    /// Parent of `entity`, if it is a child node
    pub fn parent_of(world: &World, entity: Entity) -> Option<Entity> {
        world.try_get::<SceneGraphComponent>(entity)?.parent
    }

    /// Children of `entity` in sibling-list order
    pub fn children(world: &World, entity: Entity) -> Children<'_> {
        let first = world
            .try_get::<SceneGraphComponent>(entity)
            .and_then(|node| node.first_child);
        Children::new(world, first)
    }

    /// Every scene-graph node without a parent
    pub fn roots(world: &World) -> Vec<Entity> {
        world
            .iter::<SceneGraphComponent>()
            .filter(|(_, node)| node.is_root())
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Check every scene-graph invariant
    ///
    /// Verifies link targets, that each child sits exactly once in its
    /// parent's circular list, list consistency in both directions, and that
    /// every cached world transform matches its local transform composed
    /// through its parent (within the configured tolerance).
    pub fn validate(&self, world: &World) -> Result<(), HierarchyError> {
        check_hierarchy(world, self.config.tolerance, None)
    }

    fn assert_bound(&self, world: &World) {
        assert_eq!(
            world.id(),
            self.world,
            "scene graph bound to {} used with {}",
            self.world,
            world.id()
        );
    }

    fn validate_if_enabled(&self, world: &World) {
        if self.config.validate_after_mutation {
            if let Err(err) = self.validate(world) {
                panic!("scene graph invariant violated: {err}");
            }
        }
    }
}

/// Iterator over a node's children, following `next` once around the circle
pub struct Children<'w> {
    world: &'w World,
    first: Option<Entity>,
    cursor: Option<Entity>,
}

impl<'w> Children<'w> {
    fn new(world: &'w World, first: Option<Entity>) -> Self {
        Children {
            world,
            first,
            cursor: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let current = self.cursor?;
        let first = self.first;
        self.cursor = self
            .world
            .try_get::<SceneGraphComponent>(current)
            .and_then(|node| node.next)
            .filter(|next| Some(*next) != first);
        Some(current)
    }
}

/// Destroy hook for [`SceneGraphComponent`]
///
/// Runs while the dying node is still readable. Children become roots that
/// keep their world pose, the node leaves its sibling list, and the
/// parent's head/tail are fixed up.
fn repair_on_destroy(world: &mut World, entity: Entity) {
    let node = *world.get::<SceneGraphComponent>(entity);

    if let Some(first) = node.first_child {
        let mut child = first;
        let mut promoted = 0usize;
        loop {
            let world_pose = *world.get::<Transform>(child);
            let child_node = world.get_mut::<SceneGraphComponent>(child);
            let next = child_node.next;
            child_node.local_transform = world_pose;
            child_node.parent = None;
            child_node.next = None;
            child_node.prev = None;
            promoted += 1;

            match next {
                Some(next) if next != first => child = next,
                _ => break,
            }
        }
        log::debug!("{entity} left the scene graph; {promoted} children promoted to roots");
    }

    // A lone child links to itself and has nothing to splice.
    let lone_child = node.next == Some(entity);
    if let (Some(prev), Some(next)) = (node.prev, node.next) {
        if !lone_child {
            world.get_mut::<SceneGraphComponent>(prev).next = Some(next);
            world.get_mut::<SceneGraphComponent>(next).prev = Some(prev);
        }
    }

    if let Some(parent) = node.parent {
        let parent_node = world.get_mut::<SceneGraphComponent>(parent);
        if parent_node.first_child == Some(entity) {
            parent_node.first_child = if lone_child { None } else { node.next };
        }
        if parent_node.last_child == Some(entity) {
            parent_node.last_child = if lone_child { None } else { node.prev };
        }
    }
}

fn link_at_tail(world: &mut World, parent: Entity, child: Entity) {
    let parent_node = world.get::<SceneGraphComponent>(parent);
    match (parent_node.first_child, parent_node.last_child) {
        (Some(first), Some(last)) => {
            let child_node = world.get_mut::<SceneGraphComponent>(child);
            child_node.prev = Some(last);
            child_node.next = Some(first);
            world.get_mut::<SceneGraphComponent>(last).next = Some(child);
            world.get_mut::<SceneGraphComponent>(first).prev = Some(child);
            world.get_mut::<SceneGraphComponent>(parent).last_child = Some(child);
        }
        _ => {
            let child_node = world.get_mut::<SceneGraphComponent>(child);
            child_node.prev = Some(child);
            child_node.next = Some(child);
            let parent_node = world.get_mut::<SceneGraphComponent>(parent);
            parent_node.first_child = Some(child);
            parent_node.last_child = Some(child);
        }
    }
}

fn is_ancestor(world: &World, ancestor: Entity, mut node: Entity) -> bool {
    while let Some(parent) = SceneGraph::parent_of(world, node) {
        if parent == ancestor {
            return true;
        }
        node = parent;
    }
    false
}

/// Recompute one node's cached world transform from its parent's.
fn refresh_world_transform(world: &mut World, entity: Entity) -> SceneGraphComponent {
    let node = *world.get::<SceneGraphComponent>(entity);
    let world_transform = match node.parent {
        None => node.local_transform,
        Some(parent) => node.local_transform.transform(world.get::<Transform>(parent)),
    };
    world.set(entity, world_transform);
    log::trace!("{entity} world position {}", world_transform.position);
    node
}

fn propagate_recursive(world: &mut World, entity: Entity) {
    let node = refresh_world_transform(world, entity);

    if let Some(first) = node.first_child {
        let mut child = first;
        loop {
            propagate_recursive(world, child);
            child = next_sibling(world, child);
            if child == first {
                break;
            }
        }
    }
}

fn propagate_worklist(world: &mut World, entity: Entity) {
    let mut stack = vec![entity];
    let mut siblings = Vec::new();

    while let Some(entity) = stack.pop() {
        let node = refresh_world_transform(world, entity);
        siblings.extend(Children::new(world, node.first_child));
        // Reversed so the first child is popped first.
        stack.extend(siblings.drain(..).rev());
    }
}

fn next_sibling(world: &World, entity: Entity) -> Entity {
    world
        .get::<SceneGraphComponent>(entity)
        .next
        .unwrap_or_else(|| panic!("sibling list is broken at {entity}"))
}

/// Node of `entity`, treating `leaving` as already gone
fn live_node(world: &World, entity: Entity, leaving: Option<Entity>) -> Option<&SceneGraphComponent> {
    if Some(entity) == leaving {
        return None;
    }
    world.try_get::<SceneGraphComponent>(entity)
}

/// Full invariant check
///
/// `leaving` names a node whose component is about to be removed: the
/// destroy hook validates after repair but before the component is gone,
/// so that node is skipped and any link to it counts as dangling.
fn check_hierarchy(world: &World, tolerance: f32, leaving: Option<Entity>) -> Result<(), HierarchyError> {
    let node_count = world
        .storage::<SceneGraphComponent>()
        .map_or(0, |storage| storage.len());

    for (entity, node) in world.iter::<SceneGraphComponent>() {
        if Some(entity) == leaving {
            continue;
        }

        let cached = world
            .try_get::<Transform>(entity)
            .ok_or(HierarchyError::MissingTransform(entity))?;

        let links = [
            ("parent", node.parent),
            ("first_child", node.first_child),
            ("last_child", node.last_child),
            ("next", node.next),
            ("prev", node.prev),
        ];
        for (link, target) in links {
            if let Some(target) = target {
                if live_node(world, target, leaving).is_none() {
                    return Err(HierarchyError::DanglingLink { entity, link, target });
                }
            }
        }

        match node.parent {
            None => {
                if !cached.abs_diff_eq(&node.local_transform, tolerance) {
                    return Err(HierarchyError::RootTransformMismatch(entity));
                }
            }
            Some(parent) => {
                let occurrences = Children::new(world, world.get::<SceneGraphComponent>(parent).first_child)
                    .take(node_count + 1)
                    .filter(|listed| *listed == entity)
                    .count();
                if occurrences != 1 {
                    return Err(HierarchyError::ChildNotListed {
                        child: entity,
                        parent,
                        occurrences,
                    });
                }

                let parent_world = world
                    .try_get::<Transform>(parent)
                    .ok_or(HierarchyError::MissingTransform(parent))?;
                let expected = node.local_transform.transform(parent_world);
                if !cached.abs_diff_eq(&expected, tolerance) {
                    return Err(HierarchyError::WorldTransformMismatch(entity));
                }
            }
        }

        check_child_list(world, entity, node, node_count, leaving)?;
    }

    Ok(())
}

fn check_child_list(
    world: &World,
    parent: Entity,
    node: &SceneGraphComponent,
    node_count: usize,
    leaving: Option<Entity>,
) -> Result<(), HierarchyError> {
    let (first, last) = match (node.first_child, node.last_child) {
        (None, None) => return Ok(()),
        (Some(first), Some(last)) => (first, last),
        (first, last) => {
            return Err(HierarchyError::BrokenSiblingList {
                parent,
                at: first.or(last).unwrap_or(parent),
            })
        }
    };

    let broken = |at| HierarchyError::BrokenSiblingList { parent, at };
    let mut current = first;
    let mut steps = 0usize;

    loop {
        let child = live_node(world, current, leaving).ok_or_else(|| broken(current))?;
        if child.parent != Some(parent) {
            return Err(HierarchyError::WrongParent {
                child: current,
                listed_under: parent,
                actual: child.parent,
            });
        }

        let next = child.next.ok_or_else(|| broken(current))?;
        let next_node = live_node(world, next, leaving).ok_or_else(|| broken(current))?;
        if next_node.prev != Some(current) {
            return Err(broken(current));
        }

        steps += 1;
        if next == first {
            return if current == last { Ok(()) } else { Err(broken(current)) };
        }
        if steps > node_count {
            return Err(broken(current));
        }
        current = next;
    }
}
