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
//! Scene-graph behavior tests
//!
//! Relationship creation, eager propagation and repair when nodes are
//! removed or entities destroyed.

use glam::Vec3;
use scene_engine::ecs::{Entity, World};
use scene_engine::scene::{Scene, SceneGraph, SceneGraphComponent, SceneGraphConfig, Transform, Traversal};

const EPSILON: f32 = 1e-5;

fn validating_scene() -> Scene {
    Scene::with_config(SceneGraphConfig::default().with_validation())
}

fn node(scene: &Scene, entity: Entity) -> SceneGraphComponent {
    *scene.world().get::<SceneGraphComponent>(entity)
}

fn world_position(scene: &Scene, entity: Entity) -> Vec3 {
    scene.world().get::<Transform>(entity).position
}

/// Parent `children` under `parent` in order
fn attach_all(scene: &mut Scene, parent: Entity, children: &[Entity]) {
    for &child in children {
        scene.entity(parent).make_parent_of(child);
    }
}

fn sibling_order(scene: &Scene, parent: Entity) -> Vec<Entity> {
    SceneGraph::children(scene.world(), parent).collect()
}

#[test]
fn test_root_move_propagates_to_descendants() {
    let mut scene = validating_scene();
    let r = scene.spawn(Transform::IDENTITY);
    let a = scene.spawn(Transform::IDENTITY);
    let b = scene.spawn(Transform::IDENTITY);

    scene.entity(a).make_child_of(r);
    scene.entity(a).move_to(Transform::from_xyz(1.0, 0.0, 0.0));
    scene.entity(b).make_child_of(a);
    scene.entity(b).move_to(Transform::from_xyz(0.0, 1.0, 0.0));

    assert_eq!(world_position(&scene, r), Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(world_position(&scene, a), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(world_position(&scene, b), Vec3::new(1.0, 1.0, 0.0));

    scene.entity(r).move_to(Transform::from_xyz(5.0, 0.0, 0.0));

    assert_eq!(world_position(&scene, r), Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(world_position(&scene, a), Vec3::new(6.0, 0.0, 0.0));
    assert_eq!(world_position(&scene, b), Vec3::new(6.0, 1.0, 0.0));
}

#[test]
fn test_world_transform_is_fold_from_root() {
    let mut scene = validating_scene();
    let locals = [
        Transform::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 30.0, 0.0), Vec3::splat(2.0)),
        Transform::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(10.0, 0.0, 0.0), Vec3::ONE),
        Transform::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 45.0), Vec3::splat(0.5)),
        Transform::from_xyz(1.0, 1.0, 1.0),
    ];

    let chain: Vec<Entity> = locals.iter().map(|_| scene.spawn(Transform::IDENTITY)).collect();
    for pair in chain.windows(2) {
        scene.entity(pair[0]).make_parent_of(pair[1]);
    }
    for (&entity, &local) in chain.iter().zip(&locals) {
        scene.entity(entity).move_to(local);
    }

    let mut expected = locals[0];
    for local in &locals[1..] {
        expected = local.transform(&expected);
    }

    let leaf = *scene.world().get::<Transform>(chain[3]);
    assert!(leaf.abs_diff_eq(&expected, EPSILON));
}

#[test]
fn test_sibling_list_is_circular() {
    let mut scene = validating_scene();
    let parent = scene.spawn(Transform::IDENTITY);
    let children: Vec<Entity> = (0..5).map(|_| scene.spawn(Transform::IDENTITY)).collect();
    attach_all(&mut scene, parent, &children);

    let first = node(&scene, parent).first_child().unwrap();
    assert_eq!(first, children[0]);
    assert_eq!(node(&scene, parent).last_child(), Some(children[4]));

    let mut forward = first;
    for step in 0..children.len() {
        assert_eq!(forward, children[step]);
        forward = node(&scene, forward).next_sibling().unwrap();
    }
    assert_eq!(forward, first);

    let mut backward = first;
    for _ in 0..children.len() {
        backward = node(&scene, backward).prev_sibling().unwrap();
    }
    assert_eq!(backward, first);
}

#[test]
fn test_removing_node_preserves_child_world_pose() {
    let mut scene = validating_scene();
    let parent = scene.spawn(Transform::new(
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(0.0, 90.0, 0.0),
        Vec3::splat(2.0),
    ));
    let child = scene.spawn(Transform::IDENTITY);
    scene.entity(parent).make_parent_of(child);
    scene.entity(child).move_to(Transform::from_xyz(1.0, 0.0, 0.0));

    let before = *scene.world().get::<Transform>(child);
    assert!(before.position.abs_diff_eq(Vec3::new(1.0, 2.0, 1.0), EPSILON));

    scene.world_mut().remove::<SceneGraphComponent>(parent);

    let child_node = node(&scene, child);
    assert_eq!(child_node.parent(), None);
    assert_eq!(child_node.next_sibling(), None);
    assert_eq!(child_node.prev_sibling(), None);
    assert_eq!(*child_node.local_transform(), before);
    assert_eq!(*scene.world().get::<Transform>(child), before);
    assert_eq!(scene.validate(), Ok(()));
}

#[test]
fn test_promoted_child_keeps_its_subtree() {
    let mut scene = validating_scene();
    let top = scene.spawn(Transform::from_xyz(10.0, 0.0, 0.0));
    let mid = scene.spawn(Transform::IDENTITY);
    let leaf = scene.spawn(Transform::IDENTITY);
    scene.entity(top).make_parent_of(mid);
    scene.entity(mid).make_parent_of(leaf);
    scene.entity(leaf).move_to(Transform::from_xyz(0.0, 0.0, 1.0));

    scene.world_mut().remove::<SceneGraphComponent>(top);

    // mid is now a root at its old world pose; moving it still drags leaf.
    assert_eq!(node(&scene, mid).local_transform().position, Vec3::new(10.0, 0.0, 0.0));
    scene.entity(mid).move_to(Transform::from_xyz(0.0, 5.0, 0.0));
    assert_eq!(world_position(&scene, leaf), Vec3::new(0.0, 5.0, 1.0));
    assert_eq!(world_position(&scene, top), Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn test_sole_child_removal_clears_parent_links() {
    let mut scene = validating_scene();
    let parent = scene.spawn(Transform::IDENTITY);
    let child = scene.spawn(Transform::IDENTITY);
    scene.entity(parent).make_parent_of(child);

    scene.world_mut().remove::<SceneGraphComponent>(child);

    let parent_node = node(&scene, parent);
    assert_eq!(parent_node.first_child(), None);
    assert_eq!(parent_node.last_child(), None);
    assert!(!scene.world().has::<SceneGraphComponent>(child));
    assert_eq!(scene.validate(), Ok(()));
}

#[test]
fn test_removing_first_middle_and_last_sibling() {
    let mut scene = validating_scene();
    let parent = scene.spawn(Transform::IDENTITY);
    let c: Vec<Entity> = (0..5).map(|_| scene.spawn(Transform::IDENTITY)).collect();
    attach_all(&mut scene, parent, &c);

    scene.world_mut().remove::<SceneGraphComponent>(c[2]);
    assert_eq!(sibling_order(&scene, parent), vec![c[0], c[1], c[3], c[4]]);

    scene.world_mut().remove::<SceneGraphComponent>(c[0]);
    assert_eq!(sibling_order(&scene, parent), vec![c[1], c[3], c[4]]);
    assert_eq!(node(&scene, parent).first_child(), Some(c[1]));
    assert_eq!(node(&scene, c[1]).prev_sibling(), Some(c[4]));

    scene.world_mut().remove::<SceneGraphComponent>(c[4]);
    assert_eq!(sibling_order(&scene, parent), vec![c[1], c[3]]);
    assert_eq!(node(&scene, parent).last_child(), Some(c[3]));
    assert_eq!(node(&scene, c[3]).next_sibling(), Some(c[1]));

    assert_eq!(scene.validate(), Ok(()));
}

#[test]
fn test_destroying_entity_runs_repair() {
    let mut scene = validating_scene();
    let parent = scene.spawn(Transform::from_xyz(0.0, 3.0, 0.0));
    let a = scene.spawn(Transform::IDENTITY);
    let b = scene.spawn(Transform::IDENTITY);
    let grandchild = scene.spawn(Transform::IDENTITY);
    attach_all(&mut scene, parent, &[a, b]);
    scene.entity(b).make_parent_of(grandchild);
    scene.entity(grandchild).move_to(Transform::from_xyz(1.0, 0.0, 0.0));

    assert!(scene.destroy_entity(b));

    assert_eq!(sibling_order(&scene, parent), vec![a]);
    assert_eq!(node(&scene, a).next_sibling(), Some(a));
    assert!(node(&scene, grandchild).is_root());
    assert_eq!(world_position(&scene, grandchild), Vec3::new(1.0, 3.0, 0.0));
    assert_eq!(scene.validate(), Ok(()));
}

#[test]
fn test_existing_parent_node_is_reused() {
    let mut scene = validating_scene();
    let parent = scene.spawn(Transform::IDENTITY);
    let first = scene.spawn(Transform::IDENTITY);
    let second = scene.spawn(Transform::IDENTITY);

    scene.entity(parent).make_parent_of(first);
    scene.entity(parent).move_to(Transform::from_xyz(2.0, 0.0, 0.0).with_scale(Vec3::splat(3.0)));
    let before = node(&scene, parent);

    scene.entity(parent).make_parent_of(second);

    let after = node(&scene, parent);
    assert_eq!(after.local_transform(), before.local_transform());
    assert_eq!(after.first_child(), Some(first));
    assert_eq!(after.last_child(), Some(second));
}

#[test]
fn test_new_child_starts_at_identity() {
    let mut scene = validating_scene();
    let parent = scene.spawn(Transform::from_xyz(1.0, 0.0, 0.0));
    let child = scene.spawn(Transform::from_xyz(7.0, 7.0, 7.0));

    scene.entity(parent).make_parent_of(child);

    assert_eq!(*node(&scene, child).local_transform(), Transform::IDENTITY);
    assert_eq!(world_position(&scene, child), Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_existing_root_keeps_local_transform_as_child() {
    let mut scene = validating_scene();
    let subtree_root = scene.spawn(Transform::IDENTITY);
    let leaf = scene.spawn(Transform::IDENTITY);
    scene.entity(subtree_root).make_parent_of(leaf);
    scene.entity(subtree_root).move_to(Transform::from_xyz(0.0, 2.0, 0.0));

    let parent = scene.spawn(Transform::from_xyz(1.0, 0.0, 0.0));
    scene.entity(parent).make_parent_of(subtree_root);

    assert_eq!(world_position(&scene, subtree_root), Vec3::new(1.0, 2.0, 0.0));
    assert_eq!(world_position(&scene, leaf), Vec3::new(1.0, 2.0, 0.0));
}

#[test]
#[should_panic(expected = "already has parent")]
fn test_reparenting_is_rejected() {
    let mut scene = Scene::new();
    let a = scene.spawn(Transform::IDENTITY);
    let b = scene.spawn(Transform::IDENTITY);
    let child = scene.spawn(Transform::IDENTITY);

    scene.entity(a).make_parent_of(child);
    scene.entity(b).make_parent_of(child);
}

#[test]
#[should_panic(expected = "would create a cycle")]
fn test_cycle_is_rejected() {
    let mut scene = Scene::new();
    let a = scene.spawn(Transform::IDENTITY);
    let b = scene.spawn(Transform::IDENTITY);
    let c = scene.spawn(Transform::IDENTITY);

    scene.entity(a).make_parent_of(b);
    scene.entity(b).make_parent_of(c);
    scene.entity(c).make_parent_of(a);
}

#[test]
#[should_panic(expected = "child of itself")]
fn test_self_parenting_is_rejected() {
    let mut scene = Scene::new();
    let a = scene.spawn(Transform::IDENTITY);
    scene.entity(a).make_parent_of(a);
}

#[test]
#[should_panic(expected = "needs a Transform")]
fn test_missing_transform_is_rejected() {
    let mut scene = Scene::new();
    let parent = scene.spawn(Transform::IDENTITY);
    let bare = scene.create_entity();
    scene.entity(parent).make_parent_of(bare);
}

#[test]
#[should_panic(expected = "is not part of the scene graph")]
fn test_update_requires_node() {
    let mut world = World::new();
    let graph = SceneGraph::init(&mut world);
    let entity = world.create_entity();
    world.set(entity, Transform::IDENTITY);
    graph.update_transform_with_children(&mut world, entity);
}

#[test]
fn test_worklist_handles_deep_chain() {
    let mut scene = Scene::with_config(SceneGraphConfig::default().with_traversal(Traversal::Worklist));
    let depth = 4_000;
    let chain: Vec<Entity> = (0..depth).map(|_| scene.spawn(Transform::IDENTITY)).collect();
    for pair in chain.windows(2) {
        scene.entity(pair[0]).make_parent_of(pair[1]);
    }
    scene.entity(chain[1]).move_to(Transform::from_xyz(0.0, 1.0, 0.0));

    scene.entity(chain[0]).move_to(Transform::from_xyz(3.0, 0.0, 0.0));
    assert_eq!(world_position(&scene, chain[depth - 1]), Vec3::new(3.0, 1.0, 0.0));
}

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }

    fn coord(&mut self) -> f32 {
        (self.below(2001) as f32 - 1000.0) / 100.0
    }
}

fn is_in_subtree(world: &World, root: Entity, mut entity: Entity) -> bool {
    loop {
        if entity == root {
            return true;
        }
        match SceneGraph::parent_of(world, entity) {
            Some(parent) => entity = parent,
            None => return false,
        }
    }
}

#[test]
fn test_random_operations_keep_invariants() {
    for traversal in [Traversal::Recursive, Traversal::Worklist] {
        let mut rng = Lcg(0x5eed);
        let mut scene = Scene::with_config(SceneGraphConfig::default().with_traversal(traversal));
        let mut alive: Vec<Entity> = Vec::new();

        for _ in 0..2_000 {
            match rng.below(10) {
                0..=2 => {
                    let pose = Transform::new(
                        Vec3::new(rng.coord(), rng.coord(), rng.coord()),
                        Vec3::new(0.0, rng.coord() * 9.0, 0.0),
                        Vec3::ONE,
                    );
                    alive.push(scene.spawn(pose));
                }
                3..=5 if alive.len() >= 2 => {
                    let parent = alive[rng.below(alive.len())];
                    let child = alive[rng.below(alive.len())];
                    let world = scene.world();
                    if SceneGraph::parent_of(world, child).is_none() && !is_in_subtree(world, child, parent) {
                        scene.entity(parent).make_parent_of(child);
                    }
                }
                6 | 7 if !alive.is_empty() => {
                    let entity = alive[rng.below(alive.len())];
                    let pose = Transform::from_xyz(rng.coord(), rng.coord(), rng.coord());
                    scene.entity(entity).move_to(pose);
                }
                8 if !alive.is_empty() => {
                    let entity = alive[rng.below(alive.len())];
                    scene.world_mut().remove::<SceneGraphComponent>(entity);
                }
                9 if !alive.is_empty() => {
                    let entity = alive.swap_remove(rng.below(alive.len()));
                    assert!(scene.destroy_entity(entity));
                }
                _ => {}
            }

            if let Err(err) = scene.validate() {
                panic!("{traversal:?}: {err}");
            }
        }
    }
}
