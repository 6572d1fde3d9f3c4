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
//! Scene hierarchy example
//!
//! Builds a three-node chain R -> A -> B, moves the root and shows the new
//! world positions, then destroys A and shows B keeping its pose as a root.

use scene_engine::scene::{Scene, SceneGraphConfig, Transform};
use scene_engine::Entity;

fn print_positions(scene: &Scene, nodes: &[(&str, Entity)]) {
    for (label, entity) in nodes {
        let position = scene.world().get::<Transform>(*entity).position;
        println!("  {label}: ({:.1}, {:.1}, {:.1})", position.x, position.y, position.z);
    }
}

fn main() {
    println!("Scene Engine - Hierarchy Example");
    println!("================================\n");

    let mut scene = Scene::with_config(SceneGraphConfig::default().with_validation());

    let r = scene.spawn(Transform::IDENTITY);
    let a = scene.spawn(Transform::IDENTITY);
    let b = scene.spawn(Transform::IDENTITY);

    scene.entity(r).make_parent_of(a);
    scene.entity(a).move_to(Transform::from_xyz(1.0, 0.0, 0.0));
    scene.entity(a).make_parent_of(b);
    scene.entity(b).move_to(Transform::from_xyz(0.0, 1.0, 0.0));

    let nodes = [("R", r), ("A", a), ("B", b)];
    println!("Initial world positions:");
    print_positions(&scene, &nodes);

    scene.entity(r).move_to(Transform::from_xyz(5.0, 0.0, 0.0));
    println!("\nAfter moving R to (5, 0, 0):");
    print_positions(&scene, &nodes);

    scene.destroy_entity(a);
    println!("\nAfter destroying A:");
    print_positions(&scene, &[("R", r), ("B", b)]);
    println!("  B parent: {:?}", scene.entity(b).parent());

    match scene.validate() {
        Ok(()) => println!("\nScene graph is consistent"),
        Err(err) => println!("\nScene graph is inconsistent: {err}"),
    }
}
