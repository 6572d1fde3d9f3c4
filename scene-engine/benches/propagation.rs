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
//! Benchmarks for scene-graph maintenance
//!
//! These benchmarks measure:
//! - Eager propagation after moving the root of a deep chain
//! - Eager propagation after moving the root of a wide tree
//! - Repair cost when a node with many children is destroyed
//! - Render extraction throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scene_engine::ecs::Entity;
use scene_engine::scene::{Scene, SceneGraphConfig, Transform, Traversal};

fn deep_chain(traversal: Traversal, depth: usize) -> (Scene, Entity) {
    let mut scene = Scene::with_config(SceneGraphConfig::default().with_traversal(traversal));
    let root = scene.spawn(Transform::IDENTITY);
    let mut parent = root;
    for _ in 1..depth {
        let child = scene.spawn(Transform::IDENTITY);
        scene.entity(parent).make_parent_of(child);
        scene.entity(child).move_to(Transform::from_xyz(0.0, 1.0, 0.0));
        parent = child;
    }
    (scene, root)
}

fn wide_tree(fanout: usize) -> (Scene, Entity) {
    let mut scene = Scene::new();
    let root = scene.spawn(Transform::IDENTITY);
    for i in 0..fanout {
        let child = scene.spawn(Transform::IDENTITY);
        scene.entity(root).make_parent_of(child);
        for _ in 0..4 {
            let leaf = scene.spawn(Transform::IDENTITY);
            scene.entity(child).make_parent_of(leaf);
            scene.entity(leaf).move_to(Transform::from_xyz(i as f32, 0.0, 1.0));
        }
    }
    (scene, root)
}

/// Benchmark: move the root of a chain of N nodes
fn bench_deep_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate_deep_chain");

    for depth in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*depth as u64));

        for (label, traversal) in [("recursive", Traversal::Recursive), ("worklist", Traversal::Worklist)] {
            let (mut scene, root) = deep_chain(traversal, *depth);
            let mut x = 0.0f32;
            group.bench_with_input(BenchmarkId::new(label, depth), depth, |b, _| {
                b.iter(|| {
                    x += 1.0;
                    scene.entity(root).move_to(Transform::from_xyz(x, 0.0, 0.0));
                    black_box(&scene);
                });
            });
        }
    }

    group.finish();
}

/// Benchmark: move the root of a two-level tree with N children
fn bench_wide_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate_wide_tree");

    for fanout in [100, 1000].iter() {
        group.throughput(Throughput::Elements((*fanout * 5) as u64));

        let (mut scene, root) = wide_tree(*fanout);
        let mut x = 0.0f32;
        group.bench_with_input(BenchmarkId::from_parameter(fanout), fanout, |b, _| {
            b.iter(|| {
                x += 1.0;
                scene.entity(root).move_to(Transform::from_xyz(x, 0.0, 0.0));
                black_box(&scene);
            });
        });
    }

    group.finish();
}

/// Benchmark: destroy a parent and promote its children
fn bench_destroy_repair(c: &mut Criterion) {
    let mut group = c.benchmark_group("destroy_repair");

    for fanout in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*fanout as u64));
        group.bench_with_input(BenchmarkId::from_parameter(fanout), fanout, |b, &fanout| {
            b.iter_batched(
                || wide_tree(fanout),
                |(mut scene, root)| {
                    scene.destroy_entity(root);
                    black_box(scene);
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark: extract model matrices for every entity
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_render_instances");

    for fanout in [100, 1000].iter() {
        let (scene, _) = wide_tree(*fanout);
        group.throughput(Throughput::Elements((*fanout * 5 + 1) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(fanout), fanout, |b, _| {
            b.iter(|| black_box(scene.extract_render_instances()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_deep_chain,
    bench_wide_tree,
    bench_destroy_repair,
    bench_extract
);
criterion_main!(benches);
