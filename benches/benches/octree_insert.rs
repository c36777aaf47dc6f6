// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_octree::{BoundingSphere, ObjectFilter, Octree};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec3;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1_u64 << 24) as f32)
    }
}

fn gen_spheres(count: usize, world: f32, max_radius: f32, seed: u64) -> Vec<BoundingSphere> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let radius = 0.01 + rng.next_f32() * max_radius;
        // Keep centers padded so every sphere fits the root cube.
        let span = world - 2.0 * radius;
        let center = Vec3::new(
            radius + rng.next_f32() * span,
            radius + rng.next_f32() * span,
            radius + rng.next_f32() * span,
        );
        out.push(BoundingSphere::new(center, radius));
    }
    out
}

fn bench_insert(c: &mut Criterion) {
    const WORLD: f32 = 256.0;
    const COUNT: usize = 4096;
    let spheres = gen_spheres(COUNT, WORLD, 2.0, 0x5eed);

    let mut group = c.benchmark_group("octree_insert");
    group.throughput(Throughput::Elements(COUNT as u64));
    for depth in [2_u32, 3, 4] {
        group.bench_function(format!("depth_{depth}"), |b| {
            b.iter_batched(
                || Octree::<u32>::new(Vec3::ZERO, WORLD, depth),
                |mut tree| {
                    for (i, s) in (0_u32..).zip(spheres.iter()) {
                        let _ = black_box(tree.insert(*s, i));
                    }
                    tree
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_registry_iteration(c: &mut Criterion) {
    const WORLD: f32 = 256.0;
    const COUNT: usize = 4096;
    let spheres = gen_spheres(COUNT, WORLD, 2.0, 0x5eed);
    let mut tree = Octree::<u32>::new(Vec3::ZERO, WORLD, 3);
    for (i, s) in (0_u32..).zip(spheres.iter()) {
        let _ = tree.insert(*s, i);
    }

    let mut group = c.benchmark_group("octree_registry");
    group.throughput(Throughput::Elements(tree.len() as u64));
    group.bench_function("iterate_all", |b| {
        b.iter(|| {
            let mut sum = 0_u64;
            for (_, payload) in tree.objects(ObjectFilter::default()) {
                sum += u64::from(payload);
            }
            black_box(sum)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_registry_iteration);
criterion_main!(benches);
