// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_transform::{Hierarchy, LocalTransform, Motion};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec3;

/// A wide hierarchy: `roots` parents, each with `children` spinning leaves.
fn build_star(roots: usize, children: usize) -> Hierarchy {
    let mut h = Hierarchy::new();
    for r in 0..roots {
        let root = h.insert(
            None,
            LocalTransform::at(Vec3::new(r as f32 * 10.0, 0.0, 0.0)),
            Motion::rock(Vec3::Z, 0.3, 4.0).unwrap(),
        );
        for c in 0..children {
            h.insert(
                Some(root),
                LocalTransform::at(Vec3::new(0.0, 1.0, c as f32)),
                Motion::spin(Vec3::Y, 1.0).unwrap(),
            );
        }
    }
    h
}

/// A deep hierarchy: a single chain of `depth` frames.
fn build_chain(depth: usize) -> Hierarchy {
    let mut h = Hierarchy::new();
    let mut parent = None;
    for _ in 0..depth {
        let id = h.insert(
            parent,
            LocalTransform::at(Vec3::new(1.0, 0.0, 0.0)),
            Motion::spin(Vec3::Y, 0.1).unwrap(),
        );
        parent = Some(id);
    }
    h
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy_update");

    let mut star = build_star(64, 63);
    group.throughput(Throughput::Elements(64 * 64));
    group.bench_function("star_4096", |b| {
        let mut now = 0.0_f32;
        b.iter(|| {
            now += 1.0 / 60.0;
            black_box(star.update(now, 1.0 / 60.0)).unwrap();
        });
    });

    let mut chain = build_chain(256);
    group.throughput(Throughput::Elements(256));
    group.bench_function("chain_256", |b| {
        let mut now = 0.0_f32;
        b.iter(|| {
            now += 1.0 / 60.0;
            black_box(chain.update(now, 1.0 / 60.0)).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
