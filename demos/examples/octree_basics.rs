// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octree basics.
//!
//! Build a small tree, insert a few objects, and show where they land.
//!
//! Run:
//! - `cargo run -p canopy_demos --example octree_basics`

use canopy_octree::{BoundingSphere, ObjectFilter, Octree};
use glam::Vec3;

fn main() {
    env_logger::init();

    // An 8x8x8 world subdivided twice: finest cells are 2 units wide.
    let mut tree: Octree<&str> = Octree::new(Vec3::ZERO, 8.0, 2);

    let placements = [
        ("probe", BoundingSphere::new(Vec3::new(1.0, 1.0, 1.0), 0.1)),
        ("crate", BoundingSphere::new(Vec3::new(6.0, 6.0, 6.0), 0.5)),
        ("hub", BoundingSphere::new(Vec3::new(4.0, 4.0, 4.0), 0.1)),
        ("blimp", BoundingSphere::new(Vec3::new(4.0, 4.0, 4.0), 5.0)),
    ];

    for (name, sphere) in placements {
        match tree.insert(sphere, name) {
            Ok(key) => {
                let node = tree.node_of(key).unwrap();
                println!(
                    "{name:>6}: node {node:?} at depth {}",
                    tree.node_depth(node).unwrap()
                );
            }
            Err(err) => {
                log::warn!("skipping {name}: {err}");
                println!("{name:>6}: rejected ({err})");
            }
        }
    }

    // Draw pass: the flat registry visits each placed object exactly once.
    let drawn = tree.objects(ObjectFilter::default()).count();
    println!("objects to draw: {drawn}");
    assert_eq!(drawn, 3, "the oversize blimp must not be registered");
}
