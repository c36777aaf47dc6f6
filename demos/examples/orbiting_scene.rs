// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A moving scene fed into the octree.
//!
//! Update a transform hierarchy over a few frames and rebuild the spatial
//! partition from the committed world transforms each frame, the way a game
//! loop would drive collision queries.
//!
//! Run:
//! - `cargo run -p canopy_demos --example orbiting_scene`

use canopy_octree::adapters::transform::FrameBounds;
use canopy_octree::Octree;
use canopy_transform::{Hierarchy, LocalTransform, Motion};
use glam::Vec3;

fn main() {
    env_logger::init();

    let mut hierarchy = Hierarchy::new();

    // A station fixed near the middle of the world, with two drones orbiting
    // it and a sensor rocking on the second drone.
    let station = hierarchy.insert(
        None,
        LocalTransform::at(Vec3::new(32.0, 32.0, 32.0)),
        Motion::FIXED,
    );
    let drone_a = hierarchy.insert(
        Some(station),
        LocalTransform::default(),
        Motion::orbit(Vec3::Y, 8.0, 12.0).unwrap(),
    );
    let drone_b = hierarchy.insert(
        Some(station),
        LocalTransform::default(),
        Motion::orbit(Vec3::new(1.0, 1.0, 0.0), 5.0, 7.0).unwrap(),
    );
    let sensor = hierarchy.insert(
        Some(drone_b),
        LocalTransform::at(Vec3::new(0.0, 1.0, 0.0)),
        Motion::rock(Vec3::X, 0.4, 2.0).unwrap(),
    );
    let scene = [
        ("station", station, 3.0),
        ("drone_a", drone_a, 1.0),
        ("drone_b", drone_b, 1.0),
        ("sensor", sensor, 0.25),
    ];

    let dt = 1.0 / 30.0;
    for frame in 0..5 {
        let now = frame as f32 * dt;

        // Transforms first; the octree reads committed snapshots.
        if let Err(err) = hierarchy.update(now, dt) {
            log::error!("transform update failed: {err}");
            continue;
        }

        let mut tree: Octree<&str> = Octree::new(Vec3::ZERO, 64.0, 3);
        for (name, id, radius) in scene {
            let bounds = FrameBounds::new(&hierarchy, id, radius);
            match tree.add_object(&bounds, name) {
                Ok(key) => log::debug!(
                    "frame {frame}: {name} at depth {:?}",
                    tree.node_depth(tree.node_of(key).unwrap())
                ),
                Err(err) => log::warn!("frame {frame}: {name} skipped: {err}"),
            }
        }
        println!("frame {frame}: partitioned {} objects", tree.len());
    }
}
