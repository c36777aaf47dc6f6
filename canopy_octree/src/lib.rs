// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_octree --heading-base-level=0

//! Canopy Octree: a fixed-depth spatial partition over cubic world regions.
//!
//! Canopy Octree is a reusable building block for small bounded scenes that
//! need coarse containment queries for collision sweeps and visibility passes.
//!
//! - Builds the full 8-ary tree eagerly at construction: every non-leaf cube
//!   has exactly eight children at half the edge length, in a fixed octant
//!   order (front/back x top/bottom x left/right). Nodes are never added or
//!   removed afterwards.
//! - Inserts objects by their world-space bounding sphere, descending to the
//!   deepest cube that fully contains the sphere. An object straddling a
//!   child boundary stays at the parent; placement is deterministic.
//! - Keeps a flat registry of every inserted object for draw/update passes
//!   that must visit each object exactly once, with [`ObjectFlags`] and an
//!   [`ObjectFilter`] to restrict iteration.
//!
//! ## Containment test
//!
//! A sphere is tested against the three cube faces meeting at the node's
//! reference corner: the perpendicular distance from the center to each face
//! must be at least the radius (near face) and at most `length - radius` (far
//! face). A diameter larger than the edge length is rejected up front without
//! touching geometry.
//!
//! ## What this crate does not do
//!
//! Objects are snapshots: the octree reads a `(center, radius)` pair at
//! insertion time and never re-queries the object. Re-fitting objects that
//! move after insertion is out of scope; callers that need it should rebuild
//! the tree from fresh snapshots. There is no removal either: the registry
//! is insert-only, matching its per-frame rebuild usage.
//!
//! ## Integration with Canopy Transform
//!
//! With the `transform_adapter` feature, `adapters::transform::FrameBounds`
//! derives a bounding sphere from a frame's committed world transform, using
//! the no-scale translation and a base radius scaled conservatively by the
//! frame's largest scale component.
//!
//! # Example
//!
//! ```rust
//! use canopy_octree::{BoundingSphere, InsertError, ObjectFilter, Octree};
//! use glam::Vec3;
//!
//! // An 8x8x8 world subdivided twice: 73 cubes, finest cells 2 units wide.
//! let mut tree: Octree<&str> = Octree::new(Vec3::ZERO, 8.0, 2);
//!
//! let probe = tree
//!     .insert(BoundingSphere::new(Vec3::new(1.0, 1.0, 1.0), 0.1), "probe")
//!     .unwrap();
//! assert_eq!(tree.node_depth(tree.node_of(probe).unwrap()), Some(2));
//!
//! // A sphere wider than the world is refused with a reason.
//! let err = tree
//!     .insert(BoundingSphere::new(Vec3::splat(4.0), 5.0), "giant")
//!     .unwrap_err();
//! assert!(matches!(err, InsertError::TooLarge { .. }));
//!
//! // Draw pass: visit every surviving object once.
//! for (key, name) in tree.objects(ObjectFilter::default()) {
//!     let sphere = tree.sphere(key).unwrap();
//!     println!("{name} at {:?}", sphere.center);
//! }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
mod node;
mod tree;
mod types;

pub use tree::Octree;
pub use types::{Bounded, BoundingSphere, InsertError, NodeRef, ObjectFilter, ObjectFlags, ObjectKey};
