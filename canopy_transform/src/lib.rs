// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_transform --heading-base-level=0

//! Canopy Transform: a hierarchy of time-driven 3D coordinate frames.
//!
//! Canopy Transform is a reusable building block for scene graphs, simple game
//! scenes, and anything that needs parented coordinate frames resolved once
//! per tick.
//!
//! - Represents a tree of frames, each with a local scale, position, and
//!   quaternion orientation, plus an optional [`Motion`] (spin, rock, orbit)
//!   evaluated as a pure function of absolute time.
//! - Recomputes world transforms top-down on [`Hierarchy::update`]; every
//!   frame composes against its parent's *unscaled* world transform, so a
//!   parent's non-uniform scale never shears attached child geometry.
//! - Keeps two cached matrices per frame: the scaled world transform for
//!   drawing the frame's own geometry, and the no-scale variant that children
//!   and bounding-volume consumers read.
//!
//! ## Composition contract
//!
//! The local transform is rotation, then translation; the parent's no-scale
//! world transform is composed on the left; the frame's own scale is applied
//! separately, only in the scaled variant. Motions adjust the effective
//! orientation or position before composition and never change the stored
//! local state, which keeps updates idempotent within a tick.
//!
//! ## Failure semantics
//!
//! Invalid motion parameters (zero axis, non-positive period) are refused at
//! construction with a [`MotionError`]. A parent link left pointing at a
//! removed frame surfaces as [`UpdateError::DanglingParent`] from
//! [`Hierarchy::update`]; healthy subtrees still update that tick, and the
//! caller is expected to log and repair rather than abort.
//!
//! # Example
//!
//! ```rust
//! use canopy_transform::{Hierarchy, LocalTransform, Motion};
//! use glam::Vec3;
//!
//! let mut hierarchy = Hierarchy::new();
//!
//! // A hull that rocks about its long axis, with a turret riding on deck.
//! let hull = hierarchy.insert(
//!     None,
//!     LocalTransform::at(Vec3::new(0.0, 0.0, 10.0)),
//!     Motion::rock(Vec3::Z, 0.2, 4.0).unwrap(),
//! );
//! let turret = hierarchy.insert(
//!     Some(hull),
//!     LocalTransform::at(Vec3::new(0.0, 1.0, 0.0)),
//!     Motion::spin(Vec3::Y, 0.5).unwrap(),
//! );
//!
//! hierarchy.update(0.25, 1.0 / 60.0).unwrap();
//!
//! let world = hierarchy.world_transform_no_scale(turret).unwrap();
//! let position = world.w_axis.truncate();
//! assert!((position.z - 10.0).abs() < 0.5);
//! ```
//!
//! This crate is `no_std` (with the `libm` feature in place of `std`) and
//! uses `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod hierarchy;
mod math;
mod types;

pub use hierarchy::{Hierarchy, UpdateError};
pub use types::{LocalTransform, Motion, MotionError, TransformId};
