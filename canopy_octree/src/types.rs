// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the octree: references, bounding proxies, flags, errors.

use glam::Vec3;

/// Reference to a cube node in the tree.
///
/// The tree is built eagerly at construction and nodes are never added or
/// removed afterwards, so a plain index is sufficient; references stay valid
/// for the lifetime of the [`Octree`](crate::Octree) they came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeRef(pub(crate) u32);

impl NodeRef {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Key of an object in the flat registry.
///
/// Objects are insert-only; keys are never invalidated.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObjectKey(pub(crate) u32);

impl ObjectKey {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// World-space bounding sphere: the only geometric contract the octree reads
/// from scene objects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingSphere {
    /// World-space center.
    pub center: Vec3,
    /// Radius; must be positive and finite for insertion to succeed.
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a bounding sphere from center and radius.
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Bounding proxy exposed by scene objects.
///
/// The octree never inspects geometry or transforms directly; it snapshots
/// this proxy at insertion time.
pub trait Bounded {
    /// World-space center of the bounding sphere.
    fn bounding_origin(&self) -> Vec3;

    /// Radius of the bounding sphere.
    fn bounding_radius(&self) -> f32;
}

impl Bounded for BoundingSphere {
    fn bounding_origin(&self) -> Vec3 {
        self.center
    }

    fn bounding_radius(&self) -> f32 {
        self.radius
    }
}

bitflags::bitflags! {
    /// Object flags controlling draw and collision iteration.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        /// Object participates in draw passes.
        const VISIBLE    = 0b0000_0001;
        /// Object participates in collision sweeps.
        const COLLIDABLE = 0b0000_0010;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::COLLIDABLE
    }
}

/// Filter applied when iterating the flat registry.
///
/// Used by [`Octree::objects`](crate::Octree::objects).
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectFilter {
    /// If true, only yield objects marked [`ObjectFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only yield objects marked [`ObjectFlags::COLLIDABLE`].
    pub collidable_only: bool,
}

/// Why an insertion was rejected.
///
/// Rejection is recoverable: the tree and registry are left untouched, and
/// callers are expected to log and skip the object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InsertError {
    /// The bounding radius is not a positive, finite number.
    InvalidRadius {
        /// The offending radius.
        radius: f32,
    },
    /// The sphere's diameter exceeds the root cube's edge length; it cannot
    /// fit anywhere in the tree.
    TooLarge {
        /// The sphere radius.
        radius: f32,
        /// The root cube's edge length.
        length: f32,
    },
    /// The sphere does not lie entirely within the root cube.
    OutOfBounds,
}

impl core::fmt::Display for InsertError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidRadius { radius } => {
                write!(f, "bounding radius must be positive and finite, got {radius}")
            }
            Self::TooLarge { radius, length } => write!(
                f,
                "bounding sphere of radius {radius} cannot fit a cube of edge length {length}"
            ),
            Self::OutOfBounds => write!(f, "bounding sphere lies outside the root cube"),
        }
    }
}

impl core::error::Error for InsertError {}
