// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Canopy Transform.
//!
//! ## Feature
//!
//! Enable with `transform_adapter`.
//!
//! ## Notes
//!
//! These helpers derive a bounding sphere from a frame's committed world
//! transform. They read whatever the hierarchy last computed; run
//! [`Hierarchy::update`] before inserting so the snapshot reflects the
//! current tick.

use canopy_transform::{Hierarchy, TransformId};
use glam::Vec3;

use crate::types::Bounded;

/// A [`Bounded`] view of a transform frame.
///
/// The bounding origin is the translation of the frame's no-scale world
/// transform; the radius is `base_radius` scaled by the frame's largest scale
/// component, so non-uniform scaling stays conservative.
///
/// A stale [`TransformId`] reports a zero radius, which the octree rejects at
/// insertion with an invalid-radius error.
#[derive(Clone, Copy, Debug)]
pub struct FrameBounds<'h> {
    hierarchy: &'h Hierarchy,
    id: TransformId,
    base_radius: f32,
}

impl<'h> FrameBounds<'h> {
    /// View `id` in `hierarchy` as a bounding sphere of unscaled radius
    /// `base_radius`.
    pub fn new(hierarchy: &'h Hierarchy, id: TransformId, base_radius: f32) -> Self {
        Self {
            hierarchy,
            id,
            base_radius,
        }
    }
}

impl Bounded for FrameBounds<'_> {
    fn bounding_origin(&self) -> Vec3 {
        self.hierarchy
            .world_transform_no_scale(self.id)
            .map(|m| m.w_axis.truncate())
            .unwrap_or(Vec3::ZERO)
    }

    fn bounding_radius(&self) -> f32 {
        match self.hierarchy.scale(self.id) {
            Some(scale) => self.base_radius * scale.max_element(),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Octree;
    use crate::types::{BoundingSphere, InsertError};
    use canopy_transform::{LocalTransform, Motion};

    #[test]
    fn frame_bounds_track_the_committed_world_position() {
        let mut h = Hierarchy::new();
        let frame = h.insert(
            None,
            LocalTransform {
                scale: Vec3::new(2.0, 1.0, 1.0),
                position: Vec3::new(1.0, 2.0, 3.0),
                ..Default::default()
            },
            Motion::FIXED,
        );
        h.update(0.0, 0.0).unwrap();

        let bounds = FrameBounds::new(&h, frame, 0.5);
        assert_eq!(bounds.bounding_origin(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.bounding_radius(), 1.0, "largest scale axis wins");

        let mut tree: Octree<u32> = Octree::new(Vec3::ZERO, 8.0, 2);
        let key = tree.add_object(&bounds, 7).unwrap();
        assert_eq!(
            tree.sphere(key),
            Some(BoundingSphere::new(Vec3::new(1.0, 2.0, 3.0), 1.0))
        );
    }

    #[test]
    fn stale_frame_is_rejected_at_insertion() {
        let mut h = Hierarchy::new();
        let frame = h.insert(None, LocalTransform::default(), Motion::FIXED);
        h.update(0.0, 0.0).unwrap();
        h.remove(frame);

        let bounds = FrameBounds::new(&h, frame, 0.5);
        let mut tree: Octree<u32> = Octree::new(Vec3::ZERO, 8.0, 2);
        assert_eq!(
            tree.add_object(&bounds, 7).unwrap_err(),
            InsertError::InvalidRadius { radius: 0.0 }
        );
    }
}
