// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core hierarchy implementation: structure, per-tick update, composition.

use alloc::vec::Vec;
use glam::{Mat4, Quat, Vec3};

use crate::types::{LocalTransform, Motion, TransformId};

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<TransformId>,
    children: Vec<TransformId>,
    local: LocalTransform,
    motion: Motion,
    world: Mat4,
    world_no_scale: Mat4,
}

impl Node {
    fn new(generation: u32, local: LocalTransform, motion: Motion) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            motion,
            world: Mat4::IDENTITY,
            world_no_scale: Mat4::IDENTITY,
        }
    }
}

/// A tree of coordinate frames, recomputed freshly every update tick.
///
/// Frames are owned by the hierarchy and addressed by generational
/// [`TransformId`] handles. Parent links are non-owning back-references into
/// the same arena; removing a frame removes its subtree and stales the ids.
///
/// Each frame's unscaled world transform is the composition of its parent's
/// unscaled world transform with the frame's own rotation-then-translation
/// local transform, evaluated through its [`Motion`] at the current time. The
/// frame's scale enters only the scaled variant, so children never inherit a
/// parent's (possibly non-uniform) scale.
pub struct Hierarchy {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    epoch: u64,
}

impl core::fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Hierarchy")
            .field("frames_total", &total)
            .field("frames_alive", &alive)
            .field("free_list", &free)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure while updating the hierarchy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UpdateError {
    /// A frame's stored parent id no longer refers to a live frame. The frame
    /// and its descendants were skipped this tick; other subtrees updated
    /// normally.
    DanglingParent {
        /// The frame whose parent link is broken.
        node: TransformId,
        /// The stale parent id it still holds.
        parent: TransformId,
    },
}

impl core::fmt::Display for UpdateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DanglingParent { node, parent } => {
                write!(f, "frame {node:?} holds a dangling parent id {parent:?}")
            }
        }
    }
}

impl core::error::Error for UpdateError {}

impl Hierarchy {
    /// Create a new empty hierarchy.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
        }
    }

    /// Insert a new frame as a child of `parent` (or as a root if `None`).
    ///
    /// Panics if `parent` is a stale id; use [`set_parent`](Self::set_parent)
    /// to install an unchecked back-reference.
    pub fn insert(
        &mut self,
        parent: Option<TransformId>,
        local: LocalTransform,
        motion: Motion,
    ) -> TransformId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local, motion));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "TransformId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local, motion)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "TransformId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = TransformId::new(idx, generation);
        if let Some(p) = parent {
            assert!(self.is_alive(p), "parent TransformId is stale");
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a frame (and its subtree) from the hierarchy.
    pub fn remove(&mut self, id: TransformId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent
            && self.is_alive(parent)
        {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Install a non-owning parent back-reference on `id`.
    ///
    /// The new parent is recorded as given: a stale id is not rejected here
    /// and surfaces as [`UpdateError::DanglingParent`] on the next update.
    /// Cycles are not detected either; re-linking a frame under its own
    /// descendant is the caller's responsibility to avoid.
    pub fn set_parent(&mut self, id: TransformId, new_parent: Option<TransformId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = self.node(id).parent {
            if self.is_alive(p) {
                self.unlink_parent(id, p);
            } else {
                self.node_mut(id).parent = None;
            }
        }
        match new_parent {
            Some(p) if self.is_alive(p) => self.link_parent(id, p),
            Some(p) => self.node_mut(id).parent = Some(p),
            None => {}
        }
    }

    /// Update the stored local position.
    pub fn set_position(&mut self, id: TransformId, position: Vec3) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.position = position;
        }
    }

    /// Update the stored local scale.
    pub fn set_scale(&mut self, id: TransformId, scale: Vec3) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.scale = scale;
        }
    }

    /// Update the stored local orientation.
    pub fn set_orientation(&mut self, id: TransformId, orientation: Quat) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.orientation = orientation;
        }
    }

    /// Replace the frame's motion.
    pub fn set_motion(&mut self, id: TransformId, motion: Motion) {
        if let Some(n) = self.node_opt_mut(id) {
            n.motion = motion;
        }
    }

    /// Stored local position, or `None` for a stale id.
    pub fn position(&self, id: TransformId) -> Option<Vec3> {
        self.node_opt(id).map(|n| n.local.position)
    }

    /// Stored local scale, or `None` for a stale id.
    pub fn scale(&self, id: TransformId) -> Option<Vec3> {
        self.node_opt(id).map(|n| n.local.scale)
    }

    /// Stored local orientation, or `None` for a stale id.
    pub fn orientation(&self, id: TransformId) -> Option<Quat> {
        self.node_opt(id).map(|n| n.local.orientation)
    }

    /// The parent of `id`, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: TransformId) -> Option<TransformId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// The children of `id`; empty for leaves and stale ids.
    pub fn children_of(&self, id: TransformId) -> &[TransformId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Most recently committed world transform, including this frame's scale.
    pub fn world_transform(&self, id: TransformId) -> Option<Mat4> {
        self.node_opt(id).map(|n| n.world)
    }

    /// Most recently committed world transform, excluding this frame's scale.
    ///
    /// This is the matrix children compose against, so attached geometry is
    /// never sheared by a parent's non-uniform scale.
    pub fn world_transform_no_scale(&self, id: TransformId) -> Option<Mat4> {
        self.node_opt(id).map(|n| n.world_no_scale)
    }

    /// Recompute world transforms for every frame at absolute time `now`.
    ///
    /// Motions are pure functions of `now`, so calling this twice with the
    /// same arguments yields bit-identical matrices. `dt` is the frame
    /// interval supplied by the update driver; it is carried for drivers that
    /// meter their own simulation but does not enter motion evaluation.
    ///
    /// Returns the first broken parent chain found, after all healthy
    /// subtrees have been updated.
    pub fn update(&mut self, now: f32, dt: f32) -> Result<(), UpdateError> {
        debug_assert!(
            dt.is_finite() && dt >= 0.0,
            "frame interval must be finite and non-negative"
        );
        self.epoch = self.epoch.wrapping_add(1);

        let roots: Vec<TransformId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "TransformId uses 32-bit indices by design."
                    )]
                    Some(TransformId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect();

        for root in roots {
            self.update_world_recursive(root, Mat4::IDENTITY, now);
        }

        // Frames holding a stale parent id are unreachable from any root;
        // report the first one so the caller can log and repair.
        for (i, slot) in self.nodes.iter().enumerate() {
            if let Some(n) = slot
                && let Some(p) = n.parent
                && !self.is_alive(p)
            {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "TransformId uses 32-bit indices by design."
                )]
                let node = TransformId::new(i as u32, n.generation);
                let err = UpdateError::DanglingParent { node, parent: p };
                log::debug!("transform update skipped a subtree: {err}");
                return Err(err);
            }
        }
        Ok(())
    }

    // --- internals ---

    /// Returns true if `id` refers to a live frame.
    pub fn is_alive(&self, id: TransformId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    fn node(&self, id: TransformId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling TransformId")
    }

    fn node_mut(&mut self, id: TransformId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling TransformId")
    }

    fn node_opt(&self, id: TransformId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: TransformId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: TransformId, parent: TransformId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: TransformId, parent: TransformId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn update_world_recursive(&mut self, id: TransformId, parent_no_scale: Mat4, now: f32) {
        let (no_scale, child_ids) = {
            let node = self.node_mut(id);
            let (orientation, position) = node.motion.apply(&node.local, now);
            // Rotation, then translation, then parent composition. Scale is
            // applied last and only to the scaled variant.
            let local_no_scale = Mat4::from_rotation_translation(orientation, position);
            node.world_no_scale = parent_no_scale * local_no_scale;
            node.world = node.world_no_scale * Mat4::from_scale(node.local.scale);
            (node.world_no_scale, node.children.clone())
        };
        for child in child_ids {
            self.update_world_recursive(child, no_scale, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MotionError;
    use approx::assert_relative_eq;
    use core::f32::consts::FRAC_PI_2;

    fn translation(m: Mat4) -> Vec3 {
        m.w_axis.truncate()
    }

    #[test]
    fn update_is_idempotent_for_fixed_time() {
        let mut h = Hierarchy::new();
        let root = h.insert(
            None,
            LocalTransform::at(Vec3::new(1.0, 2.0, 3.0)),
            Motion::spin(Vec3::Y, 0.7).unwrap(),
        );
        let child = h.insert(
            Some(root),
            LocalTransform::at(Vec3::new(0.5, 0.0, 0.0)),
            Motion::rock(Vec3::X, 0.3, 2.0).unwrap(),
        );

        h.update(1.25, 0.0).unwrap();
        let first = h.world_transform_no_scale(child).unwrap();
        h.update(1.25, 0.0).unwrap();
        let second = h.world_transform_no_scale(child).unwrap();
        assert_eq!(
            first.to_cols_array(),
            second.to_cols_array(),
            "repeat update at the same time must be bit-identical"
        );
    }

    #[test]
    fn parent_scale_does_not_leak_into_child() {
        let mut h = Hierarchy::new();
        let parent = h.insert(
            None,
            LocalTransform {
                scale: Vec3::new(2.0, 2.0, 2.0),
                ..Default::default()
            },
            Motion::FIXED,
        );
        let child = h.insert(
            Some(parent),
            LocalTransform::at(Vec3::new(1.0, 0.0, 0.0)),
            Motion::FIXED,
        );
        h.update(0.0, 0.0).unwrap();

        // The child offset is composed against the parent's unscaled world
        // transform: (1, 0, 0), not (2, 0, 0).
        let pos = translation(h.world_transform_no_scale(child).unwrap());
        assert_relative_eq!(pos.x, 1.0);
        assert_relative_eq!(pos.y, 0.0);
        assert_relative_eq!(pos.z, 0.0);

        // Changing the parent scale must not move the child at all.
        let before = h.world_transform_no_scale(child).unwrap();
        h.set_scale(parent, Vec3::new(3.0, 1.0, 5.0));
        h.update(0.0, 0.0).unwrap();
        let after = h.world_transform_no_scale(child).unwrap();
        assert_eq!(
            before.to_cols_array(),
            after.to_cols_array(),
            "parent scale must not contribute to the child frame"
        );
    }

    #[test]
    fn composition_is_rotate_then_translate_then_parent() {
        let mut h = Hierarchy::new();
        let parent = h.insert(
            None,
            LocalTransform {
                position: Vec3::new(0.0, 0.0, 5.0),
                orientation: Quat::from_rotation_y(FRAC_PI_2),
                ..Default::default()
            },
            Motion::FIXED,
        );
        let child = h.insert(
            Some(parent),
            LocalTransform::at(Vec3::new(1.0, 0.0, 0.0)),
            Motion::FIXED,
        );
        h.update(0.0, 0.0).unwrap();

        // +X rotated a quarter turn about +Y lands on -Z, then the parent
        // translation applies.
        let pos = translation(h.world_transform_no_scale(child).unwrap());
        assert_relative_eq!(pos.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(pos.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(pos.z, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn scaled_world_transform_carries_own_scale() {
        let mut h = Hierarchy::new();
        let n = h.insert(
            None,
            LocalTransform {
                scale: Vec3::new(2.0, 3.0, 4.0),
                position: Vec3::new(1.0, 0.0, 0.0),
                ..Default::default()
            },
            Motion::FIXED,
        );
        h.update(0.0, 0.0).unwrap();

        let scaled = h.world_transform(n).unwrap();
        let v = scaled.transform_point3(Vec3::ONE);
        assert_relative_eq!(v.x, 3.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, 3.0, epsilon = 1e-6);
        assert_relative_eq!(v.z, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn rock_returns_to_rest_each_period() {
        let mut h = Hierarchy::new();
        let n = h.insert(
            None,
            LocalTransform::default(),
            Motion::rock(Vec3::Z, 0.5, 2.0).unwrap(),
        );
        h.update(0.0, 0.0).unwrap();
        let rest = h.world_transform_no_scale(n).unwrap();
        h.update(2.0, 0.0).unwrap();
        let after = h.world_transform_no_scale(n).unwrap();
        for (a, b) in rest.to_cols_array().iter().zip(after.to_cols_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn orbit_stays_on_its_circle() {
        let mut h = Hierarchy::new();
        let n = h.insert(
            None,
            LocalTransform::default(),
            Motion::orbit(Vec3::Y, 2.0, 4.0).unwrap(),
        );
        h.update(0.0, 0.0).unwrap();
        let p0 = translation(h.world_transform_no_scale(n).unwrap());
        assert_relative_eq!(p0.length(), 2.0, epsilon = 1e-5);
        assert_relative_eq!(p0.y, 0.0, epsilon = 1e-5);

        // A quarter period later the frame is a quarter turn along the circle.
        h.update(1.0, 0.0).unwrap();
        let p1 = translation(h.world_transform_no_scale(n).unwrap());
        assert_relative_eq!(p1.length(), 2.0, epsilon = 1e-5);
        assert_relative_eq!(p0.dot(p1), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn motion_constructors_reject_bad_parameters() {
        assert_eq!(Motion::spin(Vec3::ZERO, 1.0), Err(MotionError::ZeroAxis));
        assert_eq!(
            Motion::rock(Vec3::Y, 0.5, 0.0),
            Err(MotionError::NonPositivePeriod { period: 0.0 })
        );
        assert_eq!(
            Motion::rock(Vec3::Y, 0.5, -1.0),
            Err(MotionError::NonPositivePeriod { period: -1.0 })
        );
        assert_eq!(
            Motion::orbit(Vec3::Y, -2.0, 1.0),
            Err(MotionError::NonPositiveRadius { radius: -2.0 })
        );
        assert_eq!(Motion::orbit(Vec3::ZERO, 1.0, 1.0), Err(MotionError::ZeroAxis));
    }

    #[test]
    fn dangling_parent_is_reported_and_siblings_update() {
        let mut h = Hierarchy::new();
        let doomed = h.insert(None, LocalTransform::default(), Motion::FIXED);
        let orphan = h.insert(None, LocalTransform::at(Vec3::X), Motion::FIXED);
        let healthy = h.insert(None, LocalTransform::at(Vec3::new(0.0, 7.0, 0.0)), Motion::FIXED);

        h.remove(doomed);
        h.set_parent(orphan, Some(doomed));

        let err = h.update(0.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            UpdateError::DanglingParent {
                node: orphan,
                parent: doomed
            }
        );

        // The healthy root still got its world transform this tick.
        let pos = translation(h.world_transform_no_scale(healthy).unwrap());
        assert_relative_eq!(pos.y, 7.0);
    }

    #[test]
    fn remove_stales_subtree_and_slot_reuse_bumps_generation() {
        let mut h = Hierarchy::new();
        let root = h.insert(None, LocalTransform::default(), Motion::FIXED);
        let a = h.insert(Some(root), LocalTransform::default(), Motion::FIXED);
        let leaf = h.insert(Some(a), LocalTransform::default(), Motion::FIXED);

        h.remove(a);
        assert!(!h.is_alive(a));
        assert!(!h.is_alive(leaf), "subtree must be removed with its root");
        assert!(h.is_alive(root));
        assert!(h.position(a).is_none(), "stale ids must return None");

        let b = h.insert(Some(root), LocalTransform::default(), Motion::FIXED);
        assert!(h.is_alive(b));
        assert!(!h.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn reparent_moves_child_to_new_frame() {
        let mut h = Hierarchy::new();
        let a = h.insert(None, LocalTransform::at(Vec3::new(10.0, 0.0, 0.0)), Motion::FIXED);
        let b = h.insert(None, LocalTransform::at(Vec3::new(0.0, 10.0, 0.0)), Motion::FIXED);
        let child = h.insert(Some(a), LocalTransform::at(Vec3::ONE), Motion::FIXED);

        h.update(0.0, 0.0).unwrap();
        let p0 = translation(h.world_transform_no_scale(child).unwrap());
        assert_relative_eq!(p0.x, 11.0);

        h.set_parent(child, Some(b));
        assert_eq!(h.parent_of(child), Some(b));
        assert!(h.children_of(b).contains(&child));
        assert!(!h.children_of(a).contains(&child));

        h.update(0.0, 0.0).unwrap();
        let p1 = translation(h.world_transform_no_scale(child).unwrap());
        assert_relative_eq!(p1.y, 11.0);
    }
}
