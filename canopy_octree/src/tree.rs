// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree driver: eager construction, insertion, and the flat object registry.

use alloc::vec::Vec;
use core::fmt::Debug;
use glam::Vec3;

use crate::node::{CubeNode, octant_offset};
use crate::types::{
    Bounded, BoundingSphere, InsertError, NodeRef, ObjectFilter, ObjectFlags, ObjectKey,
};

#[derive(Clone, Debug)]
struct Entry<P> {
    sphere: BoundingSphere,
    payload: P,
    flags: ObjectFlags,
    node: NodeRef,
}

/// Fixed-depth octree over axis-aligned cubic regions of world space.
///
/// The full 8-ary tree is built eagerly at construction (cost grows as
/// `8^depth`; intended for small depths, 2-4). Each inserted object is stored
/// at the deepest node whose cube fully contains its bounding sphere, and in
/// a flat registry for whole-scene iteration. Objects are not relocated when
/// they move; re-fitting is a known gap left to callers.
pub struct Octree<P> {
    nodes: Vec<CubeNode>,
    max_depth: u32,
    entries: Vec<Entry<P>>,
}

impl<P> core::fmt::Debug for Octree<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Octree")
            .field("nodes", &self.nodes.len())
            .field("max_depth", &self.max_depth)
            .field("objects", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<P: Copy + Debug> Octree<P> {
    /// Build the full tree to `max_depth` levels, rooted at the cube with the
    /// given front-top-left `origin` and edge `length`.
    pub fn new(origin: Vec3, length: f32, max_depth: u32) -> Self {
        // 1 + 8 + ... + 8^max_depth nodes.
        let capacity = (8_usize.pow(max_depth + 1) - 1) / 7;
        let mut nodes = Vec::with_capacity(capacity);
        Self::build(&mut nodes, None, origin, length, 0, max_depth);
        Self {
            nodes,
            max_depth,
            entries: Vec::new(),
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeRef uses 32-bit indices by design; 8^depth node counts stay far below u32::MAX for supported depths."
    )]
    fn build(
        nodes: &mut Vec<CubeNode>,
        parent: Option<NodeRef>,
        origin: Vec3,
        length: f32,
        depth: u32,
        max_depth: u32,
    ) -> NodeRef {
        let node = NodeRef::new(nodes.len() as u32);
        nodes.push(CubeNode::new(origin, length, depth, parent));
        if depth < max_depth {
            let half = length * 0.5;
            let mut children = [node; 8];
            for (octant, child) in children.iter_mut().enumerate() {
                *child = Self::build(
                    nodes,
                    Some(node),
                    origin + octant_offset(octant, half),
                    half,
                    depth + 1,
                    max_depth,
                );
            }
            nodes[node.idx()].children = Some(children);
        }
        node
    }

    /// The root node.
    pub fn root(&self) -> NodeRef {
        NodeRef::new(0)
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The maximum depth the tree was built to.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Insert an object with default flags.
    pub fn insert(&mut self, sphere: BoundingSphere, payload: P) -> Result<ObjectKey, InsertError> {
        self.insert_with_flags(sphere, payload, ObjectFlags::default())
    }

    /// Insert an object, placing it at the deepest node whose cube fully
    /// contains its bounding sphere.
    ///
    /// On rejection the tree and registry are untouched. The error carries a
    /// reason: an invalid radius, a sphere too large for the root cube, or a
    /// sphere positioned outside it.
    pub fn insert_with_flags(
        &mut self,
        sphere: BoundingSphere,
        payload: P,
        flags: ObjectFlags,
    ) -> Result<ObjectKey, InsertError> {
        if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
            return Err(InsertError::InvalidRadius {
                radius: sphere.radius,
            });
        }
        let root = &self.nodes[self.root().idx()];
        if 2.0 * sphere.radius > root.length {
            return Err(InsertError::TooLarge {
                radius: sphere.radius,
                length: root.length,
            });
        }
        if !root.fits(&sphere) {
            log::debug!("octree rejected object at {:?}: outside the root cube", sphere.center);
            return Err(InsertError::OutOfBounds);
        }

        let node = self.place(self.root(), &sphere);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ObjectKey uses 32-bit indices by design."
        )]
        let key = ObjectKey::new(self.entries.len() as u32);
        self.nodes[node.idx()].objects.push(key);
        self.entries.push(Entry {
            sphere,
            payload,
            flags,
            node,
        });
        log::trace!(
            "octree placed object {key:?} at node {node:?} (depth {})",
            self.nodes[node.idx()].depth
        );
        Ok(key)
    }

    /// Insert by snapshotting a [`Bounded`] proxy.
    pub fn add_object<O: Bounded>(
        &mut self,
        object: &O,
        payload: P,
    ) -> Result<ObjectKey, InsertError> {
        let sphere = BoundingSphere::new(object.bounding_origin(), object.bounding_radius());
        self.insert(sphere, payload)
    }

    /// Descend from `at` (known to contain the sphere) to the deepest fitting
    /// node: the first child in octant order that fully contains the sphere
    /// wins; a sphere straddling every child boundary stays at `at`.
    fn place(&self, at: NodeRef, sphere: &BoundingSphere) -> NodeRef {
        if let Some(children) = self.nodes[at.idx()].children {
            for child in children {
                if self.nodes[child.idx()].fits(sphere) {
                    return self.place(child, sphere);
                }
            }
        }
        at
    }

    /// Number of objects in the registry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no objects have been inserted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate every registered object once, honoring the filter.
    ///
    /// This walks the flat registry, not the tree; it is the intended path
    /// for draw and update passes that must visit each object exactly once.
    pub fn objects(&self, filter: ObjectFilter) -> impl Iterator<Item = (ObjectKey, P)> + '_ {
        self.entries.iter().enumerate().filter_map(move |(i, e)| {
            if filter.visible_only && !e.flags.contains(ObjectFlags::VISIBLE) {
                return None;
            }
            if filter.collidable_only && !e.flags.contains(ObjectFlags::COLLIDABLE) {
                return None;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectKey uses 32-bit indices by design."
            )]
            Some((ObjectKey::new(i as u32), e.payload))
        })
    }

    /// The bounding sphere snapshotted at insertion.
    pub fn sphere(&self, key: ObjectKey) -> Option<BoundingSphere> {
        self.entries.get(key.idx()).map(|e| e.sphere)
    }

    /// The payload stored with an object.
    pub fn payload(&self, key: ObjectKey) -> Option<P> {
        self.entries.get(key.idx()).map(|e| e.payload)
    }

    /// The object's flags.
    pub fn flags(&self, key: ObjectKey) -> Option<ObjectFlags> {
        self.entries.get(key.idx()).map(|e| e.flags)
    }

    /// Update the object's flags.
    pub fn set_flags(&mut self, key: ObjectKey, flags: ObjectFlags) {
        if let Some(e) = self.entries.get_mut(key.idx()) {
            e.flags = flags;
        }
    }

    /// The tree node an object was placed at.
    pub fn node_of(&self, key: ObjectKey) -> Option<NodeRef> {
        self.entries.get(key.idx()).map(|e| e.node)
    }

    /// The keys stored directly at a node (not including descendants).
    pub fn objects_at(&self, node: NodeRef) -> &[ObjectKey] {
        self.nodes
            .get(node.idx())
            .map(|n| n.objects.as_slice())
            .unwrap_or(&[])
    }

    /// The child of `node` in the given octant (0-7), if `node` is not a leaf.
    pub fn child_of(&self, node: NodeRef, octant: usize) -> Option<NodeRef> {
        let children = self.nodes.get(node.idx())?.children?;
        children.get(octant).copied()
    }

    /// The parent of `node`; `None` for the root.
    pub fn parent_of(&self, node: NodeRef) -> Option<NodeRef> {
        self.nodes.get(node.idx())?.parent
    }

    /// Depth of a node (the root is depth 0).
    pub fn node_depth(&self, node: NodeRef) -> Option<u32> {
        self.nodes.get(node.idx()).map(|n| n.depth)
    }

    /// Front-top-left corner of a node's cube.
    pub fn node_origin(&self, node: NodeRef) -> Option<Vec3> {
        self.nodes.get(node.idx()).map(|n| n.origin)
    }

    /// Edge length of a node's cube.
    pub fn node_length(&self, node: NodeRef) -> Option<f32> {
        self.nodes.get(node.idx()).map(|n| n.length)
    }
}
