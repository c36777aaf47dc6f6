// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cube nodes: corner layout and bounding-sphere containment.

use alloc::vec::Vec;
use glam::Vec3;

use crate::types::{BoundingSphere, NodeRef, ObjectKey};

/// Fixed octant order: front/back x top/bottom x left/right.
///
/// Bit 0 selects bottom, bit 1 selects right, bit 2 selects back, giving
/// front-top-left = 0 through back-bottom-right = 7. The same order is used
/// for cube corners and for child cubes.
pub(crate) fn octant_offset(octant: usize, length: f32) -> Vec3 {
    Vec3::new(
        if octant & 2 != 0 { length } else { 0.0 },
        if octant & 1 != 0 { length } else { 0.0 },
        if octant & 4 != 0 { length } else { 0.0 },
    )
}

/// The three cube faces meeting at the reference corner (vertex 0), as vertex
/// index triples ordered so the derived plane normal points into the cube.
const FACES: [(usize, usize, usize); 3] = [
    (0, 1, 4), // left
    (0, 4, 2), // top
    (0, 2, 1), // front
];

/// One cubic region of world space.
///
/// `origin` is the front-top-left corner, which is the minimum corner on
/// every axis: x grows to the right, y grows downward, z grows to the back.
#[derive(Clone, Debug)]
pub(crate) struct CubeNode {
    pub(crate) origin: Vec3,
    pub(crate) length: f32,
    pub(crate) depth: u32,
    vertices: [Vec3; 8],
    pub(crate) parent: Option<NodeRef>,
    pub(crate) children: Option<[NodeRef; 8]>,
    pub(crate) objects: Vec<ObjectKey>,
}

impl CubeNode {
    pub(crate) fn new(origin: Vec3, length: f32, depth: u32, parent: Option<NodeRef>) -> Self {
        let mut vertices = [Vec3::ZERO; 8];
        for (octant, v) in vertices.iter_mut().enumerate() {
            *v = origin + octant_offset(octant, length);
        }
        Self {
            origin,
            length,
            depth,
            vertices,
            parent,
            children: None,
            objects: Vec::new(),
        }
    }

    /// Perpendicular distance from `point` to the cube face through the given
    /// vertex triple, positive on the interior side.
    fn face_distance(&self, face: (usize, usize, usize), point: Vec3) -> f32 {
        let (a, b, c) = face;
        let va = self.vertices[a];
        let normal = (self.vertices[b] - va)
            .cross(self.vertices[c] - va)
            .normalize();
        (point - va).dot(normal)
    }

    /// Whether the sphere lies entirely within this cube.
    ///
    /// The diameter check is a fast reject only: an oversize sphere cannot fit
    /// this cube or any descendant, so no geometry is evaluated. Otherwise,
    /// for each of the three faces meeting at the reference corner, the
    /// sphere must clear the near face (`distance >= radius`) and stay short
    /// of the opposite face (`distance + radius <= length`). A center outside
    /// the cube yields a negative distance on some face and fails the near
    /// check.
    pub(crate) fn fits(&self, sphere: &BoundingSphere) -> bool {
        if 2.0 * sphere.radius > self.length {
            return false;
        }
        for face in FACES {
            let d = self.face_distance(face, sphere.center);
            if d < sphere.radius || d + sphere.radius > self.length {
                return false;
            }
        }
        true
    }
}
