// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the transform hierarchy: identifiers, local frames, motion.

use core::f32::consts::TAU;
use glam::{Quat, Vec3};

use crate::math::sinf;

/// Identifier for a frame in the hierarchy.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `TransformId` that pointed to
///   that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new,
///   distinct `TransformId`.
///
/// ### Liveness
///
/// Use [`Hierarchy::is_alive`](crate::Hierarchy::is_alive) to check whether a
/// `TransformId` still refers to a live frame. Stale ids never alias a
/// different live frame because the generation must match.
///
/// A parent link holding a stale id is reported as a
/// [`DanglingParent`](crate::UpdateError::DanglingParent) error at update time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TransformId(pub(crate) u32, pub(crate) u32);

impl TransformId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Locally stored frame state, relative to the parent frame.
///
/// Accessors on [`Hierarchy`](crate::Hierarchy) return these values as stored;
/// they are never world-space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalTransform {
    /// Per-axis scale. Applied only to this frame's own geometry; children
    /// compose against the unscaled world transform.
    pub scale: Vec3,
    /// Translation relative to the parent frame.
    pub position: Vec3,
    /// Orientation relative to the parent frame. Expected to be a unit
    /// quaternion.
    pub orientation: Quat,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl LocalTransform {
    /// A frame at `position` with default orientation and unit scale.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Time-driven adjustment of a frame's local transform.
///
/// A motion is a pure function of absolute time: evaluating it twice at the
/// same instant yields identical results, which keeps whole-hierarchy updates
/// idempotent within a tick. Construct via the validated constructors; invalid
/// parameters (zero axis, non-positive period or radius) are refused.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Motion(MotionKind);

#[derive(Copy, Clone, Debug, PartialEq)]
enum MotionKind {
    Fixed,
    Spin { axis: Vec3, rate: f32 },
    Rock { axis: Vec3, amplitude: f32, period: f32 },
    Orbit { axis: Vec3, radius: f32, period: f32 },
}

impl Default for Motion {
    fn default() -> Self {
        Self::FIXED
    }
}

impl Motion {
    /// No motion; the local transform is used as stored.
    pub const FIXED: Self = Self(MotionKind::Fixed);

    /// Continuous rotation about `axis` at `rate` radians per second.
    pub fn spin(axis: Vec3, rate: f32) -> Result<Self, MotionError> {
        let axis = axis.try_normalize().ok_or(MotionError::ZeroAxis)?;
        Ok(Self(MotionKind::Spin { axis, rate }))
    }

    /// Sinusoidal rocking about `axis`: the rotation angle swings between
    /// `-amplitude` and `amplitude` radians once per `period` seconds.
    pub fn rock(axis: Vec3, amplitude: f32, period: f32) -> Result<Self, MotionError> {
        let axis = axis.try_normalize().ok_or(MotionError::ZeroAxis)?;
        if !(period.is_finite() && period > 0.0) {
            return Err(MotionError::NonPositivePeriod { period });
        }
        Ok(Self(MotionKind::Rock {
            axis,
            amplitude,
            period,
        }))
    }

    /// Circular path of `radius` in the plane normal to `axis`, one revolution
    /// per `period` seconds, centered on the stored local position.
    pub fn orbit(axis: Vec3, radius: f32, period: f32) -> Result<Self, MotionError> {
        let axis = axis.try_normalize().ok_or(MotionError::ZeroAxis)?;
        if !(period.is_finite() && period > 0.0) {
            return Err(MotionError::NonPositivePeriod { period });
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(MotionError::NonPositiveRadius { radius });
        }
        Ok(Self(MotionKind::Orbit {
            axis,
            radius,
            period,
        }))
    }

    /// Evaluate the motion at absolute time `now`, producing the effective
    /// orientation and position for a frame with the given stored state.
    pub(crate) fn apply(&self, local: &LocalTransform, now: f32) -> (Quat, Vec3) {
        match self.0 {
            MotionKind::Fixed => (local.orientation, local.position),
            MotionKind::Spin { axis, rate } => {
                let swing = Quat::from_axis_angle(axis, rate * now);
                (swing * local.orientation, local.position)
            }
            MotionKind::Rock {
                axis,
                amplitude,
                period,
            } => {
                let angle = amplitude * sinf(TAU * now / period);
                let swing = Quat::from_axis_angle(axis, angle);
                (swing * local.orientation, local.position)
            }
            MotionKind::Orbit {
                axis,
                radius,
                period,
            } => {
                let phase = Quat::from_axis_angle(axis, TAU * now / period);
                let offset = phase * (axis.any_orthonormal_vector() * radius);
                (local.orientation, local.position + offset)
            }
        }
    }
}

/// Rejected motion configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MotionError {
    /// The rotation or orbit axis has zero (or non-finite) length.
    ZeroAxis,
    /// The period is not a positive, finite number of seconds.
    NonPositivePeriod {
        /// The offending period.
        period: f32,
    },
    /// The orbit radius is not positive and finite.
    NonPositiveRadius {
        /// The offending radius.
        radius: f32,
    },
}

impl core::fmt::Display for MotionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroAxis => write!(f, "motion axis has zero length"),
            Self::NonPositivePeriod { period } => {
                write!(f, "motion period must be positive, got {period}")
            }
            Self::NonPositiveRadius { radius } => {
                write!(f, "orbit radius must be positive, got {radius}")
            }
        }
    }
}

impl core::error::Error for MotionError {}
