//! Rigid per-instance transform.
//!
//! Both instance kinds place mesh-space points the same way: rotate first,
//! then stretch by the per-axis scale, then translate. Scale applies in the
//! rotated local frame, so with non-uniform scale the compose order is
//! visible on screen and must not change.

use glam::{Quat, Vec3};

use crate::math::quat_rotate;
use crate::types::{LineMeshInstance, TriangleMeshInstance};

/// The placement fields every instance kind shares.
#[derive(Debug, Clone, Copy)]
pub struct RigidTransform {
    pub position: Vec3,
    /// Assumed unit-length; no renormalization is performed.
    pub rotation: Quat,
    pub scale: Vec3,
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };
}

impl From<&TriangleMeshInstance> for RigidTransform {
    fn from(i: &TriangleMeshInstance) -> Self {
        Self {
            position: Vec3::from_array(i.position),
            rotation: Quat::from_xyzw(i.rotation[0], i.rotation[1], i.rotation[2], i.rotation[3]),
            scale: Vec3::from_array(i.scale),
        }
    }
}

impl From<&LineMeshInstance> for RigidTransform {
    fn from(i: &LineMeshInstance) -> Self {
        Self {
            position: Vec3::from_array(i.position),
            rotation: Quat::from_xyzw(i.rotation[0], i.rotation[1], i.rotation[2], i.rotation[3]),
            scale: Vec3::from_array(i.scale),
        }
    }
}

/// Place a mesh-space point in the world: rotate, stretch, translate.
#[inline]
pub fn world_position(t: &RigidTransform, p: Vec3) -> Vec3 {
    t.position + quat_rotate(t.rotation, p) * t.scale
}

/// Reduced transform for the simplified pipeline: identity orientation,
/// position and scale only.
#[inline]
pub fn world_position_unrotated(position: Vec3, scale: Vec3, p: Vec3) -> Vec3 {
    position + p * scale
}
