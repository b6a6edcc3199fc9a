//! Collision actors
//!
//! Every actor is one rigid body with a single cuboid collider. Static
//! actors never move; dynamic actors are kinematic bodies posed by level
//! scripts, and their pose is copied to their scene model after each step.

use focus_core::ModelKey;
use focus_math::{Mat4, Vec3};
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
use slotmap::new_key_type;

/// Half thickness of plane actors along their local z axis
pub const PLANE_HALF_THICKNESS: f32 = 0.1;

new_key_type! {
    /// Key to an actor in a [`PhysicsWorld`](crate::PhysicsWorld)
    pub struct ActorKey;
}

/// Collision shape family of an actor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorShape {
    /// Box with the model's full extents
    Box,
    /// Thin box: the model's x/y extents and [`PLANE_HALF_THICKNESS`] along z
    Plane,
}

/// Bookkeeping for one actor
#[derive(Clone, Debug)]
pub(crate) struct Actor {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub model: Option<ModelKey>,
    pub shape: ActorShape,
    pub half_extents: Vec3,
}

/// Side-table entry pairing a scripted actor with the model it drives
#[derive(Clone, Debug)]
pub(crate) struct DynamicLink {
    pub actor: ActorKey,
    pub model: ModelKey,
    pub scale: Mat4,
}

/// World-space axis-aligned bounds of an actor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Point lies strictly inside the x/z footprint
    pub fn contains_xz_strict(&self, p: &Vec3) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.z > self.min.z && p.z < self.max.z
    }

    /// Point lies inside or on the border of the x/z footprint
    pub fn contains_xz(&self, p: &Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }
}

/// Nearest blocking hit of a raycast
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub actor: ActorKey,
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_footprint_excludes_border() {
        let b = Bounds {
            min: Vec3::new(-1.0, 0.0, -1.0),
            max: Vec3::new(1.0, 1.0, 1.0),
        };
        assert!(b.contains_xz_strict(&Vec3::new(0.0, 50.0, 0.0)));
        assert!(!b.contains_xz_strict(&Vec3::new(1.0, 0.0, 0.0)));
        assert!(b.contains_xz(&Vec3::new(1.0, 0.0, 0.0)));
        assert!(!b.contains_xz(&Vec3::new(1.5, 0.0, 0.0)));
    }
}
