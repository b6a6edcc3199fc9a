//! Physics for Focus
//!
//! This crate wraps [`rapier3d`] as a black-box engine and provides:
//! - Collision actors built from authored unit boxes and planes
//! - Scripted ("dynamic") actors whose poses are written back to scene models
//! - A capsule character controller
//! - The first-person [`PlayerController`] with jumping and mirror interaction

pub mod actor;
pub mod character;
pub mod material;
pub mod player;
pub mod world;

pub use actor::{ActorKey, ActorShape, Bounds, RayHit, PLANE_HALF_THICKNESS};
pub use character::{CharacterController, CharacterDesc};
pub use material::PhysicsMaterial;
pub use player::{MirrorGroup, PlayerConfig, PlayerController, TouchListener};
pub use world::{PhysicsConfig, PhysicsWorld};

/// Errors from physics bookkeeping
#[derive(Debug)]
pub enum PhysicsError {
    /// The model key does not refer to a model in the scene
    UnknownModel,
    /// The actor key does not refer to a live actor
    UnknownActor,
    /// The model transform cannot be decomposed into a pose and extents
    DegenerateTransform(focus_math::MathError),
}

impl From<focus_math::MathError> for PhysicsError {
    fn from(e: focus_math::MathError) -> Self {
        PhysicsError::DegenerateTransform(e)
    }
}

impl std::fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicsError::UnknownModel => write!(f, "Unknown scene model"),
            PhysicsError::UnknownActor => write!(f, "Unknown physics actor"),
            PhysicsError::DegenerateTransform(e) => write!(f, "Cannot build actor: {}", e),
        }
    }
}

impl std::error::Error for PhysicsError {}
