//! Core types for the Focus game
//!
//! This crate provides the scene a level plays in:
//!
//! - [`Scene`] - Arena of named models plus camera, materials and background
//! - [`SceneModel`] - A named, transformed piece of level geometry
//! - [`ModelKey`] - Generational key to a model in a scene
//! - [`Camera`] - First-person camera pose
//! - [`Material`] - Reflectivity values the renderer reads
//! - [`SceneTemplate`] - Loadable/saveable RON description of a scene
//! - [`FadeState`] - Fade-in/fade-out timers used across level transitions

mod camera;
mod fade;
mod material;
mod model;
mod scene;
mod scene_template;
mod scene_validator;

pub use camera::Camera;
pub use fade::{FadeOutStep, FadeState, FADE_IN_RATE, FADE_OUT_RATE};
pub use material::Material;
pub use model::{ModelKey, SceneModel};
pub use scene::{Scene, SceneError};
pub use scene_template::{CameraTemplate, ModelTemplate, SceneTemplate};
pub use scene_validator::{SceneValidator, ValidationError};

// Re-export math types used in public signatures
pub use focus_math::{Mat4, Quat, Vec3};
