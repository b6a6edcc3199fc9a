//! Level state machines
//!
//! Each level is a [`LevelBehavior`]: it builds its actors from named scene
//! models on [`initialize`](LevelBehavior::initialize), animates scripted
//! geometry on every fixed step and reports a [`LevelStatus`] every frame.
//! The four levels are gathered in the closed [`LevelVariant`] enum.

mod level1;
mod level2;
mod level3;
mod level4;
mod runtime;

pub use level1::Level1;
pub use level2::Level2;
pub use level3::Level3;
pub use level4::Level4;
pub use runtime::{LevelRuntime, PlatformTracker, FOCUS_TARGET, FORCE_WIN_KEY, VICTORY_BACKGROUND};

use focus_core::{Scene, SceneError};
use focus_input::InputSnapshot;
use focus_math::{HsvInterpolator, HsvSample, MathError, Pose, Translation3, Vec3};
use focus_physics::{ActorKey, PhysicsConfig, PhysicsError, PhysicsWorld, PlayerConfig};

use crate::score::BackgroundBlend;
use crate::status::LevelStatus;

/// Player and physics parameters shared by every level
#[derive(Clone, Debug, Default)]
pub struct LevelConfig {
    pub player: PlayerConfig,
    pub physics: PhysicsConfig,
}

/// Errors raised while building or running a level
#[derive(Debug)]
pub enum LevelError {
    /// The scene lacks a model or material the level needs
    Scene(SceneError),
    /// A model the level needs is missing
    MissingModel(String),
    /// Actor bookkeeping failed
    Physics(PhysicsError),
    /// Level content could not be built
    Math(MathError),
    /// The level was used before `initialize`
    NotInitialized,
}

impl From<SceneError> for LevelError {
    fn from(e: SceneError) -> Self {
        LevelError::Scene(e)
    }
}

impl From<PhysicsError> for LevelError {
    fn from(e: PhysicsError) -> Self {
        LevelError::Physics(e)
    }
}

impl From<MathError> for LevelError {
    fn from(e: MathError) -> Self {
        LevelError::Math(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::Scene(e) => write!(f, "Level content error: {}", e),
            LevelError::MissingModel(name) => write!(f, "Level model not found: {}", name),
            LevelError::Physics(e) => write!(f, "Level physics error: {}", e),
            LevelError::Math(e) => write!(f, "Level setup error: {}", e),
            LevelError::NotInitialized => write!(f, "Level used before initialization"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Scene(e) => Some(e),
            LevelError::Physics(e) => Some(e),
            LevelError::Math(e) => Some(e),
            _ => None,
        }
    }
}

/// Behavior every level provides
pub trait LevelBehavior {
    /// Display name
    fn name(&self) -> &'static str;

    /// Build physics, player and actors from the scene; called once
    fn initialize(&mut self, scene: &mut Scene) -> Result<(), LevelError>;

    /// Animate scripted geometry and advance player and physics by one fixed step
    fn fixed_update(&mut self, scene: &mut Scene, input: &InputSnapshot, step: f32) -> Result<(), LevelError>;

    /// Integrate the score and decide the level status for this frame
    fn update(
        &mut self,
        scene: &mut Scene,
        input: &InputSnapshot,
        dt: f32,
        focus_hit: f64,
    ) -> Result<LevelStatus, LevelError>;

    /// Restore the state captured at initialization
    fn reset(&mut self, scene: &mut Scene) -> Result<(), LevelError>;

    /// Release the player and then the physics world
    fn finalize(&mut self);

    /// Shared runtime, once initialized
    fn runtime(&self) -> Option<&LevelRuntime>;

    /// Shared runtime, once initialized
    fn runtime_mut(&mut self) -> Option<&mut LevelRuntime>;
}

/// One of the four levels
pub enum LevelVariant {
    Level1(Level1),
    Level2(Level2),
    Level3(Level3),
    Level4(Level4),
}

impl LevelVariant {
    pub fn behavior(&self) -> &dyn LevelBehavior {
        match self {
            LevelVariant::Level1(level) => level,
            LevelVariant::Level2(level) => level,
            LevelVariant::Level3(level) => level,
            LevelVariant::Level4(level) => level,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn LevelBehavior {
        match self {
            LevelVariant::Level1(level) => level,
            LevelVariant::Level2(level) => level,
            LevelVariant::Level3(level) => level,
            LevelVariant::Level4(level) => level,
        }
    }
}

/// Move an actor to `place(current translation)` keeping its rotation
///
/// Returns the translation delta.
pub(crate) fn reposition_actor(
    physics: &mut PhysicsWorld,
    actor: ActorKey,
    place: impl FnOnce(&Vec3) -> Vec3,
) -> Result<Vec3, LevelError> {
    let old = physics.actor_pose(actor).ok_or(PhysicsError::UnknownActor)?;
    let translation = place(&old.translation.vector);
    physics.set_actor_pose(actor, Pose::from_parts(Translation3::from(translation), old.rotation))?;
    Ok(translation - old.translation.vector)
}

/// Background ramp between two HSV colors (hue in degrees)
pub(crate) fn hsv_blend(neutral: [f32; 3], focused: [f32; 3]) -> Result<BackgroundBlend, LevelError> {
    let interpolator = HsvInterpolator::new(vec![
        HsvSample::new(0.0, neutral),
        HsvSample::new(1.0, focused),
    ])?;
    Ok(BackgroundBlend::Hsv(interpolator))
}
