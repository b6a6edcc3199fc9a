//! Gameplay for Focus
//!
//! This crate provides the level layer on top of the scene and physics:
//!
//! - [`LevelStatus`] - Running, won or lost
//! - [`Score`] / [`ScoreRules`] - Focus score integration
//! - [`LevelBehavior`] / [`LevelVariant`] - The four levels
//! - [`LevelLogic`] - A level plus pause and status bookkeeping
//! - [`LevelRegistry`] - Levels in play order with their scene files
//! - [`GameControl`] - Drives the level sequence with fades and deferred teardown

pub mod level;

mod active_set;
mod game_control;
mod logic;
mod registry;
mod renderer;
mod score;
mod status;

pub use active_set::{ActiveElement, ActiveSet};
pub use game_control::{GameControl, GameError, LoadedLevel, SceneLoader, PAUSE_KEY, QUIT_KEY};
pub use level::{Level1, Level2, Level3, Level4, LevelBehavior, LevelConfig, LevelError, LevelRuntime, LevelVariant};
pub use logic::LevelLogic;
pub use registry::{LevelConstructor, LevelEntry, LevelRegistry};
pub use renderer::Renderer;
pub use score::{BackgroundBlend, Score, ScoreRules};
pub use status::LevelStatus;
