//! State shared by every level
//!
//! Each level owns one [`LevelRuntime`]: the physics world, the player bound
//! to it, the score and the camera pose to restore on reset.

use focus_core::{Camera, Material, ModelKey, Scene};
use focus_input::{InputSnapshot, KeyCode};
use focus_physics::{ActorKey, PhysicsWorld, PlayerController, TouchListener};

use super::{LevelConfig, LevelError};
use crate::score::{BackgroundBlend, Score, ScoreRules};
use crate::status::LevelStatus;

/// Key that wins the current level immediately
pub const FORCE_WIN_KEY: KeyCode = KeyCode::F10;

/// Background color after a win
pub const VICTORY_BACKGROUND: [f32; 4] = [1.0, 1.0, 0.5, 1.0];

/// Name of the model whose visibility drives the score
pub const FOCUS_TARGET: &str = "Sphere";

/// Physics, player and score of an initialized level
///
/// The player is declared before the physics world so it is dropped first.
pub struct LevelRuntime {
    player: PlayerController,
    physics: PhysicsWorld,
    initial_camera: Camera,
    focus_target: ModelKey,
    score: Score,
    /// Seconds of fixed steps since start or reset
    pub elapsed: f32,
}

impl LevelRuntime {
    /// Capture the camera, create the physics world and place the player
    pub fn new(scene: &mut Scene, config: &LevelConfig) -> Result<Self, LevelError> {
        let focus_target = scene.model_key(FOCUS_TARGET)?;
        if let Some(model) = scene.model_mut(focus_target) {
            model.is_focus_target = true;
        }

        let physics = PhysicsWorld::with_config(config.physics.clone());
        let player = PlayerController::new(&physics, scene, config.player.clone());

        Ok(Self {
            player,
            physics,
            initial_camera: *scene.camera(),
            focus_target,
            score: Score::new(),
            elapsed: 0.0,
        })
    }

    /// Add a box actor for the named model
    pub fn add_box(&mut self, scene: &Scene, name: &str, dynamic: bool) -> Result<ActorKey, LevelError> {
        let model = scene.model_key(name)?;
        Ok(self.physics.create_box_actor(scene, model, dynamic)?)
    }

    /// Add a plane actor for the named model
    pub fn add_plane(&mut self, scene: &Scene, name: &str, dynamic: bool) -> Result<ActorKey, LevelError> {
        let model = scene.model_key(name)?;
        Ok(self.physics.create_plane_actor(scene, model, dynamic)?)
    }

    /// Register a mirror made of a box border and a plane
    pub fn add_mirror(
        &mut self,
        scene: &Scene,
        border: &str,
        plane: &str,
        max_distance: f32,
    ) -> Result<[ActorKey; 2], LevelError> {
        let border = self.add_box(scene, border, true)?;
        let plane = self.add_plane(scene, plane, true)?;
        self.player.add_mirror(&self.physics, &[border, plane], max_distance)?;
        Ok([border, plane])
    }

    /// Player pre-step, physics step, player post-step
    pub fn step(
        &mut self,
        scene: &mut Scene,
        input: &InputSnapshot,
        step: f32,
        listener: Option<&mut dyn TouchListener>,
    ) -> Result<(), LevelError> {
        self.player.pre_step(&mut self.physics, scene, input)?;
        self.physics.step(step, scene);
        self.player
            .post_step(&mut self.physics, scene, input, step, listener);
        Ok(())
    }

    /// Score, background and win/loss checks shared by all levels
    pub fn update(
        &mut self,
        scene: &mut Scene,
        input: &InputSnapshot,
        dt: f32,
        focus_hit: f64,
        rules: &ScoreRules,
        blend: &BackgroundBlend,
    ) -> Result<LevelStatus, LevelError> {
        if self.score.exceeds_ceiling(rules) {
            return Ok(LevelStatus::Won);
        }

        self.score.integrate(rules, dt, focus_hit);
        scene.set_background_rgb(blend.color(self.score.blend_factor()));

        if self.score.reached_cap(rules) && self.player.on_final_region(&self.physics) {
            self.victory(scene, rules)?;
            return Ok(LevelStatus::Won);
        }

        if input.key_released(FORCE_WIN_KEY) {
            log::info!("Level won through the debug key");
            self.victory(scene, rules)?;
            return Ok(LevelStatus::Won);
        }

        if self.player.fell_down() {
            return Ok(LevelStatus::Lost);
        }
        Ok(LevelStatus::Running)
    }

    fn victory(&mut self, scene: &mut Scene, rules: &ScoreRules) -> Result<(), LevelError> {
        let material = scene
            .model(self.focus_target)
            .map(|m| m.material_index)
            .ok_or_else(|| LevelError::MissingModel(FOCUS_TARGET.to_string()))?;
        scene.material_mut(material)?.diffuse_reflectivity = Material::FULLY_REFLECTIVE;
        scene.set_background_color(VICTORY_BACKGROUND);
        self.score.set_sentinel(rules);
        Ok(())
    }

    /// Restore time, score, camera, player and mirrors
    pub fn reset(&mut self, scene: &mut Scene) -> Result<(), LevelError> {
        self.elapsed = 0.0;
        *scene.camera_mut() = self.initial_camera;
        self.player.update_position(scene);
        self.player.reset_mirrors(&mut self.physics)?;
        self.score.reset();
        Ok(())
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn score_mut(&mut self) -> &mut Score {
        &mut self.score
    }

    /// Camera pose captured when the level was initialized
    pub fn initial_camera(&self) -> &Camera {
        &self.initial_camera
    }
}

/// Records which tracked actors the player touched since they were last taken
#[derive(Clone, Debug, Default)]
pub struct PlatformTracker {
    actors: Vec<ActorKey>,
    touched: Vec<bool>,
}

impl PlatformTracker {
    pub fn new(actors: Vec<ActorKey>) -> Self {
        let touched = vec![false; actors.len()];
        Self { actors, touched }
    }

    /// Read and clear the flag of the platform at `index`
    pub fn take(&mut self, index: usize) -> bool {
        self.touched
            .get_mut(index)
            .map(std::mem::take)
            .unwrap_or(false)
    }

    pub fn is_touched(&self, index: usize) -> bool {
        self.touched.get(index).copied().unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.touched.iter_mut().for_each(|t| *t = false);
    }
}

impl TouchListener for PlatformTracker {
    fn on_touch(&mut self, actor: ActorKey) {
        if let Some(index) = self.actors.iter().position(|a| *a == actor) {
            self.touched[index] = true;
        }
    }
}
