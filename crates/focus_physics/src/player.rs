//! First-person player controller
//!
//! Owns the capsule character and turns per-step input into movement,
//! camera pose and mirror rotation. The controller borrows the level's
//! [`PhysicsWorld`] on every call instead of storing a reference to it.
//!
//! Per fixed step the owning level calls [`PlayerController::pre_step`]
//! before the physics step and [`PlayerController::post_step`] after it.

use focus_core::Scene;
use focus_input::{InputSnapshot, KeyCode, MouseButton};
use focus_math::{LookAngles, Pose, Quat, Vec3};

use crate::actor::ActorKey;
use crate::character::{CharacterController, CharacterDesc};
use crate::world::PhysicsWorld;
use crate::PhysicsError;

/// Horizontal look radians per pixel of cursor motion
pub const MOUSE_SENSITIVITY: f32 = 0.001;
/// Vertical look radians per pixel of cursor motion
pub const VERTICAL_LOOK_SENSITIVITY: f32 = 0.005;
/// Horizontal displacement per fixed step while a movement key is held
pub const WALK_SPEED: f32 = 0.075;
/// Vertical displacement per fixed step while not jumping
pub const GRAVITY_OFFSET: f32 = -0.2;
/// Capsule height below which the player counts as fallen
pub const FALL_THRESHOLD: f32 = -20.0;
/// Maximum height of a touched surface above the capsule center to count as footing
pub const FOOTING_TOLERANCE: f32 = 0.1;
/// Mirror rays start this far in front of the eye
pub const RAY_START_OFFSET: f32 = 0.45;
/// Mirror ray length
pub const RAY_LENGTH: f32 = 50.0;
/// Move directions shorter than this are ignored
pub const MIN_MOVE_LENGTH: f32 = 0.01;
/// Sweeps shorter than this are skipped
pub const MIN_MOVE_DISTANCE: f32 = 0.001;
/// Interaction distance of mirrors registered without a limit
pub const UNLIMITED_MIRROR_DISTANCE: f32 = 10_000.0;

/// Button that grabs mirrors
const GRAB_BUTTON: MouseButton = MouseButton::Left;

/// Tunable player parameters
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    /// Eye height above the feet
    pub eye_height: f32,
    /// Free flight without gravity
    pub fly: bool,
    /// Displacement per step while walking
    pub walk_speed: f32,
    /// Horizontal look sensitivity
    pub mouse_sensitivity: f32,
    /// Vertical look sensitivity
    pub vertical_sensitivity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            eye_height: 1.5,
            fly: false,
            walk_speed: WALK_SPEED,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            vertical_sensitivity: VERTICAL_LOOK_SENSITIVITY,
        }
    }
}

impl PlayerConfig {
    /// Set the eye height
    pub fn with_eye_height(mut self, eye_height: f32) -> Self {
        self.eye_height = eye_height;
        self
    }

    /// Enable or disable free flight
    pub fn with_fly(mut self, fly: bool) -> Self {
        self.fly = fly;
        self
    }
}

/// Receives the actors the character touched during a sweep
pub trait TouchListener {
    /// Called once per touched actor per step
    fn on_touch(&mut self, actor: ActorKey);
}

/// Actors that are grabbed and rotated together
#[derive(Clone, Debug)]
pub struct MirrorGroup {
    /// Constituent actors
    pub actors: Vec<ActorKey>,
    /// Poses captured at registration, restored on reset
    pub original_poses: Vec<Pose>,
    /// Maximum grab distance
    pub max_distance: f32,
}

/// First-person controller bound to one level
pub struct PlayerController {
    config: PlayerConfig,
    character: CharacterController,
    look: LookAngles,
    /// Seconds since the jump started, if jumping
    jump: Option<f32>,
    jump_start_y: f32,
    /// Last touched surface suitable for jumping off
    footing: Option<ActorKey>,
    grabbed: Option<usize>,
    mirrors: Vec<MirrorGroup>,
    final_region: Option<ActorKey>,
}

impl PlayerController {
    /// Create a controller standing where the scene's camera is
    pub fn new(world: &PhysicsWorld, scene: &Scene, config: PlayerConfig) -> Self {
        let camera = scene.camera();
        let desc = CharacterDesc::for_eye_height(config.eye_height, camera.translation);
        let character = world.create_character(&desc);

        Self {
            look: LookAngles::from_direction(&camera.forward()),
            config,
            character,
            jump: None,
            jump_start_y: 0.0,
            footing: None,
            grabbed: None,
            mirrors: Vec::new(),
            final_region: None,
        }
    }

    fn eye_offset(&self) -> f32 {
        self.config.eye_height * 1.5 / 4.0
    }

    /// Register the goal actor queried by [`on_final_region`](Self::on_final_region)
    pub fn set_final_region(&mut self, actor: ActorKey) {
        self.final_region = Some(actor);
    }

    /// Register a group of actors that rotate together when grabbed
    ///
    /// Returns the group index.
    pub fn add_mirror(
        &mut self,
        world: &PhysicsWorld,
        actors: &[ActorKey],
        max_distance: f32,
    ) -> Result<usize, PhysicsError> {
        let original_poses = actors
            .iter()
            .map(|a| world.actor_pose(*a).ok_or(PhysicsError::UnknownActor))
            .collect::<Result<Vec<_>, _>>()?;

        self.mirrors.push(MirrorGroup {
            actors: actors.to_vec(),
            original_poses,
            max_distance,
        });
        Ok(self.mirrors.len() - 1)
    }

    /// Restore every mirror to its registration pose
    pub fn reset_mirrors(&mut self, world: &mut PhysicsWorld) -> Result<(), PhysicsError> {
        for group in &self.mirrors {
            for (actor, pose) in group.actors.iter().zip(&group.original_poses) {
                world.set_actor_pose(*actor, *pose)?;
            }
        }
        self.grabbed = None;
        Ok(())
    }

    /// Mirror interaction, run before the physics step
    pub fn pre_step(
        &mut self,
        world: &mut PhysicsWorld,
        scene: &mut Scene,
        input: &InputSnapshot,
    ) -> Result<(), PhysicsError> {
        if input.mouse_button_down(GRAB_BUTTON) {
            if self.grabbed.is_none() {
                self.grabbed = self.raycast_mirror(world, scene);
                if let Some(index) = self.grabbed {
                    log::debug!("Grabbed mirror group {}", index);
                }
            }
            if let Some(index) = self.grabbed {
                self.rotate_mirror(world, scene, index, input)?;
            }
        } else {
            if self.grabbed.take().is_some() {
                let forward = scene.camera().forward();
                self.look_into_direction(&forward);
            }

            let highlighted = self.raycast_mirror(world, scene);
            for (index, group) in self.mirrors.iter().enumerate() {
                for actor in &group.actors {
                    if let Some(model) = world.actor_model(*actor).and_then(|m| scene.model_mut(m)) {
                        model.is_selected_mirror = highlighted == Some(index);
                    }
                }
            }
        }
        Ok(())
    }

    fn rotate_mirror(
        &mut self,
        world: &mut PhysicsWorld,
        scene: &mut Scene,
        index: usize,
        input: &InputSnapshot,
    ) -> Result<(), PhysicsError> {
        let Some(group) = self.mirrors.get(index) else {
            return Ok(());
        };
        let (dx, _) = input.cursor_delta();
        let yaw = Quat::from_axis_angle(&Vec3::y_axis(), -(dx as f32) * self.config.mouse_sensitivity);

        let mut mirror_position = None;
        for actor in &group.actors {
            let pose = world.actor_pose(*actor).ok_or(PhysicsError::UnknownActor)?;
            let rotated = Pose::from_parts(pose.translation, yaw * pose.rotation);
            world.set_actor_pose(*actor, rotated)?;

            if let Some(model) = world.actor_model(*actor).and_then(|m| scene.model_mut(m)) {
                model.is_selected_mirror = true;
            }
            mirror_position = Some(pose.translation.vector);
        }

        if let Some(position) = mirror_position {
            let to_mirror = position - scene.camera().translation;
            if to_mirror.norm() > f32::EPSILON {
                self.look_into_direction(&to_mirror.normalize());
            }
        }
        Ok(())
    }

    /// Index of the mirror group under the crosshair and within its grab distance
    pub fn raycast_mirror(&self, world: &mut PhysicsWorld, scene: &Scene) -> Option<usize> {
        let camera = scene.camera();
        let direction = camera.forward();
        let origin = camera.translation + direction * RAY_START_OFFSET;
        let hit = world.raycast(origin, direction, RAY_LENGTH)?;

        let index = self
            .mirrors
            .iter()
            .position(|group| group.actors.contains(&hit.actor))?;
        (hit.distance <= self.mirrors[index].max_distance).then_some(index)
    }

    /// Movement, jumping and camera update, run after the physics step
    pub fn post_step(
        &mut self,
        world: &mut PhysicsWorld,
        scene: &mut Scene,
        input: &InputSnapshot,
        dt: f32,
        listener: Option<&mut dyn TouchListener>,
    ) {
        if self.grabbed.is_none() {
            let (dx, dy) = input.cursor_delta();
            self.look.turn(
                dx as f32,
                dy as f32,
                self.config.mouse_sensitivity,
                self.config.vertical_sensitivity,
            );
        }
        if let Some(t) = self.jump.as_mut() {
            *t += dt;
        }

        let camera = *scene.camera();
        let mut straight = camera.forward();
        if !self.config.fly {
            straight.y = 0.0;
        }
        let mut direction = Vec3::zeros();
        if input.key_down(KeyCode::KeyW) {
            direction += straight;
        }
        if input.key_down(KeyCode::KeyS) {
            direction -= straight;
        }
        if input.key_down(KeyCode::KeyD) {
            direction += camera.right();
        }
        if input.key_down(KeyCode::KeyA) {
            direction -= camera.right();
        }
        if self.config.fly {
            if input.key_down(KeyCode::KeyE) {
                direction += camera.up();
            }
            if input.key_down(KeyCode::KeyQ) {
                direction -= camera.up();
            }
        }

        self.try_start_jump(world, input, dt);

        let mut displacement = if direction.norm() <= MIN_MOVE_LENGTH {
            Vec3::zeros()
        } else {
            direction.normalize() * self.config.walk_speed
        };
        if !self.config.fly {
            displacement.y += self.vertical_offset();
        }

        let mut touched = Vec::new();
        world.move_character(&mut self.character, displacement, MIN_MOVE_DISTANCE, dt, |actor| {
            touched.push(actor)
        });
        self.handle_touches(world, &touched, listener);

        let position = self.character.position();
        let camera = scene.camera_mut();
        camera.translation = position + Vec3::y() * self.eye_offset();
        camera.rotation = self.look.rotation();
        scene.set_character_position(position);
    }

    fn try_start_jump(&mut self, world: &PhysicsWorld, input: &InputSnapshot, dt: f32) {
        if self.jump.is_some() || !input.key_down(KeyCode::Space) {
            return;
        }
        let Some(bounds) = self.footing.and_then(|f| world.world_bounds(f)) else {
            return;
        };

        // The footing is checked against the current position, not the
        // position at touch time, so a jump shortly after a ledge still works.
        let position = self.character.position();
        if bounds.contains_xz(&position) && bounds.max.y - position.y < FOOTING_TOLERANCE {
            self.jump = Some(dt);
            self.jump_start_y = self.character.foot_position().y;
            self.footing = None;
        }
    }

    /// Vertical displacement for this step: the jump arc or pseudo-gravity
    fn vertical_offset(&mut self) -> f32 {
        match self.jump {
            None => GRAVITY_OFFSET,
            Some(t) => {
                let arc = (2.0 - 2.0 * (2.0 * t - 1.0).powi(2)).max(0.0);
                if t >= 1.0 {
                    self.jump = None;
                }
                arc + self.jump_start_y - self.character.foot_position().y
            }
        }
    }

    fn handle_touches(
        &mut self,
        world: &PhysicsWorld,
        touched: &[ActorKey],
        mut listener: Option<&mut dyn TouchListener>,
    ) {
        let position = self.character.position();
        for actor in touched {
            if !self.config.fly {
                if let Some(bounds) = world.world_bounds(*actor) {
                    if bounds.max.y - position.y < FOOTING_TOLERANCE {
                        self.footing = Some(*actor);
                    }
                }
            }
            if let Some(listener) = listener.as_mut() {
                listener.on_touch(*actor);
            }
        }
    }

    /// Point the look angles along `direction` (normalized)
    pub fn look_into_direction(&mut self, direction: &Vec3) {
        self.look = LookAngles::from_direction(direction);
    }

    /// Whether the capsule footprint lies strictly inside the final region
    pub fn on_final_region(&self, world: &PhysicsWorld) -> bool {
        let Some(bounds) = self.final_region.and_then(|r| world.world_bounds(r)) else {
            return false;
        };
        bounds.contains_xz_strict(&self.character.position())
    }

    /// Whether the player dropped below the fall threshold
    pub fn fell_down(&self) -> bool {
        self.character.position().y < FALL_THRESHOLD
    }

    /// Shift the player by `delta` without collision, carrying the camera along
    pub fn beam_along(&mut self, delta: Vec3, scene: &mut Scene) {
        let position = self.character.position() + delta;
        self.character.set_position(position);
        scene.camera_mut().translation = position + Vec3::y() * self.eye_offset();
    }

    /// Re-seat the capsule under the current camera and look along its view direction
    pub fn update_position(&mut self, scene: &Scene) {
        let camera = scene.camera();
        self.character
            .set_position(camera.translation - Vec3::y() * self.eye_offset());
        self.look_into_direction(&camera.forward());
    }

    /// Capsule center
    pub fn position(&self) -> Vec3 {
        self.character.position()
    }

    /// Teleport the capsule center
    pub fn set_position(&mut self, position: Vec3) {
        self.character.set_position(position);
    }

    /// The capsule
    pub fn character(&self) -> &CharacterController {
        &self.character
    }

    /// Current look angles
    pub fn look(&self) -> LookAngles {
        self.look
    }

    /// Whether a jump is in progress
    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    /// Last surface that qualifies for a jump
    pub fn footing(&self) -> Option<ActorKey> {
        self.footing
    }

    /// Index of the grabbed mirror group
    pub fn grabbed_mirror(&self) -> Option<usize> {
        self.grabbed
    }

    /// Registered mirror groups
    pub fn mirrors(&self) -> &[MirrorGroup] {
        &self.mirrors
    }

    /// Player configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        log::debug!("Releasing character controller");
    }
}
