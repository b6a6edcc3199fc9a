//! Level 2: a wall slides open while the camera stands on the trigger floor

use focus_core::Scene;
use focus_input::InputSnapshot;
use focus_math::{Pose, Vec3};
use focus_physics::player::UNLIMITED_MIRROR_DISTANCE;
use focus_physics::{ActorKey, PhysicsError};

use super::{hsv_blend, reposition_actor, LevelBehavior, LevelConfig, LevelError, LevelRuntime};
use crate::score::{BackgroundBlend, ScoreRules};
use crate::status::LevelStatus;

const SOLIDS: [&str; 8] = [
    "WallX1", "WallX3", "Floor1", "Floor2", "Floor3", "Floor4", "Floor5", "Floor6",
];

/// Wall z while closed
pub const WALL_CLOSED_Z: f32 = -36.0;
/// Wall z while open
pub const WALL_OPEN_Z: f32 = -28.0;
/// Seconds to slide fully open or closed
pub const WALL_TRAVEL_TIME: f32 = 2.0;
/// Seconds after closing starts before the slide may restart
pub const WALL_REARM_TIME: f32 = 2.5;

/// Scoring constants
pub const RULES: ScoreRules = ScoreRules::new(1e-4, 0.08);

/// Wall z `t` seconds after it started opening
pub fn opening_z(t: f32) -> f32 {
    (WALL_CLOSED_Z + (WALL_OPEN_Z - WALL_CLOSED_Z) * (t / WALL_TRAVEL_TIME)).min(WALL_OPEN_Z)
}

/// Wall z `t` seconds after it started closing
pub fn closing_z(t: f32) -> f32 {
    (WALL_OPEN_Z - (WALL_OPEN_Z - WALL_CLOSED_Z) * (t / WALL_TRAVEL_TIME)).max(WALL_CLOSED_Z)
}

struct Level2State {
    runtime: LevelRuntime,
    trigger: ActorKey,
    wall: ActorKey,
    wall_origin: Pose,
    opening_since: Option<f32>,
    closing_since: Option<f32>,
    blend: BackgroundBlend,
}

/// Second level
pub struct Level2 {
    config: LevelConfig,
    state: Option<Level2State>,
}

impl Level2 {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            config: config.clone(),
            state: None,
        }
    }

    /// Whether the wall is currently sliding open or held open
    pub fn is_wall_opening(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.opening_since.is_some())
    }
}

impl LevelBehavior for Level2 {
    fn name(&self) -> &'static str {
        "Level 2"
    }

    fn initialize(&mut self, scene: &mut Scene) -> Result<(), LevelError> {
        let mut runtime = LevelRuntime::new(scene, &self.config)?;

        for name in SOLIDS {
            runtime.add_box(scene, name, false)?;
        }
        let trigger = runtime.add_box(scene, "Floor7", false)?;
        let final_region = runtime.add_box(scene, "FinalRegion", false)?;
        runtime.player_mut().set_final_region(final_region);

        let wall = runtime.add_box(scene, "WallX2", true)?;
        let wall_origin = runtime
            .physics()
            .actor_pose(wall)
            .ok_or(PhysicsError::UnknownActor)?;

        runtime.add_mirror(scene, "MirrorBorder1", "MirrorPlane1", UNLIMITED_MIRROR_DISTANCE)?;
        log::info!(
            "Initialized {} with {} actors",
            self.name(),
            runtime.physics().actor_count()
        );

        self.state = Some(Level2State {
            runtime,
            trigger,
            wall,
            wall_origin,
            opening_since: None,
            closing_since: None,
            blend: hsv_blend([47.0, 0.0, 0.3], [60.0, 1.0, 1.0])?,
        });
        Ok(())
    }

    fn fixed_update(&mut self, scene: &mut Scene, input: &InputSnapshot, step: f32) -> Result<(), LevelError> {
        let state = self.state.as_mut().ok_or(LevelError::NotInitialized)?;
        let runtime = &mut state.runtime;

        runtime.elapsed += step;
        let t = runtime.elapsed;

        let camera = scene.camera().translation;
        let on_trigger = runtime
            .physics()
            .world_bounds(state.trigger)
            .is_some_and(|b| b.contains_xz(&camera));

        let wall_z = if on_trigger {
            let start = *state.opening_since.get_or_insert(t);
            Some(opening_z(t - start))
        } else {
            if state.opening_since.take().is_some() {
                state.closing_since = Some(t);
            }
            let z = state.closing_since.map(|start| closing_z(t - start));
            if state.closing_since.is_some_and(|start| t - start > WALL_REARM_TIME) {
                state.closing_since = None;
            }
            z
        };
        if let Some(z) = wall_z {
            reposition_actor(runtime.physics_mut(), state.wall, |p| Vec3::new(p.x, p.y, z))?;
        }

        runtime.step(scene, input, step, None)
    }

    fn update(
        &mut self,
        scene: &mut Scene,
        input: &InputSnapshot,
        dt: f32,
        focus_hit: f64,
    ) -> Result<LevelStatus, LevelError> {
        let state = self.state.as_mut().ok_or(LevelError::NotInitialized)?;
        state.runtime.update(scene, input, dt, focus_hit, &RULES, &state.blend)
    }

    fn reset(&mut self, scene: &mut Scene) -> Result<(), LevelError> {
        let state = self.state.as_mut().ok_or(LevelError::NotInitialized)?;
        state.opening_since = None;
        state.closing_since = None;
        state
            .runtime
            .physics_mut()
            .set_actor_pose(state.wall, state.wall_origin)?;
        state.runtime.reset(scene)
    }

    fn finalize(&mut self) {
        if self.state.take().is_some() {
            log::info!("Finalized {}", self.name());
        }
    }

    fn runtime(&self) -> Option<&LevelRuntime> {
        self.state.as_ref().map(|s| &s.runtime)
    }

    fn runtime_mut(&mut self) -> Option<&mut LevelRuntime> {
        self.state.as_mut().map(|s| &mut s.runtime)
    }
}
