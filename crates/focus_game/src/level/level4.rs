//! Level 4: four orbiting platforms, a sinking goal and a bobbing mirror

use focus_core::Scene;
use focus_input::InputSnapshot;
use focus_math::Vec3;
use focus_physics::player::UNLIMITED_MIRROR_DISTANCE;
use focus_physics::{ActorKey, PhysicsError};

use super::{reposition_actor, LevelBehavior, LevelConfig, LevelError, LevelRuntime, PlatformTracker};
use crate::score::{BackgroundBlend, ScoreRules};
use crate::status::LevelStatus;

const PLATFORMS: [&str; 4] = ["Platform1", "Platform2", "Platform3", "Platform4"];

/// (x amplitude, z amplitude, angular speed) of each platform orbit
const ORBITS: [(f32, f32, f32); 4] = [(-6.0, 5.0, 0.5), (7.0, 7.0, 0.4), (-5.0, 5.0, 0.6), (8.0, 8.0, 0.7)];

/// Lowest height of the goal region
pub const GOAL_LOW: f32 = 0.9;
/// Resting height of the goal region
pub const GOAL_HIGH: f32 = 7.029;
/// The goal only rises while below this height
const GOAL_RISE_LIMIT: f32 = 7.02;
/// Above this height the goal sinks gradually, below it snaps to the bottom
const GOAL_SNAP_HEIGHT: f32 = 1.0;
/// Goal sink/rise speed
pub const GOAL_SPEED: f32 = 2.0;

/// Scoring constants
pub const RULES: ScoreRules = ScoreRules::new(2e-4, 0.05);

/// x/z of platform `index` at time `t`
pub fn platform_position(index: usize, t: f32) -> (f32, f32) {
    let (ax, az, speed) = ORBITS[index % ORBITS.len()];
    let (sin, cos) = (t * speed).sin_cos();
    (ax * sin, az * cos)
}

/// Height of the first mirror at time `t`
pub fn mirror_height(t: f32) -> f32 {
    9.0 - 3.0 * (t * 0.7).cos()
}

/// Next goal height, or `None` if it stays put
pub fn goal_height(current: f32, standing_on: bool, step: f32) -> Option<f32> {
    if standing_on {
        if current > GOAL_SNAP_HEIGHT {
            Some((current - step * GOAL_SPEED).max(GOAL_LOW))
        } else {
            Some(GOAL_LOW)
        }
    } else if current < GOAL_RISE_LIMIT {
        Some((current + step * GOAL_SPEED).min(GOAL_HIGH))
    } else {
        None
    }
}

struct Level4State {
    runtime: LevelRuntime,
    platforms: [ActorKey; 4],
    goal: ActorKey,
    /// Border and plane of the first mirror
    bobbing_mirror: [ActorKey; 2],
    /// Platforms 0..4 and the goal at index 4
    tracker: PlatformTracker,
    blend: BackgroundBlend,
}

/// Fourth level
pub struct Level4 {
    config: LevelConfig,
    state: Option<Level4State>,
}

impl Level4 {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            config: config.clone(),
            state: None,
        }
    }
}

impl LevelBehavior for Level4 {
    fn name(&self) -> &'static str {
        "Level 4"
    }

    fn initialize(&mut self, scene: &mut Scene) -> Result<(), LevelError> {
        let mut runtime = LevelRuntime::new(scene, &self.config)?;

        scene.material_mut(0)?.scale_diffuse(2.0);
        scene.material_mut(2)?.set_uniform_ambient(0.4);
        scene.material_mut(3)?.set_uniform_ambient(0.4);

        let mut platforms = Vec::with_capacity(PLATFORMS.len());
        for name in PLATFORMS {
            platforms.push(runtime.add_box(scene, name, true)?);
        }
        let platforms = [platforms[0], platforms[1], platforms[2], platforms[3]];

        let goal = runtime.add_box(scene, "FinalRegion", true)?;
        runtime.player_mut().set_final_region(goal);

        runtime.add_plane(scene, "Ground", false)?;
        let leaves = scene.model_key("Leaves")?;
        if let Some(model) = scene.model_mut(leaves) {
            model.is_leaf = true;
        }

        let bobbing_mirror =
            runtime.add_mirror(scene, "MirrorBorder1", "MirrorPlane1", UNLIMITED_MIRROR_DISTANCE)?;
        runtime.add_mirror(scene, "MirrorBorder2", "MirrorPlane2", UNLIMITED_MIRROR_DISTANCE)?;

        log::info!(
            "Initialized {} with {} actors",
            self.name(),
            runtime.physics().actor_count()
        );

        let mut tracked = platforms.to_vec();
        tracked.push(goal);
        self.state = Some(Level4State {
            runtime,
            platforms,
            goal,
            bobbing_mirror,
            tracker: PlatformTracker::new(tracked),
            blend: BackgroundBlend::Rgb {
                neutral: [0.5, 0.7, 0.75],
                focused: [1.0, 1.0, 0.0],
            },
        });
        Ok(())
    }

    fn fixed_update(&mut self, scene: &mut Scene, input: &InputSnapshot, step: f32) -> Result<(), LevelError> {
        let state = self.state.as_mut().ok_or(LevelError::NotInitialized)?;
        let runtime = &mut state.runtime;

        runtime.elapsed += step;
        let t = runtime.elapsed;

        let mut deltas = [Vec3::zeros(); 4];
        for (i, actor) in state.platforms.iter().enumerate() {
            let (x, z) = platform_position(i, t);
            deltas[i] = reposition_actor(runtime.physics_mut(), *actor, |p| Vec3::new(x, p.y, z))?;
        }

        // The goal touch comes from the previous step
        let goal_y = runtime
            .physics()
            .actor_pose(state.goal)
            .ok_or(PhysicsError::UnknownActor)?
            .translation
            .y;
        let standing_on_goal = state.tracker.take(PLATFORMS.len());
        if let Some(y) = goal_height(goal_y, standing_on_goal, step) {
            reposition_actor(runtime.physics_mut(), state.goal, |p| Vec3::new(p.x, y, p.z))?;
        }

        // The border copies the plane pose
        let [border, plane] = state.bobbing_mirror;
        let mirror_y = mirror_height(t);
        reposition_actor(runtime.physics_mut(), plane, |p| Vec3::new(p.x, mirror_y, p.z))?;
        let plane_pose = runtime.physics().actor_pose(plane).ok_or(PhysicsError::UnknownActor)?;
        runtime.physics_mut().set_actor_pose(border, plane_pose)?;

        runtime.step(scene, input, step, Some(&mut state.tracker))?;

        for (i, delta) in deltas.iter().enumerate() {
            if state.tracker.take(i) {
                runtime.player_mut().beam_along(*delta, scene);
            }
        }
        Ok(())
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
        state.tracker.clear();
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
