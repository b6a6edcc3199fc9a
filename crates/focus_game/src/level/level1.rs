//! Level 1: floors drifting back and forth in counter-phase

use focus_core::Scene;
use focus_input::InputSnapshot;
use focus_math::Vec3;
use focus_physics::player::UNLIMITED_MIRROR_DISTANCE;
use focus_physics::ActorKey;

use super::{hsv_blend, reposition_actor, LevelBehavior, LevelConfig, LevelError, LevelRuntime, PlatformTracker};
use crate::score::{BackgroundBlend, ScoreRules};
use crate::status::LevelStatus;

const WALLS: [&str; 7] = ["Wall1", "Wall2", "Wall3", "Wall4", "Wall5", "Wall6", "Wall7"];
const FLOORS: [&str; 10] = [
    "Floor1", "Floor2", "Floor3", "Floor4", "Floor5", "Floor6", "Floor7", "Floor8", "Floor9", "Floor10",
];
/// Indices into [`FLOORS`] of the scripted floors
const MOVING_FLOORS: [usize; 3] = [6, 7, 8];

/// Scoring constants
pub const RULES: ScoreRules = ScoreRules::new(1e-4, 0.08);

/// x coordinates of the two floor phases at time `t`
pub fn floor_offsets(t: f32) -> (f32, f32) {
    let swing = 1.5 * (2.0 * t).cos();
    (-(22.0 + swing), -(22.0 - swing))
}

struct Level1State {
    runtime: LevelRuntime,
    /// Floor7, Floor8, Floor9 and the final region
    platforms: [ActorKey; 4],
    tracker: PlatformTracker,
    blend: BackgroundBlend,
}

/// First level
pub struct Level1 {
    config: LevelConfig,
    state: Option<Level1State>,
}

impl Level1 {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            config: config.clone(),
            state: None,
        }
    }
}

impl LevelBehavior for Level1 {
    fn name(&self) -> &'static str {
        "Level 1"
    }

    fn initialize(&mut self, scene: &mut Scene) -> Result<(), LevelError> {
        let mut runtime = LevelRuntime::new(scene, &self.config)?;

        for name in WALLS {
            runtime.add_plane(scene, name, false)?;
        }

        let mut moving = Vec::with_capacity(MOVING_FLOORS.len());
        for (i, name) in FLOORS.iter().enumerate() {
            let dynamic = MOVING_FLOORS.contains(&i);
            let actor = runtime.add_box(scene, name, dynamic)?;
            if dynamic {
                moving.push(actor);
            }
        }

        let final_region = runtime.add_box(scene, "FinalRegion", true)?;
        runtime.player_mut().set_final_region(final_region);
        runtime.add_mirror(scene, "MirrorBorder1", "MirrorPlane1", UNLIMITED_MIRROR_DISTANCE)?;

        let platforms = [moving[0], moving[1], moving[2], final_region];
        log::info!(
            "Initialized {} with {} actors",
            self.name(),
            runtime.physics().actor_count()
        );

        self.state = Some(Level1State {
            runtime,
            platforms,
            tracker: PlatformTracker::new(platforms.to_vec()),
            blend: hsv_blend([47.0, 0.0, 0.3], [60.0, 1.0, 1.0])?,
        });
        Ok(())
    }

    fn fixed_update(&mut self, scene: &mut Scene, input: &InputSnapshot, step: f32) -> Result<(), LevelError> {
        let state = self.state.as_mut().ok_or(LevelError::NotInitialized)?;
        let runtime = &mut state.runtime;

        runtime.elapsed += step;
        let (x_a, x_b) = floor_offsets(runtime.elapsed);

        let mut deltas = [Vec3::zeros(); 4];
        for (i, (actor, x)) in state.platforms.iter().zip([x_a, x_b, x_a, x_b]).enumerate() {
            deltas[i] = reposition_actor(runtime.physics_mut(), *actor, |p| Vec3::new(x, p.y, p.z))?;
        }

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_offsets_counter_phase() {
        let (a, b) = floor_offsets(0.0);
        assert!((a + 23.5).abs() < 1e-5);
        assert!((b + 20.5).abs() < 1e-5);
        // Both phases always average to -22
        for i in 0..20 {
            let (a, b) = floor_offsets(i as f32 * 0.37);
            assert!(((a + b) / 2.0 + 22.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_uninitialized_level_reports_error() {
        let mut level = Level1::new(&LevelConfig::default());
        let mut scene = Scene::new("empty");
        assert!(matches!(
            level.fixed_update(&mut scene, &InputSnapshot::new(), 0.1),
            Err(LevelError::NotInitialized)
        ));
    }
}
