//! Level 3: an orbiting goal platform and a wall that swings out of its way
//!
//! The platform clock only runs once the player has stepped onto the
//! platform. The rotating wall's angle is derived from the platform's
//! position on its orbit so that it opens only through the quadrants where
//! the platform would otherwise pass through it.

use std::f32::consts::FRAC_PI_2;

use focus_core::Scene;
use focus_input::InputSnapshot;
use focus_math::{Pose, Quat, Translation3, Vec3};
use focus_physics::{ActorKey, PhysicsError};

use super::{hsv_blend, reposition_actor, LevelBehavior, LevelConfig, LevelError, LevelRuntime, PlatformTracker};
use crate::score::{BackgroundBlend, ScoreRules};
use crate::status::LevelStatus;

/// Mirror grab distance in this level
pub const MIRROR_MAX_DISTANCE: f32 = 14.75;

/// Half extents of the invisible walls beside the doorway
const INVISIBLE_WALL_HALF_EXTENTS: [f32; 3] = [2.93, 3.23, 0.1];
const INVISIBLE_WALL_POSITIONS: [[f32; 3]; 4] = [
    [-5.44, 2.93, 5.55],
    [5.44, 2.93, 5.55],
    [5.44, 2.93, 3.37],
    [-5.44, 2.93, 3.37],
];

/// Scoring constants
pub const RULES: ScoreRules = ScoreRules::new(1e-4, 0.05);

/// Platform x/z on its orbit at platform time `t`
pub fn platform_position(t: f32) -> (f32, f32) {
    let (sin, cos) = (t / 5.0).sin_cos();
    (-(sin * 12.0), -18.0 + cos * 12.0)
}

/// Yaw of the rotating wall for platform time `t`
pub fn door_angle(t: f32) -> f32 {
    let (sin, cos) = (t / 5.0).sin_cos();
    if sin * cos < 0.0 {
        if cos < 0.0 {
            FRAC_PI_2 * (1.0 - sin * sin)
        } else {
            FRAC_PI_2 * sin * sin
        }
    } else if sin < 0.0 {
        FRAC_PI_2
    } else {
        0.0
    }
}

struct Level3State {
    runtime: LevelRuntime,
    platform: ActorKey,
    door: ActorKey,
    door_origin: Pose,
    tracker: PlatformTracker,
    platform_moving: bool,
    blend: BackgroundBlend,
}

/// Third level
pub struct Level3 {
    config: LevelConfig,
    state: Option<Level3State>,
}

impl Level3 {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            config: config.clone(),
            state: None,
        }
    }

    /// Whether the player has started the platform
    pub fn is_platform_moving(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.platform_moving)
    }
}

impl LevelBehavior for Level3 {
    fn name(&self) -> &'static str {
        "Level 3"
    }

    fn initialize(&mut self, scene: &mut Scene) -> Result<(), LevelError> {
        let mut runtime = LevelRuntime::new(scene, &self.config)?;

        runtime.add_box(scene, "Floor1", false)?;
        runtime.add_box(scene, "Floor2", false)?;
        let platform = runtime.add_box(scene, "FinalFloor", true)?;
        runtime.player_mut().set_final_region(platform);

        runtime.add_box(scene, "WallX", false)?;
        runtime.add_plane(scene, "DoorP1", false)?;
        runtime.add_plane(scene, "DoorP2", false)?;

        let half_extents = Vec3::from(INVISIBLE_WALL_HALF_EXTENTS);
        let upright = Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2);
        for [x, y, z] in INVISIBLE_WALL_POSITIONS {
            let pose = Pose::from_parts(Translation3::new(x, y, z), upright);
            runtime.physics_mut().create_fixed_actor(pose, half_extents);
        }

        runtime.add_mirror(scene, "MirrorBorder1", "MirrorPlane1", MIRROR_MAX_DISTANCE)?;

        let door = runtime.add_box(scene, "RotWall", true)?;
        let door_origin = runtime
            .physics()
            .actor_pose(door)
            .ok_or(PhysicsError::UnknownActor)?;

        log::info!(
            "Initialized {} with {} actors",
            self.name(),
            runtime.physics().actor_count()
        );

        self.state = Some(Level3State {
            runtime,
            platform,
            door,
            door_origin,
            tracker: PlatformTracker::new(vec![platform]),
            platform_moving: false,
            blend: hsv_blend([60.0, 0.0, 0.7], [60.0, 1.0, 1.0])?,
        });
        Ok(())
    }

    fn fixed_update(&mut self, scene: &mut Scene, input: &InputSnapshot, step: f32) -> Result<(), LevelError> {
        let state = self.state.as_mut().ok_or(LevelError::NotInitialized)?;
        let runtime = &mut state.runtime;
        let t = runtime.elapsed;

        let (x, z) = platform_position(t);
        let delta = reposition_actor(runtime.physics_mut(), state.platform, |p| Vec3::new(x, p.y, z))?;

        let swing = Quat::from_axis_angle(&Vec3::y_axis(), door_angle(t));
        let door_pose = Pose::from_parts(state.door_origin.translation, swing * state.door_origin.rotation);
        runtime.physics_mut().set_actor_pose(state.door, door_pose)?;

        runtime.step(scene, input, step, Some(&mut state.tracker))?;

        if state.tracker.is_touched(0) && !state.platform_moving {
            log::debug!("Platform started");
            state.platform_moving = true;
        }
        if state.platform_moving {
            runtime.elapsed += step;
        }
        if state.tracker.take(0) {
            runtime.player_mut().beam_along(delta, scene);
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
        state.platform_moving = false;
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
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_platform_orbit() {
        let (x, z) = platform_position(0.0);
        assert!(x.abs() < EPSILON && (z + 6.0).abs() < EPSILON);
        // A quarter orbit later the platform is at x = -12
        let (x, z) = platform_position(5.0 * FRAC_PI_2);
        assert!((x + 12.0).abs() < EPSILON && (z + 18.0).abs() < EPSILON);
    }

    #[test]
    fn test_door_closed_in_first_quadrant() {
        assert_eq!(door_angle(0.0), 0.0);
        assert_eq!(door_angle(5.0 * 0.4), 0.0);
    }

    #[test]
    fn test_door_opens_through_second_quadrant() {
        // sin > 0, cos < 0: opens from 0 at the quarter orbit towards pi/2
        let just_past_quarter = door_angle(5.0 * (FRAC_PI_2 + 0.01));
        assert!(just_past_quarter < 0.01);
        let near_half = door_angle(5.0 * (PI - 0.01));
        assert!((near_half - FRAC_PI_2).abs() < 0.01);
    }

    #[test]
    fn test_door_open_in_third_quadrant() {
        assert_eq!(door_angle(5.0 * (PI + 0.5)), FRAC_PI_2);
    }

    #[test]
    fn test_door_closes_through_fourth_quadrant() {
        // sin < 0, cos > 0: closes from pi/2 back to 0
        let start = door_angle(5.0 * (1.5 * PI + 0.01));
        assert!((start - FRAC_PI_2).abs() < 0.01);
        let end = door_angle(5.0 * (2.0 * PI - 0.01));
        assert!(end < 0.01);
    }
}
