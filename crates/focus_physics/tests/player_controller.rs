//! Integration tests for the player controller against a small in-memory level

use std::f32::consts::FRAC_PI_2;

use focus_core::{Camera, ModelKey, Scene, SceneModel};
use focus_input::{InputSnapshot, KeyCode, MouseButton};
use focus_math::{Mat4, Vec3};
use focus_physics::{ActorKey, PhysicsWorld, PlayerConfig, PlayerController, TouchListener};

const STEP: f32 = 1.0 / 60.0;
const EPSILON: f32 = 1e-4;

struct Level {
    scene: Scene,
    world: PhysicsWorld,
    player: PlayerController,
    floor: ActorKey,
    border: ActorKey,
    plane: ActorKey,
    plane_model: ModelKey,
}

fn placed(translation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::new_translation(&translation) * Mat4::new_nonuniform_scaling(&scale)
}

/// Like [`placed`] but turned a quarter turn about +Y, so the local z axis points along x
fn placed_facing_x(translation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::new_translation(&translation)
        * Mat4::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2)
        * Mat4::new_nonuniform_scaling(&scale)
}

/// A 20x20 floor with its top at y = 0 and a mirror 5 units in front of the camera
fn build_level(eye_y: f32, mirror_distance: f32) -> Level {
    let mut scene = Scene::new("test");
    let floor_model = scene
        .add_model(SceneModel::new("Floor").with_transform(placed(Vec3::new(0.0, -1.0, 0.0), Vec3::new(10.0, 1.0, 10.0))))
        .unwrap();
    let border_model = scene
        .add_model(SceneModel::new("MirrorBorder").with_transform(placed(Vec3::new(0.0, 1.5, -5.0), Vec3::new(1.0, 1.0, 0.05))))
        .unwrap();
    let plane_model = scene
        .add_model(SceneModel::new("MirrorPlane").with_transform(placed(Vec3::new(0.0, 1.5, -5.0), Vec3::new(0.9, 0.9, 1.0))))
        .unwrap();
    *scene.camera_mut() = Camera::looking_along(Vec3::new(0.0, eye_y, 0.0), -Vec3::z());

    let mut world = PhysicsWorld::new();
    let floor = world.create_box_actor(&scene, floor_model, false).unwrap();
    let border = world.create_box_actor(&scene, border_model, true).unwrap();
    let plane = world.create_plane_actor(&scene, plane_model, true).unwrap();

    let mut player = PlayerController::new(&world, &scene, PlayerConfig::default());
    player.add_mirror(&world, &[border, plane], mirror_distance).unwrap();

    Level {
        scene,
        world,
        player,
        floor,
        border,
        plane,
        plane_model,
    }
}

fn run_steps(level: &mut Level, input: &InputSnapshot, steps: usize) {
    for _ in 0..steps {
        level.player.pre_step(&mut level.world, &mut level.scene, input).unwrap();
        level.world.step(STEP, &mut level.scene);
        level.player.post_step(&mut level.world, &mut level.scene, input, STEP, None);
    }
}

#[derive(Default)]
struct Recorder {
    touched: Vec<ActorKey>,
}

impl TouchListener for Recorder {
    fn on_touch(&mut self, actor: ActorKey) {
        self.touched.push(actor);
    }
}

#[test]
fn test_grab_rotates_whole_group() {
    let mut level = build_level(1.5, 10.0);
    let input = InputSnapshot::new()
        .with_mouse_button_down(MouseButton::Left)
        .with_cursor_delta(100.0, 0.0);

    level.player.pre_step(&mut level.world, &mut level.scene, &input).unwrap();

    assert_eq!(level.player.grabbed_mirror(), Some(0));
    for actor in [level.border, level.plane] {
        let pose = level.world.actor_pose(actor).unwrap();
        assert!((pose.rotation.angle() - 0.1).abs() < EPSILON);
        assert!((pose.translation.vector - Vec3::new(0.0, 1.5, -5.0)).norm() < EPSILON);
    }
    assert!(level.scene.model(level.plane_model).unwrap().is_selected_mirror);
}

#[test]
fn test_grab_respects_max_distance() {
    let mut level = build_level(1.5, 3.0);
    let input = InputSnapshot::new().with_mouse_button_down(MouseButton::Left);

    level.player.pre_step(&mut level.world, &mut level.scene, &input).unwrap();

    assert_eq!(level.player.grabbed_mirror(), None);
    assert!(level.player.raycast_mirror(&mut level.world, &level.scene).is_none());
}

#[test]
fn test_release_clears_grab_and_refreshes_highlight() {
    let mut level = build_level(1.5, 10.0);
    let held = InputSnapshot::new().with_mouse_button_down(MouseButton::Left);
    level.player.pre_step(&mut level.world, &mut level.scene, &held).unwrap();
    assert_eq!(level.player.grabbed_mirror(), Some(0));

    level.player.pre_step(&mut level.world, &mut level.scene, &InputSnapshot::new()).unwrap();
    assert_eq!(level.player.grabbed_mirror(), None);
    assert!(level.scene.model(level.plane_model).unwrap().is_selected_mirror);

    // Look away: nothing under the crosshair
    *level.scene.camera_mut() = Camera::looking_along(Vec3::new(0.0, 1.5, 0.0), Vec3::z());
    level.player.pre_step(&mut level.world, &mut level.scene, &InputSnapshot::new()).unwrap();
    assert!(!level.scene.model(level.plane_model).unwrap().is_selected_mirror);
}

#[test]
fn test_highlight_moves_between_mirror_groups() {
    let mut level = build_level(1.5, 10.0);
    let side_border_model = level
        .scene
        .add_model(SceneModel::new("SideBorder").with_transform(placed_facing_x(Vec3::new(5.0, 1.5, 0.0), Vec3::new(1.0, 1.0, 0.05))))
        .unwrap();
    let side_plane_model = level
        .scene
        .add_model(SceneModel::new("SidePlane").with_transform(placed_facing_x(Vec3::new(5.0, 1.5, 0.0), Vec3::new(0.9, 0.9, 1.0))))
        .unwrap();
    let side_border = level.world.create_box_actor(&level.scene, side_border_model, true).unwrap();
    let side_plane = level.world.create_plane_actor(&level.scene, side_plane_model, true).unwrap();
    level.player.add_mirror(&level.world, &[side_border, side_plane], 10.0).unwrap();

    let front = [level.scene.model_key("MirrorBorder").unwrap(), level.plane_model];
    let side = [side_border_model, side_plane_model];
    let selected = |scene: &Scene, keys: &[ModelKey]| -> Vec<bool> {
        keys.iter().map(|k| scene.model(*k).unwrap().is_selected_mirror).collect()
    };
    let idle = InputSnapshot::new();

    level.player.pre_step(&mut level.world, &mut level.scene, &idle).unwrap();
    assert_eq!(selected(&level.scene, &front), [true, true]);
    assert_eq!(selected(&level.scene, &side), [false, false]);

    *level.scene.camera_mut() = Camera::looking_along(Vec3::new(0.0, 1.5, 0.0), Vec3::x());
    level.player.pre_step(&mut level.world, &mut level.scene, &idle).unwrap();
    assert_eq!(level.player.raycast_mirror(&mut level.world, &level.scene), Some(1));
    assert_eq!(selected(&level.scene, &front), [false, false]);
    assert_eq!(selected(&level.scene, &side), [true, true]);

    *level.scene.camera_mut() = Camera::looking_along(Vec3::new(0.0, 1.5, 0.0), -Vec3::x());
    level.player.pre_step(&mut level.world, &mut level.scene, &idle).unwrap();
    assert_eq!(selected(&level.scene, &front), [false, false]);
    assert_eq!(selected(&level.scene, &side), [false, false]);
}

#[test]
fn test_reset_mirrors_restores_registration_pose() {
    let mut level = build_level(1.5, 10.0);
    let original = level.world.actor_pose(level.plane).unwrap();
    let input = InputSnapshot::new()
        .with_mouse_button_down(MouseButton::Left)
        .with_cursor_delta(-350.0, 0.0);
    level.player.pre_step(&mut level.world, &mut level.scene, &input).unwrap();
    assert!(level.world.actor_pose(level.plane).unwrap() != original);

    level.player.reset_mirrors(&mut level.world).unwrap();
    let restored = level.world.actor_pose(level.plane).unwrap();
    assert!((restored.rotation.angle_to(&original.rotation)).abs() < EPSILON);
    assert_eq!(level.player.grabbed_mirror(), None);
}

#[test]
fn test_player_lands_and_records_footing() {
    let mut level = build_level(2.5, 10.0);
    let mut recorder = Recorder::default();
    let idle = InputSnapshot::new();

    for _ in 0..60 {
        level.player.pre_step(&mut level.world, &mut level.scene, &idle).unwrap();
        level.world.step(STEP, &mut level.scene);
        level
            .player
            .post_step(&mut level.world, &mut level.scene, &idle, STEP, Some(&mut recorder));
    }

    let foot = level.player.character().foot_position();
    assert!(foot.y > -0.05 && foot.y < 0.1, "foot at {}", foot.y);
    assert_eq!(level.player.footing(), Some(level.floor));
    assert!(recorder.touched.contains(&level.floor));

    let marker = level.scene.character_position().unwrap();
    assert!((marker - level.player.position()).norm() < EPSILON);
    let eye = level.scene.camera().translation;
    assert!((eye.y - (level.player.position().y + 1.5 * 1.5 / 4.0)).abs() < EPSILON);
}

#[test]
fn test_walk_forward_moves_along_view() {
    let mut level = build_level(2.5, 10.0);
    run_steps(&mut level, &InputSnapshot::new(), 60);
    let start = level.player.position();

    run_steps(&mut level, &InputSnapshot::new().with_key_down(KeyCode::KeyS), 20);

    let moved = level.player.position() - start;
    assert!(moved.z > 1.0, "moved {:?}", moved);
    assert!(moved.x.abs() < 0.05);
}

#[test]
fn test_jump_follows_arc() {
    let mut level = build_level(2.5, 10.0);
    run_steps(&mut level, &InputSnapshot::new(), 60);
    let rest = level.player.character().foot_position().y;

    run_steps(&mut level, &InputSnapshot::new().with_key_down(KeyCode::Space), 1);
    assert!(level.player.is_jumping());
    assert_eq!(level.player.footing(), None);

    run_steps(&mut level, &InputSnapshot::new(), 29);
    let apex = level.player.character().foot_position().y;
    assert!(apex - rest > 1.5, "apex {} rest {}", apex, rest);

    run_steps(&mut level, &InputSnapshot::new(), 90);
    assert!(!level.player.is_jumping());
    let landed = level.player.character().foot_position().y;
    assert!((landed - rest).abs() < 0.1);
}

#[test]
fn test_cursor_turns_view_when_not_grabbing() {
    let mut level = build_level(2.5, 10.0);
    let before = level.player.look().horizontal;
    let input = InputSnapshot::new().with_cursor_delta(100.0, 0.0);
    run_steps(&mut level, &input, 1);
    assert!((level.player.look().horizontal - before - 0.1).abs() < EPSILON);

    let forward = level.scene.camera().forward();
    assert!((forward - level.player.look().direction()).norm() < EPSILON);
}

#[test]
fn test_fell_down_below_threshold() {
    let mut level = build_level(1.5, 10.0);
    assert!(!level.player.fell_down());
    level.player.set_position(Vec3::new(0.0, -21.0, 0.0));
    assert!(level.player.fell_down());
}

#[test]
fn test_beam_along_adds_exact_delta() {
    let mut level = build_level(1.5, 10.0);
    let before = level.player.position();
    let delta = Vec3::new(0.25, 0.0, -0.5);

    level.player.beam_along(delta, &mut level.scene);

    assert!((level.player.position() - (before + delta)).norm() < EPSILON);
    let eye = level.scene.camera().translation;
    assert!((eye - (before + delta + Vec3::y() * 0.5625)).norm() < EPSILON);
}

#[test]
fn test_final_region_is_strict() {
    let mut level = build_level(1.5, 10.0);
    level.player.set_final_region(level.floor);

    level.player.set_position(Vec3::new(0.0, 1.0, 0.0));
    assert!(level.player.on_final_region(&level.world));

    level.player.set_position(Vec3::new(10.0, 1.0, 0.0));
    assert!(!level.player.on_final_region(&level.world));
}

#[test]
fn test_update_position_follows_camera() {
    let mut level = build_level(1.5, 10.0);
    *level.scene.camera_mut() = Camera::looking_along(Vec3::new(3.0, 4.0, 1.0), Vec3::x());

    level.player.update_position(&level.scene);

    assert!((level.player.position() - Vec3::new(3.0, 4.0 - 0.5625, 1.0)).norm() < EPSILON);
    assert!((level.player.look().direction() - Vec3::x()).norm() < EPSILON);
}
