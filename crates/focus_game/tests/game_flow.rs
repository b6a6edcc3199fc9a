//! Orchestrator behavior: fades, level switching, pause and quit

use std::path::PathBuf;

use focus_core::Scene;
use focus_game::{ActiveElement, GameControl, LevelLogic, LevelRegistry, LevelStatus, Renderer};
use focus_input::{FrameTiming, InputSnapshot, KeyCode};

const FRAME: f32 = 0.25;

#[derive(Default)]
struct RecordingRenderer {
    scenes: Vec<String>,
    levels: Vec<String>,
    fades: Vec<f32>,
    focus_hit: f64,
}

impl Renderer for RecordingRenderer {
    fn set_scene(&mut self, scene: &Scene) {
        self.scenes.push(scene.name().to_string());
    }

    fn set_level_logic(&mut self, logic: &LevelLogic) {
        self.levels.push(logic.name().to_string());
    }

    fn set_fade_value(&mut self, value: f32) {
        self.fades.push(value);
    }

    fn sample_focus_hit(&mut self, _scene: &Scene) -> f64 {
        self.focus_hit
    }
}

fn game() -> GameControl<RecordingRenderer> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/levels");
    let mut game = GameControl::new(LevelRegistry::standard(dir), RecordingRenderer::default());
    game.initialize().unwrap();
    game
}

fn timing() -> FrameTiming {
    FrameTiming::new(FRAME, 1.0 / 60.0)
}

fn win_input() -> InputSnapshot {
    InputSnapshot::new().with_key_released(KeyCode::F10)
}

#[test]
fn test_initialize_binds_first_level() {
    let game = game();
    assert_eq!(game.level_index(), 0);
    assert_eq!(game.renderer().scenes, vec!["level1".to_string()]);
    assert_eq!(game.renderer().levels, vec!["Level 1".to_string()]);
    assert!(game.active_set().contains(&ActiveElement::Scene("level1".to_string())));
    assert!(game.active_set().contains(&ActiveElement::Level("Level 1".to_string())));
    assert!(!game.is_stopped());
}

#[test]
fn test_uninitialized_game_errors() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/levels");
    let mut game = GameControl::new(LevelRegistry::standard(dir), RecordingRenderer::default());
    assert!(game.update(&InputSnapshot::new(), &timing()).is_err());
    assert!(game.fixed_update(&InputSnapshot::new(), 1.0 / 60.0).is_err());
}

#[test]
fn test_first_frame_starts_fade_in() {
    let mut game = game();
    game.update(&InputSnapshot::new(), &timing()).unwrap();
    assert_eq!(game.renderer().fades, vec![1.0]);

    game.update(&InputSnapshot::new(), &timing()).unwrap();
    assert_eq!(game.renderer().fades, vec![1.0, 1.0]);
    assert_eq!(game.fade().fade_in_remaining(), Some(0.75));
}

#[test]
fn test_won_level_fades_out_then_switches() {
    let mut game = game();

    game.update(&win_input(), &timing()).unwrap();
    assert_eq!(game.current().unwrap().logic.status(), LevelStatus::Won);
    assert_eq!(game.fade().fade_out_remaining(), Some(1.0));

    // Eight more frames at a quarter second each drain the fade-out timer
    for frame in 0..7 {
        game.update(&InputSnapshot::new(), &timing()).unwrap();
        assert_eq!(game.level_index(), 0, "switched early on frame {}", frame);
    }
    let last_fade = *game.renderer().fades.last().unwrap();
    assert!((last_fade - 0.875).abs() < 1e-6);

    game.update(&InputSnapshot::new(), &timing()).unwrap();
    assert_eq!(game.level_index(), 1);
    assert!(game.has_pending());
    assert_eq!(game.renderer().fades.last(), Some(&1.0));
    assert_eq!(game.renderer().scenes.last().map(String::as_str), Some("level2"));
    assert!(!game.active_set().contains(&ActiveElement::Scene("level1".to_string())));
    assert!(game.active_set().contains(&ActiveElement::Scene("level2".to_string())));
    assert_eq!(game.current().unwrap().logic.status(), LevelStatus::Running);

    game.update(&InputSnapshot::new(), &timing()).unwrap();
    assert!(!game.has_pending());
    assert!(game.fade().fade_in_remaining().is_some());
}

#[test]
fn test_last_level_win_stops_game() {
    let mut game = game();
    game.switch_level(3).unwrap();
    assert_eq!(game.level_index(), 3);

    game.update(&win_input(), &timing()).unwrap();
    for _ in 0..8 {
        game.update(&InputSnapshot::new(), &timing()).unwrap();
    }
    assert!(game.is_stopped());
    assert_eq!(game.level_index(), 3);
}

#[test]
fn test_lost_level_is_reset() {
    let mut game = game();
    let level = game.current_mut().unwrap();
    let runtime = level.logic.runtime_mut().unwrap();
    let start = *runtime.initial_camera();
    runtime
        .player_mut()
        .set_position(focus_math::Vec3::new(0.0, -30.0, 0.0));

    game.update(&InputSnapshot::new(), &timing()).unwrap();

    let level = game.current().unwrap();
    assert_eq!(level.logic.status(), LevelStatus::Running);
    assert_eq!(*level.scene.camera(), start);
    assert!(!level.logic.runtime().unwrap().player().fell_down());
}

#[test]
fn test_focus_hit_raises_score() {
    let mut game = game();
    game.renderer_mut().focus_hit = 1.0;
    game.update(&InputSnapshot::new(), &timing()).unwrap();

    let score = game.current().unwrap().logic.runtime().unwrap().score().value();
    assert!(score > 0.0);
}

#[test]
fn test_pause_toggle() {
    let mut game = game();
    let tab = InputSnapshot::new().with_key_pressed(KeyCode::Tab);

    game.update(&tab, &timing()).unwrap();
    assert!(game.is_paused());

    game.fixed_update(&InputSnapshot::new(), 1.0 / 60.0).unwrap();
    assert_eq!(game.current().unwrap().logic.runtime().unwrap().elapsed, 0.0);

    game.update(&tab, &timing()).unwrap();
    assert!(!game.is_paused());
}

#[test]
fn test_quit_key_stops_game() {
    let mut game = game();
    game.update(&InputSnapshot::new().with_key_pressed(KeyCode::Escape), &timing())
        .unwrap();
    assert!(game.is_stopped());
}

#[test]
fn test_injected_scene_loader() {
    let registry = LevelRegistry::new().with_level("Only", "missing.ron", |c| {
        focus_game::LevelVariant::Level1(focus_game::Level1::new(c))
    });
    let mut game = GameControl::new(registry, RecordingRenderer::default())
        .with_scene_loader(|_| {
            Err(focus_core::SceneError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "missing.ron",
            )))
        });
    assert!(game.initialize().is_err());
}
