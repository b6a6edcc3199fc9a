//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use focus::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("FOCUS_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("FOCUS_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_env_override_reaches_level_config() {
    std::env::set_var("FOCUS_PLAYER__FLY", "true");
    std::env::set_var("FOCUS_PHYSICS__FRICTION", "0.25");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("FOCUS_PLAYER__FLY");
    std::env::remove_var("FOCUS_PHYSICS__FRICTION");

    let level = config.to_level_config();
    assert!(level.player.fly);
    assert_eq!(level.physics.material.friction, 0.25);
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("FOCUS_WINDOW__TITLE");

    let config = AppConfig::load().unwrap();
    assert_eq!(config.game.level_dir, std::path::PathBuf::from("assets/levels"));
    assert_eq!(config.game.max_steps_per_frame, 8);
}

#[test]
#[serial]
fn test_missing_config_dir_uses_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.window.title, "Focus");
    assert_eq!(config.player.eye_height, 1.5);
}
