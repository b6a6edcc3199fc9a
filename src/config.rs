//! Application configuration
//!
//! Later sources win: `config/default.toml`, then the untracked
//! `config/user.toml`, then `FOCUS_SECTION__KEY` environment variables.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use focus_game::LevelConfig;
use focus_physics::{PhysicsMaterial, PlayerConfig as ControllerConfig, PhysicsConfig as WorldConfig};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    /// Mouse look configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Player body and movement
    #[serde(default)]
    pub player: PlayerConfig,
    /// Physics world parameters
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Level sequence and timestep
    #[serde(default)]
    pub game: GameConfig,
    /// Logging and title bar
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load `config/default.toml`, `config/user.toml` and `FOCUS_*` overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Layer the files in `config_dir` under environment overrides
    ///
    /// Missing files are skipped; a missing `default.toml` falls back to
    /// the built-in defaults.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let mut figment = Figment::new();

        for (file, required) in [("default.toml", true), ("user.toml", false)] {
            let path = config_dir.join(file);
            if path.exists() {
                log::debug!("Reading {}", path.display());
                figment = figment.merge(Toml::file(&path));
            } else if required {
                log::warn!("{} not found, using built-in defaults", path.display());
            }
        }

        // FOCUS_PLAYER__FLY=true -> player.fly = true
        let config: Self = figment
            .merge(Env::prefixed("FOCUS_").split("__"))
            .extract()?;
        Ok(config)
    }

    /// Player and physics parameters handed to every level
    pub fn to_level_config(&self) -> LevelConfig {
        let player = ControllerConfig {
            eye_height: self.player.eye_height,
            fly: self.player.fly,
            walk_speed: self.player.walk_speed,
            mouse_sensitivity: self.input.mouse_sensitivity,
            vertical_sensitivity: self.input.vertical_sensitivity,
        };
        let physics = WorldConfig::new(self.physics.gravity)
            .with_material(PhysicsMaterial::new(self.physics.friction, self.physics.restitution));
        LevelConfig { player, physics }
    }
}

/// Window size and title
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical pixels
    pub width: u32,
    pub height: u32,
    /// Borderless fullscreen on the current monitor
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Focus".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Mouse look
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Horizontal look, radians per pixel
    pub mouse_sensitivity: f32,
    /// Vertical look, radians per pixel
    pub vertical_sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        let player = ControllerConfig::default();
        Self {
            mouse_sensitivity: player.mouse_sensitivity,
            vertical_sensitivity: player.vertical_sensitivity,
        }
    }
}

/// Player body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Eye height above the feet
    pub eye_height: f32,
    /// Free flight without gravity
    pub fly: bool,
    /// Displacement per fixed step
    pub walk_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let player = ControllerConfig::default();
        Self {
            eye_height: player.eye_height,
            fly: player.fly,
            walk_speed: player.walk_speed,
        }
    }
}

/// Physics world
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration, negative pulls down
    pub gravity: f32,
    /// Friction of every collider
    pub friction: f32,
    /// Restitution of every collider
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            gravity: world.gravity,
            friction: world.material.friction,
            restitution: world.material.restitution,
        }
    }
}

/// Game loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Directory holding `level1.ron` .. `level4.ron`
    pub level_dir: PathBuf,
    /// Fixed physics step in seconds
    pub fixed_timestep: f32,
    /// Upper bound on fixed steps run in one frame
    pub max_steps_per_frame: u32,
    /// Horizontal field of view used to estimate focus on the target
    pub fov_degrees: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level_dir: PathBuf::from("assets/levels"),
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 8,
            fov_degrees: 60.0,
        }
    }
}

/// Diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Default `env_logger` filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Show position and score in the window title
    pub show_title_stats: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_title_stats: true,
        }
    }
}

/// A source could not be parsed or did not match the expected shape
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError(Box::new(e))
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}
