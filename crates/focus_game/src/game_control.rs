//! Level-switching orchestrator
//!
//! [`GameControl`] owns the active scene and level, drives them every frame,
//! fades between levels and switches to the next level once the current one
//! is won. A replaced scene and level are parked for one frame before they
//! are dropped so the renderer can finish work that still references them.

use std::path::Path;

use focus_core::{FadeOutStep, FadeState, Scene, SceneError};
use focus_input::{FrameTiming, InputSnapshot, KeyCode};

use crate::active_set::{ActiveElement, ActiveSet};
use crate::level::{LevelConfig, LevelError};
use crate::logic::LevelLogic;
use crate::registry::LevelRegistry;
use crate::renderer::Renderer;
use crate::status::LevelStatus;

/// Key that quits the game
pub const QUIT_KEY: KeyCode = KeyCode::Escape;
/// Key that toggles pause
pub const PAUSE_KEY: KeyCode = KeyCode::Tab;

/// Loads the scene for a level
pub type SceneLoader = Box<dyn Fn(&Path) -> Result<Scene, SceneError>>;

/// Errors raised by the orchestrator
#[derive(Debug)]
pub enum GameError {
    /// A level scene could not be loaded
    Scene {
        level: String,
        source: SceneError,
    },
    /// A level could not be built or stepped
    Level(LevelError),
    /// The registry has no level at this index
    UnknownLevel(usize),
    /// Used before `initialize`
    NotInitialized,
}

impl From<LevelError> for GameError {
    fn from(e: LevelError) -> Self {
        GameError::Level(e)
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Scene { level, source } => write!(f, "Failed to load scene for {}: {}", level, source),
            GameError::Level(e) => write!(f, "{}", e),
            GameError::UnknownLevel(index) => write!(f, "No level registered at index {}", index),
            GameError::NotInitialized => write!(f, "Game used before initialization"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Scene { source, .. } => Some(source),
            GameError::Level(e) => Some(e),
            _ => None,
        }
    }
}

/// A scene and the level playing in it
///
/// The level is declared first so its physics is released before the scene.
pub struct LoadedLevel {
    pub logic: LevelLogic,
    pub scene: Scene,
}

impl LoadedLevel {
    fn scene_element(&self) -> ActiveElement {
        ActiveElement::Scene(self.scene.name().to_string())
    }

    fn level_element(&self) -> ActiveElement {
        ActiveElement::Level(self.logic.name().to_string())
    }
}

/// Drives the level sequence
pub struct GameControl<R: Renderer> {
    registry: LevelRegistry,
    loader: SceneLoader,
    level_config: LevelConfig,
    renderer: R,
    level_index: usize,
    current: Option<LoadedLevel>,
    /// Replaced level kept alive until the start of the next frame
    pending: Option<LoadedLevel>,
    active: ActiveSet,
    fade: FadeState,
}

impl<R: Renderer> GameControl<R> {
    /// Create an orchestrator; call [`initialize`](Self::initialize) before use
    pub fn new(registry: LevelRegistry, renderer: R) -> Self {
        Self {
            registry,
            loader: Box::new(|path: &Path| Scene::load(path)),
            level_config: LevelConfig::default(),
            renderer,
            level_index: 0,
            current: None,
            pending: None,
            active: ActiveSet::new(),
            fade: FadeState::new(),
        }
    }

    /// Replace the scene loader (defaults to reading RON files)
    pub fn with_scene_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn(&Path) -> Result<Scene, SceneError> + 'static,
    {
        self.loader = Box::new(loader);
        self
    }

    /// Player and physics parameters for every level
    pub fn with_level_config(mut self, config: LevelConfig) -> Self {
        self.level_config = config;
        self
    }

    /// Load the first level and bind it to the renderer
    pub fn initialize(&mut self) -> Result<(), GameError> {
        let loaded = self.load_level(0)?;
        self.bind(loaded, 0);
        Ok(())
    }

    fn load_level(&self, index: usize) -> Result<LoadedLevel, GameError> {
        let entry = self.registry.get(index).ok_or(GameError::UnknownLevel(index))?;
        let mut scene = (self.loader)(&entry.scene_path).map_err(|source| GameError::Scene {
            level: entry.name.clone(),
            source,
        })?;

        let mut logic = LevelLogic::new((entry.build)(&self.level_config));
        logic.initialize(&mut scene)?;
        log::info!("Loaded {} from {}", entry.name, entry.scene_path.display());

        Ok(LoadedLevel { logic, scene })
    }

    fn bind(&mut self, loaded: LoadedLevel, index: usize) {
        self.renderer.set_scene(&loaded.scene);
        self.renderer.set_level_logic(&loaded.logic);
        self.active.add(loaded.scene_element());
        self.active.add(loaded.level_element());
        self.current = Some(loaded);
        self.level_index = index;
    }

    /// Advance the current level by one fixed step
    pub fn fixed_update(&mut self, input: &InputSnapshot, step: f32) -> Result<(), GameError> {
        let level = self.current.as_mut().ok_or(GameError::NotInitialized)?;
        level.logic.fixed_update(&mut level.scene, input, step)?;
        Ok(())
    }

    /// Per-frame update: teardown, quit/pause, level update, fades and switching
    pub fn update(&mut self, input: &InputSnapshot, timing: &FrameTiming) -> Result<(), GameError> {
        if let Some(old) = self.pending.take() {
            log::debug!("Dropping previous level {}", old.logic.name());
        }

        let dt = timing.delta_time;
        let level = self.current.as_mut().ok_or(GameError::NotInitialized)?;

        if input.key_pressed(QUIT_KEY) {
            log::info!("Quit requested");
            self.active.stop();
        }
        if input.key_pressed(PAUSE_KEY) {
            let paused = !level.logic.is_paused();
            level.logic.set_paused(paused);
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }

        let status = if level.logic.status().is_won() {
            LevelStatus::Won
        } else {
            let focus_hit = self.renderer.sample_focus_hit(&level.scene);
            level.logic.update(&mut level.scene, input, dt, focus_hit)?
        };

        if let Some(value) = self.fade.advance_fade_in(dt) {
            self.renderer.set_fade_value(value);
        }
        if let Some(value) = self.fade.begin_level_frame() {
            self.renderer.set_fade_value(value);
        }

        match status {
            LevelStatus::Won => match self.fade.advance_fade_out(dt) {
                FadeOutStep::Armed => log::debug!("Fade-out started"),
                FadeOutStep::Fading(value) => self.renderer.set_fade_value(value),
                FadeOutStep::Complete => {
                    self.next_level()?;
                    self.renderer.set_fade_value(1.0);
                }
            },
            LevelStatus::Lost => level.logic.reset(&mut level.scene)?,
            LevelStatus::Running => {}
        }
        Ok(())
    }

    fn next_level(&mut self) -> Result<(), GameError> {
        let next = self.level_index + 1;
        if next >= self.registry.len() {
            log::info!("Last level completed");
            self.active.stop();
            return Ok(());
        }
        self.switch_level(next)
    }

    /// Park the current level and bind the level at `index`
    pub fn switch_level(&mut self, index: usize) -> Result<(), GameError> {
        if let Some(mut old) = self.current.take() {
            self.active.remove(&old.scene_element());
            self.active.remove(&old.level_element());
            old.scene.set_enabled(false);
            old.logic.set_enabled(false);
            self.pending = Some(old);
        }

        let loaded = self.load_level(index)?;
        self.bind(loaded, index);
        Ok(())
    }

    /// Whether the game should exit
    pub fn is_stopped(&self) -> bool {
        self.active.is_stopped()
    }

    /// Whether the current level is paused
    pub fn is_paused(&self) -> bool {
        self.current.as_ref().is_some_and(|l| l.logic.is_paused())
    }

    /// Index of the current level in the registry
    pub fn level_index(&self) -> usize {
        self.level_index
    }

    /// Whether a replaced level is waiting to be dropped
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current(&self) -> Option<&LoadedLevel> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut LoadedLevel> {
        self.current.as_mut()
    }

    pub fn active_set(&self) -> &ActiveSet {
        &self.active
    }

    pub fn fade(&self) -> &FadeState {
        &self.fade
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
