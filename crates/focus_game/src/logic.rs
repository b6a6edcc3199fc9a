//! Level host
//!
//! [`LevelLogic`] wraps a [`LevelVariant`] with the bookkeeping the
//! orchestrator needs: the cached status of the last frame, pausing and
//! enabling.

use focus_core::Scene;
use focus_input::InputSnapshot;

use crate::level::{LevelError, LevelRuntime, LevelVariant};
use crate::status::LevelStatus;

/// A level plus its per-frame gating
pub struct LevelLogic {
    variant: LevelVariant,
    status: LevelStatus,
    paused: bool,
    enabled: bool,
    initialized: bool,
}

impl LevelLogic {
    /// Wrap a level that has not been initialized yet
    pub fn new(variant: LevelVariant) -> Self {
        Self {
            variant,
            status: LevelStatus::Running,
            paused: false,
            enabled: true,
            initialized: false,
        }
    }

    /// Build the level's actors from `scene`
    pub fn initialize(&mut self, scene: &mut Scene) -> Result<(), LevelError> {
        self.variant.behavior_mut().initialize(scene)?;
        self.initialized = true;
        Ok(())
    }

    /// Display name of the wrapped level
    pub fn name(&self) -> &'static str {
        self.variant.behavior().name()
    }

    /// Advance one fixed step unless paused or disabled
    pub fn fixed_update(&mut self, scene: &mut Scene, input: &InputSnapshot, step: f32) -> Result<(), LevelError> {
        if !self.is_active() {
            return Ok(());
        }
        self.variant.behavior_mut().fixed_update(scene, input, step)
    }

    /// Run the frame update unless paused or disabled; returns the cached status
    pub fn update(
        &mut self,
        scene: &mut Scene,
        input: &InputSnapshot,
        dt: f32,
        focus_hit: f64,
    ) -> Result<LevelStatus, LevelError> {
        if self.is_active() {
            let status = self.variant.behavior_mut().update(scene, input, dt, focus_hit)?;
            if status != self.status {
                log::info!("{} is now {}", self.name(), status);
            }
            self.status = status;
        }
        Ok(self.status)
    }

    /// Restore the level's initial state and resume running
    pub fn reset(&mut self, scene: &mut Scene) -> Result<(), LevelError> {
        log::info!("Resetting {}", self.name());
        self.variant.behavior_mut().reset(scene)?;
        self.status = LevelStatus::Running;
        Ok(())
    }

    /// Release the level's physics resources
    pub fn finalize(&mut self) {
        self.variant.behavior_mut().finalize();
        self.initialized = false;
    }

    fn is_active(&self) -> bool {
        self.initialized && self.enabled && !self.paused
    }

    /// Status reported by the last update
    pub fn status(&self) -> LevelStatus {
        self.status
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The wrapped level
    pub fn variant(&self) -> &LevelVariant {
        &self.variant
    }

    /// Shared runtime of the wrapped level
    pub fn runtime(&self) -> Option<&LevelRuntime> {
        self.variant.behavior().runtime()
    }

    /// Shared runtime of the wrapped level
    pub fn runtime_mut(&mut self) -> Option<&mut LevelRuntime> {
        self.variant.behavior_mut().runtime_mut()
    }
}

impl Drop for LevelLogic {
    fn drop(&mut self) {
        if self.initialized {
            self.finalize();
        }
    }
}
