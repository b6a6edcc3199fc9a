//! Headless renderer
//!
//! Implements the orchestrator's [`Renderer`] seam without a GPU. The focus
//! hit is estimated from the angle between the view direction and the focus
//! target: full focus when looking straight at it, falling to zero at the
//! edge of the field of view.

use focus_core::Scene;
use focus_game::{LevelLogic, Renderer};
use focus_math::Vec3;

/// Renderer that tracks what it was given and estimates focus geometrically
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    half_fov: f32,
    scene_name: Option<String>,
    level_name: Option<String>,
    fade_value: f32,
    last_focus_hit: f64,
}

impl HeadlessRenderer {
    /// Create a renderer with the given horizontal field of view
    pub fn new(fov_degrees: f32) -> Self {
        Self {
            half_fov: fov_degrees.to_radians() * 0.5,
            scene_name: None,
            level_name: None,
            fade_value: 0.0,
            last_focus_hit: 0.0,
        }
    }

    pub fn scene_name(&self) -> Option<&str> {
        self.scene_name.as_deref()
    }

    pub fn level_name(&self) -> Option<&str> {
        self.level_name.as_deref()
    }

    /// Last fade value pushed by the orchestrator (1 = opaque)
    pub fn fade_value(&self) -> f32 {
        self.fade_value
    }

    pub fn last_focus_hit(&self) -> f64 {
        self.last_focus_hit
    }

    fn estimate(&self, scene: &Scene) -> f64 {
        let Some((_, target)) = scene.models().find(|(_, m)| m.is_focus_target) else {
            return 0.0;
        };
        let camera = scene.camera();
        let to_target: Vec3 = target.translation() - camera.translation;
        let distance = to_target.norm();
        if distance <= f32::EPSILON {
            return 1.0;
        }

        let cos = (camera.forward().dot(&to_target) / distance).clamp(-1.0, 1.0);
        let angle = cos.acos();
        if angle >= self.half_fov {
            0.0
        } else {
            f64::from(1.0 - angle / self.half_fov)
        }
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl Renderer for HeadlessRenderer {
    fn set_scene(&mut self, scene: &Scene) {
        log::debug!("Rendering scene '{}'", scene.name());
        self.scene_name = Some(scene.name().to_string());
    }

    fn set_level_logic(&mut self, logic: &LevelLogic) {
        self.level_name = Some(logic.name().to_string());
    }

    fn set_fade_value(&mut self, value: f32) {
        self.fade_value = value;
    }

    fn sample_focus_hit(&mut self, scene: &Scene) -> f64 {
        self.last_focus_hit = self.estimate(scene);
        self.last_focus_hit
    }
}
