//! Boundary to the renderer

use focus_core::Scene;

use crate::logic::LevelLogic;

/// What the orchestrator needs from a renderer
///
/// The renderer may keep work referencing the previous scene in flight for
/// one frame after [`set_scene`](Renderer::set_scene); the orchestrator keeps
/// the old scene alive until the start of the next frame.
pub trait Renderer {
    /// Bind the scene to draw
    fn set_scene(&mut self, scene: &Scene);

    /// Bind the level whose status drives the overlay
    fn set_level_logic(&mut self, logic: &LevelLogic);

    /// Full-screen fade overlay opacity in [0, 1]
    fn set_fade_value(&mut self, value: f32);

    /// How strongly the focus target is being looked at this frame
    fn sample_focus_hit(&mut self, scene: &Scene) -> f64;
}
