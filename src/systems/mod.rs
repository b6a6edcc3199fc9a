//! Application systems
//!
//! The pieces the binary wires together: the fixed-step simulation loop,
//! the window and a headless renderer.

mod render;
mod simulation;
mod window;

pub use render::HeadlessRenderer;
pub use simulation::{SimulationSystem, MAX_FRAME_TIME};
pub use window::{WindowError, WindowSystem};
