//! Input handling for Focus
//!
//! Window events are accumulated into an [`InputState`]; once per frame the
//! host takes an immutable [`InputSnapshot`] and hands it to gameplay code
//! together with a [`FrameTiming`].
//!
//! Controls:
//! - W/S: Forward/backward
//! - A/D: Left/right strafe
//! - E/Q: Up/down (fly mode only)
//! - Space: Jump
//! - Left mouse button + drag: Rotate a mirror
//! - Tab: Pause, Escape: Quit, F10: Skip level

mod input_state;
mod timing;

pub use input_state::{InputSnapshot, InputState};
pub use timing::FrameTiming;

pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
