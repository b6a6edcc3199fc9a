//! Frame timing passed to gameplay code

/// Default fixed physics step (60 Hz)
pub const DEFAULT_FIXED_STEP: f32 = 1.0 / 60.0;

/// Timing for the current frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTiming {
    /// Variable time since the previous frame, in seconds
    pub delta_time: f32,
    /// Fixed physics step size, in seconds
    pub fixed_delta_time: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self {
            delta_time: 0.0,
            fixed_delta_time: DEFAULT_FIXED_STEP,
        }
    }
}

impl FrameTiming {
    pub fn new(delta_time: f32, fixed_delta_time: f32) -> Self {
        Self {
            delta_time,
            fixed_delta_time,
        }
    }
}
