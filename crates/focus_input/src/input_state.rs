//! Keyboard/mouse state accumulation

use std::collections::HashSet;

use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Accumulates window input events between frames
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    cursor_delta: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process keyboard input
    ///
    /// OS key repeat arrives as repeated presses; only the first one counts
    /// as a press edge.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.buttons_down.insert(button);
            }
            ElementState::Released => {
                self.buttons_down.remove(&button);
            }
        }
    }

    /// Process raw mouse movement
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.cursor_delta.0 += delta_x;
        self.cursor_delta.1 += delta_y;
    }

    /// Release everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        for key in self.keys_down.drain() {
            self.keys_released.insert(key);
        }
        self.buttons_down.clear();
        self.cursor_delta = (0.0, 0.0);
    }

    /// Take this frame's snapshot and reset per-frame edges and cursor delta
    pub fn snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            keys_down: self.keys_down.clone(),
            keys_pressed: std::mem::take(&mut self.keys_pressed),
            keys_released: std::mem::take(&mut self.keys_released),
            buttons_down: self.buttons_down.clone(),
            cursor_delta: std::mem::take(&mut self.cursor_delta),
        }
    }
}

/// Immutable input for one frame
#[derive(Clone, Debug, Default)]
pub struct InputSnapshot {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    cursor_delta: (f64, f64),
}

impl InputSnapshot {
    /// An empty snapshot (nothing held, no motion)
    pub fn new() -> Self {
        Self::default()
    }

    /// Key is currently held
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Key went down this frame
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Key went up this frame
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Mouse button is currently held
    pub fn mouse_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Cursor movement since the previous frame
    pub fn cursor_delta(&self) -> (f64, f64) {
        self.cursor_delta
    }

    /// Same snapshot without cursor motion
    pub fn without_cursor_delta(&self) -> Self {
        Self {
            cursor_delta: (0.0, 0.0),
            ..self.clone()
        }
    }

    /// Hold a key
    pub fn with_key_down(mut self, key: KeyCode) -> Self {
        self.keys_down.insert(key);
        self
    }

    /// Press a key this frame
    pub fn with_key_pressed(mut self, key: KeyCode) -> Self {
        self.keys_down.insert(key);
        self.keys_pressed.insert(key);
        self
    }

    /// Release a key this frame
    pub fn with_key_released(mut self, key: KeyCode) -> Self {
        self.keys_down.remove(&key);
        self.keys_released.insert(key);
        self
    }

    /// Hold a mouse button
    pub fn with_mouse_button_down(mut self, button: MouseButton) -> Self {
        self.buttons_down.insert(button);
        self
    }

    /// Set the cursor delta
    pub fn with_cursor_delta(mut self, dx: f64, dy: f64) -> Self {
        self.cursor_delta = (dx, dy);
        self
    }
}
