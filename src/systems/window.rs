//! Window and cursor
//!
//! The cursor is hidden and grabbed while a level is playing and handed back
//! to the desktop while the game is paused. The title shows the current
//! level and how well the target is held in focus.

use std::sync::Arc;

use winit::dpi::LogicalSize;
use winit::error::ExternalError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorGrabMode, Fullscreen, Window};

use crate::config::WindowConfig;

/// The game window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
    /// Pause state the cursor was last synced to
    synced_pause: Option<bool>,
    cursor_grabbed: bool,
}

impl WindowSystem {
    /// Open a window as described by `config`
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, WindowError> {
        let fullscreen = config.fullscreen.then_some(Fullscreen::Borderless(None));
        let attributes = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_fullscreen(fullscreen);

        let window = event_loop
            .create_window(attributes)
            .map_err(|e| WindowError::CreationFailed(e.to_string()))?;
        log::info!("Opened {}x{} window", config.width, config.height);

        Ok(Self {
            window: Arc::new(window),
            base_title: config.title.clone(),
            synced_pause: None,
            cursor_grabbed: false,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Whether mouse look currently owns the cursor
    pub fn is_cursor_grabbed(&self) -> bool {
        self.cursor_grabbed
    }

    /// Grab the cursor while playing and release it while paused
    ///
    /// Only acts when the pause state changed since the last call.
    pub fn sync_cursor(&mut self, paused: bool) {
        if self.synced_pause == Some(paused) {
            return;
        }
        self.synced_pause = Some(paused);

        if paused {
            self.release_cursor();
            return;
        }
        match self.grab_cursor() {
            Ok(mode) => log::debug!("Cursor grabbed ({:?})", mode),
            Err(e) => log::warn!("Could not grab cursor: {}", e),
        }
    }

    /// Lock the cursor, falling back to confining it to the window
    fn grab_cursor(&mut self) -> Result<CursorGrabMode, ExternalError> {
        let mode = match self.window.set_cursor_grab(CursorGrabMode::Locked) {
            Ok(()) => CursorGrabMode::Locked,
            Err(_) => {
                self.window.set_cursor_grab(CursorGrabMode::Confined)?;
                CursorGrabMode::Confined
            }
        };
        self.window.set_cursor_visible(false);
        self.cursor_grabbed = true;
        Ok(mode)
    }

    fn release_cursor(&mut self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("Could not release cursor: {}", e);
        }
        self.window.set_cursor_visible(true);
        self.cursor_grabbed = false;
    }

    /// Show the level name and focus score in the title bar
    pub fn update_title(&self, level: &str, score: f64, paused: bool) {
        self.window.set_title(&format_title(&self.base_title, level, score, paused));
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn format_title(base: &str, level: &str, score: f64, paused: bool) -> String {
    if paused {
        format!("{} - {} [paused, Tab to resume]", base, level)
    } else {
        format!("{} - {} - focus {:.0}%", base, level, score.clamp(0.0, 1.0) * 100.0)
    }
}

/// Window system failures
#[derive(Debug)]
pub enum WindowError {
    /// The platform refused to open a window
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_formatting_playing() {
        let title = format_title("Focus", "Level 2", 0.456, false);
        assert_eq!(title, "Focus - Level 2 - focus 46%");
    }

    #[test]
    fn test_title_formatting_paused() {
        let title = format_title("Focus", "Level 1", 0.5, true);
        assert!(title.contains("Tab to resume"));
    }

    #[test]
    fn test_title_clamps_victory_score() {
        let title = format_title("Focus", "Level 4", 100.0, false);
        assert!(title.ends_with("focus 100%"));
    }
}
