//! Level transition fades
//!
//! Two independent timers count down from 1.0 to 0.0. Fade-in runs at the
//! start of every level and pushes its remaining value to the renderer
//! (1 = opaque, 0 = clear). Fade-out starts when a level is won and pushes
//! `1 - remaining`, so the screen goes from clear to opaque before the
//! level switch.

/// Fade-in speed (timer units per second)
pub const FADE_IN_RATE: f32 = 1.0;

/// Fade-out speed (timer units per second); a fade-out takes two seconds
pub const FADE_OUT_RATE: f32 = 0.5;

/// Result of advancing the fade-out timer by one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FadeOutStep {
    /// The timer was inactive and has been armed at 1.0
    Armed,
    /// Still fading; carries the renderer fade value
    Fading(f32),
    /// The timer reached zero; the screen is fully opaque
    Complete,
}

/// Fade-in/fade-out timers
#[derive(Clone, Debug)]
pub struct FadeState {
    fade_in: Option<f32>,
    fade_out: Option<f32>,
    first_frame: bool,
}

impl Default for FadeState {
    fn default() -> Self {
        Self::new()
    }
}

impl FadeState {
    /// Create a state that arms the fade-in on the next level frame
    pub fn new() -> Self {
        Self {
            fade_in: None,
            fade_out: None,
            first_frame: true,
        }
    }

    /// Advance an active fade-in
    ///
    /// Returns the fade value to push to the renderer, or `None` if no
    /// fade-in is running.
    pub fn advance_fade_in(&mut self, dt: f32) -> Option<f32> {
        let remaining = self.fade_in?;
        let next = remaining - dt * FADE_IN_RATE;
        if next <= 0.0 {
            self.fade_in = None;
            Some(0.0)
        } else {
            self.fade_in = Some(next);
            Some(remaining)
        }
    }

    /// Arm the fade-in if this is the first frame of a level
    ///
    /// Returns the fade value to push when armed.
    pub fn begin_level_frame(&mut self) -> Option<f32> {
        if !self.first_frame {
            return None;
        }
        self.first_frame = false;
        self.fade_in = Some(1.0);
        Some(1.0)
    }

    /// Advance the fade-out while the level is won
    pub fn advance_fade_out(&mut self, dt: f32) -> FadeOutStep {
        let Some(remaining) = self.fade_out else {
            self.fade_out = Some(1.0);
            return FadeOutStep::Armed;
        };

        let next = remaining - dt * FADE_OUT_RATE;
        if next <= 0.0 {
            self.fade_out = None;
            self.first_frame = true;
            FadeOutStep::Complete
        } else {
            self.fade_out = Some(next);
            FadeOutStep::Fading(1.0 - next)
        }
    }

    /// Remaining fade-in time, if running
    pub fn fade_in_remaining(&self) -> Option<f32> {
        self.fade_in
    }

    /// Remaining fade-out time, if running
    pub fn fade_out_remaining(&self) -> Option<f32> {
        self.fade_out
    }

    /// Whether the next level frame will arm a fade-in
    pub fn is_first_frame(&self) -> bool {
        self.first_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_first_frame_arms_fade_in_once() {
        let mut fade = FadeState::new();
        assert_eq!(fade.begin_level_frame(), Some(1.0));
        assert_eq!(fade.fade_in_remaining(), Some(1.0));
        assert_eq!(fade.begin_level_frame(), None);
    }

    #[test]
    fn test_fade_in_counts_down_and_clears() {
        let mut fade = FadeState::new();
        fade.begin_level_frame();

        assert_eq!(fade.advance_fade_in(0.25), Some(1.0));
        assert_eq!(fade.advance_fade_in(0.25), Some(0.75));
        assert_eq!(fade.advance_fade_in(0.25), Some(0.5));
        // Reaching zero pushes a fully clear value and stops the timer
        assert_eq!(fade.advance_fade_in(0.25), Some(0.0));
        assert_eq!(fade.fade_in_remaining(), None);
        assert_eq!(fade.advance_fade_in(0.25), None);
    }

    #[test]
    fn test_fade_out_takes_two_seconds() {
        let mut fade = FadeState::new();
        fade.begin_level_frame();

        assert_eq!(fade.advance_fade_out(0.25), FadeOutStep::Armed);
        for frame in 1..8 {
            match fade.advance_fade_out(0.25) {
                FadeOutStep::Fading(v) => assert!((v - frame as f32 * 0.125).abs() < EPSILON),
                other => panic!("frame {}: unexpected {:?}", frame, other),
            }
        }
        assert_eq!(fade.advance_fade_out(0.25), FadeOutStep::Complete);
        assert_eq!(fade.fade_out_remaining(), None);
        assert!(fade.is_first_frame());
    }
}
