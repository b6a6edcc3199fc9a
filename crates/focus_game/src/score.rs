//! Focus score
//!
//! The score grows while the renderer reports the focus target as seen and
//! decays otherwise. It also drives the background color of the level.

use focus_math::{lerp_rgb, HsvInterpolator};

/// Per-level scoring constants
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreRules {
    /// Focus samples with a magnitude below this count as "not seen"
    pub epsilon: f64,
    /// Decay per second while not seen
    pub decay_rate: f64,
    /// Growth per second while seen
    pub growth_rate: f64,
    /// Upper bound of the integrated score
    pub cap: f64,
    /// Score needed to win on the final region
    pub win_threshold: f64,
    /// Scores above this only occur after a win
    pub ceiling: f64,
    /// Value written on a win
    pub sentinel: f64,
}

impl ScoreRules {
    /// Rules with the shared growth, cap and win constants
    pub const fn new(epsilon: f64, decay_rate: f64) -> Self {
        Self {
            epsilon,
            decay_rate,
            growth_rate: 0.1,
            cap: 1.0,
            win_threshold: 0.99,
            ceiling: 2.0,
            sentinel: 100.0,
        }
    }
}

/// Integrated focus score
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Score {
    value: f64,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Overwrite the score
    pub fn set(&mut self, value: f64) {
        self.value = value;
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    /// Advance by one frame of `dt` seconds given the renderer's focus sample
    pub fn integrate(&mut self, rules: &ScoreRules, dt: f32, focus_hit: f64) {
        let dt = f64::from(dt);
        self.value = if focus_hit.abs() < rules.epsilon {
            (self.value - rules.decay_rate * dt).max(0.0)
        } else {
            (self.value + rules.growth_rate * dt).min(rules.cap)
        };
    }

    /// Score clamped to [0, 1] for color blending
    pub fn blend_factor(&self) -> f32 {
        self.value.clamp(0.0, 1.0) as f32
    }

    /// Whether a win has already been recorded
    pub fn exceeds_ceiling(&self, rules: &ScoreRules) -> bool {
        self.value > rules.ceiling
    }

    /// Whether the score is high enough to win
    pub fn reached_cap(&self, rules: &ScoreRules) -> bool {
        self.value >= rules.win_threshold
    }

    /// Record a win
    pub fn set_sentinel(&mut self, rules: &ScoreRules) {
        self.value = rules.sentinel;
    }
}

/// Maps the score to a background color
#[derive(Clone, Debug)]
pub enum BackgroundBlend {
    /// Interpolate in HSV between the samples
    Hsv(HsvInterpolator),
    /// Interpolate in RGB between two colors
    Rgb { neutral: [f32; 3], focused: [f32; 3] },
}

impl BackgroundBlend {
    /// Background color for a blend factor in [0, 1]
    pub fn color(&self, t: f32) -> [f32; 3] {
        let t = t.clamp(0.0, 1.0);
        match self {
            BackgroundBlend::Hsv(interpolator) => interpolator.sample(t),
            BackgroundBlend::Rgb { neutral, focused } => lerp_rgb(*neutral, *focused, t),
        }
    }
}
