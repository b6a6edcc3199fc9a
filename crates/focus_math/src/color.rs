//! Color helpers
//!
//! Hue is expressed in degrees, saturation and value in [0, 1].

use crate::MathError;

/// Convert an HSV triple to linear RGB
pub fn hsv_to_rgb(hsv: [f32; 3]) -> [f32; 3] {
    let [h, s, v] = hsv;
    let h = h.rem_euclid(360.0) / 60.0;
    let chroma = v * s;
    let x = chroma * (1.0 - ((h % 2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = v - chroma;
    [r + m, g + m, b + m]
}

/// Componentwise linear interpolation between two RGB colors
pub fn lerp_rgb(from: [f32; 3], to: [f32; 3], t: f32) -> [f32; 3] {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
    ]
}

/// A color stop on an [`HsvInterpolator`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HsvSample {
    /// Position along the ramp
    pub position: f32,
    /// Hue (degrees), saturation, value
    pub hsv: [f32; 3],
}

impl HsvSample {
    pub fn new(position: f32, hsv: [f32; 3]) -> Self {
        Self { position, hsv }
    }
}

/// Piecewise-linear color ramp interpolated in HSV space
#[derive(Clone, Debug)]
pub struct HsvInterpolator {
    samples: Vec<HsvSample>,
}

impl HsvInterpolator {
    /// Build a ramp from samples in any order
    pub fn new(mut samples: Vec<HsvSample>) -> Result<Self, MathError> {
        if samples.is_empty() {
            return Err(MathError::NoSamples);
        }
        samples.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { samples })
    }

    /// Interpolated HSV at `t`, clamped to the outermost samples
    pub fn sample_hsv(&self, t: f32) -> [f32; 3] {
        let first = self.samples[0];
        let last = self.samples[self.samples.len() - 1];
        if t <= first.position {
            return first.hsv;
        }
        if t >= last.position {
            return last.hsv;
        }

        for pair in self.samples.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.position {
                let span = b.position - a.position;
                let f = if span > 0.0 { (t - a.position) / span } else { 1.0 };
                return lerp_rgb(a.hsv, b.hsv, f);
            }
        }
        last.hsv
    }

    /// Interpolated color at `t` converted to RGB
    pub fn sample(&self, t: f32) -> [f32; 3] {
        hsv_to_rgb(self.sample_hsv(t))
    }
}
