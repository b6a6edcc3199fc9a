//! Material records
//!
//! Only the values gameplay code touches are modeled; the renderer owns the rest.

use serde::{Deserialize, Serialize};

/// Reflectivity values for one material slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name (for debugging)
    #[serde(default)]
    pub name: String,
    /// Diffuse reflectivity as RGBA
    pub diffuse_reflectivity: [f32; 4],
    /// Ambient reflectivity as RGBA
    pub ambient_reflectivity: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_reflectivity: [0.8, 0.8, 0.8, 1.0],
            ambient_reflectivity: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

impl Material {
    /// Fully white diffuse reflectivity
    pub const FULLY_REFLECTIVE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Create a named material with the given diffuse color
    pub fn new(name: impl Into<String>, diffuse: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            diffuse_reflectivity: diffuse,
            ..Default::default()
        }
    }

    /// Multiply every diffuse component by `factor`
    pub fn scale_diffuse(&mut self, factor: f32) {
        for c in &mut self.diffuse_reflectivity {
            *c *= factor;
        }
    }

    /// Set all ambient components to `value`
    pub fn set_uniform_ambient(&mut self, value: f32) {
        self.ambient_reflectivity = [value; 4];
    }
}
