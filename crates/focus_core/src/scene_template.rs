//! Scene serialization
//!
//! Provides [`SceneTemplate`] for loading/saving level scenes from RON files.
//! A template lists named models as unit primitives placed by translation,
//! axis-angle rotation and per-axis scale.

use std::fs;
use std::path::Path;

use focus_math::{Isometry3, Mat4, Quat, Translation3, Vec3};
use serde::{Deserialize, Serialize};

use crate::material::Material;
use crate::model::SceneModel;
use crate::scene::SceneError;

/// A serializable scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneTemplate {
    /// Scene name (for display/debugging)
    pub name: String,
    /// Starting camera pose
    #[serde(default)]
    pub camera: CameraTemplate,
    /// Initial background color as RGBA
    #[serde(default = "default_background")]
    pub background_color: [f32; 4],
    /// Material table; models refer to entries by index
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Model templates in this scene
    pub models: Vec<ModelTemplate>,
}

fn default_background() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl SceneTemplate {
    /// Create a new empty scene template
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            camera: CameraTemplate::default(),
            background_color: default_background(),
            materials: Vec::new(),
            models: Vec::new(),
        }
    }

    /// Load a scene template from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path)?;
        let template = ron::from_str(&contents)?;
        Ok(template)
    }

    /// Save a scene template to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Add a model template
    pub fn with_model(mut self, model: ModelTemplate) -> Self {
        self.models.push(model);
        self
    }

    /// Add a material
    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }
}

/// Serializable starting camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraTemplate {
    /// Eye position
    pub position: [f32; 3],
    /// Initial view direction (need not be normalized)
    pub look_direction: [f32; 3],
}

impl Default for CameraTemplate {
    fn default() -> Self {
        Self {
            position: [0.0, 1.5, 0.0],
            look_direction: [0.0, 0.0, -1.0],
        }
    }
}

/// Serializable model placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTemplate {
    /// Model name, unique within the scene
    pub name: String,
    /// Material index
    #[serde(default)]
    pub material: usize,
    /// Translation
    #[serde(default)]
    pub translation: [f32; 3],
    /// Rotation axis scaled by the angle in degrees: `(0, 90, 0)` is a
    /// quarter turn about +Y
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Per-axis scale of the unit primitive
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Drives the focus score
    #[serde(default)]
    pub focus_target: bool,
    /// Rendered with the leaf shader
    #[serde(default)]
    pub leaf: bool,
    /// Rendered as non-opaque
    #[serde(default)]
    pub transparent: bool,
}

impl ModelTemplate {
    /// Create a unit model at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: 0,
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
            focus_target: false,
            leaf: false,
            transparent: false,
        }
    }

    /// Set the translation
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = [x, y, z];
        self
    }

    /// Set the per-axis scale
    pub fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = [x, y, z];
        self
    }

    /// Set the axis-angle rotation in degrees
    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = [x, y, z];
        self
    }

    /// Model transform described by this template
    pub fn transform(&self) -> Mat4 {
        let rotation = Quat::from_scaled_axis(Vec3::from(self.rotation.map(f32::to_radians)));
        let [tx, ty, tz] = self.translation;
        let pose = Isometry3::from_parts(Translation3::new(tx, ty, tz), rotation);
        pose.to_homogeneous() * Mat4::new_nonuniform_scaling(&Vec3::from(self.scale))
    }

    /// Instantiate the runtime model
    pub fn to_model(&self) -> SceneModel {
        SceneModel {
            name: self.name.clone(),
            transform: self.transform(),
            material_index: self.material,
            is_focus_target: self.focus_target,
            is_selected_mirror: false,
            is_leaf: self.leaf,
            transparent: self.transparent,
        }
    }
}
