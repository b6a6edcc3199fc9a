//! Runtime scene
//!
//! A [`Scene`] owns every model of a loaded level in a slotmap arena and
//! indexes them by name. Gameplay code resolves the names it needs once at
//! level start; a missing name is a content-authoring error.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use focus_math::{rotation_vector, ScaledPose, Vec3};
use slotmap::SlotMap;

use crate::camera::Camera;
use crate::material::Material;
use crate::model::{ModelKey, SceneModel};
use crate::scene_template::{CameraTemplate, ModelTemplate, SceneTemplate};
use crate::scene_validator::{SceneValidator, ValidationError};

/// A loaded level scene
pub struct Scene {
    name: String,
    models: SlotMap<ModelKey, SceneModel>,
    names: HashMap<String, ModelKey>,
    materials: Vec<Material>,
    materials_dirty: bool,
    camera: Camera,
    background_color: [f32; 4],
    character_position: Option<Vec3>,
    enabled: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: SlotMap::with_key(),
            names: HashMap::new(),
            materials: Vec::new(),
            materials_dirty: false,
            camera: Camera::default(),
            background_color: [0.0, 0.0, 0.0, 1.0],
            character_position: None,
            enabled: true,
        }
    }

    /// Build a scene from a validated template
    pub fn from_template(template: &SceneTemplate) -> Result<Self, SceneError> {
        SceneValidator::validate_or_error(template).map_err(SceneError::Invalid)?;

        let mut scene = Scene::new(template.name.clone());
        scene.materials = template.materials.clone();
        scene.background_color = template.background_color;
        scene.camera = Camera::looking_along(
            Vec3::from(template.camera.position),
            Vec3::from(template.camera.look_direction),
        );
        for model in &template.models {
            scene.add_model(model.to_model())?;
        }

        log::info!(
            "Built scene '{}' with {} models and {} materials",
            scene.name,
            scene.models.len(),
            scene.materials.len()
        );
        Ok(scene)
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        log::info!("Loading scene from {}", path.display());
        let template = SceneTemplate::load(path)?;
        Self::from_template(&template)
    }

    /// Describe the current models, materials and camera as a template
    pub fn to_template(&self) -> Result<SceneTemplate, SceneError> {
        let mut template = SceneTemplate::new(self.name.clone());
        template.background_color = self.background_color;
        template.materials = self.materials.clone();
        template.camera = CameraTemplate {
            position: self.camera.translation.into(),
            look_direction: self.camera.forward().into(),
        };

        for (_, model) in self.models() {
            let scaled = ScaledPose::from_matrix(&model.transform)
                .map_err(|_| SceneError::DegenerateModel(model.name.clone()))?;
            template.models.push(ModelTemplate {
                name: model.name.clone(),
                material: model.material_index,
                translation: scaled.pose.translation.vector.into(),
                rotation: rotation_vector(&scaled.pose.rotation).map(f32::to_degrees).into(),
                scale: scaled.extents.into(),
                focus_target: model.is_focus_target,
                leaf: model.is_leaf,
                transparent: model.transparent,
            });
        }
        Ok(template)
    }

    /// Write the scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let path = path.as_ref();
        log::info!("Saving scene '{}' to {}", self.name, path.display());
        self.to_template()?.save(path)
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a model; names must be unique
    pub fn add_model(&mut self, model: SceneModel) -> Result<ModelKey, SceneError> {
        if self.names.contains_key(&model.name) {
            return Err(SceneError::DuplicateModel(model.name));
        }
        let name = model.name.clone();
        let key = self.models.insert(model);
        self.names.insert(name, key);
        Ok(key)
    }

    /// Append a material and return its index
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Look up a model key by name
    pub fn model_key(&self, name: &str) -> Result<ModelKey, SceneError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::ModelNotFound(name.to_string()))
    }

    /// Look up a model by name
    pub fn model_by_name(&self, name: &str) -> Result<&SceneModel, SceneError> {
        let key = self.model_key(name)?;
        self.models
            .get(key)
            .ok_or_else(|| SceneError::ModelNotFound(name.to_string()))
    }

    /// Get a model by key
    pub fn model(&self, key: ModelKey) -> Option<&SceneModel> {
        self.models.get(key)
    }

    /// Get a mutable model by key
    pub fn model_mut(&mut self, key: ModelKey) -> Option<&mut SceneModel> {
        self.models.get_mut(key)
    }

    /// Iterate over all models with their keys
    pub fn models(&self) -> impl Iterator<Item = (ModelKey, &SceneModel)> {
        self.models.iter()
    }

    /// Number of models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Get a material by index
    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    /// Get a mutable material; marks the material table for re-upload
    pub fn material_mut(&mut self, index: usize) -> Result<&mut Material, SceneError> {
        let material = self
            .materials
            .get_mut(index)
            .ok_or(SceneError::MaterialNotFound(index))?;
        self.materials_dirty = true;
        Ok(material)
    }

    /// All materials
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Returns whether materials changed since the last call, clearing the flag
    pub fn take_materials_dirty(&mut self) -> bool {
        std::mem::take(&mut self.materials_dirty)
    }

    /// The camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Current background color as RGBA
    pub fn background_color(&self) -> [f32; 4] {
        self.background_color
    }

    /// Set the background color
    pub fn set_background_color(&mut self, rgba: [f32; 4]) {
        self.background_color = rgba;
    }

    /// Set the background color from RGB with full alpha
    pub fn set_background_rgb(&mut self, rgb: [f32; 3]) {
        self.background_color = [rgb[0], rgb[1], rgb[2], 1.0];
    }

    /// Position of the player character, if published this level
    pub fn character_position(&self) -> Option<Vec3> {
        self.character_position
    }

    /// Publish the player character position
    pub fn set_character_position(&mut self, position: Vec3) {
        self.character_position = Some(position);
    }

    /// Whether the scene takes part in per-frame updates
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the scene
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Unified error type for scene operations
#[derive(Debug)]
pub enum SceneError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Serialization error
    Serialize(ron::Error),
    /// Template failed validation
    Invalid(Vec<ValidationError>),
    /// A model with this name already exists
    DuplicateModel(String),
    /// A model the level needs is absent from the scene
    ModelNotFound(String),
    /// A material index is out of range
    MaterialNotFound(usize),
    /// A model transform has a zero-length axis
    DegenerateModel(String),
}

impl From<io::Error> for SceneError {
    fn from(e: io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::Parse(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::Serialize(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneError::Serialize(e) => write!(f, "Serialize error: {}", e),
            SceneError::Invalid(errors) => {
                write!(f, "Invalid scene:")?;
                for error in errors {
                    write!(f, " {};", error)?;
                }
                Ok(())
            }
            SceneError::DuplicateModel(name) => write!(f, "Duplicate model: {}", name),
            SceneError::ModelNotFound(name) => write!(f, "Model not found: {}", name),
            SceneError::MaterialNotFound(index) => write!(f, "Material not found: {}", index),
            SceneError::DegenerateModel(name) => write!(f, "Model has a degenerate transform: {}", name),
        }
    }
}

impl std::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_template::ModelTemplate;

    fn sample_template() -> SceneTemplate {
        let mut sphere = ModelTemplate::new("Sphere").at(0.0, 3.0, -10.0);
        sphere.focus_target = true;
        sphere.material = 1;
        SceneTemplate::new("sample")
            .with_material(Material::default())
            .with_material(Material::new("sphere", [0.2, 0.2, 0.2, 1.0]))
            .with_model(ModelTemplate::new("Floor1").scaled(5.0, 0.5, 5.0))
            .with_model(sphere)
    }

    #[test]
    fn test_from_template() {
        let scene = Scene::from_template(&sample_template()).unwrap();
        assert_eq!(scene.name(), "sample");
        assert_eq!(scene.model_count(), 2);
        assert_eq!(scene.materials().len(), 2);
        let sphere = scene.model_by_name("Sphere").unwrap();
        assert!(sphere.is_focus_target);
        assert_eq!(sphere.material_index, 1);
    }

    #[test]
    fn test_missing_model_is_error() {
        let scene = Scene::from_template(&sample_template()).unwrap();
        match scene.model_key("Cube.015") {
            Err(SceneError::ModelNotFound(name)) => assert_eq!(name, "Cube.015"),
            other => panic!("expected ModelNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_template_rejected() {
        let template = SceneTemplate::new("bad")
            .with_model(ModelTemplate::new("A"))
            .with_model(ModelTemplate::new("A"));
        assert!(matches!(Scene::from_template(&template), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_add_model() {
        let mut scene = Scene::new("s");
        scene.add_model(SceneModel::new("A")).unwrap();
        assert!(matches!(
            scene.add_model(SceneModel::new("A")),
            Err(SceneError::DuplicateModel(_))
        ));
    }

    #[test]
    fn test_material_mut_marks_dirty() {
        let mut scene = Scene::from_template(&sample_template()).unwrap();
        assert!(!scene.take_materials_dirty());
        scene.material_mut(1).unwrap().diffuse_reflectivity = Material::FULLY_REFLECTIVE;
        assert!(scene.take_materials_dirty());
        assert!(!scene.take_materials_dirty());
        assert_eq!(scene.material(1).unwrap().diffuse_reflectivity, [1.0; 4]);
    }

    #[test]
    fn test_material_out_of_range() {
        let mut scene = Scene::new("s");
        assert!(matches!(scene.material_mut(0), Err(SceneError::MaterialNotFound(0))));
    }

    #[test]
    fn test_background_rgb_sets_alpha() {
        let mut scene = Scene::new("s");
        scene.set_background_rgb([0.2, 0.4, 0.6]);
        assert_eq!(scene.background_color(), [0.2, 0.4, 0.6, 1.0]);
    }

    #[test]
    fn test_character_position() {
        let mut scene = Scene::new("s");
        assert!(scene.character_position().is_none());
        scene.set_character_position(Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(scene.character_position(), Some(Vec3::new(1.0, 0.0, 2.0)));
    }

    #[test]
    fn test_camera_from_template() {
        let scene = Scene::from_template(&sample_template()).unwrap();
        assert!((scene.camera().translation - Vec3::new(0.0, 1.5, 0.0)).norm() < 1e-6);
        assert!((scene.camera().forward() - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_to_template_reproduces_transforms() {
        let mut template = sample_template();
        template.models.push(ModelTemplate::new("Wall1").at(4.0, 2.0, 0.0).scaled(4.0, 2.0, 1.0).rotated(0.0, 90.0, 0.0));
        let scene = Scene::from_template(&template).unwrap();

        let saved = scene.to_template().unwrap();
        assert_eq!(saved.models.len(), 3);
        for model in &saved.models {
            let original = scene.model_by_name(&model.name).unwrap();
            assert!((model.transform() - original.transform).norm() < 1e-4, "{} moved", model.name);
        }
        let sphere = saved.models.iter().find(|m| m.name == "Sphere").unwrap();
        assert!(sphere.focus_target);
        assert_eq!(sphere.material, 1);
        assert_eq!(saved.materials.len(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let scene = Scene::from_template(&sample_template()).unwrap();
        let path = std::env::temp_dir().join(format!("focus_scene_{}.ron", std::process::id()));
        scene.save(&path).unwrap();

        let loaded = Scene::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.name(), "sample");
        assert_eq!(loaded.model_count(), 2);
        assert!((loaded.camera().forward() - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_degenerate_model_not_saved() {
        let mut scene = Scene::new("flat");
        scene
            .add_model(SceneModel::new("Flat").with_transform(focus_math::Mat4::new_nonuniform_scaling(&Vec3::new(1.0, 0.0, 1.0))))
            .unwrap();
        assert!(matches!(scene.to_template(), Err(SceneError::DegenerateModel(_))));
    }
}
