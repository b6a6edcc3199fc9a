//! Scene validation
//!
//! Validates scene templates for authoring errors before a level is built.
//! The [`SceneValidator`] checks for empty scenes, duplicate model names,
//! dangling material indices and collapsed model scales.

use std::collections::HashSet;

use crate::scene_template::SceneTemplate;

/// Validation error found in a scene template
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Scene has no models
    EmptyScene,
    /// Two models share a name, so name lookup would be ambiguous
    DuplicateName(String),
    /// Model refers to a material the scene does not define
    MissingMaterial {
        /// Model name
        model: String,
        /// Requested material index
        index: usize,
    },
    /// Model has a zero scale on some axis
    DegenerateScale(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyScene => write!(f, "Scene has no models"),
            ValidationError::DuplicateName(name) => {
                write!(f, "Duplicate model name: '{}'", name)
            }
            ValidationError::MissingMaterial { model, index } => {
                write!(f, "Model '{}' uses undefined material {}", model, index)
            }
            ValidationError::DegenerateScale(name) => {
                write!(f, "Model '{}' has a zero scale component", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Scene validator that checks for common authoring errors
///
/// # Example
/// ```ignore
/// let errors = SceneValidator::validate(&template);
/// for error in &errors {
///     log::error!("{}", error);
/// }
/// ```
pub struct SceneValidator;

impl SceneValidator {
    /// Validate a template, returning all errors found
    pub fn validate(template: &SceneTemplate) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if template.models.is_empty() {
            errors.push(ValidationError::EmptyScene);
        }

        let mut seen_names = HashSet::new();
        for model in &template.models {
            if !seen_names.insert(model.name.as_str()) {
                errors.push(ValidationError::DuplicateName(model.name.clone()));
            }

            // A scene without materials renders everything with the default one
            if !template.materials.is_empty() && model.material >= template.materials.len() {
                errors.push(ValidationError::MissingMaterial {
                    model: model.name.clone(),
                    index: model.material,
                });
            }

            if model.scale.iter().any(|s| s.abs() < f32::EPSILON) {
                errors.push(ValidationError::DegenerateScale(model.name.clone()));
            }
        }

        errors
    }

    /// Validate and return Result (Ok if no errors, Err with all errors)
    pub fn validate_or_error(template: &SceneTemplate) -> Result<(), Vec<ValidationError>> {
        let errors = Self::validate(template);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
