//! Scene models
//!
//! A model is one named piece of level geometry. Gameplay code finds models
//! by name once at level start and keeps the [`ModelKey`].

use focus_math::Mat4;
use slotmap::new_key_type;

new_key_type! {
    /// Key to a model in a [`Scene`](crate::Scene)
    ///
    /// Generational, so a key from a torn-down scene never aliases a model
    /// in its replacement.
    pub struct ModelKey;
}

/// A named, transformed piece of geometry
#[derive(Clone, Debug)]
pub struct SceneModel {
    /// Stable name used for lookup
    pub name: String,
    /// Affine model transform (last row is always 0, 0, 0, 1)
    pub transform: Mat4,
    /// Index into the scene's material table
    pub material_index: usize,
    /// The model whose visibility drives the focus score
    pub is_focus_target: bool,
    /// Set while a mirror group containing this model is highlighted or grabbed
    pub is_selected_mirror: bool,
    /// Rendered with the leaf shader
    pub is_leaf: bool,
    /// Rendered as non-opaque
    pub transparent: bool,
}

impl SceneModel {
    /// Create a model with the identity transform and material 0
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::identity(),
            material_index: 0,
            is_focus_target: false,
            is_selected_mirror: false,
            is_leaf: false,
            transparent: false,
        }
    }

    /// Set the model transform
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Set the material index
    pub fn with_material(mut self, material_index: usize) -> Self {
        self.material_index = material_index;
        self
    }

    /// Mark this model as the focus target
    pub fn with_focus_target(mut self, focus: bool) -> Self {
        self.is_focus_target = focus;
        self
    }

    /// World-space translation of the model origin
    pub fn translation(&self) -> focus_math::Vec3 {
        self.transform.fixed_view::<3, 1>(0, 3).into_owned()
    }
}
