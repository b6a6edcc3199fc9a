//! First-person camera
//!
//! The camera looks along its local −z axis; +y is up and +x is right.

use focus_math::{look_rotation, Quat, Vec3};

/// Camera pose in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position
    pub translation: Vec3,
    /// Orientation
    pub rotation: Quat,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Camera {
    /// Create a camera at `translation` with `rotation`
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self { translation, rotation }
    }

    /// Create a camera at `translation` looking along `direction`
    pub fn looking_along(translation: Vec3, direction: Vec3) -> Self {
        Self {
            translation,
            rotation: look_rotation(&direction.normalize()),
        }
    }

    /// View direction (the rotated −z axis)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }

    /// Rotated +x axis
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }

    /// Rotated +y axis
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    /// Rotated +z axis (points behind the camera)
    pub fn z_axis(&self) -> Vec3 {
        self.rotation * Vec3::z()
    }
}
