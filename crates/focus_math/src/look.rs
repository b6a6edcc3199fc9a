//! First-person look angles
//!
//! The camera looks along its local −z axis with world +Y up.

use std::f32::consts::FRAC_PI_2;

use nalgebra::{UnitQuaternion, Vector3};

/// Vertical look angle is clamped to this magnitude to avoid flipping over the pole
pub const VERTICAL_LOOK_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Horizontal (yaw) and vertical (pitch) look angles in radians
///
/// A direction is `(sin h · cos v, sin v, cos h · cos v)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LookAngles {
    /// Rotation about world +Y; zero looks along +z
    pub horizontal: f32,
    /// Elevation above the horizon
    pub vertical: f32,
}

impl LookAngles {
    /// Create from explicit angles (vertical is clamped)
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical: vertical.clamp(-VERTICAL_LOOK_LIMIT, VERTICAL_LOOK_LIMIT),
        }
    }

    /// Derive angles that look along `dir`
    ///
    /// `dir` is expected to be normalized. A straight up/down direction keeps
    /// a horizontal angle of zero.
    pub fn from_direction(dir: &Vector3<f32>) -> Self {
        let vertical = dir.y.clamp(-1.0, 1.0).asin();
        let flat_len = (dir.x * dir.x + dir.z * dir.z).sqrt();
        let horizontal = if flat_len > f32::EPSILON {
            (dir.z / flat_len).clamp(-1.0, 1.0).acos() * dir.x.signum()
        } else {
            0.0
        };
        Self::new(horizontal, vertical)
    }

    /// Unit look direction for these angles
    pub fn direction(&self) -> Vector3<f32> {
        let (sin_h, cos_h) = self.horizontal.sin_cos();
        let (sin_v, cos_v) = self.vertical.sin_cos();
        Vector3::new(sin_h * cos_v, sin_v, cos_h * cos_v)
    }

    /// Camera rotation whose −z axis points along [`direction`](Self::direction)
    pub fn rotation(&self) -> UnitQuaternion<f32> {
        look_rotation(&self.direction())
    }

    /// Accumulate a cursor delta, clamping the vertical angle
    pub fn turn(&mut self, dx: f32, dy: f32, horizontal_sensitivity: f32, vertical_sensitivity: f32) {
        self.horizontal += dx * horizontal_sensitivity;
        self.vertical = (self.vertical + dy * vertical_sensitivity)
            .clamp(-VERTICAL_LOOK_LIMIT, VERTICAL_LOOK_LIMIT);
    }
}

/// Rotation mapping the camera's −z axis onto `dir` with +Y as up
pub fn look_rotation(dir: &Vector3<f32>) -> UnitQuaternion<f32> {
    UnitQuaternion::face_towards(&-dir, &Vector3::y())
}
