//! Math helpers for the Focus game
//!
//! Thin layer over [`nalgebra`] providing the handful of operations the
//! gameplay core needs.
//!
//! ## Core Types
//!
//! - [`ScaledPose`] - An affine model transform split into extents and an unscaled pose
//! - [`LookAngles`] - First-person horizontal/vertical look angles
//! - [`HsvInterpolator`] - Piecewise-linear color ramp in HSV space

mod affine;
mod color;
mod look;

pub use affine::{rotation_vector, ScaledPose};
pub use color::{hsv_to_rgb, lerp_rgb, HsvInterpolator, HsvSample};
pub use look::{look_rotation, LookAngles, VERTICAL_LOOK_LIMIT};

pub use nalgebra::{
    Isometry3, Matrix3, Matrix4, Point3, Rotation3, Translation3, UnitQuaternion, Vector2,
    Vector3, Vector4,
};

/// Single-precision 3D vector
pub type Vec3 = Vector3<f32>;
/// Single-precision rotation quaternion
pub type Quat = UnitQuaternion<f32>;
/// Rigid pose (rotation + translation)
pub type Pose = Isometry3<f32>;
/// Homogeneous 4x4 transform; model transforms keep the last row at (0, 0, 0, 1)
pub type Mat4 = Matrix4<f32>;

/// Errors from math helpers
#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    /// A transform collapses at least one axis to zero length
    DegenerateTransform {
        /// Per-axis extents that were measured
        extents: [f32; 3],
    },
    /// An interpolator was built without any samples
    NoSamples,
}

impl std::fmt::Display for MathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MathError::DegenerateTransform { extents } => write!(
                f,
                "Degenerate transform with extents ({}, {}, {})",
                extents[0], extents[1], extents[2]
            ),
            MathError::NoSamples => write!(f, "Interpolator needs at least one sample"),
        }
    }
}

impl std::error::Error for MathError {}
