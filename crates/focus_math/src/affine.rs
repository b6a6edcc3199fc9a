//! Decomposition of authored model transforms
//!
//! Level geometry is authored as unit primitives (the cube spans [-1, 1] on
//! every axis) placed with an arbitrary affine transform. Physics needs the
//! same placement as a rigid pose plus per-axis half extents.

use nalgebra::{Isometry3, Matrix3, Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3, Vector4};

use crate::MathError;

/// Extents below this are treated as a collapsed axis
const MIN_EXTENT: f32 = 1e-6;

/// An affine transform split into per-axis extents and an unscaled pose
///
/// `pose.to_homogeneous() * diag(extents)` reconstructs the original
/// transform for any rotation + non-uniform scale + translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledPose {
    /// Rotation and translation with the scale divided out
    pub pose: Isometry3<f32>,
    /// World-space length of each transformed unit axis
    pub extents: Vector3<f32>,
}

impl ScaledPose {
    /// Create from an already separated pose and extents
    pub fn new(pose: Isometry3<f32>, extents: Vector3<f32>) -> Self {
        Self { pose, extents }
    }

    /// Decompose a model transform
    pub fn from_matrix(m: &Matrix4<f32>) -> Result<Self, MathError> {
        let origin = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let extent = |axis: Vector4<f32>| ((m * axis) - origin).xyz().norm();
        let extents = Vector3::new(
            extent(Vector4::new(1.0, 0.0, 0.0, 1.0)),
            extent(Vector4::new(0.0, 1.0, 0.0, 1.0)),
            extent(Vector4::new(0.0, 0.0, 1.0, 1.0)),
        );

        if extents.iter().any(|e| *e < MIN_EXTENT) {
            return Err(MathError::DegenerateTransform {
                extents: [extents.x, extents.y, extents.z],
            });
        }

        let unscaled = m * Matrix4::new_nonuniform_scaling(&extents.map(|e| 1.0 / e));
        let basis: Matrix3<f32> = unscaled.fixed_view::<3, 3>(0, 0).into_owned();
        let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(&basis));
        let translation = Translation3::new(unscaled[(0, 3)], unscaled[(1, 3)], unscaled[(2, 3)]);

        Ok(Self {
            pose: Isometry3::from_parts(translation, rotation),
            extents,
        })
    }

    /// Scale matrix `diag(ex, ey, ez, 1)`
    pub fn scale_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&self.extents)
    }

    /// Recompose into a model transform
    pub fn to_matrix(&self) -> Matrix4<f32> {
        self.pose.to_homogeneous() * self.scale_matrix()
    }
}

/// Axis scaled by angle (radians) of a rotation
///
/// The angle comes from `atan2` of the quaternion parts, which keeps full
/// precision for small angles and near half turns.
pub fn rotation_vector(rotation: &UnitQuaternion<f32>) -> Vector3<f32> {
    let q = if rotation.w < 0.0 {
        -rotation.into_inner()
    } else {
        rotation.into_inner()
    };
    let imag = q.imag();
    let sin_half = imag.norm();
    if sin_half < 1e-7 {
        return imag * 2.0;
    }
    imag * (2.0 * sin_half.atan2(q.w) / sin_half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-4;

    fn approx_matrix(a: &Matrix4<f32>, b: &Matrix4<f32>) -> bool {
        (a - b).abs().max() < EPSILON
    }

    #[test]
    fn test_identity_has_unit_extents() {
        let sp = ScaledPose::from_matrix(&Matrix4::identity()).unwrap();
        assert!((sp.extents - Vector3::new(1.0, 1.0, 1.0)).norm() < EPSILON);
        assert!(sp.pose.translation.vector.norm() < EPSILON);
    }

    #[test]
    fn test_non_uniform_scale_recovered() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.7);
        let m = Isometry3::from_parts(Translation3::new(3.0, -1.0, 8.0), rotation).to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 0.5, 4.0));

        let sp = ScaledPose::from_matrix(&m).unwrap();
        assert!((sp.extents.x - 2.0).abs() < EPSILON);
        assert!((sp.extents.y - 0.5).abs() < EPSILON);
        assert!((sp.extents.z - 4.0).abs() < EPSILON);
        assert!((sp.pose.translation.vector - Vector3::new(3.0, -1.0, 8.0)).norm() < EPSILON);
        assert!(sp.pose.rotation.angle_to(&rotation) < EPSILON);
    }

    #[test]
    fn test_round_trip_reconstructs_transform() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
        let m = Isometry3::from_parts(Translation3::new(-5.44, 2.93, 5.55), rotation).to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::new(2.93, 3.23, 1.0));

        let sp = ScaledPose::from_matrix(&m).unwrap();
        assert!(approx_matrix(&sp.to_matrix(), &m));
    }

    #[test]
    fn test_rotation_vector_quarter_turn() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        let v = rotation_vector(&rotation);
        assert!((v - Vector3::new(0.0, FRAC_PI_2, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_vector_rebuilds_rotation() {
        let rotations = [
            UnitQuaternion::identity(),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 1e-4),
            UnitQuaternion::from_euler_angles(0.3, FRAC_PI_2, -0.2),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f32::consts::PI - 1e-3),
        ];
        for rotation in rotations {
            let rebuilt = UnitQuaternion::from_scaled_axis(rotation_vector(&rotation));
            let error = rebuilt.to_rotation_matrix().into_inner() - rotation.to_rotation_matrix().into_inner();
            assert!(error.norm() < 1e-5, "{:?}", rotation);
        }
    }

    #[test]
    fn test_degenerate_transform_rejected() {
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 0.0, 1.0));
        assert!(matches!(
            ScaledPose::from_matrix(&m),
            Err(MathError::DegenerateTransform { .. })
        ));
    }
}
