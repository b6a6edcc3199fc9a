//! Capsule character controller
//!
//! The capsule is not part of the collider set; it is swept through the
//! world by [`PhysicsWorld::move_character`](crate::PhysicsWorld::move_character),
//! so raycasts from the eye never hit the player.

use focus_math::{Isometry3, Vec3};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::parry::shape::Capsule;

/// Gap kept between the capsule and obstacles
const CONTACT_OFFSET: f32 = 0.01;

/// Parameters for a new character controller
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterDesc {
    /// Distance between the two hemisphere centers
    pub height: f32,
    /// Capsule radius
    pub radius: f32,
    /// Highest ledge the character steps onto automatically
    pub step_offset: f32,
    /// Steepest climbable slope in degrees
    pub slope_limit_degrees: f32,
    /// Initial capsule center
    pub position: Vec3,
}

impl CharacterDesc {
    /// Capsule proportions for a player whose eyes are `eye_height` above the feet
    ///
    /// `eye_position` is the camera position; the capsule center sits
    /// `eye_height * 1.5 / 4` below it.
    pub fn for_eye_height(eye_height: f32, eye_position: Vec3) -> Self {
        Self {
            height: eye_height * 3.0 / 4.0,
            radius: eye_height / 4.0,
            step_offset: 0.1,
            slope_limit_degrees: 10.0,
            position: eye_position - Vec3::y() * eye_height * 1.5 / 4.0,
        }
    }
}

/// A capsule moved by kinematic sweeps
pub struct CharacterController {
    pub(crate) controller: KinematicCharacterController,
    pub(crate) shape: Capsule,
    position: Vec3,
    half_height: f32,
    radius: f32,
}

impl CharacterController {
    /// Create a controller from a description
    pub fn new(desc: &CharacterDesc) -> Self {
        let slope = desc.slope_limit_degrees.to_radians();
        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(CONTACT_OFFSET),
            autostep: Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(desc.step_offset),
                min_width: CharacterLength::Absolute(desc.radius * 0.5),
                include_dynamic_bodies: true,
            }),
            max_slope_climb_angle: slope,
            min_slope_slide_angle: slope,
            snap_to_ground: None,
            ..Default::default()
        };
        let half_height = desc.height * 0.5;

        Self {
            controller,
            shape: Capsule::new_y(half_height, desc.radius),
            position: desc.position,
            half_height,
            radius: desc.radius,
        }
    }

    /// Capsule center
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the capsule center
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Bottom of the capsule
    pub fn foot_position(&self) -> Vec3 {
        self.position - Vec3::y() * (self.half_height + self.radius)
    }

    /// Capsule radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance between hemisphere centers
    pub fn height(&self) -> f32 {
        self.half_height * 2.0
    }

    pub(crate) fn isometry(&self) -> Isometry3<f32> {
        Isometry3::translation(self.position.x, self.position.y, self.position.z)
    }
}
