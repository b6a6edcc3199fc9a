//! Surface response shared by level colliders

use rapier3d::geometry::ColliderBuilder;

/// Friction and restitution applied to every collider of a world
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsMaterial {
    pub friction: f32,
    /// 0 absorbs impacts, 1 bounces back fully
    pub restitution: f32,
}

impl PhysicsMaterial {
    /// Floors, walls and platforms: full grip, a slight bounce
    pub const LEVEL_GEOMETRY: Self = Self {
        friction: 1.0,
        restitution: 0.3,
    };

    /// Both coefficients are clamped into `[0, 1]`
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.clamp(0.0, 1.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Set this material on a collider under construction
    pub fn apply(self, builder: ColliderBuilder) -> ColliderBuilder {
        builder.friction(self.friction).restitution(self.restitution)
    }
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self::LEVEL_GEOMETRY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_level_geometry() {
        assert_eq!(PhysicsMaterial::default(), PhysicsMaterial::LEVEL_GEOMETRY);
        assert_eq!(PhysicsMaterial::default().restitution, 0.3);
    }

    #[test]
    fn test_new_clamps() {
        let m = PhysicsMaterial::new(2.0, -1.0);
        assert_eq!(m, PhysicsMaterial::new(1.0, 0.0));
    }

    #[test]
    fn test_apply_sets_collider_coefficients() {
        let collider = PhysicsMaterial::new(0.4, 0.1)
            .apply(ColliderBuilder::cuboid(1.0, 1.0, 1.0))
            .build();
        assert_eq!(collider.friction(), 0.4);
        assert_eq!(collider.restitution(), 0.1);
    }
}
