//! Physics world
//!
//! A thin owner around the rapier pipeline. Actors are created from scene
//! models (or directly from a pose for invisible colliders), stepped with a
//! fixed delta, and queried with raycasts and world-space bounds.

use std::collections::HashMap;

use focus_core::{ModelKey, Scene};
use focus_math::{Pose, ScaledPose, Vec3};
use rapier3d::prelude::*;
use slotmap::SlotMap;

use crate::actor::{Actor, ActorKey, ActorShape, Bounds, DynamicLink, RayHit, PLANE_HALF_THICKNESS};
use crate::character::{CharacterController, CharacterDesc};
use crate::material::PhysicsMaterial;
use crate::PhysicsError;

/// Configuration for the physics world
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity along the y axis
    pub gravity: f32,
    /// Material shared by every collider
    pub material: PhysicsMaterial,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            material: PhysicsMaterial::LEVEL_GEOMETRY,
        }
    }
}

impl PhysicsConfig {
    /// Create a config with custom gravity
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }

    /// Replace the shared collider material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }
}

/// The physics simulation for one level
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Actor bookkeeping
    actors: SlotMap<ActorKey, Actor>,
    /// Reverse lookup for query and contact results
    collider_to_actor: HashMap<ColliderHandle, ActorKey>,
    /// Scripted actors whose poses drive scene models
    dynamic_links: Vec<DynamicLink>,
    /// Set when colliders moved outside of a step
    queries_dirty: bool,
    /// World configuration
    pub config: PhysicsConfig,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create an empty world with default gravity
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create an empty world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            gravity: vector![0.0, config.gravity, 0.0],
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            actors: SlotMap::with_key(),
            collider_to_actor: HashMap::new(),
            dynamic_links: Vec::new(),
            queries_dirty: false,
            config,
        }
    }

    /// Create a box actor matching a unit-cube model
    ///
    /// Dynamic actors are kinematic and their pose is written back to the
    /// model after every [`step`](Self::step).
    pub fn create_box_actor(
        &mut self,
        scene: &Scene,
        model: ModelKey,
        dynamic: bool,
    ) -> Result<ActorKey, PhysicsError> {
        self.create_model_actor(scene, model, ActorShape::Box, dynamic)
    }

    /// Create a thin box actor matching a unit-quad model in its local xy plane
    pub fn create_plane_actor(
        &mut self,
        scene: &Scene,
        model: ModelKey,
        dynamic: bool,
    ) -> Result<ActorKey, PhysicsError> {
        self.create_model_actor(scene, model, ActorShape::Plane, dynamic)
    }

    /// Create a static box actor without a scene model
    pub fn create_fixed_actor(&mut self, pose: Pose, half_extents: Vec3) -> ActorKey {
        self.insert_actor(pose, half_extents, ActorShape::Box, None, false)
    }

    fn create_model_actor(
        &mut self,
        scene: &Scene,
        model: ModelKey,
        shape: ActorShape,
        dynamic: bool,
    ) -> Result<ActorKey, PhysicsError> {
        let transform = scene.model(model).ok_or(PhysicsError::UnknownModel)?.transform;
        let scaled = ScaledPose::from_matrix(&transform)?;

        let half_extents = match shape {
            ActorShape::Box => scaled.extents,
            ActorShape::Plane => Vec3::new(scaled.extents.x, scaled.extents.y, PLANE_HALF_THICKNESS),
        };

        let key = self.insert_actor(scaled.pose, half_extents, shape, Some(model), dynamic);
        if dynamic {
            self.dynamic_links.push(DynamicLink {
                actor: key,
                model,
                scale: scaled.scale_matrix(),
            });
        }

        Ok(key)
    }

    fn insert_actor(
        &mut self,
        pose: Pose,
        half_extents: Vec3,
        shape: ActorShape,
        model: Option<ModelKey>,
        dynamic: bool,
    ) -> ActorKey {
        let builder = if dynamic {
            RigidBodyBuilder::kinematic_position_based()
        } else {
            RigidBodyBuilder::fixed()
        };
        let body = builder
            .translation(pose.translation.vector)
            .rotation(pose.rotation.scaled_axis())
            .build();
        let body = self.rigid_body_set.insert(body);

        let collider = self
            .config
            .material
            .apply(ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z))
            .build();
        let collider = self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);

        let key = self.actors.insert(Actor {
            body,
            collider,
            model,
            shape,
            half_extents,
        });
        self.collider_to_actor.insert(collider, key);
        self.queries_dirty = true;

        key
    }

    /// Advance the simulation and copy scripted actor poses to their models
    pub fn step(&mut self, dt: f32, scene: &mut Scene) {
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.query_pipeline.update(&self.collider_set);
        self.queries_dirty = false;

        self.sync_dynamic_models(scene);
    }

    fn sync_dynamic_models(&self, scene: &mut Scene) {
        for link in &self.dynamic_links {
            let Some(pose) = self.actor_pose(link.actor) else {
                continue;
            };
            if let Some(model) = scene.model_mut(link.model) {
                model.transform = pose.to_homogeneous() * link.scale;
            }
        }
    }

    fn refresh_queries(&mut self) {
        if self.queries_dirty {
            self.query_pipeline.update(&self.collider_set);
            self.queries_dirty = false;
        }
    }

    /// Nearest blocking hit along a ray
    ///
    /// `direction` does not need to be normalized; the returned distance is
    /// measured in world units from `origin`.
    pub fn raycast(&mut self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let length = direction.norm();
        if length <= f32::EPSILON {
            return None;
        }
        self.refresh_queries();

        let ray = Ray::new(Point::from(origin), direction / length);
        let (collider, distance) = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            QueryFilter::default(),
        )?;
        let actor = *self.collider_to_actor.get(&collider)?;

        Some(RayHit { actor, distance })
    }

    /// Current pose of an actor
    pub fn actor_pose(&self, key: ActorKey) -> Option<Pose> {
        let actor = self.actors.get(key)?;
        self.rigid_body_set.get(actor.body).map(|body| *body.position())
    }

    /// Teleport an actor
    ///
    /// The collider moves immediately so that queries made before the next
    /// step already see the new pose.
    pub fn set_actor_pose(&mut self, key: ActorKey, pose: Pose) -> Result<(), PhysicsError> {
        let actor = self.actors.get(key).ok_or(PhysicsError::UnknownActor)?;
        let body = self
            .rigid_body_set
            .get_mut(actor.body)
            .ok_or(PhysicsError::UnknownActor)?;
        body.set_position(pose, true);

        if let Some(collider) = self.collider_set.get_mut(actor.collider) {
            collider.set_position(pose);
        }
        self.queries_dirty = true;

        Ok(())
    }

    /// World-space axis-aligned bounds of an actor's collider
    pub fn world_bounds(&self, key: ActorKey) -> Option<Bounds> {
        let actor = self.actors.get(key)?;
        let body = self.rigid_body_set.get(actor.body)?;
        let collider = self.collider_set.get(actor.collider)?;
        let aabb = collider.shape().compute_aabb(body.position());

        Some(Bounds {
            min: aabb.mins.coords,
            max: aabb.maxs.coords,
        })
    }

    /// Scene model an actor was created from
    pub fn actor_model(&self, key: ActorKey) -> Option<ModelKey> {
        self.actors.get(key).and_then(|a| a.model)
    }

    /// Collision shape family of an actor
    pub fn actor_shape(&self, key: ActorKey) -> Option<ActorShape> {
        self.actors.get(key).map(|a| a.shape)
    }

    /// Collider half extents of an actor
    pub fn actor_half_extents(&self, key: ActorKey) -> Option<Vec3> {
        self.actors.get(key).map(|a| a.half_extents)
    }

    /// Number of live actors
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Number of scripted actors synchronized to models
    pub fn dynamic_count(&self) -> usize {
        self.dynamic_links.len()
    }

    /// Create a character controller living in this world
    pub fn create_character(&self, desc: &CharacterDesc) -> CharacterController {
        CharacterController::new(desc)
    }

    /// Sweep a character by `displacement`
    ///
    /// Movements shorter than `min_distance` are skipped. `on_touch` is
    /// called once per distinct actor the capsule touched during the sweep.
    pub fn move_character(
        &mut self,
        character: &mut CharacterController,
        displacement: Vec3,
        min_distance: f32,
        dt: f32,
        mut on_touch: impl FnMut(ActorKey),
    ) {
        if displacement.norm() < min_distance {
            return;
        }
        self.refresh_queries();

        let mut touched: Vec<ActorKey> = Vec::new();
        let position = character.isometry();
        let movement = character.controller.move_shape(
            dt,
            &self.rigid_body_set,
            &self.collider_set,
            &self.query_pipeline,
            &character.shape,
            &position,
            displacement,
            QueryFilter::default(),
            |collision| {
                if let Some(actor) = self.collider_to_actor.get(&collision.handle) {
                    if !touched.contains(actor) {
                        touched.push(*actor);
                    }
                }
            },
        );

        character.set_position(character.position() + movement.translation);
        for actor in touched {
            on_touch(actor);
        }
    }
}

impl Drop for PhysicsWorld {
    fn drop(&mut self) {
        log::debug!(
            "Dropping physics world with {} actors ({} scripted)",
            self.actors.len(),
            self.dynamic_links.len()
        );
    }
}
