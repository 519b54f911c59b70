//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to
//! simulate the ragdoll. Rigid-body integration, constraint solving and
//! collision response all live behind it; the ragdoll crate only creates
//! bodies, reads their pose and pushes on them.

use bevy::prelude::*;

use crate::body::{BodyKind, BodyMaterial, BodyShape};
use crate::ragdoll::JointSpec;

/// Trait for physics backend implementations.
///
/// All methods operate on the Bevy [`World`] directly so they can be called
/// from exclusive systems and startup code alike.
pub trait RagdollPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend's own systems.
    ///
    /// This does not add the physics engine itself; the application does.
    fn plugin() -> impl Plugin;

    /// Set the world gravity vector.
    fn set_gravity(world: &mut World, gravity: Vec2);

    /// Turn an existing entity into a rigid body with the given shape and material.
    fn insert_body(
        world: &mut World,
        entity: Entity,
        shape: BodyShape,
        material: BodyMaterial,
        kind: BodyKind,
    );

    /// Create a constraint between two bodies and return its entity.
    ///
    /// `joint.anchor_parent` is local to `parent`, `joint.anchor_child` to `child`.
    fn insert_joint(world: &mut World, joint: &JointSpec, parent: Entity, child: Entity) -> Entity;

    /// Apply a force at the body's center for the current physics step.
    fn apply_force(world: &mut World, entity: Entity, force: Vec2);

    /// Get the current position of a body.
    fn get_position(world: &World, entity: Entity) -> Vec2;

    /// Get the current rotation angle of a body (in radians).
    fn get_rotation(world: &World, entity: Entity) -> f32;

    /// Get the mass of a body, or 0 if it has none (yet).
    fn get_mass(world: &World, entity: Entity) -> f32;

    /// Whether the body is moved by the simulation.
    fn is_dynamic(world: &World, entity: Entity) -> bool;
}
