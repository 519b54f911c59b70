//! Avian2D physics backend implementation.
//!
//! This module provides the physics backend for Avian2D.
//! Enable with the `avian2d` feature (on by default).

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::RagdollSet;
use crate::backend::RagdollPhysicsBackend;
use crate::body::{BodyKind, BodyMaterial, BodyShape};
use crate::forces::SegmentForces;
use crate::ragdoll::JointSpec;

/// Compliance of a joint with stiffness 0. Stiffness 1 maps to 0 (rigid).
pub const JOINT_COMPLIANCE_SCALE: f32 = 1e-4;

/// Collision layers used by the ragdoll.
///
/// Segments only collide with boundaries, never with each other; overlapping
/// limbs at the joints would otherwise fight the constraints.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum RagdollLayer {
    #[default]
    Default,
    Segment,
    Boundary,
}

/// Map a joint stiffness in `[0, 1]` to Avian's compliance (inverse stiffness).
pub fn joint_compliance(stiffness: f32) -> f32 {
    (1.0 - stiffness.clamp(0.0, 1.0)) * JOINT_COMPLIANCE_SCALE
}

/// Avian2D physics backend for the ragdoll.
///
/// Forces are not written to Avian directly. They accumulate in
/// [`SegmentForces`] and are moved into `ConstantForce` at the end of the
/// frame, then taken back out at the start of the next one.
pub struct Avian2dBackend;

impl RagdollPhysicsBackend for Avian2dBackend {
    fn plugin() -> impl Plugin {
        Avian2dBackendPlugin
    }

    fn set_gravity(world: &mut World, gravity: Vec2) {
        world.insert_resource(Gravity(gravity));
    }

    fn insert_body(
        world: &mut World,
        entity: Entity,
        shape: BodyShape,
        material: BodyMaterial,
        kind: BodyKind,
    ) {
        let collider = match shape {
            BodyShape::Circle { radius } => Collider::circle(radius),
            BodyShape::Rectangle { width, height } => Collider::rectangle(width, height),
        };

        let mut entity = world.entity_mut(entity);
        entity.insert((
            collider,
            ColliderDensity(material.density),
            Friction::new(material.friction),
            Restitution::new(material.restitution),
        ));

        match kind {
            BodyKind::Dynamic => {
                entity.insert((
                    RigidBody::Dynamic,
                    CollisionLayers::new(RagdollLayer::Segment, [RagdollLayer::Boundary]),
                    ConstantForce::default(),
                    SegmentForces::default(),
                ));
            }
            BodyKind::Static => {
                entity.insert((
                    RigidBody::Static,
                    CollisionLayers::new(
                        RagdollLayer::Boundary,
                        [RagdollLayer::Segment, RagdollLayer::Default],
                    ),
                ));
            }
        }
    }

    fn insert_joint(world: &mut World, joint: &JointSpec, parent: Entity, child: Entity) -> Entity {
        world
            .spawn(
                DistanceJoint::new(parent, child)
                    .with_local_anchor1(joint.anchor_parent)
                    .with_local_anchor2(joint.anchor_child)
                    .with_limits(joint.length, joint.length)
                    .with_compliance(joint_compliance(joint.stiffness)),
            )
            .id()
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec2) {
        // Accumulate instead of touching ConstantForce directly.
        // Forces will be applied at the end of the frame by apply_segment_forces.
        if let Some(mut forces) = world.get_mut::<SegmentForces>(entity) {
            forces.add_force(force);
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec2 {
        // Try Avian's Position component first, then fall back to Transform
        world
            .get::<Position>(entity)
            .map(|p| p.0)
            .or_else(|| world.get::<Transform>(entity).map(|t| t.translation.xy()))
            .unwrap_or(Vec2::ZERO)
    }

    fn get_rotation(world: &World, entity: Entity) -> f32 {
        world
            .get::<Rotation>(entity)
            .map(|r| r.as_radians())
            .or_else(|| {
                world.get::<Transform>(entity).map(|t| {
                    let (_, _, z) = t.rotation.to_euler(EulerRot::XYZ);
                    z
                })
            })
            .unwrap_or(0.0)
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        let Some(computed_mass) = world.get::<ComputedMass>(entity) else {
            return 0.0;
        };
        let mass = computed_mass.value();
        if mass <= 0.0 || !mass.is_finite() {
            return 0.0;
        }
        mass
    }

    fn is_dynamic(world: &World, entity: Entity) -> bool {
        world
            .get::<RigidBody>(entity)
            .is_some_and(|body| *body == RigidBody::Dynamic)
    }
}

/// Plugin that sets up Avian2D-specific systems for the ragdoll.
pub struct Avian2dBackendPlugin;

impl Plugin for Avian2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            clear_segment_forces.in_set(RagdollSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            apply_segment_forces.in_set(RagdollSet::FinalApplication),
        );
    }
}

/// Take last frame's controller forces back out of `ConstantForce`.
///
/// Anything else writing to `ConstantForce` is left as it is.
pub fn clear_segment_forces(mut q: Query<(&mut SegmentForces, &mut ConstantForce)>) {
    const EPSILON: f32 = 1e-6;

    for (mut forces, mut constant_force) in &mut q {
        let previous = forces.prepare_new_frame();
        if previous == Vec2::ZERO {
            continue;
        }
        constant_force.0 -= previous;

        // Clean up near-zero values left by our own subtraction
        if constant_force.0.x.abs() < EPSILON {
            constant_force.0.x = 0.0;
        }
        if constant_force.0.y.abs() < EPSILON {
            constant_force.0.y = 0.0;
        }
    }
}

/// Hand this frame's accumulated controller forces to Avian.
pub fn apply_segment_forces(mut q: Query<(&mut SegmentForces, &mut ConstantForce)>) {
    for (mut forces, mut constant_force) in &mut q {
        constant_force.0 += forces.finalize_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::transform::TransformPlugin);
        // Insert SceneSpawner resource required by Avian's ColliderHierarchyPlugin
        app.insert_resource(bevy::scene::SceneSpawner::default());
        app.add_plugins(PhysicsPlugins::default());
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app.finish();
        app.cleanup();
        app
    }

    fn spawn_body(app: &mut App, position: Vec2, kind: BodyKind) -> Entity {
        let world = app.world_mut();
        let transform = Transform::from_translation(position.extend(0.0));
        let entity = world.spawn((transform, GlobalTransform::from(transform))).id();
        Avian2dBackend::insert_body(
            world,
            entity,
            BodyShape::rectangle(20.0, 60.0),
            BodyMaterial::default(),
            kind,
        );
        entity
    }

    #[test]
    fn compliance_from_stiffness() {
        assert_eq!(joint_compliance(1.0), 0.0);
        assert_eq!(joint_compliance(0.0), JOINT_COMPLIANCE_SCALE);
        assert!(joint_compliance(0.7) > joint_compliance(0.8));
        assert_eq!(joint_compliance(2.0), 0.0);
    }

    #[test]
    fn avian_backend_get_position() {
        let mut app = create_test_app();
        let entity = spawn_body(&mut app, Vec2::new(100.0, 200.0), BodyKind::Static);

        app.update();

        let pos = Avian2dBackend::get_position(app.world(), entity);
        assert!((pos.x - 100.0).abs() < 0.01);
        assert!((pos.y - 200.0).abs() < 0.01);
        assert!(Avian2dBackend::get_rotation(app.world(), entity).abs() < 1e-4);
    }

    #[test]
    fn insert_body_sets_up_dynamic_segment() {
        let mut app = create_test_app();
        let entity = spawn_body(&mut app, Vec2::ZERO, BodyKind::Dynamic);

        app.update();

        let world = app.world();
        assert!(Avian2dBackend::is_dynamic(world, entity));
        assert!(world.get::<Collider>(entity).is_some());
        assert!(world.get::<ConstantForce>(entity).is_some());
        assert!(world.get::<SegmentForces>(entity).is_some());
    }

    #[test]
    fn static_body_is_not_dynamic() {
        let mut app = create_test_app();
        let entity = spawn_body(&mut app, Vec2::ZERO, BodyKind::Static);

        app.update();

        assert!(!Avian2dBackend::is_dynamic(app.world(), entity));
        assert!(app.world().get::<SegmentForces>(entity).is_none());
    }

    #[test]
    fn forces_are_applied_then_removed() {
        let mut app = create_test_app();
        let entity = spawn_body(&mut app, Vec2::ZERO, BodyKind::Dynamic);

        let force = Vec2::new(4.0, -2.0);
        Avian2dBackend::apply_force(app.world_mut(), entity, force);
        Avian2dBackend::apply_force(app.world_mut(), entity, force);

        app.world_mut()
            .run_system_once(apply_segment_forces)
            .expect("system should run");
        let applied = app.world().get::<ConstantForce>(entity).unwrap().0;
        assert_eq!(applied, force * 2.0);

        app.world_mut()
            .run_system_once(clear_segment_forces)
            .expect("system should run");
        let applied = app.world().get::<ConstantForce>(entity).unwrap().0;
        assert_eq!(applied, Vec2::ZERO);
    }

    #[test]
    fn external_constant_force_is_preserved() {
        let mut app = create_test_app();
        let entity = spawn_body(&mut app, Vec2::ZERO, BodyKind::Dynamic);
        app.world_mut().get_mut::<ConstantForce>(entity).unwrap().0 = Vec2::new(0.0, 10.0);

        Avian2dBackend::apply_force(app.world_mut(), entity, Vec2::new(5.0, 0.0));
        app.world_mut()
            .run_system_once(apply_segment_forces)
            .expect("system should run");
        app.world_mut()
            .run_system_once(clear_segment_forces)
            .expect("system should run");

        let remaining = app.world().get::<ConstantForce>(entity).unwrap().0;
        assert_eq!(remaining, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn tiny_external_force_survives_idle_frames() {
        let mut app = create_test_app();
        let entity = spawn_body(&mut app, Vec2::ZERO, BodyKind::Dynamic);
        let external = Vec2::new(1e-7, -1e-7);
        app.world_mut().get_mut::<ConstantForce>(entity).unwrap().0 = external;

        // Nothing applied by the ragdoll, so nothing to take back out.
        app.world_mut()
            .run_system_once(clear_segment_forces)
            .expect("system should run");
        assert_eq!(app.world().get::<ConstantForce>(entity).unwrap().0, external);

        app.world_mut()
            .run_system_once(apply_segment_forces)
            .expect("system should run");
        app.world_mut()
            .run_system_once(clear_segment_forces)
            .expect("system should run");
        assert_eq!(app.world().get::<ConstantForce>(entity).unwrap().0, external);
    }

    #[test]
    fn joint_connects_two_bodies() {
        let mut app = create_test_app();
        let parent = spawn_body(&mut app, Vec2::ZERO, BodyKind::Dynamic);
        let child = spawn_body(&mut app, Vec2::new(0.0, -60.0), BodyKind::Dynamic);
        let spec = JointSpec {
            parent: crate::ragdoll::SegmentKind::Torso,
            child: crate::ragdoll::SegmentKind::Head,
            anchor_parent: Vec2::new(0.0, -30.0),
            anchor_child: Vec2::new(0.0, 30.0),
            length: 0.0,
            stiffness: 1.0,
        };

        let joint = Avian2dBackend::insert_joint(app.world_mut(), &spec, parent, child);
        app.update();

        let distance_joint = app.world().get::<DistanceJoint>(joint).unwrap();
        assert_eq!(distance_joint.body1, parent);
        assert_eq!(distance_joint.body2, child);
    }
}
