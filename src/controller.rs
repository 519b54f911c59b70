//! Per-frame perturbation and soft boundary containment.

use bevy::prelude::*;

use crate::backend::RagdollPhysicsBackend;
use crate::config::{ControllerConfig, SceneConfig};
use crate::policy::{ControlPolicy, SegmentObservation};
use crate::ragdoll::Ragdoll;

/// Scale a normalized policy action into a perturbation acceleration.
///
/// Each component is clamped to `[-1, 1]` first, so the result always lies
/// in `[-range, range]` whatever the policy returns.
pub fn perturbation(action: Vec2, config: &ControllerConfig) -> Vec2 {
    let action = Vec2::new(clamp_unit(action.x), clamp_unit(action.y));
    action * config.perturbation_range
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Inward push for a segment at horizontal position `x` in an area of `width`.
///
/// Only applies strictly inside the margin: exactly at `margin` or
/// `width - margin` there is no push. This is a nudge, not a clamp.
pub fn containment_push(x: f32, width: f32, config: &ControllerConfig) -> Vec2 {
    if x < config.boundary_margin {
        Vec2::new(config.containment_push, 0.0)
    } else if x > width - config.boundary_margin {
        Vec2::new(-config.containment_push, 0.0)
    } else {
        Vec2::ZERO
    }
}

/// Perturb every dynamic ragdoll segment and push stray ones back inside.
///
/// Runs once per fixed tick, after the previous physics step.
pub fn perturb_segments<B: RagdollPhysicsBackend>(world: &mut World) {
    let Some(config) = world.get_resource::<ControllerConfig>().copied() else {
        return;
    };
    if !config.enabled {
        return;
    }
    let Some(width) = world.get_resource::<SceneConfig>().map(|s| s.width) else {
        return;
    };
    let Some(segments) = world.get_resource::<Ragdoll>().map(|r| r.segments.clone()) else {
        return;
    };
    if !world.contains_resource::<ControlPolicy>() {
        return;
    }

    world.resource_scope(|world, mut policy: Mut<ControlPolicy>| {
        for (kind, entity) in segments {
            if world.get_entity(entity).is_err() || !B::is_dynamic(world, entity) {
                continue;
            }

            let position = B::get_position(world, entity);
            let observation = SegmentObservation {
                kind,
                position,
                rotation: B::get_rotation(world, entity),
            };
            let acceleration = perturbation(policy.0.choose_action(&observation), &config)
                + containment_push(position.x, width, &config);

            let mass = B::get_mass(world, entity);
            if acceleration != Vec2::ZERO && mass > 0.0 {
                B::apply_force(world, entity, acceleration * mass);
            }
        }
    });
}
