//! Per-frame force bookkeeping for ragdoll segments.

use bevy::prelude::*;

/// Accumulates the controller's forces for one segment during a frame.
///
/// Backends that keep forces in a persistent component (Avian's
/// `ConstantForce`) subtract what they applied last frame before adding the
/// new total, so forces from other sources are left untouched and ours never
/// pile up.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct SegmentForces {
    /// Forces added this frame, not yet handed to the physics engine.
    accumulated: Vec2,
    /// Total handed to the physics engine last frame.
    applied: Vec2,
}

impl SegmentForces {
    /// Add a force for the current frame.
    pub fn add_force(&mut self, force: Vec2) {
        self.accumulated += force;
    }

    /// Forces added so far this frame.
    pub fn accumulated(&self) -> Vec2 {
        self.accumulated
    }

    /// Start a new frame. Returns the force applied last frame, which the
    /// caller must remove from the physics engine.
    pub fn prepare_new_frame(&mut self) -> Vec2 {
        self.accumulated = Vec2::ZERO;
        std::mem::take(&mut self.applied)
    }

    /// End the frame. Returns the force to hand to the physics engine and
    /// remembers it for the next [`prepare_new_frame`](Self::prepare_new_frame).
    pub fn finalize_frame(&mut self) -> Vec2 {
        self.applied = std::mem::take(&mut self.accumulated);
        self.applied
    }
}
