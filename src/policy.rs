//! Perturbation policies: what the controller wants to do to each segment.
//!
//! A policy only decides. The controller owns scaling, containment and the
//! actual force application, so a scripted or trained policy can replace
//! [`RandomPolicy`] without touching any physics code.

use bevy::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ragdoll::SegmentKind;

/// What a policy sees of a segment when choosing an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentObservation {
    pub kind: SegmentKind,
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
}

/// Chooses a perturbation for one segment per frame.
pub trait PerturbationPolicy: Send + Sync + 'static {
    /// Returns a normalized action; each component is expected in `[-1, 1]`.
    ///
    /// The controller clamps anything outside that range.
    fn choose_action(&mut self, observation: &SegmentObservation) -> Vec2;
}

/// Uniform noise, no learning.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl PerturbationPolicy for RandomPolicy {
    fn choose_action(&mut self, _observation: &SegmentObservation) -> Vec2 {
        Vec2::new(
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
        )
    }
}

/// Does nothing. Useful to watch the ragdoll settle on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl PerturbationPolicy for IdlePolicy {
    fn choose_action(&mut self, _observation: &SegmentObservation) -> Vec2 {
        Vec2::ZERO
    }
}

/// The policy driving the controller.
#[derive(Resource)]
pub struct ControlPolicy(pub Box<dyn PerturbationPolicy>);

impl ControlPolicy {
    pub fn new(policy: impl PerturbationPolicy) -> Self {
        Self(Box::new(policy))
    }
}

impl Default for ControlPolicy {
    fn default() -> Self {
        Self::new(RandomPolicy::new())
    }
}
