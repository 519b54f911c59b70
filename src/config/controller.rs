//! Configuration for the random perturbation controller.

use bevy::prelude::*;

/// Configuration for the per-frame perturbation and boundary containment.
///
/// All magnitudes are accelerations (world units/second^2). The controller
/// multiplies them by each segment's mass before handing them to the physics
/// backend, so the same numbers shake a light forearm as much as the torso.
#[derive(Resource, Reflect, Debug, Clone, Copy)]
#[reflect(Resource)]
pub struct ControllerConfig {
    /// Whether the controller applies anything at all.
    pub enabled: bool,

    /// Half-width of the symmetric range each perturbation component is drawn from.
    pub perturbation_range: f32,

    /// Distance from the left/right edge inside which containment kicks in.
    pub boundary_margin: f32,

    /// Constant push applied to segments inside the margin, directed inward.
    pub containment_push: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            perturbation_range: 60.0,
            boundary_margin: 30.0,
            containment_push: 150.0,
        }
    }
}

impl ControllerConfig {
    /// Builder: set the perturbation range.
    pub fn with_perturbation_range(mut self, range: f32) -> Self {
        self.perturbation_range = range.abs();
        self
    }

    /// Builder: set the containment margin.
    pub fn with_boundary_margin(mut self, margin: f32) -> Self {
        self.boundary_margin = margin.max(0.0);
        self
    }

    /// Builder: set the containment push strength.
    pub fn with_containment_push(mut self, push: f32) -> Self {
        self.containment_push = push.abs();
        self
    }

    /// Builder: disable the controller.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
