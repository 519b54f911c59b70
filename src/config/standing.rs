//! Configuration for the standing (stability) monitor.

use std::time::Duration;

use bevy::prelude::*;

/// Configuration for the standing monitor.
#[derive(Resource, Reflect, Debug, Clone, Copy)]
#[reflect(Resource)]
pub struct StandingConfig {
    /// Height above the ground surface that still counts as touching it.
    pub surface_offset: f32,

    /// Extra slack on top of `surface_offset`.
    pub tolerance: f32,

    /// Continuous grounded time required before the goal is achieved.
    pub threshold: Duration,
}

impl Default for StandingConfig {
    fn default() -> Self {
        Self {
            surface_offset: 10.0,
            tolerance: 5.0,
            threshold: Duration::from_millis(3000),
        }
    }
}

impl StandingConfig {
    /// Builder: set the required standing time.
    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = threshold;
        self
    }

    /// Builder: set the contact tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Highest foot y that still counts as grounded for a given ground surface.
    pub fn contact_line(&self, ground_y: f32) -> f32 {
        ground_y + self.surface_offset + self.tolerance
    }
}
