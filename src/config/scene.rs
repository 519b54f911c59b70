//! Configuration for the simulation area.

use bevy::prelude::*;

use crate::error::RagdollError;

/// Dimensions of the bounded play area and where the ragdoll starts.
///
/// The area spans `x` in `[0, width]` and `y` in `[0, height]` with y up.
#[derive(Resource, Reflect, Debug, Clone, Copy)]
#[reflect(Resource)]
pub struct SceneConfig {
    pub width: f32,
    pub height: f32,

    /// Thickness of the ground slab; its top surface sits at this height.
    pub ground_thickness: f32,

    /// Thickness of the side walls.
    pub wall_thickness: f32,

    /// World gravity (world units/second^2).
    pub gravity: Vec2,

    /// Where the head of the ragdoll is placed on spawn and restart.
    pub ragdoll_origin: Vec2,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            ground_thickness: 20.0,
            wall_thickness: 20.0,
            gravity: Vec2::new(0.0, -490.0),
            ragdoll_origin: Vec2::new(300.0, 300.0),
        }
    }
}

impl SceneConfig {
    /// Builder: set the area size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder: set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set the ragdoll spawn origin (head center).
    pub fn with_ragdoll_origin(mut self, origin: Vec2) -> Self {
        self.ragdoll_origin = origin;
        self
    }

    /// Y coordinate of the ground's top surface.
    pub fn ground_surface(&self) -> f32 {
        self.ground_thickness
    }

    /// Center of the area.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / 2.0
    }

    pub fn validate(&self) -> Result<(), RagdollError> {
        let thickness = self.ground_thickness.max(self.wall_thickness);
        let valid = self.ground_thickness > 0.0
            && self.wall_thickness > 0.0
            && self.width > 2.0 * self.wall_thickness
            && self.height > self.ground_thickness;
        if valid {
            Ok(())
        } else {
            Err(RagdollError::InvalidScene {
                width: self.width,
                height: self.height,
                thickness,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn narrow_scene_is_rejected() {
        let scene = SceneConfig::default().with_size(30.0, 400.0);
        assert!(matches!(
            scene.validate(),
            Err(RagdollError::InvalidScene { width, .. }) if width == 30.0
        ));
    }

    #[test]
    fn ground_surface_is_slab_top() {
        let scene = SceneConfig::default();
        assert_eq!(scene.ground_surface(), 20.0);
        assert_eq!(scene.center(), Vec2::new(300.0, 200.0));
    }
}
