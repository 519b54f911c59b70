//! Backend-agnostic body descriptions.
//!
//! These structures describe what a rigid body looks like (shape) and how it
//! behaves on contact (material). Physics backends turn them into colliders;
//! the renderer turns the shape into a mesh.

use bevy::prelude::*;

/// Collision and render shape of a body, centered on the body origin.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub enum BodyShape {
    Circle { radius: f32 },
    Rectangle { width: f32, height: f32 },
}

impl BodyShape {
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::Rectangle { width, height }
    }

    /// Half-extents of the unrotated shape.
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Self::Circle { radius } => Vec2::splat(radius),
            Self::Rectangle { width, height } => Vec2::new(width, height) / 2.0,
        }
    }

    /// Whether every dimension is strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        let extents = self.half_extents();
        extents.x > 0.0 && extents.y > 0.0 && extents.is_finite()
    }

    /// World position of the bottom-center of the shape in its local frame,
    /// rotated by `rotation` (radians) around `position`.
    ///
    /// For a lower leg this is the foot.
    pub fn bottom_point(&self, position: Vec2, rotation: f32) -> Vec2 {
        let local = Vec2::new(0.0, -self.half_extents().y);
        position + Vec2::from_angle(rotation).rotate(local)
    }
}

/// Physical material fixed at creation.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct BodyMaterial {
    /// Mass per unit area.
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self {
            density: 0.001,
            friction: 0.1,
            restitution: 0.0,
        }
    }
}

impl BodyMaterial {
    /// Builder: set the restitution (bounciness).
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.density > 0.0
            && self.density.is_finite()
            && self.friction >= 0.0
            && self.restitution >= 0.0
    }
}

/// Whether a body is moved by the simulation or pinned in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Static,
}
