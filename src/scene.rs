//! Static boundaries of the play area: ground and two walls.

use bevy::prelude::*;

use crate::backend::RagdollPhysicsBackend;
use crate::body::{BodyKind, BodyMaterial, BodyShape};
use crate::config::SceneConfig;
use crate::error::RagdollError;

/// Which edge of the play area a boundary is.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Ground,
    LeftWall,
    RightWall,
}

/// Marks a static boundary body.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct Boundary {
    pub kind: BoundaryKind,
}

/// Placement of one boundary rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySpec {
    pub kind: BoundaryKind,
    pub center: Vec2,
    pub size: Vec2,
}

/// Ground along the bottom, walls along the full height of each side.
///
/// Walls sit just outside `[0, width]` so the whole area stays usable.
pub fn boundaries(scene: &SceneConfig) -> [BoundarySpec; 3] {
    let ground = scene.ground_thickness;
    let wall = scene.wall_thickness;
    [
        BoundarySpec {
            kind: BoundaryKind::Ground,
            center: Vec2::new(scene.width / 2.0, ground / 2.0),
            size: Vec2::new(scene.width + 2.0 * wall, ground),
        },
        BoundarySpec {
            kind: BoundaryKind::LeftWall,
            center: Vec2::new(-wall / 2.0, scene.height / 2.0),
            size: Vec2::new(wall, scene.height),
        },
        BoundarySpec {
            kind: BoundaryKind::RightWall,
            center: Vec2::new(scene.width + wall / 2.0, scene.height / 2.0),
            size: Vec2::new(wall, scene.height),
        },
    ]
}

/// Set gravity and spawn the three boundaries.
pub fn spawn_scene<B: RagdollPhysicsBackend>(
    world: &mut World,
    scene: &SceneConfig,
) -> Result<Vec<Entity>, RagdollError> {
    scene.validate()?;
    B::set_gravity(world, scene.gravity);

    let entities = boundaries(scene)
        .into_iter()
        .map(|spec| {
            let shape = BodyShape::rectangle(spec.size.x, spec.size.y);
            let transform = Transform::from_translation(spec.center.extend(0.0));
            let entity = world
                .spawn((
                    Name::new(format!("{:?}", spec.kind)),
                    Boundary { kind: spec.kind },
                    shape,
                    transform,
                    GlobalTransform::from(transform),
                ))
                .id();
            B::insert_body(
                world,
                entity,
                shape,
                BodyMaterial {
                    friction: 0.8,
                    ..default()
                },
                BodyKind::Static,
            );
            entity
        })
        .collect();

    info!(
        "Spawned scene {}x{} with gravity {:?}",
        scene.width, scene.height, scene.gravity
    );
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_top_matches_surface() {
        let scene = SceneConfig::default();
        let [ground, ..] = boundaries(&scene);
        assert_eq!(ground.kind, BoundaryKind::Ground);
        assert_eq!(ground.center.y + ground.size.y / 2.0, scene.ground_surface());
        assert!(ground.size.x >= scene.width);
    }

    #[test]
    fn walls_bound_the_width() {
        let scene = SceneConfig::default();
        let [_, left, right] = boundaries(&scene);
        assert_eq!(left.center.x + left.size.x / 2.0, 0.0);
        assert_eq!(right.center.x - right.size.x / 2.0, scene.width);
        assert_eq!(left.size.y, scene.height);
    }
}
