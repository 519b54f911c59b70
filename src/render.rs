//! Drawing the scene: a mesh per body and a standing-time overlay.
//!
//! The core only exposes [`BodyShape`] and the physics-driven `Transform` of
//! each body; colors, camera and layout are decided here.

use bevy::prelude::*;

use crate::body::BodyShape;
use crate::config::SceneConfig;
use crate::monitor::StandingState;
use crate::ragdoll::{Segment, SegmentKind};
use crate::scene::Boundary;

/// Renders every body and the standing-time readout.
///
/// Needs a windowed app (`DefaultPlugins`); headless simulations leave it out.
pub struct RagdollRenderPlugin;

impl Plugin for RagdollRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, spawn_overlay));
        app.add_systems(Update, (attach_body_meshes, update_overlay));
    }
}

/// Overlay text showing the current standing time.
#[derive(Component)]
pub struct StandingTimeText;

/// Overlay text shown while the goal is achieved.
#[derive(Component)]
pub struct GoalText;

/// `"Standing time: X.XX sec"`.
pub fn standing_time_label(state: &StandingState) -> String {
    format!("Standing time: {:.2} sec", state.seconds())
}

/// The goal banner, if the goal is currently achieved.
pub fn goal_label(state: &StandingState) -> Option<&'static str> {
    state.achieved.then_some("Goal Achieved!")
}

fn segment_color(kind: SegmentKind) -> Color {
    match kind {
        SegmentKind::Head => Color::srgb(0.95, 0.8, 0.6),
        SegmentKind::Torso => Color::srgb(0.2, 0.5, 0.85),
        SegmentKind::UpperArm(_) | SegmentKind::LowerArm(_) => Color::srgb(0.3, 0.65, 0.9),
        SegmentKind::UpperLeg(_) | SegmentKind::LowerLeg(_) => Color::srgb(0.15, 0.35, 0.6),
    }
}

fn shape_mesh(shape: &BodyShape) -> Mesh {
    match *shape {
        BodyShape::Circle { radius } => Circle::new(radius).into(),
        BodyShape::Rectangle { width, height } => Rectangle::new(width, height).into(),
    }
}

fn spawn_camera(mut commands: Commands, scene: Option<Res<SceneConfig>>) {
    let center = scene.map(|s| s.center()).unwrap_or_default();
    commands.spawn((Camera2d, Transform::from_translation(center.extend(999.0))));
}

fn spawn_overlay(mut commands: Commands) {
    commands.spawn((
        StandingTimeText,
        Text::new(standing_time_label(&StandingState::default())),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));

    commands.spawn((
        GoalText,
        Text::new(""),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::srgb(0.3, 0.9, 0.4)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(40.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));
}

/// Give every new body a mesh matching its collision shape.
fn attach_body_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    q_bodies: Query<(Entity, &BodyShape, Option<&Segment>, Has<Boundary>), Without<Mesh2d>>,
) {
    for (entity, shape, segment, is_boundary) in &q_bodies {
        let color = match segment {
            Some(segment) => segment_color(segment.kind),
            None if is_boundary => Color::srgb(0.3, 0.3, 0.3),
            None => Color::srgb(0.6, 0.6, 0.6),
        };
        commands.entity(entity).insert((
            Mesh2d(meshes.add(shape_mesh(shape))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(color))),
        ));
    }
}

fn update_overlay(
    state: Option<Res<StandingState>>,
    mut q_time: Query<&mut Text, (With<StandingTimeText>, Without<GoalText>)>,
    mut q_goal: Query<&mut Text, (With<GoalText>, Without<StandingTimeText>)>,
) {
    let Some(state) = state else {
        return;
    };
    if !state.is_changed() {
        return;
    }

    for mut text in &mut q_time {
        text.0 = standing_time_label(&state);
    }
    for mut text in &mut q_goal {
        text.0 = goal_label(&state).unwrap_or_default().to_string();
    }
}
