//! Stickman Example
//!
//! A ragdoll drops into a walled box and gets shaken by random pushes every
//! frame. The overlay shows how long both feet have stayed on the ground;
//! after three seconds the goal banner appears.
//!
//! ## Controls
//! - **R**: Restart the ragdoll
//! - **C**: Toggle the random controller
//!
//! ## Running
//! ```bash
//! cargo run --example stickman
//! ```

use avian2d::prelude::*;
use bevy::prelude::*;
use stickman_ragdoll::prelude::*;

// ==================== Constants ====================

const PX_PER_M: f32 = 10.0;

// ==================== Main ====================

fn main() {
    let scene = SceneConfig::default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Stickman Ragdoll".into(),
                resolution: (scene.width as u32 + 40, scene.height as u32 + 40).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.86, 0.86, 0.86)))
        .insert_resource(scene)
        // Physics
        .add_plugins(PhysicsPlugins::default().with_length_unit(PX_PER_M))
        // Ragdoll simulation and its renderer
        .add_plugins(RagdollPlugin::<Avian2dBackend>::default())
        .add_plugins(RagdollRenderPlugin)
        // Systems
        .add_systems(Update, (handle_input, log_goals))
        .run();
}

// ==================== Systems ====================

fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut restart: MessageWriter<RestartRagdoll>,
    mut controller: ResMut<ControllerConfig>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        restart.write(RestartRagdoll);
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        controller.enabled = !controller.enabled;
        info!(
            "Controller {}",
            if controller.enabled { "enabled" } else { "disabled" }
        );
    }
}

fn log_goals(mut goals: MessageReader<GoalAchieved>) {
    for goal in goals.read() {
        info!(
            "Success! Stood for {:.2} sec",
            goal.standing_time.as_secs_f32()
        );
    }
}
