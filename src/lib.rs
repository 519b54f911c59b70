//! A 2D stickman ragdoll for Bevy.
//!
//! Ten rigid segments joined by nine pin joints fall into a walled box. Every
//! fixed tick a controller shakes each segment a little and nudges strays
//! back from the walls, while a monitor times how long both feet stay on the
//! ground. Rigid-body dynamics, constraints and collisions are delegated to a
//! physics backend ([`backend::Avian2dBackend`] by default).
//!
//! ```rust,no_run
//! use avian2d::prelude::*;
//! use bevy::prelude::*;
//! use stickman_ragdoll::prelude::*;
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(PhysicsPlugins::default().with_length_unit(10.0))
//!     .add_plugins(RagdollPlugin::<Avian2dBackend>::default())
//!     .add_plugins(RagdollRenderPlugin)
//!     .run();
//! ```

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod backend;
pub mod body;
pub mod config;
pub mod controller;
pub mod error;
pub mod forces;
pub mod monitor;
pub mod policy;
pub mod ragdoll;
pub mod render;
pub mod scene;

use backend::RagdollPhysicsBackend;
use config::{ControllerConfig, SceneConfig, StandingConfig};
use monitor::{GoalAchieved, StandingState};
use policy::{ControlPolicy, RandomPolicy};
use ragdoll::{RagdollBlueprint, despawn_ragdoll, spawn_ragdoll};

pub mod prelude {
    #[cfg(feature = "avian2d")]
    pub use crate::backend::Avian2dBackend;
    pub use crate::backend::RagdollPhysicsBackend;
    pub use crate::body::{BodyKind, BodyMaterial, BodyShape};
    pub use crate::config::{ControllerConfig, SceneConfig, StandingConfig};
    pub use crate::error::RagdollError;
    pub use crate::monitor::{GoalAchieved, StandingState};
    pub use crate::policy::{
        ControlPolicy, IdlePolicy, PerturbationPolicy, RandomPolicy, SegmentObservation,
    };
    pub use crate::ragdoll::{
        Ragdoll, RagdollBlueprint, RagdollJoint, Segment, SegmentKind, Side,
    };
    pub use crate::render::RagdollRenderPlugin;
    pub use crate::scene::{Boundary, BoundaryKind};
    pub use crate::{RagdollPlugin, RagdollSet, RestartRagdoll};
}

/// Phases of one fixed tick, run in order in `FixedUpdate`.
///
/// The physics step itself runs afterwards in `FixedPostUpdate`, so every
/// phase here observes the poses produced by the previous step.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RagdollSet {
    /// Backend bookkeeping: take last tick's forces back out.
    Preparation,
    /// Perturbation and boundary containment.
    Control,
    /// Foot contact check and standing timer.
    Monitor,
    /// Backend bookkeeping: hand accumulated forces to the physics engine.
    FinalApplication,
}

/// Request to tear down the ragdoll and start a fresh session.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RestartRagdoll;

/// Wires the ragdoll, its controller and the standing monitor into an app.
///
/// The physics engine itself is not added; add the backend's engine plugin
/// (for Avian, `PhysicsPlugins`) alongside this one. Configuration resources
/// inserted before this plugin is added are kept.
pub struct RagdollPlugin<B: RagdollPhysicsBackend> {
    seed: Option<u64>,
    _backend: PhantomData<B>,
}

impl<B: RagdollPhysicsBackend> Default for RagdollPlugin<B> {
    fn default() -> Self {
        Self {
            seed: None,
            _backend: PhantomData,
        }
    }
}

impl<B: RagdollPhysicsBackend> RagdollPlugin<B> {
    /// Seed the default random policy for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl<B: RagdollPhysicsBackend> Plugin for RagdollPlugin<B> {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControllerConfig>()
            .init_resource::<StandingConfig>()
            .init_resource::<SceneConfig>()
            .init_resource::<RagdollBlueprint>()
            .init_resource::<StandingState>()
            .add_message::<GoalAchieved>()
            .add_message::<RestartRagdoll>();

        if !app.world().contains_resource::<ControlPolicy>() {
            let policy = match self.seed {
                Some(seed) => RandomPolicy::seeded(seed),
                None => RandomPolicy::new(),
            };
            app.insert_resource(ControlPolicy::new(policy));
        }

        app.configure_sets(
            FixedUpdate,
            (
                RagdollSet::Preparation,
                RagdollSet::Control,
                RagdollSet::Monitor,
                RagdollSet::FinalApplication,
            )
                .chain(),
        );

        app.add_plugins(B::plugin());

        app.add_systems(Startup, setup_simulation::<B>);
        app.add_systems(
            FixedUpdate,
            (
                restart_ragdoll::<B>.in_set(RagdollSet::Preparation),
                controller::perturb_segments::<B>.in_set(RagdollSet::Control),
                monitor::monitor_standing::<B>.in_set(RagdollSet::Monitor),
            ),
        );
    }
}

/// Spawn boundaries and the ragdoll. Invalid configuration aborts startup.
fn setup_simulation<B: RagdollPhysicsBackend>(world: &mut World) -> Result {
    let scene = *world.resource::<SceneConfig>();
    let blueprint = world.resource::<RagdollBlueprint>().clone();

    scene::spawn_scene::<B>(world, &scene)?;
    spawn_ragdoll::<B>(world, &blueprint, scene.ragdoll_origin)?;
    Ok(())
}

/// Rebuild the ragdoll at its origin and reset the standing timer when a
/// [`RestartRagdoll`] message arrives.
fn restart_ragdoll<B: RagdollPhysicsBackend>(world: &mut World) {
    let requested = world
        .get_resource_mut::<Messages<RestartRagdoll>>()
        .is_some_and(|mut messages| messages.drain().count() > 0);
    if !requested {
        return;
    }

    despawn_ragdoll(world);
    world.resource_mut::<StandingState>().reset();

    let origin = world.resource::<SceneConfig>().ragdoll_origin;
    let blueprint = world.resource::<RagdollBlueprint>().clone();
    match spawn_ragdoll::<B>(world, &blueprint, origin) {
        Ok(_) => info!("Ragdoll restarted"),
        Err(err) => error!("Failed to restart ragdoll: {err}"),
    }
}
