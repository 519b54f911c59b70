//! Stability monitor: how long both feet have been on the ground.
//!
//! The timer is wall-clock based: it accumulates the fixed timestep's
//! `Duration`, so the threshold is reached after the same simulated time at
//! any tick rate. The goal flag is re-derived from the timer every frame and
//! drops as soon as a foot leaves the ground.

use std::time::Duration;

use bevy::prelude::*;

use crate::backend::RagdollPhysicsBackend;
use crate::body::BodyShape;
use crate::config::{SceneConfig, StandingConfig};
use crate::ragdoll::Ragdoll;

/// Continuous standing time and whether it has reached the threshold.
#[derive(Resource, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Resource)]
pub struct StandingState {
    pub duration: Duration,
    pub achieved: bool,
}

/// Fired once each time the ragdoll reaches the standing threshold.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct GoalAchieved {
    pub standing_time: Duration,
}

/// Whether a foot at `foot_y` touches the ground whose surface is at `ground_y`.
///
/// Anything at or below the contact line counts, including feet that sank
/// into the ground.
pub fn is_grounded(config: &StandingConfig, foot_y: f32, ground_y: f32) -> bool {
    foot_y <= config.contact_line(ground_y)
}

impl StandingState {
    /// Advance the state by one frame and return the new state.
    pub fn update(
        &mut self,
        config: &StandingConfig,
        delta: Duration,
        left_foot_y: f32,
        right_foot_y: f32,
        ground_y: f32,
    ) -> StandingState {
        let grounded =
            is_grounded(config, left_foot_y, ground_y) && is_grounded(config, right_foot_y, ground_y);

        if grounded {
            self.duration += delta;
            self.achieved = self.duration >= config.threshold;
        } else {
            self.reset();
        }
        *self
    }

    /// Back to zero, as on restart.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn seconds(&self) -> f32 {
        self.duration.as_secs_f32()
    }
}

/// Foot contact point of a lower leg: the bottom of its shape in world space.
fn foot_y<B: RagdollPhysicsBackend>(world: &World, entity: Entity) -> Option<f32> {
    let shape = world.get::<BodyShape>(entity)?;
    let position = B::get_position(world, entity);
    let rotation = B::get_rotation(world, entity);
    Some(shape.bottom_point(position, rotation).y)
}

/// Check both feet against the ground and advance the standing timer.
pub fn monitor_standing<B: RagdollPhysicsBackend>(world: &mut World) {
    let Some(ragdoll) = world.get_resource::<Ragdoll>() else {
        return;
    };
    let (left, right) = (ragdoll.left_foot, ragdoll.right_foot);
    let (Some(left_y), Some(right_y)) = (foot_y::<B>(world, left), foot_y::<B>(world, right))
    else {
        return;
    };
    let Some(ground_y) = world.get_resource::<SceneConfig>().map(|s| s.ground_surface()) else {
        return;
    };
    let config = world
        .get_resource::<StandingConfig>()
        .copied()
        .unwrap_or_default();
    let delta = world.resource::<Time>().delta();

    let (was_achieved, now) = {
        let mut state = world.get_resource_or_init::<StandingState>();
        let was_achieved = state.achieved;
        (was_achieved, state.update(&config, delta, left_y, right_y, ground_y))
    };

    if now.achieved && !was_achieved {
        info!("Goal achieved: standing for {:.2} sec", now.seconds());
        world.write_message(GoalAchieved {
            standing_time: now.duration,
        });
    } else if was_achieved && !now.achieved {
        debug!("Lost footing after reaching the goal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: f32 = 20.0;
    const ON_GROUND: f32 = GROUND + 10.0;
    const IN_AIR: f32 = GROUND + 40.0;

    fn tick() -> Duration {
        Duration::from_millis(100)
    }

    #[test]
    fn grounded_predicate() {
        let config = StandingConfig::default();
        assert!(is_grounded(&config, ON_GROUND, GROUND));
        // Within tolerance, inclusive.
        assert!(is_grounded(&config, GROUND + 15.0, GROUND));
        assert!(!is_grounded(&config, GROUND + 15.01, GROUND));
        // Below the surface still counts.
        assert!(is_grounded(&config, GROUND - 30.0, GROUND));
    }

    #[test]
    fn tolerance_widens_contact_line() {
        let strict = StandingConfig::default().with_tolerance(0.0);
        let loose = StandingConfig::default().with_tolerance(20.0);
        let foot = GROUND + 12.0;
        assert!(!is_grounded(&strict, foot, GROUND));
        assert!(is_grounded(&loose, foot, GROUND));
        assert_eq!(
            StandingConfig::default().with_tolerance(-3.0).tolerance,
            0.0
        );
    }

    #[test]
    fn duration_grows_while_grounded() {
        let config = StandingConfig::default();
        let mut state = StandingState::default();
        let mut previous = Duration::ZERO;
        for _ in 0..20 {
            let now = state.update(&config, tick(), ON_GROUND, ON_GROUND, GROUND);
            assert!(now.duration > previous);
            previous = now.duration;
        }
        assert_eq!(state.duration, Duration::from_secs(2));
    }

    #[test]
    fn resets_to_zero_on_first_lift() {
        let config = StandingConfig::default();
        let mut state = StandingState::default();
        for _ in 0..10 {
            state.update(&config, tick(), ON_GROUND, ON_GROUND, GROUND);
        }
        let now = state.update(&config, tick(), ON_GROUND, IN_AIR, GROUND);
        assert_eq!(now.duration, Duration::ZERO);
        assert!(!now.achieved);
    }

    #[test]
    fn achieved_exactly_at_threshold() {
        let config = StandingConfig::default();
        let mut state = StandingState::default();
        for frame in 1..=30 {
            let now = state.update(&config, tick(), ON_GROUND, ON_GROUND, GROUND);
            assert_eq!(now.achieved, frame == 30, "frame {frame}");
        }
        assert_eq!(state.duration, Duration::from_millis(3000));
    }

    #[test]
    fn interruption_before_threshold_starts_over() {
        let config = StandingConfig::default();
        let mut state = StandingState::default();
        for _ in 0..25 {
            state.update(&config, tick(), ON_GROUND, ON_GROUND, GROUND);
        }
        state.update(&config, tick(), IN_AIR, ON_GROUND, GROUND);
        assert_eq!(state.duration, Duration::ZERO);

        // Another 25 frames is not enough on its own.
        for _ in 0..25 {
            state.update(&config, tick(), ON_GROUND, ON_GROUND, GROUND);
        }
        assert!(!state.achieved);
        assert_eq!(state.duration, Duration::from_millis(2500));
    }

    #[test]
    fn achieved_is_not_sticky() {
        let config = StandingConfig::default();
        let mut state = StandingState::default();
        for _ in 0..40 {
            state.update(&config, tick(), ON_GROUND, ON_GROUND, GROUND);
        }
        assert!(state.achieved);

        let now = state.update(&config, tick(), IN_AIR, IN_AIR, GROUND);
        assert!(!now.achieved);
        assert_eq!(now.duration, Duration::ZERO);
    }

    #[test]
    fn custom_threshold() {
        let config = StandingConfig::default().with_threshold(Duration::from_millis(250));
        let mut state = StandingState::default();
        state.update(&config, tick(), ON_GROUND, ON_GROUND, GROUND);
        state.update(&config, tick(), ON_GROUND, ON_GROUND, GROUND);
        assert!(!state.achieved);
        state.update(&config, tick(), ON_GROUND, ON_GROUND, GROUND);
        assert!(state.achieved);
    }

    #[cfg(feature = "avian2d")]
    mod goal_messages {
        use super::*;
        use crate::backend::Avian2dBackend;
        use crate::ragdoll::{Ragdoll, SegmentKind, Side};
        use bevy::ecs::system::RunSystemOnce;

        // Lower legs are 40 tall, so a center at 40 puts the sole on the
        // default ground surface (20).
        const FOOT_ON_GROUND: f32 = 40.0;
        const FOOT_IN_AIR: f32 = 100.0;

        fn spawn_foot(world: &mut World, x: f32) -> Entity {
            world
                .spawn((
                    BodyShape::rectangle(10.0, 40.0),
                    Transform::from_xyz(x, FOOT_ON_GROUND, 0.0),
                ))
                .id()
        }

        fn setup() -> (World, Entity) {
            let mut world = World::new();
            world.insert_resource(SceneConfig::default());
            world.insert_resource(
                StandingConfig::default().with_threshold(Duration::from_millis(500)),
            );
            world.init_resource::<Time>();
            world.init_resource::<Messages<GoalAchieved>>();

            let left = spawn_foot(&mut world, 290.0);
            let right = spawn_foot(&mut world, 310.0);
            world.insert_resource(Ragdoll {
                segments: vec![
                    (SegmentKind::LowerLeg(Side::Left), left),
                    (SegmentKind::LowerLeg(Side::Right), right),
                ],
                joints: Vec::new(),
                left_foot: left,
                right_foot: right,
            });
            (world, right)
        }

        fn run_ticks(world: &mut World, ticks: usize) {
            for _ in 0..ticks {
                world.resource_mut::<Time>().advance_by(tick());
                world
                    .run_system_once(monitor_standing::<Avian2dBackend>)
                    .expect("system should run");
            }
        }

        fn goal_count(world: &World) -> usize {
            world.resource::<Messages<GoalAchieved>>().len()
        }

        fn set_foot_y(world: &mut World, foot: Entity, y: f32) {
            world
                .get_mut::<Transform>(foot)
                .expect("foot should exist")
                .translation
                .y = y;
        }

        #[test]
        fn fires_once_per_achievement() {
            let (mut world, right) = setup();

            run_ticks(&mut world, 4);
            assert_eq!(goal_count(&world), 0);

            run_ticks(&mut world, 1);
            assert!(world.resource::<StandingState>().achieved);
            assert_eq!(goal_count(&world), 1);

            // Staying on the ground does not fire again.
            run_ticks(&mut world, 10);
            assert_eq!(goal_count(&world), 1);

            set_foot_y(&mut world, right, FOOT_IN_AIR);
            run_ticks(&mut world, 1);
            assert!(!world.resource::<StandingState>().achieved);
            assert_eq!(goal_count(&world), 1);

            set_foot_y(&mut world, right, FOOT_ON_GROUND);
            run_ticks(&mut world, 5);
            assert_eq!(goal_count(&world), 2);
        }

        #[test]
        fn message_carries_standing_time() {
            let (mut world, _) = setup();
            run_ticks(&mut world, 5);

            let messages = world.resource::<Messages<GoalAchieved>>();
            let mut cursor = messages.get_cursor();
            let goals: Vec<_> = cursor.read(messages).copied().collect();
            assert_eq!(
                goals,
                vec![GoalAchieved {
                    standing_time: Duration::from_millis(500)
                }]
            );
        }
    }
}
