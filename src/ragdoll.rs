//! The stickman: ten segments wired together by nine joints.
//!
//! [`RagdollBlueprint`] is pure data. [`RagdollBlueprint::build`] places it at
//! an origin, and [`spawn_ragdoll`] registers the result with a physics
//! backend.

use bevy::prelude::*;

use crate::backend::RagdollPhysicsBackend;
use crate::body::{BodyKind, BodyMaterial, BodyShape};
use crate::error::RagdollError;

/// Left or right side of the body, as seen by the viewer.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Identity of a ragdoll segment.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Head,
    Torso,
    UpperArm(Side),
    LowerArm(Side),
    UpperLeg(Side),
    LowerLeg(Side),
}

impl SegmentKind {
    /// The canonical segment order.
    pub const ALL: [SegmentKind; 10] = [
        SegmentKind::Head,
        SegmentKind::Torso,
        SegmentKind::UpperArm(Side::Left),
        SegmentKind::UpperArm(Side::Right),
        SegmentKind::LowerArm(Side::Left),
        SegmentKind::LowerArm(Side::Right),
        SegmentKind::UpperLeg(Side::Left),
        SegmentKind::UpperLeg(Side::Right),
        SegmentKind::LowerLeg(Side::Left),
        SegmentKind::LowerLeg(Side::Right),
    ];
}

/// Marks an entity as one rigid segment of the ragdoll.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct Segment {
    pub kind: SegmentKind,
}

/// Marks a joint entity created for the ragdoll.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct RagdollJoint {
    pub parent: SegmentKind,
    pub child: SegmentKind,
    pub stiffness: f32,
}

/// Description of one segment, relative to the ragdoll origin (head center).
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct SegmentSpec {
    pub kind: SegmentKind,
    pub offset: Vec2,
    pub shape: BodyShape,
    pub material: BodyMaterial,
}

/// Description of one joint.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct JointSpec {
    pub parent: SegmentKind,
    pub child: SegmentKind,
    /// Attachment point in the parent's local frame.
    pub anchor_parent: Vec2,
    /// Attachment point in the child's local frame.
    pub anchor_child: Vec2,
    /// Rest distance between the anchors; 0 makes it a pin.
    pub length: f32,
    /// 1.0 is rigid, lower values let the joint stretch.
    pub stiffness: f32,
}

impl JointSpec {
    fn pin(
        parent: SegmentKind,
        anchor_parent: Vec2,
        child: SegmentKind,
        anchor_child: Vec2,
        stiffness: f32,
    ) -> Self {
        Self {
            parent,
            child,
            anchor_parent,
            anchor_child,
            length: 0.0,
            stiffness,
        }
    }
}

/// A segment placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPlacement {
    pub spec: SegmentSpec,
    pub position: Vec2,
}

const HEAD_RADIUS: f32 = 15.0;
const TORSO_SIZE: Vec2 = Vec2::new(20.0, 60.0);
const ARM_SIZE: Vec2 = Vec2::new(30.0, 10.0);
const LEG_SIZE: Vec2 = Vec2::new(10.0, 40.0);

const NECK_STIFFNESS: f32 = 1.0;
const ARM_STIFFNESS: f32 = 0.7;
const LEG_STIFFNESS: f32 = 0.8;

/// Topology, dimensions and materials of a ragdoll.
#[derive(Resource, Reflect, Debug, Clone, PartialEq)]
#[reflect(Resource)]
pub struct RagdollBlueprint {
    pub segments: Vec<SegmentSpec>,
    pub joints: Vec<JointSpec>,
}

impl Default for RagdollBlueprint {
    fn default() -> Self {
        Self::canonical()
    }
}

impl RagdollBlueprint {
    /// The stickman: head, torso, two-part arms and two-part legs.
    pub fn canonical() -> Self {
        let limb = BodyMaterial::default();
        let core = limb.with_restitution(0.5);

        let mut segments = vec![
            SegmentSpec {
                kind: SegmentKind::Head,
                offset: Vec2::ZERO,
                shape: BodyShape::circle(HEAD_RADIUS),
                material: core,
            },
            SegmentSpec {
                kind: SegmentKind::Torso,
                offset: Vec2::new(0.0, -60.0),
                shape: BodyShape::rectangle(TORSO_SIZE.x, TORSO_SIZE.y),
                material: core,
            },
        ];

        let arm = BodyShape::rectangle(ARM_SIZE.x, ARM_SIZE.y);
        let leg = BodyShape::rectangle(LEG_SIZE.x, LEG_SIZE.y);
        let limbs: [(fn(Side) -> SegmentKind, Vec2, BodyShape); 4] = [
            (SegmentKind::UpperArm, Vec2::new(30.0, -60.0), arm),
            (SegmentKind::LowerArm, Vec2::new(50.0, -80.0), arm),
            (SegmentKind::UpperLeg, Vec2::new(10.0, -110.0), leg),
            (SegmentKind::LowerLeg, Vec2::new(10.0, -160.0), leg),
        ];
        for (kind, offset, shape) in limbs {
            for side in [Side::Left, Side::Right] {
                segments.push(SegmentSpec {
                    kind: kind(side),
                    offset: Vec2::new(offset.x * side.sign(), offset.y),
                    shape,
                    material: limb,
                });
            }
        }

        let half_torso = TORSO_SIZE / 2.0;
        let half_arm = ARM_SIZE.x / 2.0;
        let half_leg = LEG_SIZE.y / 2.0;

        let mut joints = vec![JointSpec::pin(
            SegmentKind::Head,
            Vec2::new(0.0, -HEAD_RADIUS),
            SegmentKind::Torso,
            Vec2::new(0.0, half_torso.y),
            NECK_STIFFNESS,
        )];
        for side in [Side::Left, Side::Right] {
            let s = side.sign();
            // Arms hang off the shoulders; the inner end of each arm part is
            // the one closer to the torso.
            joints.push(JointSpec::pin(
                SegmentKind::Torso,
                Vec2::new(half_torso.x * s, half_torso.y - 5.0),
                SegmentKind::UpperArm(side),
                Vec2::new(-half_arm * s, 0.0),
                ARM_STIFFNESS,
            ));
            joints.push(JointSpec::pin(
                SegmentKind::UpperArm(side),
                Vec2::new(half_arm * s, 0.0),
                SegmentKind::LowerArm(side),
                Vec2::new(-half_arm * s, 0.0),
                ARM_STIFFNESS,
            ));
        }
        for side in [Side::Left, Side::Right] {
            let s = side.sign();
            joints.push(JointSpec::pin(
                SegmentKind::Torso,
                Vec2::new(half_torso.x / 2.0 * s, -half_torso.y),
                SegmentKind::UpperLeg(side),
                Vec2::new(0.0, half_leg),
                LEG_STIFFNESS,
            ));
            joints.push(JointSpec::pin(
                SegmentKind::UpperLeg(side),
                Vec2::new(0.0, -half_leg),
                SegmentKind::LowerLeg(side),
                Vec2::new(0.0, half_leg),
                LEG_STIFFNESS,
            ));
        }

        Self { segments, joints }
    }

    /// Look up a segment description by kind.
    pub fn segment(&self, kind: SegmentKind) -> Option<&SegmentSpec> {
        self.segments.iter().find(|s| s.kind == kind)
    }

    /// Check that the blueprint can be handed to a physics backend.
    pub fn validate(&self) -> Result<(), RagdollError> {
        for (i, segment) in self.segments.iter().enumerate() {
            if !segment.shape.is_valid() {
                return Err(RagdollError::NonPositiveDimension { kind: segment.kind });
            }
            if !segment.material.is_valid() {
                return Err(RagdollError::InvalidMaterial { kind: segment.kind });
            }
            if self.segments[..i].iter().any(|s| s.kind == segment.kind) {
                return Err(RagdollError::DuplicateSegment { kind: segment.kind });
            }
        }

        for joint in &self.joints {
            let (parent, child) = (joint.parent, joint.child);
            if self.segment(parent).is_none() || self.segment(child).is_none() {
                return Err(RagdollError::MissingSegment { parent, child });
            }
            if !(0.0..=1.0).contains(&joint.stiffness) {
                return Err(RagdollError::StiffnessOutOfRange {
                    parent,
                    child,
                    stiffness: joint.stiffness,
                });
            }
            if joint.length < 0.0 {
                return Err(RagdollError::NegativeJointLength {
                    parent,
                    child,
                    length: joint.length,
                });
            }
        }

        for side in [Side::Left, Side::Right] {
            let foot = SegmentKind::LowerLeg(side);
            if self.segment(foot).is_none() {
                return Err(RagdollError::MissingFoot(foot));
            }
        }

        Ok(())
    }

    /// Place every segment relative to `origin` (the head center).
    pub fn build(&self, origin: Vec2) -> (Vec<SegmentPlacement>, Vec<JointSpec>) {
        let placements = self
            .segments
            .iter()
            .map(|spec| SegmentPlacement {
                spec: *spec,
                position: origin + spec.offset,
            })
            .collect();
        (placements, self.joints.clone())
    }
}

/// Entities of the live ragdoll.
#[derive(Resource, Debug, Clone)]
pub struct Ragdoll {
    /// Segment entities in blueprint order.
    pub segments: Vec<(SegmentKind, Entity)>,
    pub joints: Vec<Entity>,
    pub left_foot: Entity,
    pub right_foot: Entity,
}

impl Ragdoll {
    pub fn segment(&self, kind: SegmentKind) -> Option<Entity> {
        self.segments
            .iter()
            .find_map(|&(k, e)| (k == kind).then_some(e))
    }
}

/// Validate `blueprint`, create its bodies and joints through the backend and
/// store the resulting [`Ragdoll`] resource.
pub fn spawn_ragdoll<B: RagdollPhysicsBackend>(
    world: &mut World,
    blueprint: &RagdollBlueprint,
    origin: Vec2,
) -> Result<Ragdoll, RagdollError> {
    blueprint.validate()?;
    let (placements, joints) = blueprint.build(origin);

    let mut segments = Vec::with_capacity(placements.len());
    for placement in placements {
        let spec = placement.spec;
        let transform = Transform::from_translation(placement.position.extend(1.0));
        let entity = world
            .spawn((
                Name::new(format!("{:?}", spec.kind)),
                Segment { kind: spec.kind },
                spec.shape,
                transform,
                GlobalTransform::from(transform),
            ))
            .id();
        B::insert_body(world, entity, spec.shape, spec.material, BodyKind::Dynamic);
        segments.push((spec.kind, entity));
    }

    let find = |kind: SegmentKind| {
        segments
            .iter()
            .find_map(|&(k, e)| (k == kind).then_some(e))
    };

    let mut joint_entities = Vec::with_capacity(joints.len());
    for joint in &joints {
        // Both ends exist, validate() checked.
        let (Some(parent), Some(child)) = (find(joint.parent), find(joint.child)) else {
            return Err(RagdollError::MissingSegment {
                parent: joint.parent,
                child: joint.child,
            });
        };
        let entity = B::insert_joint(world, joint, parent, child);
        world.entity_mut(entity).insert(RagdollJoint {
            parent: joint.parent,
            child: joint.child,
            stiffness: joint.stiffness,
        });
        joint_entities.push(entity);
    }

    let foot = |side| {
        let kind = SegmentKind::LowerLeg(side);
        find(kind).ok_or(RagdollError::MissingFoot(kind))
    };
    let ragdoll = Ragdoll {
        left_foot: foot(Side::Left)?,
        right_foot: foot(Side::Right)?,
        segments,
        joints: joint_entities,
    };

    info!(
        "Spawned ragdoll with {} segments and {} joints at {:?}",
        ragdoll.segments.len(),
        ragdoll.joints.len(),
        origin
    );
    world.insert_resource(ragdoll.clone());
    Ok(ragdoll)
}

/// Remove every ragdoll segment and joint from the world.
pub fn despawn_ragdoll(world: &mut World) {
    let Some(ragdoll) = world.remove_resource::<Ragdoll>() else {
        return;
    };
    for entity in ragdoll
        .joints
        .into_iter()
        .chain(ragdoll.segments.into_iter().map(|(_, e)| e))
    {
        world.despawn(entity);
    }
}
