//! Errors raised while validating a ragdoll blueprint or scene before spawning.

use crate::ragdoll::SegmentKind;

/// Configuration errors surfaced before the simulation starts.
///
/// None of these can occur once the frame loop is running; the per-frame
/// systems have no failure branches.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RagdollError {
    #[error("segment {kind:?} has a non-positive dimension")]
    NonPositiveDimension { kind: SegmentKind },
    #[error("segment {kind:?} appears more than once in the blueprint")]
    DuplicateSegment { kind: SegmentKind },
    #[error("segment {kind:?} has invalid material (density must be > 0, friction and restitution >= 0)")]
    InvalidMaterial { kind: SegmentKind },
    #[error("joint {parent:?} -> {child:?} references a segment missing from the blueprint")]
    MissingSegment {
        parent: SegmentKind,
        child: SegmentKind,
    },
    #[error("joint {parent:?} -> {child:?} has stiffness {stiffness} outside [0, 1]")]
    StiffnessOutOfRange {
        parent: SegmentKind,
        child: SegmentKind,
        stiffness: f32,
    },
    #[error("joint {parent:?} -> {child:?} has negative length {length}")]
    NegativeJointLength {
        parent: SegmentKind,
        child: SegmentKind,
        length: f32,
    },
    #[error("blueprint has no {0:?} segment to track as a foot")]
    MissingFoot(SegmentKind),
    #[error("scene of {width}x{height} cannot hold boundaries of thickness {thickness}")]
    InvalidScene {
        width: f32,
        height: f32,
        thickness: f32,
    },
}
