//! Gesture segments – one predicate step of a multi-step gesture.
//!
//! [`Segment::evaluate`] is a pure function of the current [`PoseFrame`],
//! the shared [`InteractionContext`] and the instance's
//! [`CarriedMeasurements`].  Missing joints make a predicate fail; nothing in
//! here returns an error.
//!
//! # Families
//!
//! | Variant | Succeeds when |
//! |---|---|
//! | [`Segment::Pose`] | every joint comparison holds and the hand shape matches |
//! | [`Segment::Baseline`] | the guard holds; records hand → reference distance |
//! | [`Segment::Strike`] | the guard holds and the distance moved more than baseline / 12 |
//! | [`Segment::HandState`] | the selected hand has the expected shape |

use handwave_types::{HandState, JointId, PoseFrame, Side};

use crate::context::{CarriedMeasurements, InteractionContext};

/// A strike must change the hand → reference distance by more than
/// `baseline / STRIKE_THRESHOLD_DIVISOR`.
pub const STRIKE_THRESHOLD_DIVISOR: f32 = 12.0;

// ─────────────────────────────────────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentResult {
    Succeeded,
    Failed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Joint addressing
// ─────────────────────────────────────────────────────────────────────────────

/// Which hand(s) a segment is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandSelector {
    Fixed(Side),
    /// Try the right hand, then the left; the first that satisfies wins.
    Either,
    /// The hand recorded by an earlier segment of the same instance.
    Carried,
    /// [`InteractionContext::signal_hand`].
    Signal,
    /// [`InteractionContext::active_hand`].
    Active,
}

impl HandSelector {
    fn candidates(self, ctx: &InteractionContext, carried: &CarriedMeasurements) -> Vec<Side> {
        match self {
            HandSelector::Fixed(side) => vec![side],
            HandSelector::Either => vec![Side::Right, Side::Left],
            HandSelector::Carried => carried.hand.into_iter().collect(),
            HandSelector::Signal => vec![ctx.signal_hand],
            HandSelector::Active => vec![ctx.active_hand],
        }
    }
}

/// A joint on the side being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limb {
    Hand,
    Elbow,
    Shoulder,
    Hip,
}

impl Limb {
    pub fn on(self, side: Side) -> JointId {
        match self {
            Limb::Hand => side.hand(),
            Limb::Elbow => side.elbow(),
            Limb::Shoulder => side.shoulder(),
            Limb::Hip => side.hip(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointRef {
    /// A specific joint regardless of the evaluated side.
    Joint(JointId),
    /// A joint resolved against the evaluated side.
    Own(Limb),
}

impl JointRef {
    pub const HAND: JointRef = JointRef::Own(Limb::Hand);
    pub const ELBOW: JointRef = JointRef::Own(Limb::Elbow);
    pub const SHOULDER: JointRef = JointRef::Own(Limb::Shoulder);
    pub const HIP: JointRef = JointRef::Own(Limb::Hip);

    fn resolve(self, side: Side) -> JointId {
        match self {
            JointRef::Joint(id) => id,
            JointRef::Own(limb) => limb.on(side),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// `lhs.axis (> | <) rhs.axis`, both strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub lhs: JointRef,
    pub axis: Axis,
    pub greater: bool,
    pub rhs: JointRef,
}

impl Comparison {
    pub fn above(lhs: JointRef, rhs: JointRef) -> Self {
        Self { lhs, axis: Axis::Y, greater: true, rhs }
    }

    pub fn below(lhs: JointRef, rhs: JointRef) -> Self {
        Self { lhs, axis: Axis::Y, greater: false, rhs }
    }

    pub fn right_of(lhs: JointRef, rhs: JointRef) -> Self {
        Self { lhs, axis: Axis::X, greater: true, rhs }
    }

    pub fn left_of(lhs: JointRef, rhs: JointRef) -> Self {
        Self { lhs, axis: Axis::X, greater: false, rhs }
    }

    fn holds(&self, frame: &PoseFrame, side: Side) -> bool {
        let (Some(a), Some(b)) = (
            frame.joint(self.lhs.resolve(side)),
            frame.joint(self.rhs.resolve(side)),
        ) else {
            return false;
        };
        let (a, b) = match self.axis {
            Axis::X => (a.x, b.x),
            Axis::Y => (a.y, b.y),
            Axis::Z => (a.z, b.z),
        };
        if self.greater { a > b } else { a < b }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Positional predicate
// ─────────────────────────────────────────────────────────────────────────────

/// A conjunction of joint comparisons plus an optional hand shape, evaluated
/// for the hand(s) chosen by a [`HandSelector`].
#[derive(Debug, Clone, PartialEq)]
pub struct PosePredicate {
    pub hand: HandSelector,
    pub comparisons: Vec<Comparison>,
    pub hand_state: Option<HandState>,
}

impl PosePredicate {
    pub fn new(hand: HandSelector) -> Self {
        Self {
            hand,
            comparisons: Vec::new(),
            hand_state: None,
        }
    }

    pub fn require(mut self, comparison: Comparison) -> Self {
        self.comparisons.push(comparison);
        self
    }

    pub fn with_state(mut self, state: HandState) -> Self {
        self.hand_state = Some(state);
        self
    }

    fn holds_for(&self, frame: &PoseFrame, side: Side) -> bool {
        if let Some(expected) = self.hand_state
            && frame.hand_state(side) != expected
        {
            return false;
        }
        self.comparisons.iter().all(|c| c.holds(frame, side))
    }

    /// The first candidate side for which the predicate holds.
    pub fn matching_side(
        &self,
        frame: &PoseFrame,
        ctx: &InteractionContext,
        carried: &CarriedMeasurements,
    ) -> Option<Side> {
        self.hand
            .candidates(ctx, carried)
            .into_iter()
            .find(|&side| self.holds_for(frame, side))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Segment
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeDirection {
    /// Distance grows: the hand moves away from the reference joint.
    Outward,
    /// Distance shrinks: the hand pulls back toward the reference joint.
    Retracting,
}

/// One step of a gesture definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Pose(PosePredicate),
    /// Records `distance(hand, reference)` as the instance's baseline.
    Baseline { guard: PosePredicate, reference: Limb },
    /// Compares `distance(hand, reference)` against the carried baseline.
    Strike {
        guard: PosePredicate,
        reference: Limb,
        direction: StrikeDirection,
    },
    HandState { hand: HandSelector, expected: HandState },
}

impl Segment {
    pub fn evaluate(
        &self,
        frame: &PoseFrame,
        ctx: &InteractionContext,
        carried: &mut CarriedMeasurements,
    ) -> SegmentResult {
        let side = match self {
            Segment::Pose(predicate) => predicate.matching_side(frame, ctx, carried),

            Segment::Baseline { guard, reference } => {
                guard.matching_side(frame, ctx, carried).and_then(|side| {
                    let distance = frame.distance(side.hand(), reference.on(side))?;
                    carried.baseline = Some(distance);
                    Some(side)
                })
            }

            Segment::Strike {
                guard,
                reference,
                direction,
            } => guard.matching_side(frame, ctx, carried).filter(|&side| {
                let Some(distance) = frame.distance(side.hand(), reference.on(side)) else {
                    return false;
                };
                // A zero baseline gives a zero threshold: any movement in the
                // strike direction succeeds.
                let baseline = carried.baseline.unwrap_or(0.0);
                let delta = distance - baseline;
                let threshold = baseline / STRIKE_THRESHOLD_DIVISOR;
                match direction {
                    StrikeDirection::Outward => delta > threshold,
                    StrikeDirection::Retracting => delta < -threshold,
                }
            }),

            Segment::HandState { hand, expected } => hand
                .candidates(ctx, carried)
                .into_iter()
                .find(|&side| frame.hand_state(side) == *expected),
        };

        match side {
            Some(side) => {
                carried.hand = Some(side);
                SegmentResult::Succeeded
            }
            None => SegmentResult::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use handwave_types::Point3;

    use super::*;
    use crate::fixtures::{hand_at, standing_body};

    fn raised_right_closed() -> Segment {
        Segment::Pose(
            PosePredicate::new(HandSelector::Fixed(Side::Right))
                .require(Comparison::above(JointRef::HAND, JointRef::ELBOW))
                .require(Comparison::right_of(JointRef::HAND, JointRef::SHOULDER))
                .with_state(HandState::Closed),
        )
    }

    fn signal_guard(state: HandState) -> PosePredicate {
        PosePredicate::new(HandSelector::Signal)
            .require(Comparison::above(JointRef::HAND, JointRef::ELBOW))
            .with_state(state)
    }

    /// Right arm laid out along X so the hand → shoulder distance is exact.
    fn arm_with_hand_x(x: f32) -> PoseFrame {
        PoseFrame::new()
            .with_joint(JointId::ShoulderRight, Point3::new(0.0, 0.0, 0.0))
            .with_joint(JointId::ElbowRight, Point3::new(6.0, -1.0, 0.0))
            .with_joint(JointId::HandRight, Point3::new(x, 0.0, 0.0))
            .with_hand_state(Side::Right, HandState::Closed)
    }

    fn outward() -> Segment {
        Segment::Strike {
            guard: signal_guard(HandState::Closed),
            reference: Limb::Shoulder,
            direction: StrikeDirection::Outward,
        }
    }

    fn retracting() -> Segment {
        Segment::Strike {
            guard: signal_guard(HandState::Closed),
            reference: Limb::Shoulder,
            direction: StrikeDirection::Retracting,
        }
    }

    fn baseline_segment() -> Segment {
        Segment::Baseline {
            guard: signal_guard(HandState::Closed),
            reference: Limb::Shoulder,
        }
    }

    #[test]
    fn pose_segment_requires_every_comparison() {
        let ctx = InteractionContext::default();
        let mut carried = CarriedMeasurements::default();
        let seg = raised_right_closed();

        let good = hand_at(Side::Right, 0.35, 0.3, HandState::Closed);
        assert_eq!(seg.evaluate(&good, &ctx, &mut carried), SegmentResult::Succeeded);
        assert_eq!(carried.hand, Some(Side::Right));

        // Raised but inside the shoulder line.
        let inside = hand_at(Side::Right, 0.1, 0.3, HandState::Closed);
        assert_eq!(seg.evaluate(&inside, &ctx, &mut carried), SegmentResult::Failed);

        // Position right, shape wrong.
        let open = hand_at(Side::Right, 0.35, 0.3, HandState::Open);
        assert_eq!(seg.evaluate(&open, &ctx, &mut carried), SegmentResult::Failed);
    }

    #[test]
    fn missing_joint_fails_instead_of_erroring() {
        let ctx = InteractionContext::default();
        let mut carried = CarriedMeasurements::default();
        let mut frame = hand_at(Side::Right, 0.35, 0.3, HandState::Closed);
        frame.joints.remove(&JointId::ElbowRight);
        assert_eq!(
            raised_right_closed().evaluate(&frame, &ctx, &mut carried),
            SegmentResult::Failed
        );
    }

    #[test]
    fn either_selector_prefers_right_and_records_side() {
        let ctx = InteractionContext::default();
        let seg = Segment::Pose(
            PosePredicate::new(HandSelector::Either)
                .require(Comparison::above(JointRef::HAND, JointRef::Joint(JointId::Head))),
        );

        let mut carried = CarriedMeasurements::default();
        let left_up = hand_at(Side::Left, 0.0, 0.8, HandState::Closed);
        assert_eq!(seg.evaluate(&left_up, &ctx, &mut carried), SegmentResult::Succeeded);
        assert_eq!(carried.hand, Some(Side::Left));

        let both_up = left_up.with_joint(JointId::HandRight, Point3::new(0.0, 0.9, 2.0));
        assert_eq!(seg.evaluate(&both_up, &ctx, &mut carried), SegmentResult::Succeeded);
        assert_eq!(carried.hand, Some(Side::Right));
    }

    #[test]
    fn carried_selector_fails_without_a_recorded_hand() {
        let ctx = InteractionContext::default();
        let seg = Segment::Pose(PosePredicate::new(HandSelector::Carried));
        let mut carried = CarriedMeasurements::default();
        assert_eq!(
            seg.evaluate(&standing_body(), &ctx, &mut carried),
            SegmentResult::Failed
        );
        carried.hand = Some(Side::Left);
        assert_eq!(
            seg.evaluate(&standing_body(), &ctx, &mut carried),
            SegmentResult::Succeeded
        );
    }

    #[test]
    fn hand_state_segment_ignores_position() {
        let mut ctx = InteractionContext::default();
        ctx.active_hand = Side::Left;
        let seg = Segment::HandState {
            hand: HandSelector::Active,
            expected: HandState::Open,
        };
        let mut carried = CarriedMeasurements::default();

        let open_left = standing_body().with_hand_state(Side::Left, HandState::Open);
        assert_eq!(seg.evaluate(&open_left, &ctx, &mut carried), SegmentResult::Succeeded);

        let open_right = standing_body().with_hand_state(Side::Right, HandState::Open);
        assert_eq!(seg.evaluate(&open_right, &ctx, &mut carried), SegmentResult::Failed);
    }

    #[test]
    fn baseline_records_distance_when_guard_holds() {
        let ctx = InteractionContext::default();
        let mut carried = CarriedMeasurements::default();
        let result = baseline_segment().evaluate(&arm_with_hand_x(12.0), &ctx, &mut carried);
        assert_eq!(result, SegmentResult::Succeeded);
        assert_eq!(carried.baseline, Some(12.0));

        let mut carried = CarriedMeasurements::default();
        let lowered = arm_with_hand_x(12.0).with_joint(JointId::HandRight, Point3::new(12.0, -2.0, 0.0));
        assert_eq!(
            baseline_segment().evaluate(&lowered, &ctx, &mut carried),
            SegmentResult::Failed
        );
        assert_eq!(carried.baseline, None);
    }

    #[test]
    fn outward_strike_boundary_is_exclusive() {
        let ctx = InteractionContext::default();
        let mut carried = CarriedMeasurements {
            baseline: Some(12.0),
            hand: None,
        };
        // delta == 12 / 12 exactly.
        assert_eq!(
            outward().evaluate(&arm_with_hand_x(13.0), &ctx, &mut carried),
            SegmentResult::Failed
        );
        assert_eq!(
            outward().evaluate(&arm_with_hand_x(13.25), &ctx, &mut carried),
            SegmentResult::Succeeded
        );
    }

    #[test]
    fn retracting_strike_needs_a_decrease() {
        let ctx = InteractionContext::default();
        let mut carried = CarriedMeasurements {
            baseline: Some(12.0),
            hand: None,
        };
        assert_eq!(
            retracting().evaluate(&arm_with_hand_x(13.5), &ctx, &mut carried),
            SegmentResult::Failed
        );
        assert_eq!(
            retracting().evaluate(&arm_with_hand_x(11.0), &ctx, &mut carried),
            SegmentResult::Failed
        );
        assert_eq!(
            retracting().evaluate(&arm_with_hand_x(10.5), &ctx, &mut carried),
            SegmentResult::Succeeded
        );
    }

    #[test]
    fn strike_scales_with_arm_length() {
        let ctx = InteractionContext::default();
        // The same 1.5 unit push passes for a short arm and fails for a long one.
        let mut short = CarriedMeasurements {
            baseline: Some(12.0),
            hand: None,
        };
        assert_eq!(
            outward().evaluate(&arm_with_hand_x(13.5), &ctx, &mut short),
            SegmentResult::Succeeded
        );
        let mut long = CarriedMeasurements {
            baseline: Some(24.0),
            hand: None,
        };
        assert_eq!(
            outward().evaluate(&arm_with_hand_x(25.5), &ctx, &mut long),
            SegmentResult::Failed
        );
    }

    #[test]
    fn zero_baseline_accepts_any_outward_motion() {
        let ctx = InteractionContext::default();
        let mut carried = CarriedMeasurements::default();

        // Hand exactly on the shoulder records a zero baseline.
        assert_eq!(
            baseline_segment().evaluate(&arm_with_hand_x(0.0), &ctx, &mut carried),
            SegmentResult::Succeeded
        );
        assert_eq!(carried.baseline, Some(0.0));

        // No motion: 0 > 0 is false.
        assert_eq!(
            outward().evaluate(&arm_with_hand_x(0.0), &ctx, &mut carried),
            SegmentResult::Failed
        );
        // The smallest positive motion clears the zero threshold.
        assert_eq!(
            outward().evaluate(&arm_with_hand_x(0.001), &ctx, &mut carried),
            SegmentResult::Succeeded
        );
    }
}
