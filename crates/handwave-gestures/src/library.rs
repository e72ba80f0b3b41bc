//! Built-in gesture definitions.
//!
//! Coordinates follow the sensor convention: `+Y` is up, `+X` is toward the
//! user's right shoulder.  "In the band" means horizontally between the two
//! shoulders.

use handwave_types::{GestureKind, HandState, JointId, Side};

use crate::matcher::GestureDefinition;
use crate::segment::{
    Comparison, HandSelector, JointRef, Limb, PosePredicate, Segment, StrikeDirection,
};

const HEAD: JointRef = JointRef::Joint(JointId::Head);
const SHOULDER_LEFT: JointRef = JointRef::Joint(JointId::ShoulderLeft);
const SHOULDER_RIGHT: JointRef = JointRef::Joint(JointId::ShoulderRight);

/// Every built-in gesture, one definition per [`GestureKind`].
pub fn standard_library() -> Vec<GestureDefinition> {
    vec![
        wave(),
        window_drag_start(),
        window_drag_end(),
        cursor_start(),
        cursor_end(),
        scroll_down_start(),
        scroll_up_start(),
        scroll_end(),
        volume_down_start(),
        volume_up_start(),
        volume_end(),
        pause_play(),
        hide_all(),
        show_all(),
        knock(),
        slap(),
        poke(),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Wave
// ─────────────────────────────────────────────────────────────────────────────

/// Right hand above the elbow, swinging across it three times.
pub fn wave() -> GestureDefinition {
    let outside = Segment::Pose(
        PosePredicate::new(HandSelector::Fixed(Side::Right))
            .require(Comparison::above(JointRef::HAND, JointRef::ELBOW))
            .require(Comparison::right_of(JointRef::HAND, JointRef::ELBOW)),
    );
    let inside = Segment::Pose(
        PosePredicate::new(HandSelector::Fixed(Side::Right))
            .require(Comparison::above(JointRef::HAND, JointRef::ELBOW))
            .require(Comparison::left_of(JointRef::HAND, JointRef::ELBOW)),
    );
    GestureDefinition::sequence(
        GestureKind::Wave,
        outside.clone(),
        [
            inside.clone(),
            outside.clone(),
            inside.clone(),
            outside,
            inside,
        ],
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Drag / cursor
// ─────────────────────────────────────────────────────────────────────────────

fn in_band(predicate: PosePredicate) -> PosePredicate {
    predicate
        .require(Comparison::left_of(JointRef::HAND, SHOULDER_RIGHT))
        .require(Comparison::right_of(JointRef::HAND, SHOULDER_LEFT))
}

/// Hand raised above the head in the band, then lowered below the head,
/// holding `shape` throughout.  The first segment records which hand.
fn raise_and_lower(kind: GestureKind, shape: HandState) -> GestureDefinition {
    let raise = in_band(
        PosePredicate::new(HandSelector::Either)
            .require(Comparison::above(JointRef::HAND, HEAD))
            .with_state(shape),
    );
    let lower = in_band(
        PosePredicate::new(HandSelector::Carried)
            .require(Comparison::below(JointRef::HAND, HEAD))
            .with_state(shape),
    );
    GestureDefinition::sequence(kind, Segment::Pose(raise), [Segment::Pose(lower)])
}

fn release(kind: GestureKind, hand: HandSelector) -> GestureDefinition {
    GestureDefinition::sequence(
        kind,
        Segment::HandState {
            hand,
            expected: HandState::Open,
        },
        [],
    )
}

pub fn window_drag_start() -> GestureDefinition {
    raise_and_lower(GestureKind::WindowDragStart, HandState::Closed)
}

pub fn window_drag_end() -> GestureDefinition {
    release(GestureKind::WindowDragEnd, HandSelector::Active)
}

pub fn cursor_start() -> GestureDefinition {
    raise_and_lower(GestureKind::CursorStart, HandState::Pointing)
}

pub fn cursor_end() -> GestureDefinition {
    release(GestureKind::CursorEnd, HandSelector::Active)
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll / volume
// ─────────────────────────────────────────────────────────────────────────────

/// Hand held out to its own side, above or below the shoulder.
fn side_hold(kind: GestureKind, side: Side, raised: bool, shape: HandState) -> GestureDefinition {
    let vertical = if raised {
        Comparison::above(JointRef::HAND, JointRef::SHOULDER)
    } else {
        Comparison::below(JointRef::HAND, JointRef::SHOULDER)
    };
    let outward = match side {
        Side::Right => Comparison::right_of(JointRef::HAND, JointRef::SHOULDER),
        Side::Left => Comparison::left_of(JointRef::HAND, JointRef::SHOULDER),
    };
    GestureDefinition::sequence(
        kind,
        Segment::Pose(
            PosePredicate::new(HandSelector::Fixed(side))
                .require(vertical)
                .require(outward)
                .with_state(shape),
        ),
        [],
    )
}

pub fn scroll_down_start() -> GestureDefinition {
    side_hold(GestureKind::ScrollDownStart, Side::Right, true, HandState::Closed)
}

pub fn scroll_up_start() -> GestureDefinition {
    side_hold(GestureKind::ScrollUpStart, Side::Right, false, HandState::Closed)
}

pub fn scroll_end() -> GestureDefinition {
    release(GestureKind::ScrollEnd, HandSelector::Fixed(Side::Right))
}

pub fn volume_down_start() -> GestureDefinition {
    side_hold(GestureKind::VolumeDownStart, Side::Left, true, HandState::Pointing)
}

pub fn volume_up_start() -> GestureDefinition {
    side_hold(GestureKind::VolumeUpStart, Side::Left, false, HandState::Pointing)
}

pub fn volume_end() -> GestureDefinition {
    release(GestureKind::VolumeEnd, HandSelector::Fixed(Side::Left))
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot commands
// ─────────────────────────────────────────────────────────────────────────────

/// Closed left fist swept from outside the left shoulder to inside it.
pub fn pause_play() -> GestureDefinition {
    let left = HandSelector::Fixed(Side::Left);
    GestureDefinition::sequence(
        GestureKind::PausePlay,
        Segment::Pose(
            PosePredicate::new(left)
                .require(Comparison::left_of(JointRef::HAND, JointRef::SHOULDER))
                .with_state(HandState::Closed),
        ),
        [Segment::Pose(
            PosePredicate::new(left)
                .require(Comparison::right_of(JointRef::HAND, JointRef::SHOULDER))
                .with_state(HandState::Closed),
        )],
    )
}

/// Both hands relative to a pair of same-side joints, right hand pointing.
fn both_hands(kind: GestureKind, reference: Limb, raised: bool) -> GestureDefinition {
    let compare = |side: Side| {
        let lhs = JointRef::Joint(side.hand());
        let rhs = JointRef::Joint(reference.on(side));
        if raised {
            Comparison::above(lhs, rhs)
        } else {
            Comparison::below(lhs, rhs)
        }
    };
    GestureDefinition::sequence(
        kind,
        Segment::Pose(
            PosePredicate::new(HandSelector::Fixed(Side::Right))
                .require(compare(Side::Right))
                .require(compare(Side::Left))
                .with_state(HandState::Pointing),
        ),
        [],
    )
}

pub fn hide_all() -> GestureDefinition {
    both_hands(GestureKind::HideAll, Limb::Shoulder, true)
}

pub fn show_all() -> GestureDefinition {
    both_hands(GestureKind::ShowAll, Limb::Hip, false)
}

// ─────────────────────────────────────────────────────────────────────────────
// Strikes
// ─────────────────────────────────────────────────────────────────────────────

fn strike_guard(shape: HandState) -> PosePredicate {
    PosePredicate::new(HandSelector::Signal)
        .require(Comparison::above(JointRef::HAND, JointRef::ELBOW))
        .with_state(shape)
}

fn strike(
    kind: GestureKind,
    shape: HandState,
    directions: &[StrikeDirection],
) -> GestureDefinition {
    GestureDefinition::sequence(
        kind,
        Segment::Baseline {
            guard: strike_guard(shape),
            reference: Limb::Shoulder,
        },
        directions.iter().map(|&direction| Segment::Strike {
            guard: strike_guard(shape),
            reference: Limb::Shoulder,
            direction,
        }),
    )
}

/// Closed fist pushed out, then pulled back.
pub fn knock() -> GestureDefinition {
    strike(
        GestureKind::Knock,
        HandState::Closed,
        &[StrikeDirection::Outward, StrikeDirection::Retracting],
    )
}

pub fn slap() -> GestureDefinition {
    strike(GestureKind::Slap, HandState::Open, &[StrikeDirection::Outward])
}

pub fn poke() -> GestureDefinition {
    strike(GestureKind::Poke, HandState::Pointing, &[StrikeDirection::Outward])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use handwave_types::{Point3, PoseFrame};

    use super::*;
    use crate::context::InteractionContext;
    use crate::fixtures::{hand_at, standing_body};
    use crate::matcher::{Completion, GestureMatcher};

    fn run(definition: GestureDefinition, frames: &[PoseFrame]) -> Vec<Completion> {
        let ctx = InteractionContext::default();
        let mut matcher = GestureMatcher::new(Arc::new(definition));
        frames
            .iter()
            .filter_map(|f| matcher.update(f, &ctx))
            .collect()
    }

    /// Signal (right) hand raised above the elbow, `distance` metres in front of
    /// the shoulder.
    fn reach(distance: f32, state: HandState) -> PoseFrame {
        standing_body()
            .with_joint(JointId::HandRight, Point3::new(0.2, 0.4, 2.0 - distance))
            .with_hand_state(Side::Right, state)
    }

    #[test]
    fn library_covers_every_kind_once() {
        let kinds: HashSet<_> = standard_library().iter().map(|d| d.kind()).collect();
        assert_eq!(kinds.len(), standard_library().len());
        assert_eq!(kinds.len(), 17);
    }

    #[test]
    fn wave_needs_three_swings() {
        let out = hand_at(Side::Right, 0.45, 0.3, HandState::Open);
        let inn = hand_at(Side::Right, 0.15, 0.3, HandState::Open);
        let frames = [
            out.clone(),
            inn.clone(),
            out.clone(),
            inn.clone(),
            out.clone(),
            inn.clone(),
        ];
        assert_eq!(run(wave(), &frames).len(), 1);
        assert!(run(wave(), &frames[..5]).is_empty());
    }

    #[test]
    fn drag_start_records_left_hand() {
        let frames = [
            hand_at(Side::Left, 0.0, 0.8, HandState::Closed),
            hand_at(Side::Left, 0.0, 0.3, HandState::Closed),
        ];
        let completions = run(window_drag_start(), &frames);
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].hand, Some(Side::Left));
    }

    #[test]
    fn cursor_start_requires_pointing() {
        let closed = [
            hand_at(Side::Right, 0.0, 0.8, HandState::Closed),
            hand_at(Side::Right, 0.0, 0.3, HandState::Closed),
        ];
        assert!(run(cursor_start(), &closed).is_empty());

        let pointing = [
            hand_at(Side::Right, 0.0, 0.8, HandState::Pointing),
            hand_at(Side::Right, 0.0, 0.3, HandState::Pointing),
        ];
        assert_eq!(run(cursor_start(), &pointing).len(), 1);
    }

    #[test]
    fn drag_start_rejects_hand_outside_band() {
        let frames = [
            hand_at(Side::Right, 0.5, 0.8, HandState::Closed),
            hand_at(Side::Right, 0.5, 0.3, HandState::Closed),
        ];
        assert!(run(window_drag_start(), &frames).is_empty());
    }

    #[test]
    fn scroll_and_volume_poses() {
        let right_high = hand_at(Side::Right, 0.5, 0.5, HandState::Closed);
        let right_low = hand_at(Side::Right, 0.5, 0.2, HandState::Closed);
        assert_eq!(run(scroll_down_start(), &[right_high.clone()]).len(), 1);
        assert!(run(scroll_up_start(), &[right_high]).is_empty());
        assert_eq!(run(scroll_up_start(), &[right_low]).len(), 1);

        let left_high = hand_at(Side::Left, -0.5, 0.5, HandState::Pointing);
        let left_low = hand_at(Side::Left, -0.5, 0.2, HandState::Pointing);
        assert_eq!(run(volume_down_start(), &[left_high]).len(), 1);
        assert_eq!(run(volume_up_start(), &[left_low]).len(), 1);

        let left_open = standing_body().with_hand_state(Side::Left, HandState::Open);
        assert_eq!(run(volume_end(), &[left_open.clone()]).len(), 1);
        assert!(run(scroll_end(), &[left_open]).is_empty());
    }

    #[test]
    fn pause_play_sweeps_across_left_shoulder() {
        let frames = [
            hand_at(Side::Left, -0.4, 0.0, HandState::Closed),
            hand_at(Side::Left, -0.1, 0.0, HandState::Closed),
        ];
        assert_eq!(run(pause_play(), &frames).len(), 1);
        let reversed = [frames[1].clone(), frames[0].clone()];
        assert!(run(pause_play(), &reversed).is_empty());
    }

    #[test]
    fn hide_and_show_all_need_both_hands() {
        let both_up = standing_body()
            .with_joint(JointId::HandRight, Point3::new(0.3, 0.7, 2.0))
            .with_joint(JointId::HandLeft, Point3::new(-0.3, 0.7, 2.0))
            .with_hand_state(Side::Right, HandState::Pointing);
        assert_eq!(run(hide_all(), &[both_up.clone()]).len(), 1);

        let one_up = both_up
            .clone()
            .with_joint(JointId::HandLeft, Point3::new(-0.3, 0.0, 2.0));
        assert!(run(hide_all(), &[one_up]).is_empty());

        let both_down = standing_body()
            .with_joint(JointId::HandRight, Point3::new(0.2, -0.4, 2.0))
            .with_joint(JointId::HandLeft, Point3::new(-0.2, -0.4, 2.0))
            .with_hand_state(Side::Right, HandState::Pointing);
        assert_eq!(run(show_all(), &[both_down]).len(), 1);
    }

    #[test]
    fn knock_pushes_out_then_back() {
        let frames = [
            reach(0.24, HandState::Closed),
            reach(0.30, HandState::Closed),
            reach(0.20, HandState::Closed),
        ];
        let completions = run(knock(), &frames);
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].kind, GestureKind::Knock);
        assert_eq!(completions[0].hand, Some(Side::Right));

        // Pushing out without pulling back never completes.
        let no_return = [
            reach(0.24, HandState::Closed),
            reach(0.30, HandState::Closed),
            reach(0.36, HandState::Closed),
        ];
        assert!(run(knock(), &no_return).is_empty());
    }

    #[test]
    fn slap_and_poke_differ_only_by_shape() {
        let open = [reach(0.24, HandState::Open), reach(0.30, HandState::Open)];
        let pointing = [reach(0.24, HandState::Pointing), reach(0.30, HandState::Pointing)];
        assert_eq!(run(slap(), &open).len(), 1);
        assert!(run(poke(), &open).is_empty());
        assert_eq!(run(poke(), &pointing).len(), 1);
    }
}
