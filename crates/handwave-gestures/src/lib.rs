//! `handwave-gestures` – online, frame-by-frame gesture sequence recognition.
//!
//! A gesture is an ordered list of [`Segment`][segment::Segment] predicates.
//! A [`GestureMatcher`][matcher::GestureMatcher] walks that list one frame at
//! a time: every satisfied segment advances its cursor, any failed segment
//! throws away all progress, and satisfying the last segment emits a single
//! [`Completion`][matcher::Completion].
//!
//! # Modules
//!
//! - [`context`] – [`InteractionContext`][context::InteractionContext], the
//!   cross-gesture session state, and
//!   [`CarriedMeasurements`][context::CarriedMeasurements], the per-instance
//!   bag that carries a baseline from one segment to a later one.
//! - [`segment`] – the segment families: positional relations, baseline and
//!   strike-threshold segments, and hand-state terminators.
//! - [`matcher`] – [`GestureDefinition`][matcher::GestureDefinition] and the
//!   [`GestureMatcher`][matcher::GestureMatcher] state machine.
//! - [`library`] – the built-in gesture set (wave, drag, cursor, scroll,
//!   volume, pause/play, hide/show all, knock, slap, poke).

pub mod context;
pub mod library;
pub mod matcher;
pub mod segment;

pub use context::{CarriedMeasurements, HandDelta, InteractionContext};
pub use matcher::{Completion, GestureDefinition, GestureMatcher, MatcherState};
pub use segment::{
    Axis, Comparison, HandSelector, JointRef, Limb, PosePredicate, Segment, SegmentResult,
    StrikeDirection,
};
