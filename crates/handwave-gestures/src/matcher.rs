//! [`GestureMatcher`] – the per-gesture sequence state machine.
//!
//! ```text
//!            seg[0] ok                 seg[k] ok (k < len-1)
//!   Idle ───────────────▶ Awaiting(1) ──────────────▶ Awaiting(k+1)
//!    ▲                         │                            │
//!    │        any seg fails    │      seg[len-1] ok         │
//!    └─────────────────────────┴──── (emit Completion) ─────┘
//! ```
//!
//! There is no grace period and no timeout: one failed frame discards all
//! progress (and the carried measurements), and an instance in `Awaiting`
//! waits for as long as frames keep satisfying nothing but the current
//! segment's predicate.

use std::sync::Arc;

use handwave_types::{GestureKind, HandwaveError, PoseFrame, Side};
use tracing::{debug, trace};

use crate::context::{CarriedMeasurements, InteractionContext};
use crate::segment::{Segment, SegmentResult};

/// An immutable, non-empty sequence of segments for one gesture type.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureDefinition {
    kind: GestureKind,
    segments: Vec<Segment>,
}

impl GestureDefinition {
    /// Build a definition from a runtime list of segments.
    ///
    /// # Errors
    ///
    /// Returns [`HandwaveError::Config`] when `segments` is empty.
    pub fn new(kind: GestureKind, segments: Vec<Segment>) -> Result<Self, HandwaveError> {
        if segments.is_empty() {
            return Err(HandwaveError::Config(format!(
                "gesture '{kind}' needs at least one segment"
            )));
        }
        Ok(Self { kind, segments })
    }

    /// Build a definition whose first segment is given separately, so the
    /// sequence is non-empty by construction.
    pub fn sequence(
        kind: GestureKind,
        first: Segment,
        rest: impl IntoIterator<Item = Segment>,
    ) -> Self {
        let mut segments = vec![first];
        segments.extend(rest);
        Self { kind, segments }
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; definitions are never empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Signal emitted on the frame that satisfies a gesture's last segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub kind: GestureKind,
    /// Hand that satisfied the final segment.
    pub hand: Option<Side>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherState {
    Idle,
    /// Waiting for the segment at this index (≥ 1).
    Awaiting(usize),
}

/// One running instance of a [`GestureDefinition`].
///
/// Matchers of different gesture types share no progress; the only state
/// they have in common is the [`InteractionContext`] passed to
/// [`GestureMatcher::update`].
#[derive(Debug, Clone)]
pub struct GestureMatcher {
    definition: Arc<GestureDefinition>,
    cursor: usize,
    carried: CarriedMeasurements,
}

impl GestureMatcher {
    pub fn new(definition: Arc<GestureDefinition>) -> Self {
        Self {
            definition,
            cursor: 0,
            carried: CarriedMeasurements::default(),
        }
    }

    pub fn kind(&self) -> GestureKind {
        self.definition.kind
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn carried(&self) -> &CarriedMeasurements {
        &self.carried
    }

    pub fn state(&self) -> MatcherState {
        match self.cursor {
            0 => MatcherState::Idle,
            k => MatcherState::Awaiting(k),
        }
    }

    /// Evaluate the awaited segment against `frame`.
    ///
    /// Returns `Some` on exactly the frame that completes the gesture; the
    /// matcher is back at cursor 0 when this returns.
    pub fn update(&mut self, frame: &PoseFrame, ctx: &InteractionContext) -> Option<Completion> {
        let segments = &self.definition.segments;
        match segments[self.cursor].evaluate(frame, ctx, &mut self.carried) {
            SegmentResult::Succeeded if self.cursor + 1 == segments.len() => {
                let completion = Completion {
                    kind: self.definition.kind,
                    hand: self.carried.hand,
                };
                debug!(gesture = %completion.kind, hand = ?completion.hand, "gesture recognized");
                self.reset();
                Some(completion)
            }
            SegmentResult::Succeeded => {
                self.cursor += 1;
                trace!(gesture = %self.definition.kind, cursor = self.cursor, "segment satisfied");
                None
            }
            SegmentResult::Failed => {
                if self.cursor > 0 {
                    trace!(gesture = %self.definition.kind, cursor = self.cursor, "progress discarded");
                }
                self.reset();
                None
            }
        }
    }

    /// Return to [`MatcherState::Idle`] and drop carried measurements.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.carried.clear();
    }
}
