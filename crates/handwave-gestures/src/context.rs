//! Session-wide and per-instance gesture state.
//!
//! Segments never keep state of their own.  Anything that has to survive
//! from one frame to the next is held in one of two explicit bags that the
//! caller passes into every evaluation:
//!
//! - [`InteractionContext`] – shared by every gesture type for the whole
//!   session (signal hand, active drag/cursor hand, last observed screen
//!   point).
//! - [`CarriedMeasurements`] – owned by exactly one
//!   [`GestureMatcher`][crate::matcher::GestureMatcher] and cleared whenever
//!   that matcher resets.

use handwave_types::{ScreenPoint, Side};

/// Cross-gesture interaction state that outlives any single matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionContext {
    /// Hand used by the distance-based strike gestures.
    pub signal_hand: Side,
    /// Hand currently driving the cursor or a window drag.
    pub active_hand: Side,
    /// Last observed display-space position of the active hand.
    pub last_point: Option<ScreenPoint>,
    /// Last observed depth of the active hand (sensor metres).
    pub last_depth: f32,
    /// One-shot flag: the next observation re-seeds `last_point` instead of
    /// producing a delta.
    pub reset_last_point: bool,
}

impl Default for InteractionContext {
    fn default() -> Self {
        Self::new(Side::Right)
    }
}

/// Displacement of the active hand between two consecutive observations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandDelta {
    pub dx: f64,
    pub dy: f64,
    pub dz: f32,
}

impl InteractionContext {
    pub fn new(signal_hand: Side) -> Self {
        Self {
            signal_hand,
            active_hand: Side::Right,
            last_point: None,
            last_depth: 0.0,
            reset_last_point: true,
        }
    }

    /// Arm the one-shot reset so the first tick of a new mode yields a zero
    /// delta.
    pub fn request_point_reset(&mut self) {
        self.reset_last_point = true;
    }

    /// Record a new observation of the active hand and return its
    /// displacement since the previous observation.
    pub fn observe_hand(&mut self, point: ScreenPoint, depth: f32) -> HandDelta {
        let (last, last_depth) = match self.last_point {
            Some(last) if !self.reset_last_point => (last, self.last_depth),
            _ => (point, depth),
        };
        self.reset_last_point = false;
        self.last_point = Some(point);
        self.last_depth = depth;
        HandDelta {
            dx: point.x - last.x,
            dy: point.y - last.y,
            dz: depth - last_depth,
        }
    }

    /// Displacement from the last observation to `point` without recording
    /// it.  `None` when nothing has been observed yet.
    pub fn displacement_to(&self, point: ScreenPoint) -> Option<(f64, f64)> {
        self.last_point.map(|last| (point.x - last.x, point.y - last.y))
    }
}

/// Measurements carried between the segments of one gesture instance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CarriedMeasurements {
    /// Signal hand → reference joint distance recorded by a baseline segment.
    pub baseline: Option<f32>,
    /// Hand that satisfied the most recent segment.
    pub hand: Option<Side>,
}

impl CarriedMeasurements {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
