//! Drag-release classification.
//!
//! When a window drag ends, the hand's exit displacement decides what
//! happens to the window:
//!
//! ```text
//!   total / arm <= threshold            -> nothing
//!   |dx| / total > direction_ratio      -> snap left / right (sign of dx)
//!   otherwise                           -> maximize (dy < 0) / minimize
//! ```

use handwave_types::Rect;

pub const DEFAULT_THRESHOLD: f64 = 10.0;
pub const DEFAULT_DIRECTION_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlingAction {
    None,
    SnapLeft,
    SnapRight,
    Maximize,
    Minimize,
}

impl FlingAction {
    /// Work-area half a snap lands on.
    pub fn snap_target(self, work_area: Rect) -> Option<Rect> {
        let half = work_area.width / 2.0;
        match self {
            FlingAction::SnapLeft => Some(Rect::new(
                work_area.x,
                work_area.y,
                half,
                work_area.height,
            )),
            FlingAction::SnapRight => Some(Rect::new(
                work_area.x + half,
                work_area.y,
                half,
                work_area.height,
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingClassifier {
    /// Minimum `total / arm_length` for any action.
    pub threshold: f64,
    /// `|dx| / total` above which a release counts as horizontal.
    pub direction_ratio: f64,
}

impl Default for FlingClassifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            direction_ratio: DEFAULT_DIRECTION_RATIO,
        }
    }
}

impl FlingClassifier {
    pub fn new(threshold: f64, direction_ratio: f64) -> Self {
        Self {
            threshold,
            direction_ratio,
        }
    }

    /// Classify an exit displacement `(dx, dy)` in screen pixels.
    ///
    /// A non-positive or non-finite `arm_length` never flings.
    pub fn classify(&self, dx: f64, dy: f64, arm_length: f32) -> FlingAction {
        let arm = f64::from(arm_length);
        if !arm.is_finite() || arm <= 0.0 {
            return FlingAction::None;
        }
        let total = dx.hypot(dy);
        if total / arm <= self.threshold {
            return FlingAction::None;
        }
        if dx.abs() / total > self.direction_ratio {
            if dx > 0.0 {
                FlingAction::SnapRight
            } else {
                FlingAction::SnapLeft
            }
        } else if dy < 0.0 {
            FlingAction::Maximize
        } else {
            FlingAction::Minimize
        }
    }
}
