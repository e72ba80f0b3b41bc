//! Distance-dependent repeat throttle for scroll and volume.
//!
//! The further the driving hand is held from its shoulder, the more often
//! the command repeats:
//!
//! ```text
//!   nd    = clamp(|hand.y - shoulder.y| / reach, 0, 1)
//!   delay = floor((1 - nd) * K) + 1
//!   fire  = counter % delay == 0
//! ```

use handwave_types::{PoseFrame, Side};

pub const SCROLL_DELAY_SCALE: u32 = 10;
pub const VOLUME_DELAY_SCALE: u32 = 20;

/// Vertical hand-to-shoulder offset on `side` as a fraction of the arm's
/// reach (shoulder → elbow → hand).
///
/// `None` when a joint is missing or the reach is not positive.
pub fn normalized_reach(frame: &PoseFrame, side: Side) -> Option<f32> {
    let hand = frame.joint(side.hand())?;
    let shoulder = frame.joint(side.shoulder())?;
    let reach = frame.distance(side.shoulder(), side.elbow())?
        + frame.distance(side.elbow(), side.hand())?;
    if !reach.is_finite() || reach <= 0.0 {
        return None;
    }
    Some(((hand.y - shoulder.y).abs() / reach).clamp(0.0, 1.0))
}

/// Tick counter for one continuous mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatThrottle {
    scale: u32,
    counter: u64,
}

impl RepeatThrottle {
    pub fn new(scale: u32) -> Self {
        Self { scale, counter: 0 }
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Restart counting, e.g. on entering a mode.
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Ticks between repeats for a normalized distance in `[0, 1]`.
    pub fn delay(&self, normalized: f32) -> u64 {
        let nd = f64::from(normalized.clamp(0.0, 1.0));
        ((1.0 - nd) * f64::from(self.scale)).floor() as u64 + 1
    }

    /// Advance one tick; `true` when the command should be issued.
    pub fn tick(&mut self, normalized: f32) -> bool {
        let fire = self.counter % self.delay(normalized) == 0;
        self.counter += 1;
        fire
    }
}
