//! Engine tuning.

use std::fmt;
use std::str::FromStr;

use handwave_motion::fling::{DEFAULT_DIRECTION_RATIO, DEFAULT_THRESHOLD};
use handwave_motion::throttle::{SCROLL_DELAY_SCALE, VOLUME_DELAY_SCALE};
use handwave_types::{HandwaveError, Side};
use serde::{Deserialize, Serialize};

/// What a horizontal drag release does to the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlingStyle {
    /// Launch the window toward the target half and let it glide there.
    #[default]
    Momentum,
    /// Place the window on the target half immediately.
    Snap,
}

impl fmt::Display for FlingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlingStyle::Momentum => "momentum",
            FlingStyle::Snap => "snap",
        })
    }
}

impl FromStr for FlingStyle {
    type Err = HandwaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "momentum" => Ok(FlingStyle::Momentum),
            "snap" => Ok(FlingStyle::Snap),
            other => Err(HandwaveError::Config(format!(
                "unknown fling style '{other}' (expected 'momentum' or 'snap')"
            ))),
        }
    }
}

/// Configuration bundle for [`GestureEngine`][crate::engine::GestureEngine].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hand used by the knock, slap and poke gestures.
    pub signal_hand: Side,
    pub fling_style: FlingStyle,
    /// Minimum exit displacement / arm length for a release to do anything.
    pub fling_threshold: f64,
    /// Horizontal share of the exit displacement above which a release
    /// snaps left or right instead of maximizing or minimizing.
    pub fling_direction_ratio: f64,
    /// `K` in the scroll repeat delay.
    pub scroll_delay_scale: u32,
    /// `K` in the volume repeat delay.
    pub volume_delay_scale: u32,
    /// A cursor-mode push deeper than `arm / click_depth_divisor` clicks.
    pub click_depth_divisor: f32,
    /// Divisor of the hand-to-screen scale.
    pub seek_scale_divisor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            signal_hand: Side::Right,
            fling_style: FlingStyle::Momentum,
            fling_threshold: DEFAULT_THRESHOLD,
            fling_direction_ratio: DEFAULT_DIRECTION_RATIO,
            scroll_delay_scale: SCROLL_DELAY_SCALE,
            volume_delay_scale: VOLUME_DELAY_SCALE,
            click_depth_divisor: 15.0,
            seek_scale_divisor: 500.0,
        }
    }
}
