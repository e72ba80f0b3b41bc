//! [`ModeController`] – the single exclusive continuous-control mode.
//!
//! | Completion | Transition |
//! |---|---|
//! | `window-drag-start` | → `WindowDrag`, active hand = recorded hand |
//! | `cursor-start` | → `CursorControl`, active hand = recorded hand |
//! | `scroll-{up,down}-start` | → `ScrollUp` / `ScrollDown` |
//! | `volume-{up,down}-start` | → `VolumeUp` / `VolumeDown` |
//! | `window-drag-end` | `WindowDrag` → `Idle`, arms the fling check |
//! | `cursor-end` / `scroll-end` / `volume-end` | matching mode → `Idle` |
//!
//! Entering a different mode re-arms the last-point reset and restarts the
//! repeat counter.  Entering the mode that is already active changes
//! nothing.
//!
//! `WindowDrag` and `CursorControl` hold the active hand: while either is on,
//! only its own end gesture and the event-only gestures (wave, knock, slap,
//! poke) are matched.  A fist carried past the shoulder mid-drag therefore
//! cannot start scrolling, and a swing across the body cannot fire
//! pause/play.

use std::fmt;

use handwave_gestures::{Completion, InteractionContext};
use handwave_motion::RepeatThrottle;
use handwave_types::{GestureKind, HandwaveError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    CursorControl,
    WindowDrag,
    ScrollUp,
    ScrollDown,
    VolumeUp,
    VolumeDown,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::CursorControl => "cursor_control",
            Mode::WindowDrag => "window_drag",
            Mode::ScrollUp => "scroll_up",
            Mode::ScrollDown => "scroll_down",
            Mode::VolumeUp => "volume_up",
            Mode::VolumeDown => "volume_down",
        }
    }

    pub fn is_scroll(self) -> bool {
        matches!(self, Mode::ScrollUp | Mode::ScrollDown)
    }

    pub fn is_volume(self) -> bool {
        matches!(self, Mode::VolumeUp | Mode::VolumeDown)
    }

    /// Modes driven by the active hand's position.
    pub fn holds_hand(self) -> bool {
        matches!(self, Mode::WindowDrag | Mode::CursorControl)
    }

    /// Whether matchers of `kind` run while this mode is active.
    ///
    /// End gestures only run in the mode they end.  Start and one-shot
    /// gestures are paused while a hand-holding mode is on.  Event-only
    /// gestures always run.
    pub fn activates(self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::WindowDragEnd => self == Mode::WindowDrag,
            GestureKind::CursorEnd => self == Mode::CursorControl,
            GestureKind::ScrollEnd => self.is_scroll(),
            GestureKind::VolumeEnd => self.is_volume(),
            GestureKind::Wave | GestureKind::Knock | GestureKind::Slap | GestureKind::Poke => true,
            _ => !self.holds_hand(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = HandwaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Mode::Idle,
            Mode::CursorControl,
            Mode::WindowDrag,
            Mode::ScrollUp,
            Mode::ScrollDown,
            Mode::VolumeUp,
            Mode::VolumeDown,
        ]
        .into_iter()
        .find(|m| m.as_str() == s)
        .ok_or_else(|| HandwaveError::Config(format!("unknown mode '{s}'")))
    }
}

/// A mode change caused by a completion or a control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

#[derive(Debug, Clone)]
pub struct ModeController {
    mode: Mode,
    check_for_fling: bool,
    scroll_scale: u32,
    volume_scale: u32,
    repeat: RepeatThrottle,
}

impl ModeController {
    pub fn new(scroll_scale: u32, volume_scale: u32) -> Self {
        Self {
            mode: Mode::Idle,
            check_for_fling: false,
            scroll_scale,
            volume_scale,
            repeat: RepeatThrottle::new(0),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn fling_pending(&self) -> bool {
        self.check_for_fling
    }

    /// Consume the one-shot fling check.
    pub fn take_fling_check(&mut self) -> bool {
        std::mem::take(&mut self.check_for_fling)
    }

    /// Switch to `mode`.  Returns `None` when it is already active.
    pub fn enter(&mut self, mode: Mode, ctx: &mut InteractionContext) -> Option<Transition> {
        if mode == self.mode {
            return None;
        }
        let transition = Transition {
            from: self.mode,
            to: mode,
        };
        self.mode = mode;
        if mode != Mode::Idle {
            // A pending fling belongs to the drag that just ended.
            self.check_for_fling = false;
        }
        ctx.request_point_reset();
        let scale = if mode.is_scroll() {
            self.scroll_scale
        } else if mode.is_volume() {
            self.volume_scale
        } else {
            0
        };
        self.repeat = RepeatThrottle::new(scale);
        debug!(from = %transition.from, to = %transition.to, "mode changed");
        Some(transition)
    }

    /// Apply one gesture completion.
    pub fn on_completion(
        &mut self,
        completion: &Completion,
        ctx: &mut InteractionContext,
    ) -> Option<Transition> {
        let target = match completion.kind {
            GestureKind::WindowDragStart => Mode::WindowDrag,
            GestureKind::CursorStart => Mode::CursorControl,
            GestureKind::ScrollUpStart => Mode::ScrollUp,
            GestureKind::ScrollDownStart => Mode::ScrollDown,
            GestureKind::VolumeUpStart => Mode::VolumeUp,
            GestureKind::VolumeDownStart => Mode::VolumeDown,
            GestureKind::WindowDragEnd if self.mode == Mode::WindowDrag => {
                let transition = self.enter(Mode::Idle, ctx);
                self.check_for_fling = true;
                return transition;
            }
            GestureKind::CursorEnd if self.mode == Mode::CursorControl => Mode::Idle,
            GestureKind::ScrollEnd if self.mode.is_scroll() => Mode::Idle,
            GestureKind::VolumeEnd if self.mode.is_volume() => Mode::Idle,
            _ => return None,
        };

        let previous_hand = ctx.active_hand;
        let transition = self.enter(target, ctx)?;
        if matches!(target, Mode::WindowDrag | Mode::CursorControl) {
            ctx.active_hand = completion.hand.unwrap_or(previous_hand);
        }
        Some(transition)
    }

    /// Advance the repeat counter; `true` when the mode's command fires.
    pub fn repeat_tick(&mut self, normalized: f32) -> bool {
        self.repeat.tick(normalized)
    }

    pub fn repeat_counter(&self) -> u64 {
        self.repeat.counter()
    }
}
