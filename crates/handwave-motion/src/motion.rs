//! Window motion integration.
//!
//! A [`MotionController`] drives at most one window at a time through two
//! submodes:
//!
//! | Submode | Entry | Per tick |
//! |---|---|---|
//! | Seek | [`MotionController::seek`] | position set directly, velocity zero |
//! | Fling | [`MotionController::fling`] | `pos += v`, decay `v`, reflect at the work area |
//!
//! Decay is a fixed step count rather than a time constant: each tick every
//! axis loses [`DECAY_STEP`] up to [`MAX_DECAY_STEPS`] times.
//!
//! One deviation from a bare step loop: a component that falls to
//! [`REST_SPEED`] or below is set to exactly zero instead of keeping its
//! sub-step residue.  Without it a flung window would drift by a fraction of
//! a pixel per tick forever and [`MotionController::is_moving`] would never
//! turn false.
//!
//! # Example
//!
//! ```rust
//! use handwave_motion::motion::MotionController;
//! use handwave_types::{Rect, ScreenPoint, WindowId};
//!
//! let mut motion = MotionController::new(Rect::new(0.0, 0.0, 1920.0, 1040.0));
//! motion.attach(WindowId(1), Rect::new(500.0, 300.0, 400.0, 300.0));
//! motion.fling(ScreenPoint::new(0.0, 300.0));
//!
//! let first = motion.step().unwrap();
//! assert!(first.x < 500.0);
//! ```

use handwave_types::{Rect, ScreenPoint, ScreenSize, WindowId};
use tracing::debug;

/// Speed a fling starts at, in pixels per tick.
pub const MAX_SPEED: f64 = 30.0;
/// Goals closer than this produce no fling.
pub const GOAL_DEAD_ZONE: f64 = 5.0;
/// Velocity removed per decay step.
pub const DECAY_STEP: f64 = 0.01;
/// Decay steps applied per axis per tick.
pub const MAX_DECAY_STEPS: usize = 30;
/// Speeds at or below this are snapped to zero.
pub const REST_SPEED: f64 = DECAY_STEP;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { x: 0.0, y: 0.0 };

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Position, velocity and extent of the controlled window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub window: WindowId,
    /// Top-left corner.
    pub position: ScreenPoint,
    pub velocity: Velocity,
    pub width: f64,
    pub height: f64,
}

impl MotionState {
    pub fn new(window: WindowId, rect: Rect) -> Self {
        Self {
            window,
            position: ScreenPoint::new(rect.x, rect.y),
            velocity: Velocity::ZERO,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }
}

/// Hand-displacement scale: `max(H / arm, W / arm) / divisor`.
///
/// `None` when `arm_length` is not a positive finite number.
pub fn screen_scale(screen: ScreenSize, arm_length: f32, divisor: f64) -> Option<f64> {
    let arm = f64::from(arm_length);
    if !arm.is_finite() || arm <= 0.0 {
        return None;
    }
    Some((screen.height / arm).max(screen.width / arm) / divisor)
}

/// Step `v` toward zero by [`DECAY_STEP`], at most [`MAX_DECAY_STEPS`] times,
/// snapping to zero at [`REST_SPEED`].
fn decay(mut v: f64) -> f64 {
    for _ in 0..MAX_DECAY_STEPS {
        if v.abs() <= REST_SPEED {
            return 0.0;
        }
        v -= DECAY_STEP * v.signum();
    }
    v
}

/// Integrates the motion of a single controlled window.
#[derive(Debug, Clone)]
pub struct MotionController {
    work_area: Rect,
    state: Option<MotionState>,
}

impl MotionController {
    pub fn new(work_area: Rect) -> Self {
        Self {
            work_area,
            state: None,
        }
    }

    pub fn work_area(&self) -> Rect {
        self.work_area
    }

    pub fn set_work_area(&mut self, work_area: Rect) {
        self.work_area = work_area;
    }

    pub fn state(&self) -> Option<&MotionState> {
        self.state.as_ref()
    }

    pub fn window(&self) -> Option<WindowId> {
        self.state.map(|s| s.window)
    }

    /// Take control of `window`, replacing any previously held one.
    pub fn attach(&mut self, window: WindowId, rect: Rect) {
        debug!(%window, x = rect.x, y = rect.y, "motion attached");
        self.state = Some(MotionState::new(window, rect));
    }

    /// Drop the controlled window.
    pub fn release(&mut self) -> Option<MotionState> {
        self.state.take()
    }

    /// Refresh the window's extent (the user may resize it mid-fling).
    pub fn resize(&mut self, width: f64, height: f64) {
        if let Some(state) = self.state.as_mut() {
            state.width = width;
            state.height = height;
        }
    }

    /// Seek submode: move by an already-scaled delta and kill any velocity.
    ///
    /// Returns the new top-left corner, or `None` with nothing attached.
    pub fn seek(&mut self, dx: f64, dy: f64) -> Option<ScreenPoint> {
        let state = self.state.as_mut()?;
        state.position.x += dx;
        state.position.y += dy;
        state.velocity = Velocity::ZERO;
        Some(state.position)
    }

    /// Fling submode: launch toward `goal` at [`MAX_SPEED`].
    ///
    /// A goal within [`GOAL_DEAD_ZONE`] of the current position leaves the
    /// window at rest.
    pub fn fling(&mut self, goal: ScreenPoint) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let dx = goal.x - state.position.x;
        let dy = goal.y - state.position.y;
        let length = dx.hypot(dy);
        state.velocity = if length > GOAL_DEAD_ZONE {
            Velocity {
                x: dx / length * MAX_SPEED,
                y: dy / length * MAX_SPEED,
            }
        } else {
            Velocity::ZERO
        };
        debug!(window = %state.window, vx = state.velocity.x, vy = state.velocity.y, "fling");
    }

    pub fn is_moving(&self) -> bool {
        self.state.is_some_and(|s| !s.velocity.is_zero())
    }

    /// Advance one tick of fling integration.
    ///
    /// Returns the new top-left corner when the window moved.  The position
    /// is never clamped: leaving the work area flips the velocity component
    /// for that axis so the next tick travels back.
    pub fn step(&mut self) -> Option<ScreenPoint> {
        let area = self.work_area;
        let state = self.state.as_mut().filter(|s| !s.velocity.is_zero())?;

        state.position.x += state.velocity.x;
        state.position.y += state.velocity.y;

        state.velocity.x = decay(state.velocity.x);
        state.velocity.y = decay(state.velocity.y);

        let p = state.position;
        if p.x < area.x || p.x + state.width > area.right() {
            state.velocity.x = -state.velocity.x;
        }
        if p.y < area.y || p.y + state.height > area.bottom() {
            state.velocity.y = -state.velocity.y;
        }
        Some(p)
    }
}
