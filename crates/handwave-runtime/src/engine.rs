//! [`GestureEngine`] – per-frame orchestration.
//!
//! Each call to [`GestureEngine::tick`] processes one [`PoseFrame`] to
//! completion:
//!
//! 1. **Control** – apply every queued [`ControlRequest`].
//! 2. **Match** – feed the frame to every matcher the current mode
//!    activates; inactive matchers are held at their first segment.
//! 3. **Transition** – publish one [`GestureEvent`] per completion, let the
//!    [`ModeController`] react, and issue one-shot commands.
//! 4. **Continuous control** – cursor move/click, window seek, fling check,
//!    or throttled scroll/volume repeat, depending on the mode.
//! 5. **Integrate** – advance a flung window by one tick.
//!
//! Completions are gathered before any of them is applied, so every matcher
//! in a tick sees the same mode and context.
//!
//! # Example
//!
//! ```rust
//! use handwave_motion::SimDesktop;
//! use handwave_runtime::{EngineConfig, GestureEngine};
//! use handwave_types::{PoseFrame, ScreenSize};
//!
//! let desktop = SimDesktop::new(ScreenSize { width: 1920.0, height: 1080.0 });
//! let mut engine = GestureEngine::new(EngineConfig::default(), desktop);
//! let report = engine.tick(&PoseFrame::new()).expect("empty frame is harmless");
//! assert!(report.events.is_empty());
//! ```

use std::sync::Arc;

use handwave_gestures::library::standard_library;
use handwave_gestures::{Completion, GestureDefinition, GestureMatcher, InteractionContext};
use handwave_motion::motion::screen_scale;
use handwave_motion::throttle::normalized_reach;
use handwave_motion::{Desktop, FlingAction, FlingClassifier, MotionController};
use handwave_types::{
    DesktopIntent, GestureEvent, GestureKind, HandwaveError, MediaKey, PoseFrame, ScreenPoint,
    ScrollDirection, SensorTick, Side, WindowId, WindowState,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::bus::EventBus;
use crate::config::{EngineConfig, FlingStyle};
use crate::control::{ControlHandle, ControlQueue, ControlRequest, control_channel};
use crate::mode::{Mode, ModeController};

/// Everything one tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<GestureEvent>,
    pub intents: Vec<DesktopIntent>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.intents.is_empty()
    }

    pub fn has_event(&self, kind: GestureKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }
}

/// Screen position, depth and forearm length of one hand.
struct HandSample {
    point: ScreenPoint,
    depth: f32,
    arm: f32,
}

fn sample_hand(frame: &PoseFrame, side: Side) -> Option<HandSample> {
    let point = frame.projected(side.hand())?;
    let depth = frame.joint(side.hand())?.z;
    let arm = frame.distance(side.hand(), side.elbow())?;
    (arm.is_finite() && arm > 0.0).then_some(HandSample { point, depth, arm })
}

pub struct GestureEngine<D: Desktop> {
    config: EngineConfig,
    desktop: D,
    matchers: Vec<GestureMatcher>,
    ctx: InteractionContext,
    modes: ModeController,
    motion: MotionController,
    classifier: FlingClassifier,
    bus: EventBus,
    control: ControlQueue,
    handle: ControlHandle,
}

impl<D: Desktop> GestureEngine<D> {
    /// Engine running the built-in gesture library.
    pub fn new(config: EngineConfig, desktop: D) -> Self {
        Self::with_definitions(config, desktop, standard_library())
    }

    pub fn with_definitions(
        config: EngineConfig,
        desktop: D,
        definitions: impl IntoIterator<Item = GestureDefinition>,
    ) -> Self {
        let matchers = definitions
            .into_iter()
            .map(|d| GestureMatcher::new(Arc::new(d)))
            .collect();
        let (handle, control) = control_channel();
        Self {
            ctx: InteractionContext::new(config.signal_hand),
            modes: ModeController::new(config.scroll_delay_scale, config.volume_delay_scale),
            motion: MotionController::new(desktop.work_area()),
            classifier: FlingClassifier::new(config.fling_threshold, config.fling_direction_ratio),
            bus: EventBus::default(),
            matchers,
            control,
            handle,
            desktop,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn context(&self) -> &InteractionContext {
        &self.ctx
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn matchers(&self) -> &[GestureMatcher] {
        &self.matchers
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut D {
        &mut self.desktop
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// A handle for mutating the engine from other tasks.
    pub fn control_handle(&self) -> ControlHandle {
        self.handle.clone()
    }

    /// Tick against the nearest tracked body; `None` when nobody is tracked.
    ///
    /// # Errors
    ///
    /// See [`GestureEngine::tick`].
    pub fn process(&mut self, tick: &SensorTick) -> Result<Option<TickReport>, HandwaveError> {
        match tick.nearest_body() {
            Some(body) => self.tick(body).map(Some),
            None => {
                trace!("no tracked body; tick skipped");
                Ok(None)
            }
        }
    }

    /// Process one frame.
    ///
    /// # Errors
    ///
    /// Returns the first desktop failure.  Events already recognized in this
    /// tick have been published to the bus by then.
    #[instrument(level = "trace", skip_all, fields(mode = %self.modes.mode()))]
    pub fn tick(&mut self, frame: &PoseFrame) -> Result<TickReport, HandwaveError> {
        let mut report = TickReport::default();

        self.apply_control();

        let mode = self.modes.mode();
        let mut completions = Vec::new();
        for matcher in &mut self.matchers {
            if mode.activates(matcher.kind()) {
                completions.extend(matcher.update(frame, &self.ctx));
            } else {
                matcher.reset();
            }
        }

        for completion in completions {
            self.complete(completion, &mut report)?;
        }

        self.continuous_step(frame, &mut report)?;
        self.integrate(&mut report)?;
        Ok(report)
    }

    // ── Control ──────────────────────────────────────────────────────────────

    fn apply_control(&mut self) {
        for request in self.control.drain() {
            debug!(?request, "control request");
            match request {
                ControlRequest::SetMode(mode) => {
                    if let Some(t) = self.modes.enter(mode, &mut self.ctx)
                        && t.to == Mode::WindowDrag
                    {
                        self.grab_foreground_window();
                    }
                }
                ControlRequest::SetSignalHand(side) => self.ctx.signal_hand = side,
                ControlRequest::ResetGestures => {
                    self.matchers.iter_mut().for_each(GestureMatcher::reset);
                }
            }
        }
    }

    // ── Completions ──────────────────────────────────────────────────────────

    fn complete(
        &mut self,
        completion: Completion,
        report: &mut TickReport,
    ) -> Result<(), HandwaveError> {
        info!(gesture = %completion.kind, hand = ?completion.hand, "gesture completed");
        let event = GestureEvent::new(completion.kind, completion.hand);
        if let Err(e) = self.bus.publish(event.clone()) {
            trace!(error = %e, "gesture event not delivered");
        }
        report.events.push(event);

        if let Some(t) = self.modes.on_completion(&completion, &mut self.ctx)
            && t.to == Mode::WindowDrag
        {
            self.grab_foreground_window();
        }

        let one_shot = match completion.kind {
            GestureKind::PausePlay => Some(DesktopIntent::MediaKey(MediaKey::PlayPause)),
            GestureKind::HideAll => Some(DesktopIntent::MinimizeAll),
            GestureKind::ShowAll => Some(DesktopIntent::RestoreAll),
            _ => None,
        };
        match one_shot {
            Some(intent) => self.dispatch(intent, report),
            None => Ok(()),
        }
    }

    fn grab_foreground_window(&mut self) {
        let Some(window) = self.desktop.foreground_window() else {
            warn!("window drag started with no foreground window");
            self.motion.release();
            return;
        };
        match self.desktop.window_rect(window) {
            Ok(rect) => self.motion.attach(window, rect),
            Err(e) => {
                warn!(%window, error = %e, "cannot read foreground window bounds");
                self.motion.release();
            }
        }
    }

    // ── Continuous control ───────────────────────────────────────────────────

    fn continuous_step(
        &mut self,
        frame: &PoseFrame,
        report: &mut TickReport,
    ) -> Result<(), HandwaveError> {
        match self.modes.mode() {
            Mode::Idle => {
                if self.modes.take_fling_check() {
                    self.check_for_fling(frame, report)?;
                }
                Ok(())
            }
            Mode::CursorControl => self.drive_cursor(frame, report),
            Mode::WindowDrag => self.drive_window(frame, report),
            Mode::ScrollUp => {
                self.repeat(frame, Side::Right, DesktopIntent::Scroll(ScrollDirection::Up), report)
            }
            Mode::ScrollDown => {
                self.repeat(frame, Side::Right, DesktopIntent::Scroll(ScrollDirection::Down), report)
            }
            Mode::VolumeUp => {
                self.repeat(frame, Side::Left, DesktopIntent::MediaKey(MediaKey::VolumeUp), report)
            }
            Mode::VolumeDown => {
                self.repeat(frame, Side::Left, DesktopIntent::MediaKey(MediaKey::VolumeDown), report)
            }
        }
    }

    fn drive_cursor(&mut self, frame: &PoseFrame, report: &mut TickReport) -> Result<(), HandwaveError> {
        let Some(hand) = sample_hand(frame, self.ctx.active_hand) else {
            trace!("cursor step skipped: hand not measurable");
            return Ok(());
        };
        let delta = self.ctx.observe_hand(hand.point, hand.depth);

        if delta.dz > hand.arm / self.config.click_depth_divisor {
            return self.dispatch(DesktopIntent::Click, report);
        }
        let Some(scale) = screen_scale(
            self.desktop.screen_size(),
            hand.arm,
            self.config.seek_scale_divisor,
        ) else {
            return Ok(());
        };
        let dx = (delta.dx * scale) as i32;
        let dy = (delta.dy * scale) as i32;
        if dx == 0 && dy == 0 {
            return Ok(());
        }
        self.dispatch(DesktopIntent::MoveCursorBy { dx, dy }, report)
    }

    fn drive_window(&mut self, frame: &PoseFrame, report: &mut TickReport) -> Result<(), HandwaveError> {
        let Some(hand) = sample_hand(frame, self.ctx.active_hand) else {
            trace!("drag step skipped: hand not measurable");
            return Ok(());
        };
        let delta = self.ctx.observe_hand(hand.point, hand.depth);
        let Some(scale) = screen_scale(
            self.desktop.screen_size(),
            hand.arm,
            self.config.seek_scale_divisor,
        ) else {
            return Ok(());
        };
        let (Some(window), Some(position)) = (
            self.motion.window(),
            self.motion.seek(delta.dx * scale, delta.dy * scale),
        ) else {
            return Ok(());
        };
        if delta.dx == 0.0 && delta.dy == 0.0 {
            return Ok(());
        }
        self.move_window(window, position, report)
    }

    fn check_for_fling(&mut self, frame: &PoseFrame, report: &mut TickReport) -> Result<(), HandwaveError> {
        let Some(window) = self.motion.window() else {
            return Ok(());
        };
        let Some(hand) = sample_hand(frame, self.ctx.active_hand) else {
            debug!("fling check skipped: hand not measurable");
            return Ok(());
        };
        let Some((dx, dy)) = self.ctx.displacement_to(hand.point) else {
            return Ok(());
        };

        let action = self.classifier.classify(dx, dy, hand.arm);
        info!(?action, dx, dy, arm = hand.arm, "drag released");
        match action {
            FlingAction::None => Ok(()),
            FlingAction::Maximize => self.dispatch(
                DesktopIntent::ShowWindow {
                    window,
                    state: WindowState::Maximized,
                },
                report,
            ),
            FlingAction::Minimize => self.dispatch(
                DesktopIntent::ShowWindow {
                    window,
                    state: WindowState::Minimized,
                },
                report,
            ),
            FlingAction::SnapLeft | FlingAction::SnapRight => {
                let area = self.desktop.work_area();
                self.motion.set_work_area(area);
                let Some(target) = action.snap_target(area) else {
                    return Ok(());
                };
                match self.config.fling_style {
                    FlingStyle::Snap => {
                        self.dispatch(DesktopIntent::PlaceWindow { window, rect: target }, report)
                    }
                    FlingStyle::Momentum => {
                        self.motion.fling(ScreenPoint::new(target.x, target.y));
                        Ok(())
                    }
                }
            }
        }
    }

    fn repeat(
        &mut self,
        frame: &PoseFrame,
        side: Side,
        intent: DesktopIntent,
        report: &mut TickReport,
    ) -> Result<(), HandwaveError> {
        let Some(normalized) = normalized_reach(frame, side) else {
            trace!(%side, "repeat step skipped: arm not measurable");
            return Ok(());
        };
        if self.modes.repeat_tick(normalized) {
            self.dispatch(intent, report)?;
        }
        Ok(())
    }

    // ── Integration ──────────────────────────────────────────────────────────

    fn integrate(&mut self, report: &mut TickReport) -> Result<(), HandwaveError> {
        let Some(window) = self.motion.window().filter(|_| self.motion.is_moving()) else {
            return Ok(());
        };
        if let Ok(rect) = self.desktop.window_rect(window) {
            self.motion.resize(rect.width, rect.height);
        }
        match self.motion.step() {
            Some(position) => self.move_window(window, position, report),
            None => Ok(()),
        }
    }

    fn move_window(
        &mut self,
        window: WindowId,
        position: ScreenPoint,
        report: &mut TickReport,
    ) -> Result<(), HandwaveError> {
        let intent = DesktopIntent::MoveWindow {
            window,
            x: position.x as i32,
            y: position.y as i32,
        };
        let result = self.dispatch(intent, report);
        if matches!(result, Err(HandwaveError::UnknownWindow(_))) {
            warn!(%window, "controlled window vanished; releasing it");
            self.motion.release();
        }
        result
    }

    fn dispatch(&mut self, intent: DesktopIntent, report: &mut TickReport) -> Result<(), HandwaveError> {
        if let Err(e) = self.desktop.dispatch(&intent) {
            warn!(?intent, error = %e, "desktop call failed");
            return Err(e);
        }
        trace!(?intent, "intent dispatched");
        report.intents.push(intent);
        Ok(())
    }
}
