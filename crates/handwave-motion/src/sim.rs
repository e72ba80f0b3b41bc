//! In-process desktop for tests and headless runs.
//!
//! [`SimDesktop`] keeps a table of window rectangles and a cursor position,
//! applies every [`DesktopIntent`] to them, and records the intents in
//! order.  Nothing touches the real OS.
//!
//! # Example
//!
//! ```rust
//! use handwave_motion::{Desktop, SimDesktop};
//! use handwave_types::{DesktopIntent, Rect, ScreenSize, WindowId};
//!
//! let mut desktop = SimDesktop::new(ScreenSize { width: 1920.0, height: 1080.0 })
//!     .with_window(WindowId(1), Rect::new(100.0, 100.0, 640.0, 480.0));
//!
//! desktop
//!     .dispatch(&DesktopIntent::MoveWindow { window: WindowId(1), x: 200, y: 150 })
//!     .expect("sim move must succeed");
//! assert_eq!(desktop.window_rect(WindowId(1)).unwrap().x, 200.0);
//! ```

use std::collections::BTreeMap;

use handwave_types::{
    DesktopIntent, HandwaveError, Rect, ScreenPoint, ScreenSize, WindowId, WindowState,
};

use crate::desktop::Desktop;

#[derive(Debug, Clone)]
pub struct SimDesktop {
    screen: ScreenSize,
    work_area: Rect,
    windows: BTreeMap<WindowId, Rect>,
    window_states: BTreeMap<WindowId, WindowState>,
    foreground: Option<WindowId>,
    cursor: ScreenPoint,
    clicks: usize,
    log: Vec<DesktopIntent>,
}

impl SimDesktop {
    /// A desktop with no windows whose work area is the whole screen.
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            screen,
            work_area: Rect::new(0.0, 0.0, screen.width, screen.height),
            windows: BTreeMap::new(),
            window_states: BTreeMap::new(),
            foreground: None,
            cursor: ScreenPoint::new(screen.width / 2.0, screen.height / 2.0),
            clicks: 0,
            log: Vec::new(),
        }
    }

    pub fn with_work_area(mut self, work_area: Rect) -> Self {
        self.work_area = work_area;
        self
    }

    /// Add a window; the most recently added window has focus.
    pub fn with_window(mut self, window: WindowId, rect: Rect) -> Self {
        self.windows.insert(window, rect);
        self.foreground = Some(window);
        self
    }

    /// Remove a window, as if its owner closed it.
    pub fn close_window(&mut self, window: WindowId) {
        self.windows.remove(&window);
        self.window_states.remove(&window);
        if self.foreground == Some(window) {
            self.foreground = None;
        }
    }

    pub fn focus(&mut self, window: Option<WindowId>) {
        self.foreground = window;
    }

    pub fn cursor(&self) -> ScreenPoint {
        self.cursor
    }

    pub fn clicks(&self) -> usize {
        self.clicks
    }

    pub fn window_state(&self, window: WindowId) -> Option<WindowState> {
        self.window_states.get(&window).copied()
    }

    /// Every intent applied so far, oldest first.
    pub fn intents(&self) -> &[DesktopIntent] {
        &self.log
    }

    pub fn take_intents(&mut self) -> Vec<DesktopIntent> {
        std::mem::take(&mut self.log)
    }

    fn window_mut(&mut self, window: WindowId) -> Result<&mut Rect, HandwaveError> {
        self.windows
            .get_mut(&window)
            .ok_or(HandwaveError::UnknownWindow(window))
    }
}

impl Desktop for SimDesktop {
    fn screen_size(&self) -> ScreenSize {
        self.screen
    }

    fn work_area(&self) -> Rect {
        self.work_area
    }

    fn foreground_window(&self) -> Option<WindowId> {
        self.foreground
    }

    fn window_rect(&self, window: WindowId) -> Result<Rect, HandwaveError> {
        self.windows
            .get(&window)
            .copied()
            .ok_or(HandwaveError::UnknownWindow(window))
    }

    fn dispatch(&mut self, intent: &DesktopIntent) -> Result<(), HandwaveError> {
        match *intent {
            DesktopIntent::MoveCursorBy { dx, dy } => {
                self.cursor.x = (self.cursor.x + f64::from(dx)).clamp(0.0, self.screen.width);
                self.cursor.y = (self.cursor.y + f64::from(dy)).clamp(0.0, self.screen.height);
            }
            DesktopIntent::Click => self.clicks += 1,
            DesktopIntent::MoveWindow { window, x, y } => {
                let rect = self.window_mut(window)?;
                rect.x = f64::from(x);
                rect.y = f64::from(y);
            }
            DesktopIntent::PlaceWindow { window, rect } => {
                *self.window_mut(window)? = rect;
                self.window_states.remove(&window);
            }
            DesktopIntent::ShowWindow { window, state } => {
                self.window_mut(window)?;
                self.window_states.insert(window, state);
            }
            DesktopIntent::MinimizeAll => {
                let ids: Vec<WindowId> = self.windows.keys().copied().collect();
                for id in ids {
                    self.window_states.insert(id, WindowState::Minimized);
                }
            }
            DesktopIntent::RestoreAll => self.window_states.clear(),
            DesktopIntent::Scroll(_) | DesktopIntent::MediaKey(_) => {}
        }
        self.log.push(intent.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use handwave_types::{MediaKey, ScrollDirection};

    use super::*;

    fn desktop() -> SimDesktop {
        SimDesktop::new(ScreenSize {
            width: 800.0,
            height: 600.0,
        })
        .with_window(WindowId(1), Rect::new(10.0, 10.0, 200.0, 100.0))
        .with_window(WindowId(2), Rect::new(300.0, 200.0, 200.0, 100.0))
    }

    #[test]
    fn last_added_window_has_focus() {
        let mut d = desktop();
        assert_eq!(d.foreground_window(), Some(WindowId(2)));
        d.focus(None);
        assert_eq!(d.foreground_window(), None);
    }

    #[test]
    fn cursor_moves_and_stays_on_screen() {
        let mut d = desktop();
        d.dispatch(&DesktopIntent::MoveCursorBy { dx: 15, dy: -20 }).unwrap();
        assert_eq!(d.cursor(), ScreenPoint::new(415.0, 280.0));
        d.dispatch(&DesktopIntent::MoveCursorBy { dx: 5000, dy: -5000 })
            .unwrap();
        assert_eq!(d.cursor(), ScreenPoint::new(800.0, 0.0));
    }

    #[test]
    fn move_and_place_windows() {
        let mut d = desktop();
        d.dispatch(&DesktopIntent::MoveWindow {
            window: WindowId(1),
            x: -40,
            y: 75,
        })
        .unwrap();
        assert_eq!(
            d.window_rect(WindowId(1)).unwrap(),
            Rect::new(-40.0, 75.0, 200.0, 100.0)
        );

        let half = Rect::new(0.0, 0.0, 400.0, 600.0);
        d.dispatch(&DesktopIntent::PlaceWindow {
            window: WindowId(2),
            rect: half,
        })
        .unwrap();
        assert_eq!(d.window_rect(WindowId(2)).unwrap(), half);
    }

    #[test]
    fn unknown_window_is_an_error_and_not_logged() {
        let mut d = desktop();
        let err = d
            .dispatch(&DesktopIntent::MoveWindow {
                window: WindowId(9),
                x: 0,
                y: 0,
            })
            .unwrap_err();
        assert_eq!(err, HandwaveError::UnknownWindow(WindowId(9)));
        assert!(d.intents().is_empty());
    }

    #[test]
    fn closed_window_loses_focus() {
        let mut d = desktop();
        d.close_window(WindowId(2));
        assert_eq!(d.foreground_window(), None);
        assert!(d.window_rect(WindowId(2)).is_err());
    }

    #[test]
    fn minimize_and_restore_all() {
        let mut d = desktop();
        d.dispatch(&DesktopIntent::MinimizeAll).unwrap();
        assert_eq!(d.window_state(WindowId(1)), Some(WindowState::Minimized));
        assert_eq!(d.window_state(WindowId(2)), Some(WindowState::Minimized));
        d.dispatch(&DesktopIntent::RestoreAll).unwrap();
        assert_eq!(d.window_state(WindowId(1)), None);
    }

    #[test]
    fn intents_are_recorded_in_order() {
        let mut d = desktop();
        d.dispatch(&DesktopIntent::Scroll(ScrollDirection::Up)).unwrap();
        d.dispatch(&DesktopIntent::MediaKey(MediaKey::VolumeDown)).unwrap();
        d.dispatch(&DesktopIntent::Click).unwrap();
        assert_eq!(d.clicks(), 1);
        assert_eq!(
            d.take_intents(),
            vec![
                DesktopIntent::Scroll(ScrollDirection::Up),
                DesktopIntent::MediaKey(MediaKey::VolumeDown),
                DesktopIntent::Click,
            ]
        );
        assert!(d.intents().is_empty());
    }
}
