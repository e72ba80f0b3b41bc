//! The `Desktop` trait – everything the engine needs from the OS.
//!
//! Cursor movement, window placement and key events are thin wrappers over
//! platform calls.  The engine only ever talks to this trait, so a real
//! backend and [`SimDesktop`][crate::sim::SimDesktop] are interchangeable.

use handwave_types::{DesktopIntent, HandwaveError, Rect, ScreenSize, WindowId};

pub trait Desktop: Send {
    /// Size of the primary display in pixels.
    fn screen_size(&self) -> ScreenSize;

    /// Usable area of the primary display (excludes task bars).
    fn work_area(&self) -> Rect;

    /// Window that currently has input focus, if any.
    fn foreground_window(&self) -> Option<WindowId>;

    /// Current bounds of `window`.
    ///
    /// # Errors
    ///
    /// Returns [`HandwaveError::UnknownWindow`] if the window no longer
    /// exists.
    fn window_rect(&self, window: WindowId) -> Result<Rect, HandwaveError>;

    /// Apply one intent.
    ///
    /// # Errors
    ///
    /// Returns [`HandwaveError::Desktop`] or [`HandwaveError::UnknownWindow`]
    /// when the platform call fails.
    fn dispatch(&mut self, intent: &DesktopIntent) -> Result<(), HandwaveError>;
}
