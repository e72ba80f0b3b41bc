//! `handwave-motion` – window motion and the desktop collaborator boundary.
//!
//! - [`desktop`] – the [`Desktop`][desktop::Desktop] trait the engine uses to
//!   query screen geometry and apply
//!   [`DesktopIntent`][handwave_types::DesktopIntent]s.
//! - [`motion`] – [`MotionController`][motion::MotionController]: seek and
//!   fling integration with per-axis decay and work-area reflection.
//! - [`fling`] – classification of a drag release into snap, maximize,
//!   minimize, or nothing.
//! - [`throttle`] – distance-dependent repeat rate for scroll and volume.
//! - [`sim`] – [`SimDesktop`][sim::SimDesktop], an in-process desktop for
//!   tests and the CLI.

pub mod desktop;
pub mod fling;
pub mod motion;
pub mod sim;
pub mod throttle;

pub use desktop::Desktop;
pub use fling::{FlingAction, FlingClassifier};
pub use motion::{MotionController, MotionState, Velocity};
pub use sim::SimDesktop;
pub use throttle::RepeatThrottle;
