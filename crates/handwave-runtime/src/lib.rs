//! `handwave-runtime` – the per-frame gesture engine.
//!
//! Wires the recognizer (`handwave-gestures`) to the motion layer
//! (`handwave-motion`): every sensor frame runs through all active gesture
//! matchers, completions drive the exclusive interaction mode, and the mode
//! decides which continuous command the frame produces.
//!
//! # Modules
//!
//! - [`engine`] – [`GestureEngine`][engine::GestureEngine]: the tick
//!   orchestrator that owns the matchers, the interaction context, the mode
//!   controller and the motion controller.
//! - [`mode`] – [`Mode`][mode::Mode] and
//!   [`ModeController`][mode::ModeController]: which continuous control is
//!   active and how completions switch between them.
//! - [`bus`] – [`EventBus`][bus::EventBus]: a `tokio` broadcast channel of
//!   recognized [`GestureEvent`][handwave_types::GestureEvent]s.
//! - [`control`] – [`ControlHandle`][control::ControlHandle]: requests from
//!   other tasks, applied at the start of the next tick.
//! - [`config`] – [`EngineConfig`][config::EngineConfig] tuning knobs.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: global
//!   `tracing` subscriber with optional OTLP span export.
//!
//! The engine never talks to the OS itself.  Every side effect goes through
//! the [`Desktop`][handwave_motion::Desktop] it was built with.

pub mod bus;
pub mod config;
pub mod control;
pub mod engine;
pub mod mode;
pub mod telemetry;

pub use bus::{EventBus, GestureSubscriber};
pub use config::{EngineConfig, FlingStyle};
pub use control::{ControlHandle, ControlQueue, ControlRequest, control_channel};
pub use engine::{GestureEngine, TickReport};
pub use mode::{Mode, ModeController, Transition};
pub use telemetry::{TracerProviderGuard, init_tracing};
