//! Serialized control queue.
//!
//! Asynchronous sources (a voice front-end, a remote UI) must not touch the
//! engine's mode or interaction context while a frame is being processed.
//! They send [`ControlRequest`]s through a [`ControlHandle`] instead, and the
//! engine applies them at the start of its next tick.

use handwave_types::{HandwaveError, Side};
use tokio::sync::mpsc;

use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    SetMode(Mode),
    SetSignalHand(Side),
    /// Drop all in-progress gesture attempts.
    ResetGestures,
}

/// Clonable sender half.  Safe to move to other threads and tasks.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    sender: mpsc::UnboundedSender<ControlRequest>,
}

impl ControlHandle {
    /// # Errors
    ///
    /// Returns [`HandwaveError::Channel`] once the engine has been dropped.
    pub fn send(&self, request: ControlRequest) -> Result<(), HandwaveError> {
        self.sender
            .send(request)
            .map_err(|e| HandwaveError::Channel(format!("engine is gone, dropped {:?}", e.0)))
    }

    pub fn set_mode(&self, mode: Mode) -> Result<(), HandwaveError> {
        self.send(ControlRequest::SetMode(mode))
    }

    pub fn set_signal_hand(&self, side: Side) -> Result<(), HandwaveError> {
        self.send(ControlRequest::SetSignalHand(side))
    }

    pub fn reset_gestures(&self) -> Result<(), HandwaveError> {
        self.send(ControlRequest::ResetGestures)
    }
}

/// Receiver half, owned by the engine.
#[derive(Debug)]
pub struct ControlQueue {
    receiver: mpsc::UnboundedReceiver<ControlRequest>,
}

impl ControlQueue {
    /// Everything queued so far, oldest first.  Never blocks.
    pub fn drain(&mut self) -> Vec<ControlRequest> {
        let mut requests = Vec::new();
        while let Ok(request) = self.receiver.try_recv() {
            requests.push(request);
        }
        requests
    }
}

pub fn control_channel() -> (ControlHandle, ControlQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ControlHandle { sender }, ControlQueue { receiver })
}
