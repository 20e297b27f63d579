//! One-shot environment capture slot.
//!
//! A capture runs as its own future and writes exactly one outcome into a
//! bounded(1) channel. The frame loop polls the receiving side without ever
//! waiting on it. Cancelling closes the channel, so a capture that finishes
//! later has nowhere to write and is dropped.

use async_channel::{Receiver, Sender, TryRecvError};

use crate::error::WorldError;
use crate::scene::EnvironmentMap;

pub type CaptureOutcome = Result<Option<EnvironmentMap>, WorldError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No capture has been started.
    Idle,
    /// Started, result not yet written.
    Pending,
    /// A map arrived.
    Ready,
    /// The capture produced no map or an error, or was dropped without writing.
    Failed,
    /// The slot was closed before a result arrived.
    Cancelled,
}

/// Writing half handed to the capture future.
#[derive(Debug)]
pub struct CaptureWriter {
    sender: Sender<CaptureOutcome>,
}

impl CaptureWriter {
    /// Write the outcome. Returns `false` when the slot has been cancelled.
    pub fn write(&self, outcome: CaptureOutcome) -> bool {
        self.sender.try_send(outcome).is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.sender.is_closed()
    }
}

#[derive(Debug)]
pub struct CaptureSlot {
    receiver: Option<Receiver<CaptureOutcome>>,
    state: CaptureState,
}

impl CaptureSlot {
    pub fn new() -> Self {
        Self {
            receiver: None,
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Start the slot and return its writer. Only an idle slot can be armed.
    pub fn arm(&mut self) -> Option<CaptureWriter> {
        if self.state != CaptureState::Idle {
            return None;
        }
        let (sender, receiver) = async_channel::bounded(1);
        self.receiver = Some(receiver);
        self.state = CaptureState::Pending;
        Some(CaptureWriter { sender })
    }

    /// Non-blocking check for a result. Returns the outcome once, on the frame it arrives.
    pub fn poll(&mut self) -> Option<CaptureOutcome> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(outcome) => {
                self.state = match &outcome {
                    Ok(Some(_)) => CaptureState::Ready,
                    _ => CaptureState::Failed,
                };
                self.receiver = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                self.state = CaptureState::Failed;
                self.receiver = None;
                None
            }
        }
    }

    /// Close the slot so a late result is discarded.
    pub fn cancel(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            receiver.close();
        }
        if self.state == CaptureState::Pending || self.state == CaptureState::Idle {
            self.state = CaptureState::Cancelled;
        }
    }
}

impl Default for CaptureSlot {
    fn default() -> Self {
        Self::new()
    }
}
