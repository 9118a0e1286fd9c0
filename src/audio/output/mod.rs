//! Output backends that turn a decoded buffer into sound.
//!
//! A backend starts one source node per playback session. The source feeds
//! its rendered samples into the analysis tap and, when it runs out of
//! frames, posts a completion event back to the controller.

mod cpal_backend;
mod simulated;

pub use cpal_backend::CpalOutput;
pub use simulated::{SimulatedOutput, SimulatedSource};

use std::sync::mpsc::Sender;

use super::analyser::AnalysisTap;
use super::buffer::DecodedAudioBuffer;
use super::controller::SessionToken;
use crate::error::Result;

/// Notification delivered to the controller on its next event poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The source of this session played its last frame
    Ended(SessionToken),
}

/// One-shot completion handle handed to a source node
#[derive(Debug, Clone)]
pub struct CompletionNotifier {
    token: SessionToken,
    events: Sender<PlaybackEvent>,
}

impl CompletionNotifier {
    pub(crate) fn new(token: SessionToken, events: Sender<PlaybackEvent>) -> Self {
        Self { token, events }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Post the natural-completion event (dropped if the controller is gone)
    pub fn notify(&self) {
        let _ = self.events.send(PlaybackEvent::Ended(self.token));
    }
}

/// A sound-producing node bound to one buffer
pub trait SourceNode {
    /// Halt output immediately and release device resources
    fn stop(&mut self);
}

/// Device abstraction used by the playback controller
pub trait OutputBackend {
    type Source: SourceNode;

    /// Whether the device is suspended and needs [`Self::resume`]
    fn is_suspended(&self) -> bool {
        false
    }

    /// Best-effort wake-up of a suspended device
    fn resume(&mut self) -> Result<()> {
        Ok(())
    }

    /// Create and immediately start a source playing `buffer`.
    ///
    /// Failure must leave nothing running.
    fn start_source(
        &mut self,
        buffer: DecodedAudioBuffer,
        tap: AnalysisTap,
        on_ended: CompletionNotifier,
    ) -> Result<Self::Source>;
}
