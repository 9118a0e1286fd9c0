//! Playback graph controller: one live session, one shared analysis node.
//!
//! ```text
//! source (session N) ──► AnalysisNode ──► output device
//! ```
//!
//! Starting a session always tears down the previous one first, so at most
//! one source node exists at any instant. Completion notices travel over a
//! channel and are applied in [`PlaybackController::poll_events`]; a notice
//! whose token is not the live session's is ignored.

use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info, warn};

use super::analyser::AnalysisNode;
use super::buffer::DecodedAudioBuffer;
use super::output::{CompletionNotifier, OutputBackend, PlaybackEvent, SourceNode};
use crate::error::Result;
use crate::history::EntryId;
use crate::params::AnalyserConfig;

/// Monotonically increasing identity of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

struct PlaybackSession<S> {
    token: SessionToken,
    entry_id: EntryId,
    buffer: DecodedAudioBuffer,
    source: S,
}

pub struct PlaybackController<B: OutputBackend> {
    backend: B,
    analyser_config: AnalyserConfig,
    /// Created on first play, kept for the life of the controller
    analyser: Option<AnalysisNode>,
    session: Option<PlaybackSession<B::Source>>,
    next_token: SessionToken,
    events_tx: Sender<PlaybackEvent>,
    events_rx: Receiver<PlaybackEvent>,
}

impl<B: OutputBackend> PlaybackController<B> {
    /// Create an idle controller; fails if the analyser config is invalid
    pub fn new(backend: B, analyser_config: AnalyserConfig) -> std::result::Result<Self, String> {
        analyser_config
            .validate()
            .map_err(|e| format!("Invalid analyser config: {}", e))?;

        let (events_tx, events_rx) = mpsc::channel();
        Ok(Self {
            backend,
            analyser_config,
            analyser: None,
            session: None,
            next_token: SessionToken::first(),
            events_tx,
            events_rx,
        })
    }

    /// Stop whatever is playing and start `buffer` as `entry_id`.
    ///
    /// On failure the controller is left idle with no source allocated.
    pub fn play(&mut self, buffer: DecodedAudioBuffer, entry_id: EntryId) -> Result<()> {
        self.stop();

        if self.backend.is_suspended() {
            if let Err(e) = self.backend.resume() {
                warn!("Output device resume failed: {}", e);
            }
        }

        let config = &self.analyser_config;
        let analyser = self
            .analyser
            .get_or_insert_with(|| AnalysisNode::new(config.clone()));

        let token = self.next_token;
        self.next_token = token.next();

        analyser.connect(token);
        let tap = analyser.tap(token);
        let notifier = CompletionNotifier::new(token, self.events_tx.clone());

        let source = match self.backend.start_source(buffer.clone(), tap, notifier) {
            Ok(source) => source,
            Err(e) => {
                analyser.disconnect();
                warn!("Playback of {} failed: {}", entry_id, e);
                return Err(e);
            }
        };

        info!(
            "Playing {} ({:.2}s, session {:?})",
            entry_id,
            buffer.duration().as_secs_f32(),
            token
        );
        self.session = Some(PlaybackSession {
            token,
            entry_id,
            buffer,
            source,
        });
        Ok(())
    }

    /// Halt the live session, if any
    pub fn stop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.source.stop();
        if let Some(analyser) = &self.analyser {
            analyser.disconnect();
        }
        info!("Stopped {}", session.entry_id);
    }

    /// Apply pending completion notices. Returns true if the live session ended.
    pub fn poll_events(&mut self) -> bool {
        let mut ended = false;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                PlaybackEvent::Ended(token) => {
                    let live = self.session.as_ref().map(|s| s.token);
                    if live == Some(token) {
                        if let Some(session) = self.session.take() {
                            if let Some(analyser) = &self.analyser {
                                analyser.disconnect();
                            }
                            info!("Finished {}", session.entry_id);
                        }
                        ended = true;
                    } else {
                        debug!("Ignoring stale completion for session {:?}", token);
                    }
                }
            }
        }
        ended
    }

    pub fn state(&self) -> PlaybackState {
        if self.session.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    /// History entry of the live session
    pub fn active_entry_id(&self) -> Option<&EntryId> {
        self.session.as_ref().map(|s| &s.entry_id)
    }

    /// Buffer of the live session
    pub fn active_buffer(&self) -> Option<&DecodedAudioBuffer> {
        self.session.as_ref().map(|s| &s.buffer)
    }

    /// Shared analysis node (None until the first play)
    pub fn analyser(&self) -> Option<&AnalysisNode> {
        self.analyser.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
