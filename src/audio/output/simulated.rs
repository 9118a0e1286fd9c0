//! Device-free backend driven by a manual clock.
//!
//! Sources "play" as [`SimulatedOutput::advance`] moves time forward: the
//! frames covered by each step are written to the analysis tap, and a
//! source whose buffer duration has elapsed posts its completion event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{CompletionNotifier, OutputBackend, SourceNode};
use crate::audio::analyser::AnalysisTap;
use crate::audio::buffer::DecodedAudioBuffer;
use crate::error::{Error, Result};

struct SimulatedVoice {
    buffer: DecodedAudioBuffer,
    tap: AnalysisTap,
    notifier: CompletionNotifier,
    started_at: Duration,
    stopped: Arc<AtomicBool>,
    ended: bool,
}

impl SimulatedVoice {
    fn frame_at(&self, now: Duration) -> usize {
        let elapsed = now.saturating_sub(self.started_at).as_secs_f64();
        ((elapsed * self.buffer.sample_rate() as f64) as usize).min(self.buffer.frames())
    }

    fn is_running(&self) -> bool {
        !self.ended && !self.stopped.load(Ordering::SeqCst)
    }
}

/// Output backend with a manual clock and no device
#[derive(Default)]
pub struct SimulatedOutput {
    now: Duration,
    voices: Vec<SimulatedVoice>,
    suspended: bool,
    fail_resume: bool,
    fail_next_start: Option<String>,
}

impl SimulatedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in the suspended state (like an autoplay-blocked device)
    pub fn suspended() -> Self {
        Self {
            suspended: true,
            ..Self::default()
        }
    }

    /// Make the next resume attempt fail
    pub fn fail_resume(&mut self) {
        self.fail_resume = true;
    }

    /// Make the next `start_source` fail with `reason`
    pub fn fail_next_start(&mut self, reason: impl Into<String>) {
        self.fail_next_start = Some(reason.into());
    }

    /// Current simulated time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of sources ever started
    pub fn started_count(&self) -> usize {
        self.voices.len()
    }

    /// Number of sources currently producing sound
    pub fn running_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_running()).count()
    }

    /// Move the clock forward, rendering and completing sources
    pub fn advance(&mut self, step: Duration) {
        let before = self.now;
        self.now += step;

        for voice in self.voices.iter_mut().filter(|v| v.is_running()) {
            let from = voice.frame_at(before);
            let to = voice.frame_at(self.now);
            if to > from {
                let mixed: Vec<f32> = (from..to).map(|f| voice.buffer.mono_frame(f)).collect();
                voice.tap.write(&mixed);
            }
            if to >= voice.buffer.frames() {
                voice.ended = true;
                voice.notifier.notify();
            }
        }
    }

    /// Deliver the completion event of the `index`-th started source now,
    /// even if it was stopped, as a late hardware callback would
    pub fn fire_completion(&mut self, index: usize) {
        if let Some(voice) = self.voices.get_mut(index) {
            voice.ended = true;
            voice.notifier.notify();
        }
    }
}

impl OutputBackend for SimulatedOutput {
    type Source = SimulatedSource;

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<()> {
        if std::mem::take(&mut self.fail_resume) {
            return Err(Error::PlaybackUnavailable("resume refused".into()));
        }
        self.suspended = false;
        Ok(())
    }

    fn start_source(
        &mut self,
        buffer: DecodedAudioBuffer,
        tap: AnalysisTap,
        on_ended: CompletionNotifier,
    ) -> Result<SimulatedSource> {
        if let Some(reason) = self.fail_next_start.take() {
            return Err(Error::PlaybackUnavailable(reason));
        }

        let stopped = Arc::new(AtomicBool::new(false));
        self.voices.push(SimulatedVoice {
            buffer,
            tap,
            notifier: on_ended,
            started_at: self.now,
            stopped: Arc::clone(&stopped),
            ended: false,
        });
        Ok(SimulatedSource { stopped })
    }
}

/// Handle to a simulated source
pub struct SimulatedSource {
    stopped: Arc<AtomicBool>,
}

impl SourceNode for SimulatedSource {
    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}
