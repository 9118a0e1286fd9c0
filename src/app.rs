//! Application state: synthesis, history and playback wired together.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::audio::{decode_payload, export_wav, output::OutputBackend, PlaybackController};
use crate::error::{Error, Result};
use crate::history::{EntryId, History, HistoryEntry};
use crate::synthesis::{SpeechSynthesizer, SynthesisPayload, SynthesisRequest};

pub struct App<S, B: OutputBackend> {
    synthesizer: S,
    history: History,
    player: PlaybackController<B>,
}

impl<S: SpeechSynthesizer, B: OutputBackend> App<S, B> {
    pub fn new(synthesizer: S, player: PlaybackController<B>) -> Self {
        Self {
            synthesizer,
            history: History::new(),
            player,
        }
    }

    /// Synthesize `request`, store the clip and start playing it.
    ///
    /// The entry stays in history even if playback cannot start; the
    /// playback error is still returned.
    pub fn generate(&mut self, request: SynthesisRequest) -> Result<EntryId> {
        let id = self.synthesize(request)?;
        self.play(&id)?;
        Ok(id)
    }

    /// Synthesize `request` and store the clip without playing it
    pub fn synthesize(&mut self, request: SynthesisRequest) -> Result<EntryId> {
        if request.text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        let payload = self.synthesizer.synthesize(&request)?;
        self.ingest(request, &payload)
    }

    /// Decode an already-fetched payload into a new history entry
    pub fn ingest(&mut self, request: SynthesisRequest, payload: &SynthesisPayload) -> Result<EntryId> {
        let buffer = decode_payload(payload)?;
        let entry = HistoryEntry::new(request.text, request.voice, request.emotion, buffer);
        let id = entry.id.clone();
        info!(
            "Added {} ({:.2}s) to history",
            id,
            entry.buffer.duration().as_secs_f32()
        );
        self.history.push(entry);
        Ok(id)
    }

    pub fn play(&mut self, id: &EntryId) -> Result<()> {
        let entry = self
            .history
            .get(id)
            .ok_or_else(|| Error::UnknownEntry(id.clone()))?;
        self.player.play(entry.buffer.clone(), id.clone())
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// Stop `id` if it is playing, otherwise play it
    pub fn toggle(&mut self, id: &EntryId) -> Result<()> {
        if self.player.active_entry_id() == Some(id) {
            self.stop();
            Ok(())
        } else {
            self.play(id)
        }
    }

    /// Write `id` as a WAV file into `dir`
    pub fn export(&self, id: &EntryId, dir: &Path) -> Result<PathBuf> {
        let entry = self
            .history
            .get(id)
            .ok_or_else(|| Error::UnknownEntry(id.clone()))?;
        export_wav(&entry.buffer, id, dir).inspect_err(|e| warn!("Export of {} failed: {}", id, e))
    }

    /// Apply pending playback events; true if playback just ended
    pub fn poll(&mut self) -> bool {
        self.player.poll_events()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn player(&self) -> &PlaybackController<B> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlaybackController<B> {
        &mut self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::output::SimulatedOutput;
    use crate::audio::PlaybackState;
    use crate::params::AnalyserConfig;
    use crate::synthesis::{Emotion, Voice};
    use base64::{engine::general_purpose, Engine as _};
    use std::cell::Cell;
    use std::time::Duration;

    /// Returns a fixed payload, or an upstream error when `data` is None
    struct CannedSynthesizer {
        data: Option<String>,
        calls: Cell<usize>,
    }

    impl CannedSynthesizer {
        fn with_samples(samples: &[i16]) -> Self {
            let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
            Self {
                data: Some(general_purpose::STANDARD.encode(bytes)),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                data: None,
                calls: Cell::new(0),
            }
        }
    }

    impl SpeechSynthesizer for CannedSynthesizer {
        fn synthesize(&self, _request: &SynthesisRequest) -> Result<SynthesisPayload> {
            self.calls.set(self.calls.get() + 1);
            match &self.data {
                Some(data) => Ok(SynthesisPayload::pcm24k_mono(data.clone())),
                None => Err(Error::UpstreamSynthesis(
                    "No audio data received from Gemini API.".into(),
                )),
            }
        }
    }

    fn app(synth: CannedSynthesizer) -> App<CannedSynthesizer, SimulatedOutput> {
        let player =
            PlaybackController::new(SimulatedOutput::new(), AnalyserConfig::default()).unwrap();
        App::new(synth, player)
    }

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest::new(text, Voice::Charon, Emotion::Excited)
    }

    #[test]
    fn test_generate_adds_entry_and_plays() {
        let mut app = app(CannedSynthesizer::with_samples(&[0, 100, -100, 0]));
        let id = app.generate(request("নমস্কার")).unwrap();

        let entry = app.history().get(&id).unwrap();
        assert_eq!(entry.text, "নমস্কার");
        assert_eq!(entry.voice, Voice::Charon);
        assert_eq!(entry.buffer.frames(), 4);
        assert_eq!(entry.buffer.sample_rate(), 24000);
        assert_eq!(app.player().active_entry_id(), Some(&id));
    }

    #[test]
    fn test_blank_text_rejected_without_request() {
        let synth = CannedSynthesizer::with_samples(&[0]);
        let mut app = app(synth);

        let err = app.generate(request("   ")).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
        assert_eq!(app.synthesizer.calls.get(), 0);
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_upstream_failure_leaves_state_untouched() {
        let mut app = app(CannedSynthesizer::failing());
        let err = app.generate(request("hello")).unwrap_err();

        assert_eq!(err.to_string(), "No audio data received from Gemini API.");
        assert!(app.history().is_empty());
        assert_eq!(app.player().state(), PlaybackState::Idle);
    }

    #[test]
    fn test_malformed_payload_never_reaches_playback() {
        let mut app = app(CannedSynthesizer::failing());
        let odd = SynthesisPayload::pcm24k_mono(general_purpose::STANDARD.encode([1u8, 2, 3]));

        let err = app.ingest(request("hello"), &odd).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));
        assert!(app.history().is_empty());
        assert_eq!(app.player().backend().started_count(), 0);
    }

    #[test]
    fn test_synthesize_does_not_play() {
        let mut app = app(CannedSynthesizer::with_samples(&[1, 2]));
        let id = app.synthesize(request("quiet")).unwrap();

        assert!(app.history().get(&id).is_some());
        assert_eq!(app.player().state(), PlaybackState::Idle);
    }

    #[test]
    fn test_toggle_stops_active_and_plays_other() {
        let mut app = app(CannedSynthesizer::with_samples(&[0; 2400]));
        let first = app.generate(request("one")).unwrap();
        let second = app.generate(request("two")).unwrap();
        assert_eq!(app.player().active_entry_id(), Some(&second));

        app.toggle(&second).unwrap();
        assert_eq!(app.player().state(), PlaybackState::Idle);

        app.toggle(&first).unwrap();
        assert_eq!(app.player().active_entry_id(), Some(&first));
    }

    #[test]
    fn test_playback_ends_after_duration() {
        let mut app = app(CannedSynthesizer::with_samples(&[0; 2400]));
        let id = app.generate(request("short")).unwrap();

        app.player_mut().backend_mut().advance(Duration::from_millis(50));
        assert!(!app.poll());
        assert_eq!(app.player().active_entry_id(), Some(&id));

        app.player_mut().backend_mut().advance(Duration::from_millis(50));
        assert!(app.poll());
        assert!(app.player().active_entry_id().is_none());
    }

    #[test]
    fn test_failed_playback_keeps_entry() {
        let mut app = app(CannedSynthesizer::with_samples(&[0, 1]));
        app.player_mut().backend_mut().fail_next_start("no device");

        let err = app.generate(request("hello")).unwrap_err();
        assert!(matches!(err, Error::PlaybackUnavailable(_)));
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.player().state(), PlaybackState::Idle);
    }

    #[test]
    fn test_unknown_entry() {
        let mut app = app(CannedSynthesizer::failing());
        let missing = EntryId::from("nope");
        assert!(matches!(app.play(&missing), Err(Error::UnknownEntry(_))));
        assert!(matches!(
            app.export(&missing, Path::new(".")),
            Err(Error::UnknownEntry(_))
        ));
    }

    #[test]
    fn test_export_writes_wav() {
        let mut app = app(CannedSynthesizer::with_samples(&[5, -5]));
        let id = app.generate(request("save me")).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = app.export(&id, dir.path()).unwrap();
        assert!(path.ends_with(format!("bengali_tts_{}.wav", id)));
        let samples: Vec<i16> = hound::WavReader::open(&path)
            .unwrap()
            .samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        assert_eq!(samples, vec![5, -5]);
    }
}
