//! Remote speech synthesis boundary.
//!
//! The app only depends on [`SpeechSynthesizer`]; [`GeminiClient`] is the
//! production implementation.

mod gemini;
mod voice;

pub use gemini::GeminiClient;
pub use voice::{Emotion, Voice, EXAMPLE_PHRASES};

use crate::error::Result;
use crate::params::audio_constants::{CHANNELS, SAMPLE_RATE_HZ};

/// What to say and how
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: Voice,
    pub emotion: Emotion,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice: Voice, emotion: Emotion) -> Self {
        Self {
            text: text.into(),
            voice,
            emotion,
        }
    }

    /// Prompt sent to the speech model
    pub fn prompt(&self) -> String {
        format!(
            "Say in Bengali ({} style): {}",
            self.emotion.label(),
            self.text
        )
    }
}

/// Base64 PCM returned by the synthesizer, with its format
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisPayload {
    /// Base64 of signed 16-bit little-endian PCM
    pub data: String,
    pub sample_rate: u32,
    pub channels: u16,
}

impl SynthesisPayload {
    /// Payload in the service's default format (24 kHz mono)
    pub fn pcm24k_mono(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            sample_rate: SAMPLE_RATE_HZ,
            channels: CHANNELS,
        }
    }
}

/// Turns text into an encoded audio payload
pub trait SpeechSynthesizer {
    /// Errors are reported as [`crate::Error::UpstreamSynthesis`]
    fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisPayload>;
}
