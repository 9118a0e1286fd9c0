//! Gemini text-to-speech over the `generateContent` REST endpoint.

use serde::Deserialize;
use tracing::{debug, info};

use super::{SpeechSynthesizer, SynthesisPayload, SynthesisRequest};
use crate::error::{Error, Result};
use crate::params::audio_constants::CHANNELS;
use crate::params::SynthesisConfig;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

/// Blocking Gemini TTS client
pub struct GeminiClient {
    config: SynthesisConfig,
    agent: ureq::Agent,
}

impl GeminiClient {
    pub fn new(config: SynthesisConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .build()
            .into();
        Self { config, agent }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }
}

/// JSON body asking for audio-only output in `voice`
fn request_body(request: &SynthesisRequest) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [{ "text": request.prompt() }]
        }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": request.voice.id() }
                }
            }
        }
    })
}

/// Read `rate=` from a mime type such as `audio/L16;codec=pcm;rate=24000`
fn mime_sample_rate(mime_type: &str) -> Option<u32> {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.trim().parse().ok())
}

/// First inline audio part of the first candidate
fn extract_payload(
    response: GenerateContentResponse,
    fallback_sample_rate: u32,
) -> Result<SynthesisPayload> {
    let inline = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.inline_data)
        .filter(|d| !d.data.trim().is_empty())
        .ok_or_else(|| Error::UpstreamSynthesis("No audio data received from Gemini API.".into()))?;

    let sample_rate = inline
        .mime_type
        .as_deref()
        .and_then(mime_sample_rate)
        .unwrap_or(fallback_sample_rate);

    Ok(SynthesisPayload {
        data: inline.data,
        sample_rate,
        channels: CHANNELS,
    })
}

impl SpeechSynthesizer for GeminiClient {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisPayload> {
        let api_key = self.config.api_key().ok_or_else(|| {
            Error::UpstreamSynthesis("API key is missing. Please ensure it is configured.".into())
        })?;

        let url = self.config.generate_url();
        info!(
            "Synthesizing {} chars with voice {} ({})",
            request.text.chars().count(),
            request.voice,
            request.emotion.english_name()
        );

        let mut response = self
            .agent
            .post(&url)
            .header("x-goog-api-key", api_key)
            .send_json(request_body(request))
            .map_err(|e| match e {
                ureq::Error::StatusCode(401 | 403) => {
                    Error::UpstreamSynthesis("Invalid API key.".into())
                }
                other => Error::UpstreamSynthesis(format!("Gemini TTS request failed: {}", other)),
            })?;

        let parsed: GenerateContentResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| Error::UpstreamSynthesis(format!("Unreadable Gemini response: {}", e)))?;

        let payload = extract_payload(parsed, self.config.fallback_sample_rate_hz)?;
        debug!(
            "Received {} base64 chars @ {}Hz",
            payload.data.len(),
            payload.sample_rate
        );
        Ok(payload)
    }
}
