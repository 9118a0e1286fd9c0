//! Remote speech synthesis configuration.

use std::time::Duration;

use super::audio::audio_constants::SAMPLE_RATE_HZ;

/// Default speech model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Gemini REST endpoint root
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Speech synthesis client configuration
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// API key (None = requests fail with a user-visible error)
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Endpoint root, without trailing slash
    pub endpoint: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Sample rate assumed when the response does not state one (Hz)
    pub fallback_sample_rate_hz: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 120,
            fallback_sample_rate_hz: SAMPLE_RATE_HZ,
        }
    }
}

impl SynthesisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full `generateContent` URL for the configured model
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// API key if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        let mut config = SynthesisConfig::default();
        config.endpoint = "http://localhost:8080/".to_string();
        assert_eq!(
            config.generate_url(),
            "http://localhost:8080/models/gemini-2.5-flash-preview-tts:generateContent"
        );
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let mut config = SynthesisConfig::default();
        assert!(config.api_key().is_none());

        config.api_key = Some("   ".to_string());
        assert!(config.api_key().is_none());

        config.api_key = Some("key".to_string());
        assert_eq!(config.api_key(), Some("key"));
    }
}
