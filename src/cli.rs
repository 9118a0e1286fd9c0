//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::params::{audio_constants, SynthesisConfig, DEFAULT_MODEL};
use crate::synthesis::{Emotion, Voice, EXAMPLE_PHRASES};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "kontho")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bengali text-to-speech with live spectrum playback", long_about = None)]
pub struct Args {
    /// Text to speak
    pub text: Option<String>,

    /// Use one of the built-in example phrases instead of TEXT (1-4)
    #[arg(long, value_name = "N", conflicts_with = "text")]
    pub example: Option<usize>,

    /// Voice to synthesize with
    #[arg(long, value_enum, default_value_t = Voice::Kore)]
    pub voice: Voice,

    /// Speaking style
    #[arg(long, value_enum, default_value_t = Emotion::Neutral)]
    pub emotion: Emotion,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Speech model identifier
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Decode a local base64 PCM file instead of calling the API
    #[arg(long, value_name = "FILE")]
    pub payload: Option<PathBuf>,

    /// Sample rate of --payload (Hz)
    #[arg(long, value_name = "HZ", default_value_t = audio_constants::SAMPLE_RATE_HZ)]
    pub sample_rate: u32,

    /// Channel count of --payload
    #[arg(long, value_name = "N", default_value_t = audio_constants::CHANNELS)]
    pub channels: u16,

    /// Save the clip as WAV into this directory
    #[arg(long, value_name = "DIR")]
    pub save: Option<PathBuf>,

    /// Do not play the clip
    #[arg(long)]
    pub no_play: bool,

    /// Play against a simulated clock without opening an audio device
    #[arg(long)]
    pub mute: bool,

    /// List voices and emotions, then exit
    #[arg(long)]
    pub list_voices: bool,
}

impl Args {
    /// Text to synthesize, from TEXT or --example
    pub fn input_text(&self) -> Result<String, String> {
        match (self.example, &self.text) {
            (Some(n), _) => EXAMPLE_PHRASES
                .get(n.wrapping_sub(1))
                .map(|s| s.to_string())
                .ok_or_else(|| {
                    format!("Example must be 1-{}, got {}", EXAMPLE_PHRASES.len(), n)
                }),
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Ok(String::new()),
        }
    }

    /// Synthesis client configuration from the arguments
    pub fn synthesis_config(&self) -> SynthesisConfig {
        SynthesisConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            ..SynthesisConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["kontho", "hello"]).unwrap();
        assert_eq!(args.voice, Voice::Kore);
        assert_eq!(args.emotion, Emotion::Neutral);
        assert_eq!(args.sample_rate, 24000);
        assert_eq!(args.channels, 1);
        assert_eq!(args.input_text().unwrap(), "hello");
    }

    #[test]
    fn test_voice_and_emotion_values() {
        let args =
            Args::try_parse_from(["kontho", "x", "--voice", "fenrir", "--emotion", "sad"]).unwrap();
        assert_eq!(args.voice, Voice::Fenrir);
        assert_eq!(args.emotion, Emotion::Sad);
    }

    #[test]
    fn test_example_phrase() {
        let args = Args::try_parse_from(["kontho", "--example", "2"]).unwrap();
        assert_eq!(args.input_text().unwrap(), EXAMPLE_PHRASES[1]);

        let args = Args::try_parse_from(["kontho", "--example", "0"]).unwrap();
        assert!(args.input_text().is_err());

        let args = Args::try_parse_from(["kontho", "--example", "9"]).unwrap();
        assert!(args.input_text().is_err());
    }

    #[test]
    fn test_synthesis_config() {
        let args =
            Args::try_parse_from(["kontho", "x", "--api-key", "k", "--model", "m"]).unwrap();
        let config = args.synthesis_config();
        assert_eq!(config.api_key(), Some("k"));
        assert_eq!(config.model, "m");
    }
}
